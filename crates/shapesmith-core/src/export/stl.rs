//! STL file export (Binary format)
//!
//! STL is the usual interchange format for 3D printing. Binary STL is more
//! compact and more widely supported than ASCII STL.

use crate::error::ExportError;
use crate::mesh::Mesh;
use glam::Vec3;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write a mesh as binary STL
///
/// Binary STL format:
/// - 80 bytes: Header (arbitrary text)
/// - 4 bytes: Number of triangles (u32 little-endian)
/// - For each triangle (50 bytes):
///   - 12 bytes: Normal vector (3 x f32 little-endian)
///   - 36 bytes: 3 vertices (9 x f32 little-endian)
///   - 2 bytes: Attribute byte count (usually 0)
pub fn write_stl<W: Write>(mesh: &Mesh, mut writer: W) -> io::Result<()> {
    // Header (80 bytes, padded with spaces)
    let header = format!(
        "Shapesmith STL Export - {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    let mut header_bytes = [b' '; 80];
    let header_len = header.len().min(80);
    header_bytes[..header_len].copy_from_slice(&header.as_bytes()[..header_len]);
    writer.write_all(&header_bytes)?;

    writer.write_all(&(mesh.triangle_count() as u32).to_le_bytes())?;

    for tri in mesh.indices.chunks_exact(3) {
        let [p0, p1, p2] =
            [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(mesh.vertices[i as usize].position));

        // STL expects face normals; default up if degenerate
        let normal = (p1 - p0).cross(p2 - p0).try_normalize().unwrap_or(Vec3::Z);

        for v in [normal, p0, p1, p2] {
            for c in v.to_array() {
                writer.write_all(&c.to_le_bytes())?;
            }
        }

        // Attribute byte count
        writer.write_all(&0u16.to_le_bytes())?;
    }

    writer.flush()
}

/// Export a mesh to a binary STL file
pub fn export_stl(mesh: &Mesh, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_stl(mesh, BufWriter::new(file))?;
    Ok(())
}
