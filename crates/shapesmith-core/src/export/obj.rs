//! OBJ file export

use crate::error::ExportError;
use crate::mesh::Mesh;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write a mesh as Wavefront OBJ text
pub fn write_obj<W: Write>(mesh: &Mesh, mut writer: W) -> io::Result<()> {
    // Header
    writeln!(writer, "# Shapesmith OBJ Export")?;
    writeln!(writer, "# Vertices: {}", mesh.vertex_count())?;
    writeln!(writer, "# Triangles: {}", mesh.triangle_count())?;
    writeln!(writer)?;

    for v in &mesh.vertices {
        let [x, y, z] = v.position;
        writeln!(writer, "v {x} {y} {z}")?;
    }
    writeln!(writer)?;

    for v in &mesh.vertices {
        let [x, y, z] = v.normal;
        writeln!(writer, "vn {x} {y} {z}")?;
    }
    writeln!(writer)?;

    // Faces (OBJ uses 1-based indexing)
    for tri in mesh.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] + 1, tri[1] + 1, tri[2] + 1];
        writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
    }

    writer.flush()
}

/// Export a mesh to an OBJ file
pub fn export_obj(mesh: &Mesh, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_obj(mesh, BufWriter::new(file))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Vertex;
    use glam::Vec3;

    #[test]
    fn faces_are_one_based() {
        let mesh = Mesh {
            vertices: vec![
                Vertex::new(Vec3::ZERO, Vec3::Z),
                Vertex::new(Vec3::X, Vec3::Z),
                Vertex::new(Vec3::Y, Vec3::Z),
            ],
            indices: vec![0, 1, 2],
        };
        let mut out = Vec::new();
        write_obj(&mesh, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 3);
        assert_eq!(text.lines().filter(|l| l.starts_with("vn ")).count(), 3);
        assert!(text.contains("v 1 0 0"));
        assert!(text.contains("f 1//1 2//2 3//3"));
    }
}
