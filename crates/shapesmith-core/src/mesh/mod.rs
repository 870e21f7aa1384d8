//! Mesh generation from SDFs using Surface Nets
//!
//! Uses Rayon for parallel sampling of the distance field.

use crate::config::{KernelConfig, MAX_VOLUME_RESOLUTION};
use crate::kernel::KernelError;
use crate::sdf::{Aabb, Sdf};
use fast_surface_nets::ndshape::{RuntimeShape, Shape};
use fast_surface_nets::{SurfaceNetsBuffer, surface_nets};
use glam::{DVec3, Vec3};
use rayon::prelude::*;
use tracing::{debug, info, trace};

/// A vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// A triangle mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Bounds of the vertex positions, `None` for an empty mesh
    pub fn bounds(&self) -> Option<Aabb> {
        if self.vertices.is_empty() {
            return None;
        }
        let (min, max) = self.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(min, max), v| {
                let p = Vec3::from_array(v.position);
                (min.min(p), max.max(p))
            },
        );
        Some(Aabb::new(min, max))
    }

    /// Enclosed volume via the divergence theorem
    ///
    /// Only meaningful for closed meshes. The magnitude is returned so the
    /// result does not depend on triangle winding.
    pub fn volume(&self) -> f64 {
        let signed: f64 = self
            .indices
            .chunks_exact(3)
            .map(|tri| {
                let p = |i: u32| Vec3::from_array(self.vertices[i as usize].position).as_dvec3();
                let (a, b, c) = (p(tri[0]), p(tri[1]), p(tri[2]));
                a.dot(b.cross(c))
            })
            .sum();
        (signed / 6.0).abs()
    }
}

/// Fewest cells across the thinnest non-zero axis of a shape's bounds
const MIN_AXIS_CELLS: f64 = 4.0;

/// Most lattice points a single mesh may sample
pub const MAX_LATTICE_POINTS: u64 = 1 << 27;

/// Regular sampling lattice covering a shape's bounds plus padding
struct Grid {
    origin: Vec3,
    step: f32,
    dims: [u32; 3],
}

impl Grid {
    fn covering(bounds: &Aabb, resolution: u32, padding: u32) -> Result<Self, KernelError> {
        // Extents in f64 so bounds near f32::MAX do not overflow
        let size = bounds.max.as_dvec3() - bounds.min.as_dvec3();
        let thinnest = size
            .to_array()
            .into_iter()
            .filter(|&extent| extent > 0.0)
            .fold(f64::INFINITY, f64::min);
        // Thin solids would otherwise fall between samples
        let step = (size.max_element() / f64::from(resolution.max(1)))
            .min(thinnest / MIN_AXIS_CELLS)
            .max(f64::from(f32::MIN_POSITIVE));

        let cells = (size / step).ceil();
        let dims = [cells.x, cells.y, cells.z].map(|c| c + 1.0 + 2.0 * f64::from(padding));
        let points = dims.iter().product::<f64>();
        // NaN comes from non-finite bounds
        if points.is_nan() || points > MAX_LATTICE_POINTS as f64 {
            return Err(KernelError::new(format!(
                "sampling lattice {:.0}x{:.0}x{:.0} exceeds {MAX_LATTICE_POINTS} points",
                dims[0], dims[1], dims[2]
            )));
        }

        Ok(Self {
            origin: (bounds.min.as_dvec3() - DVec3::splat(f64::from(padding) * step)).as_vec3(),
            step: step as f32,
            dims: dims.map(|d| d as u32),
        })
    }

    fn point(&self, [x, y, z]: [u32; 3]) -> Vec3 {
        self.origin + Vec3::new(x as f32, y as f32, z as f32) * self.step
    }
}

/// Generate a mesh from an SDF using Surface Nets
///
/// The lattice spans the SDF's bounds with `mesh_resolution` cells along
/// the longest axis, refined so the thinnest axis still gets a few cells,
/// plus at least one cell of padding so the outermost samples are always
/// outside and the surface closes. Fails when that lattice would exceed
/// [`MAX_LATTICE_POINTS`].
pub fn generate_mesh<S: Sdf + ?Sized>(
    sdf: &S,
    config: &KernelConfig,
) -> Result<Mesh, KernelError> {
    let bounds = sdf.bounds();
    if bounds.is_empty() {
        debug!("Empty bounds, skipping meshing");
        return Ok(Mesh::new());
    }

    let grid = Grid::covering(&bounds, config.mesh_resolution, config.mesh_padding.max(1))?;
    let shape = RuntimeShape::<u32, 3>::new(grid.dims);

    // === Phase 1: Parallel SDF sampling ===
    let values: Vec<f32> = (0..shape.size())
        .into_par_iter()
        .map(|idx| sdf.distance(grid.point(shape.delinearize(idx))))
        .collect();

    trace!(dims = ?grid.dims, samples = values.len(), "Sampled distance field");

    // === Phase 2: Surface extraction ===
    let mut buffer = SurfaceNetsBuffer::default();
    surface_nets(
        &values,
        &shape,
        [0, 0, 0],
        grid.dims.map(|d| d - 1),
        &mut buffer,
    );

    // Positions are in lattice coordinates
    let vertices = buffer
        .positions
        .iter()
        .zip(&buffer.normals)
        .map(|(pos, normal)| {
            Vertex::new(
                grid.origin + Vec3::from_array(*pos) * grid.step,
                Vec3::from_array(*normal).normalize_or_zero(),
            )
        })
        .collect();

    let mesh = Mesh {
        vertices,
        indices: buffer.indices,
    };

    info!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "Surface nets complete"
    );

    Ok(mesh)
}

/// Estimate enclosed volume by sampling cell centers over the SDF's bounds
///
/// Uses `resolution` cells per axis, capped at `MAX_VOLUME_RESOLUTION`;
/// each center with negative distance contributes one cell volume.
pub fn estimate_volume<S: Sdf + ?Sized>(sdf: &S, resolution: u32) -> f64 {
    let bounds = sdf.bounds();
    if bounds.is_empty() {
        return 0.0;
    }

    let res = resolution.clamp(1, MAX_VOLUME_RESOLUTION);
    let cell = (bounds.max.as_dvec3() - bounds.min.as_dvec3()) / f64::from(res);
    let n = res as usize;
    let min = bounds.min.as_dvec3();

    let inside: usize = (0..n * n * n)
        .into_par_iter()
        .filter(|&idx| {
            let x = idx % n;
            let y = (idx / n) % n;
            let z = idx / (n * n);
            let center = min + (DVec3::new(x as f64, y as f64, z as f64) + 0.5) * cell;
            sdf.distance(center.as_vec3()) < 0.0
        })
        .count();

    inside as f64 * cell.x * cell.y * cell.z
}
