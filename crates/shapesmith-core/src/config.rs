//! Sampling configuration for the SDF kernel

use serde::{Deserialize, Serialize};

/// Largest accepted `mesh_resolution`
pub const MAX_MESH_RESOLUTION: u32 = 500;
/// Largest accepted `volume_resolution`
pub const MAX_VOLUME_RESOLUTION: u32 = 512;
/// Largest accepted `mesh_padding`
pub const MAX_MESH_PADDING: u32 = 4;

/// Resolution settings for meshing and volume queries
///
/// ```rust,ignore
/// let config = KernelConfig::default().with_mesh_resolution(96);
/// let kernel = SdfKernel::new(config);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Grid cells along the longest axis of a shape's bounds when meshing
    pub mesh_resolution: u32,
    /// Sample cells per axis when estimating volume
    pub volume_resolution: u32,
    /// Extra cells of margin around the bounds when meshing
    pub mesh_padding: u32,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            mesh_resolution: 64,
            volume_resolution: 64,
            mesh_padding: 2,
        }
    }
}

impl KernelConfig {
    pub fn with_mesh_resolution(mut self, resolution: u32) -> Self {
        self.mesh_resolution = resolution.clamp(1, MAX_MESH_RESOLUTION);
        self
    }

    pub fn with_volume_resolution(mut self, resolution: u32) -> Self {
        self.volume_resolution = resolution.clamp(1, MAX_VOLUME_RESOLUTION);
        self
    }

    pub fn with_mesh_padding(mut self, padding: u32) -> Self {
        self.mesh_padding = padding.min(MAX_MESH_PADDING);
        self
    }

    /// Pull every setting into its accepted range
    ///
    /// Deserialized configs skip the `with_*` builders, so the kernel runs
    /// its config through this on construction.
    pub fn clamped(self) -> Self {
        let (mesh, volume, padding) = (
            self.mesh_resolution,
            self.volume_resolution,
            self.mesh_padding,
        );
        self.with_mesh_resolution(mesh)
            .with_volume_resolution(volume)
            .with_mesh_padding(padding)
    }
}
