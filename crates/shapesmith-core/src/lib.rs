//! # Shapesmith Core
//!
//! Declarative CSG: JSON shape descriptors in, solids and meshes out.
//!
//! A descriptor names a shape kind, its parameters, an optional `origin`
//! and a list of transforms. The builder turns it into a shape through any
//! [`GeometryKernel`](kernel::GeometryKernel); boolean kinds fold an
//! ordered list of already built shapes.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shapesmith_core::prelude::*;
//!
//! let kernel = SdfKernel::default();
//! let desc = Descriptor::from_json(serde_json::json!({
//!     "type": "cuboid", "width": 2, "height": 2, "depth": 2,
//!     "origin": [-1, -1, -1],
//! }))?;
//! let built = build(&kernel, &desc)?;
//! built.mesh().unwrap().export("cube.stl")?;
//! ```
//!
//! ## Units and Conventions
//!
//! - **Distances**: Arbitrary model units
//! - **Angles**: Transform records use **degrees**
//! - **Coordinate system**: Right-handed, Z-up

pub mod boolean;
pub mod builder;
pub mod config;
pub mod descriptor;
pub mod export;
pub mod kernel;
pub mod mesh;
pub mod primitive;
pub mod sdf;
pub mod transform;

mod error;

pub use error::{BuildError, ExportError, Result};

/// Prelude module for convenient imports
pub mod prelude {
    // Descriptors and building
    pub use crate::boolean::BooleanOp;
    pub use crate::builder::{Built, build, build_boolean, dispatch};
    pub use crate::descriptor::{Descriptor, ShapeKind};
    pub use crate::primitive::{Dimension, Primitive};
    pub use crate::transform::Transform;

    // Kernels
    pub use crate::config::KernelConfig;
    pub use crate::kernel::{Bounds, GeometryKernel, KernelError, KernelIntrospect};
    pub use crate::sdf::{SdfKernel, SdfShape, Topology};

    // Meshes and export
    pub use crate::export::{ExportFormat, MeshExport};
    pub use crate::mesh::{Mesh, Vertex};

    // Error handling
    pub use crate::{BuildError, ExportError, Result};
}
