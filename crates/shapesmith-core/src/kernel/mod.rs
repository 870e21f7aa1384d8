//! Capability interface to the geometry kernel
//!
//! The builder never looks inside a shape. Everything it does to geometry
//! goes through [`GeometryKernel`], so any kernel (the bundled
//! [`SdfKernel`](crate::sdf::SdfKernel), a B-rep binding, a test double)
//! can sit behind it.

pub mod trace;

use crate::boolean::BooleanOp;
use crate::primitive::Primitive;
use crate::transform::Transform;
use glam::DVec3;
use thiserror::Error;

/// A failure reported by the geometry kernel
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct KernelError {
    pub message: String,
}

impl KernelError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The four operations the builder needs from a geometry kernel.
///
/// `Shape` is an opaque handle: cheap to clone, owned by the kernel's
/// representation. Kernels shared across worker threads must be
/// `Send + Sync`; otherwise give each thread its own instance.
pub trait GeometryKernel {
    /// Opaque geometric object
    type Shape: Clone;
    /// Triangulated surface produced by tessellation
    type Mesh;

    /// Construct an untransformed primitive solid or curve
    fn make_primitive(&self, primitive: &Primitive) -> Result<Self::Shape, KernelError>;

    /// Apply one affine transform, returning the transformed shape
    fn apply_transform(
        &self,
        shape: &Self::Shape,
        transform: &Transform,
    ) -> Result<Self::Shape, KernelError>;

    /// Combine two shapes with a boolean set operation
    fn combine(
        &self,
        op: BooleanOp,
        left: &Self::Shape,
        right: &Self::Shape,
    ) -> Result<Self::Shape, KernelError>;

    /// Triangulate the boundary of a solid
    fn tessellate(&self, shape: &Self::Shape) -> Result<Self::Mesh, KernelError>;
}

/// Geometric queries used to inspect build results
pub trait KernelIntrospect: GeometryKernel {
    /// Axis-aligned bounds, `None` when the shape is empty
    fn bounds(&self, shape: &Self::Shape) -> Option<Bounds>;

    /// Enclosed volume (zero for curves and empty results)
    fn volume(&self, shape: &Self::Shape) -> f64;
}

/// Axis-aligned bounding box in model space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: DVec3,
    pub max: DVec3,
}

impl Bounds {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }
}
