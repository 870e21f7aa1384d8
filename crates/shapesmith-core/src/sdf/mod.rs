//! Signed distance functions: the reference geometry kernel's representation
//!
//! An SDF returns the distance from any point to the nearest surface:
//! negative inside, positive outside, zero on the surface. Shapes compose by
//! wrapping one another, and [`SdfKernel`] exposes them through the
//! [`GeometryKernel`](crate::kernel::GeometryKernel) interface.
//!
//! Conventions: Z is up and primitives sit where a B-rep kernel would put
//! them (cuboids and wedges start at the origin corner, cylinders and
//! cones stand on the XY plane).

pub mod kernel;
pub mod operations;
pub mod primitives;
pub mod transforms;

use crate::kernel::Bounds;
use glam::Vec3;
use std::sync::Arc;

pub use kernel::{SdfKernel, SdfShape, Topology};

/// The core SDF trait - any type that can compute distance from a point
pub trait Sdf: Send + Sync {
    /// Calculate the signed distance from point `p` to the surface.
    fn distance(&self, p: Vec3) -> f32;

    /// Bounding box containing every point where the distance is negative
    fn bounds(&self) -> Aabb;
}

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// A box containing nothing; the identity for [`Aabb::union`]
    pub fn empty() -> Self {
        Self::new(Vec3::splat(f32::MAX), Vec3::splat(f32::MIN))
    }

    /// Create a cube centered at origin
    pub fn cube(half_size: f32) -> Self {
        Self::new(Vec3::splat(-half_size), Vec3::splat(half_size))
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    /// Expand the bounding box by a margin
    pub fn expand(&self, margin: f32) -> Self {
        Self::new(
            self.min - Vec3::splat(margin),
            self.max + Vec3::splat(margin),
        )
    }

    /// Merge two bounding boxes
    pub fn union(&self, other: &Aabb) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Overlap of two bounding boxes, possibly empty
    pub fn intersection(&self, other: &Aabb) -> Self {
        Self::new(self.min.max(other.min), self.max.min(other.max))
    }

    /// Get the size of the bounding box
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Get the center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Bounds of this box's corners after mapping them through `f`
    pub fn map_corners(&self, f: impl Fn(Vec3) -> Vec3) -> Self {
        if self.is_empty() {
            return *self;
        }
        self.corners()
            .into_iter()
            .map(f)
            .fold(Self::empty(), |acc, p| Self::new(acc.min.min(p), acc.max.max(p)))
    }

    pub fn to_bounds(&self) -> Option<Bounds> {
        (!self.is_empty()).then(|| Bounds::new(self.min.as_dvec3(), self.max.as_dvec3()))
    }
}

/// A shared SDF that can be composed and transformed
#[derive(Clone)]
pub struct SdfNode {
    inner: Arc<dyn Sdf>,
}

impl SdfNode {
    /// Create a new SDF node from any type implementing Sdf
    pub fn new<S: Sdf + 'static>(sdf: S) -> Self {
        Self {
            inner: Arc::new(sdf),
        }
    }

    /// Whether two nodes share the same underlying SDF
    pub fn ptr_eq(&self, other: &SdfNode) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Sdf for SdfNode {
    fn distance(&self, p: Vec3) -> f32 {
        self.inner.distance(p)
    }

    fn bounds(&self) -> Aabb {
        self.inner.bounds()
    }
}

impl std::fmt::Debug for SdfNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdfNode")
            .field("bounds", &self.bounds())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_box_is_union_identity() {
        let b = Aabb::cube(1.0);
        assert!(Aabb::empty().is_empty());
        assert_eq!(Aabb::empty().union(&b), b);
    }

    #[test]
    fn disjoint_intersection_is_empty() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::splat(2.0), Vec3::splat(3.0));
        assert!(a.intersection(&b).is_empty());
        assert!(a.intersection(&b).to_bounds().is_none());
        assert!(!a.intersection(&a).is_empty());
    }

    #[test]
    fn map_corners_tracks_translation() {
        let b = Aabb::cube(1.0).map_corners(|p| p + Vec3::X);
        assert_eq!(b.min, Vec3::new(0.0, -1.0, -1.0));
        assert_eq!(b.max, Vec3::new(2.0, 1.0, 1.0));
    }
}
