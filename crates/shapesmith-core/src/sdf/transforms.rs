//! SDF rigid transforms and uniform scale
//!
//! Each wrapper evaluates its inner SDF at the inverse-mapped point.
//! Rotation and scale act about the origin; pivots are handled by
//! sandwiching them between translations.

use super::{Aabb, Sdf};
use glam::{Quat, Vec3};

/// Translation transform
pub struct Translate<S: Sdf> {
    pub inner: S,
    pub offset: Vec3,
}

impl<S: Sdf> Translate<S> {
    pub fn new(inner: S, offset: Vec3) -> Self {
        Self { inner, offset }
    }
}

impl<S: Sdf> Sdf for Translate<S> {
    fn distance(&self, p: Vec3) -> f32 {
        self.inner.distance(p - self.offset)
    }

    fn bounds(&self) -> Aabb {
        self.inner.bounds().map_corners(|c| c + self.offset)
    }
}

/// Rotation about the origin
pub struct Rotate<S: Sdf> {
    pub inner: S,
    pub rotation: Quat,
    inverse: Quat,
}

impl<S: Sdf> Rotate<S> {
    pub fn new(inner: S, rotation: Quat) -> Self {
        Self {
            inner,
            rotation,
            inverse: rotation.inverse(),
        }
    }
}

impl<S: Sdf> Sdf for Rotate<S> {
    fn distance(&self, p: Vec3) -> f32 {
        // Rotate point into local space
        self.inner.distance(self.inverse * p)
    }

    fn bounds(&self) -> Aabb {
        self.inner.bounds().map_corners(|c| self.rotation * c)
    }
}

/// Uniform scale about the origin
pub struct Scale<S: Sdf> {
    pub inner: S,
    pub factor: f32,
}

impl<S: Sdf> Scale<S> {
    pub fn new(inner: S, factor: f32) -> Self {
        Self { inner, factor }
    }
}

impl<S: Sdf> Sdf for Scale<S> {
    fn distance(&self, p: Vec3) -> f32 {
        self.inner.distance(p / self.factor) * self.factor
    }

    fn bounds(&self) -> Aabb {
        self.inner.bounds().map_corners(|c| c * self.factor)
    }
}

/// Reflection across the plane through `point` with unit `normal`
///
/// Unlike a symmetry fold this keeps only the mirror image.
pub struct Mirror<S: Sdf> {
    pub inner: S,
    pub point: Vec3,
    pub normal: Vec3,
}

impl<S: Sdf> Mirror<S> {
    pub fn new(inner: S, point: Vec3, normal: Vec3) -> Self {
        Self {
            inner,
            point,
            normal: normal.try_normalize().unwrap_or(Vec3::X),
        }
    }

    fn reflect(&self, p: Vec3) -> Vec3 {
        p - 2.0 * (p - self.point).dot(self.normal) * self.normal
    }
}

impl<S: Sdf> Sdf for Mirror<S> {
    fn distance(&self, p: Vec3) -> f32 {
        // A reflection is its own inverse
        self.inner.distance(self.reflect(p))
    }

    fn bounds(&self) -> Aabb {
        self.inner.bounds().map_corners(|c| self.reflect(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdf::primitives::{box3, sphere};
    use approx::assert_relative_eq;

    #[test]
    fn translate_moves_center() {
        let t = Translate::new(sphere(1.0), Vec3::new(3.0, 0.0, 0.0));
        assert_relative_eq!(t.distance(Vec3::new(3.0, 0.0, 0.0)), -1.0);
        assert_eq!(t.bounds().min, Vec3::new(2.0, -1.0, -1.0));
    }

    #[test]
    fn rotate_quarter_turn_swaps_extents() {
        let r = Rotate::new(
            box3(Vec3::new(2.0, 1.0, 1.0)),
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
        );
        assert!(r.distance(Vec3::new(0.0, 1.5, 0.0)) < 0.0);
        assert!(r.distance(Vec3::new(1.5, 0.0, 0.0)) > 0.0);
        let b = r.bounds();
        assert_relative_eq!(b.max.y, 2.0, epsilon = 1e-5);
        assert_relative_eq!(b.max.x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn scale_preserves_metric() {
        let s = Scale::new(sphere(1.0), 2.0);
        assert_relative_eq!(s.distance(Vec3::new(5.0, 0.0, 0.0)), 3.0);
        assert_eq!(s.bounds(), Aabb::cube(2.0));
    }

    #[test]
    fn mirror_keeps_only_the_image() {
        let shifted = Translate::new(sphere(1.0), Vec3::new(3.0, 0.0, 0.0));
        let m = Mirror::new(shifted, Vec3::ZERO, Vec3::X);
        assert!(m.distance(Vec3::new(-3.0, 0.0, 0.0)) < 0.0);
        assert!(m.distance(Vec3::new(3.0, 0.0, 0.0)) > 0.0);
        assert_relative_eq!(m.bounds().min.x, -4.0);
        assert_relative_eq!(m.bounds().max.x, -2.0);
    }

    #[test]
    fn mirror_about_offset_plane() {
        let m = Mirror::new(sphere(1.0), Vec3::new(2.0, 0.0, 0.0), Vec3::X);
        assert_relative_eq!(m.distance(Vec3::new(4.0, 0.0, 0.0)), -1.0);
    }
}
