//! SDF primitive shapes
//!
//! Boxes and spheres are centered at the origin; the Z-up solids of
//! revolution stand on the XY plane. [`SdfKernel`](super::SdfKernel) places
//! each one where the descriptor conventions expect it.

use super::{Aabb, Sdf};
use glam::{Vec2, Vec3};

// ============================================================================
// Constructor functions (ergonomic API)
// ============================================================================

/// Create a sphere with given radius
pub fn sphere(radius: f32) -> Sphere {
    Sphere::new(radius)
}

/// Create a box with given half-extents (size/2 in each direction)
pub fn box3(half_extents: Vec3) -> Box3 {
    Box3::new(half_extents)
}

/// Create a Z-axis cylinder standing on the XY plane
pub fn cylinder(radius: f32, height: f32) -> Cylinder {
    Cylinder::new(radius, height)
}

/// Create a Z-axis truncated cone: `radius1` at z = 0, `radius2` at z = height
pub fn capped_cone(radius1: f32, radius2: f32, height: f32) -> CappedCone {
    CappedCone::new(radius1, radius2, height)
}

/// Create a torus lying in the XY plane
pub fn torus(major_radius: f32, minor_radius: f32) -> Torus {
    Torus::new(major_radius, minor_radius)
}

/// Create a right-angular wedge
pub fn wedge(width: f32, depth: f32, height: f32, ltx: f32) -> Wedge {
    Wedge::new(width, depth, height, ltx)
}

/// Create an ellipse curve in the XY plane
pub fn ellipse(radius_major: f32, radius_minor: f32) -> Ellipse {
    Ellipse::new(radius_major, radius_minor)
}

// ============================================================================
// Primitive Structs
// ============================================================================

/// Sphere centered at origin
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub radius: f32,
}

impl Sphere {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }
}

impl Sdf for Sphere {
    fn distance(&self, p: Vec3) -> f32 {
        p.length() - self.radius
    }

    fn bounds(&self) -> Aabb {
        Aabb::cube(self.radius)
    }
}

/// Axis-aligned box (rectangular prism) centered at origin
#[derive(Debug, Clone, Copy)]
pub struct Box3 {
    pub half_extents: Vec3,
}

impl Box3 {
    pub fn new(half_extents: Vec3) -> Self {
        Self { half_extents }
    }
}

impl Sdf for Box3 {
    fn distance(&self, p: Vec3) -> f32 {
        let q = p.abs() - self.half_extents;
        q.max(Vec3::ZERO).length() + q.x.max(q.y.max(q.z)).min(0.0)
    }

    fn bounds(&self) -> Aabb {
        Aabb::new(-self.half_extents, self.half_extents)
    }
}

/// Cylinder along +Z with its base disc on z = 0
#[derive(Debug, Clone, Copy)]
pub struct Cylinder {
    pub radius: f32,
    pub half_height: f32,
}

impl Cylinder {
    pub fn new(radius: f32, height: f32) -> Self {
        Self {
            radius,
            half_height: height * 0.5,
        }
    }
}

impl Sdf for Cylinder {
    fn distance(&self, p: Vec3) -> f32 {
        let d = Vec2::new(p.truncate().length(), p.z - self.half_height).abs()
            - Vec2::new(self.radius, self.half_height);
        d.x.max(d.y).min(0.0) + d.max(Vec2::ZERO).length()
    }

    fn bounds(&self) -> Aabb {
        Aabb::new(
            Vec3::new(-self.radius, -self.radius, 0.0),
            Vec3::new(self.radius, self.radius, 2.0 * self.half_height),
        )
    }
}

/// Truncated cone along +Z; `radius2` may be zero for a pointed cone
#[derive(Debug, Clone, Copy)]
pub struct CappedCone {
    pub radius1: f32,
    pub radius2: f32,
    pub half_height: f32,
}

impl CappedCone {
    pub fn new(radius1: f32, radius2: f32, height: f32) -> Self {
        Self {
            radius1,
            radius2,
            half_height: height * 0.5,
        }
    }
}

impl Sdf for CappedCone {
    fn distance(&self, p: Vec3) -> f32 {
        let h = self.half_height;
        let q = Vec2::new(p.truncate().length(), p.z - h);
        let k1 = Vec2::new(self.radius2, h);
        let k2 = Vec2::new(self.radius2 - self.radius1, 2.0 * h);
        let cap_radius = if q.y < 0.0 { self.radius1 } else { self.radius2 };
        let ca = Vec2::new(q.x - q.x.min(cap_radius), q.y.abs() - h);
        let cb = q - k1 + k2 * ((k1 - q).dot(k2) / k2.length_squared()).clamp(0.0, 1.0);
        let s = if cb.x < 0.0 && ca.y < 0.0 { -1.0 } else { 1.0 };
        s * ca.length_squared().min(cb.length_squared()).sqrt()
    }

    fn bounds(&self) -> Aabb {
        let r = self.radius1.max(self.radius2);
        Aabb::new(
            Vec3::new(-r, -r, 0.0),
            Vec3::new(r, r, 2.0 * self.half_height),
        )
    }
}

/// Torus lying in the XY plane around the Z axis
#[derive(Debug, Clone, Copy)]
pub struct Torus {
    pub major_radius: f32,
    pub minor_radius: f32,
}

impl Torus {
    pub fn new(major_radius: f32, minor_radius: f32) -> Self {
        Self {
            major_radius,
            minor_radius,
        }
    }
}

impl Sdf for Torus {
    fn distance(&self, p: Vec3) -> f32 {
        let q = Vec2::new(p.truncate().length() - self.major_radius, p.z);
        q.length() - self.minor_radius
    }

    fn bounds(&self) -> Aabb {
        let r = self.major_radius + self.minor_radius;
        Aabb::new(
            Vec3::new(-r, -r, -self.minor_radius),
            Vec3::new(r, r, self.minor_radius),
        )
    }
}

/// Right-angular wedge
///
/// The XY profile is the trapezoid `(0,0) (width,0) (ltx,depth) (0,depth)`,
/// extruded over `0 <= z <= height`. A zero `ltx` collapses it to a
/// triangle.
#[derive(Debug, Clone)]
pub struct Wedge {
    profile: Vec<Vec2>,
    pub width: f32,
    pub depth: f32,
    pub half_height: f32,
}

impl Wedge {
    pub fn new(width: f32, depth: f32, height: f32, ltx: f32) -> Self {
        let mut profile = vec![Vec2::ZERO, Vec2::new(width, 0.0)];
        if ltx > 0.0 {
            profile.push(Vec2::new(ltx, depth));
        }
        profile.push(Vec2::new(0.0, depth));
        Self {
            profile,
            width,
            depth,
            half_height: height * 0.5,
        }
    }
}

/// Signed distance to a closed polygon (winding-number sign test)
fn polygon_distance(vertices: &[Vec2], p: Vec2) -> f32 {
    let mut d = (p - vertices[0]).length_squared();
    let mut s = 1.0;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let e = vertices[j] - vertices[i];
        let w = p - vertices[i];
        let b = w - e * (w.dot(e) / e.length_squared()).clamp(0.0, 1.0);
        d = d.min(b.length_squared());

        let c = [
            p.y >= vertices[i].y,
            p.y < vertices[j].y,
            e.x * w.y > e.y * w.x,
        ];
        if c.iter().all(|&v| v) || c.iter().all(|&v| !v) {
            s = -s;
        }
        j = i;
    }
    s * d.sqrt()
}

impl Sdf for Wedge {
    fn distance(&self, p: Vec3) -> f32 {
        let d = polygon_distance(&self.profile, p.truncate());
        let w = Vec2::new(d, (p.z - self.half_height).abs() - self.half_height);
        w.x.max(w.y).min(0.0) + w.max(Vec2::ZERO).length()
    }

    fn bounds(&self) -> Aabb {
        let max_x = self.profile.iter().fold(0.0_f32, |m, v| m.max(v.x));
        Aabb::new(
            Vec3::ZERO,
            Vec3::new(max_x, self.depth, 2.0 * self.half_height),
        )
    }
}

/// Ellipse curve in the XY plane, major axis along X
///
/// A curve encloses no volume, so the distance is never negative.
#[derive(Debug, Clone, Copy)]
pub struct Ellipse {
    pub radii: Vec2,
}

impl Ellipse {
    pub fn new(radius_major: f32, radius_minor: f32) -> Self {
        Self {
            radii: Vec2::new(radius_major, radius_minor),
        }
    }
}

impl Sdf for Ellipse {
    fn distance(&self, p: Vec3) -> f32 {
        let q = p.truncate();
        let k1 = (q / (self.radii * self.radii)).length();
        let in_plane = if k1 > 0.0 {
            let k0 = (q / self.radii).length();
            k0 * (k0 - 1.0) / k1
        } else {
            -self.radii.min_element()
        };
        Vec2::new(in_plane, p.z).length()
    }

    fn bounds(&self) -> Aabb {
        Aabb::new(self.radii.extend(0.0) * -1.0, self.radii.extend(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sphere_distance_is_radial() {
        let s = sphere(2.0);
        assert_relative_eq!(s.distance(Vec3::ZERO), -2.0);
        assert_relative_eq!(s.distance(Vec3::new(3.0, 0.0, 0.0)), 1.0);
    }

    #[test]
    fn box_distance_on_faces() {
        let b = box3(Vec3::splat(1.0));
        assert_relative_eq!(b.distance(Vec3::new(2.0, 0.0, 0.0)), 1.0);
        assert_relative_eq!(b.distance(Vec3::ZERO), -1.0);
    }

    #[test]
    fn cylinder_stands_on_xy_plane() {
        let c = cylinder(1.0, 4.0);
        assert!(c.distance(Vec3::new(0.0, 0.0, 0.5)) < 0.0);
        assert!(c.distance(Vec3::new(0.0, 0.0, 3.5)) < 0.0);
        assert!(c.distance(Vec3::new(0.0, 0.0, -0.5)) > 0.0);
        assert_relative_eq!(c.distance(Vec3::new(2.0, 0.0, 2.0)), 1.0);
        assert_eq!(c.bounds().min.z, 0.0);
        assert_eq!(c.bounds().max.z, 4.0);
    }

    #[test]
    fn capped_cone_tapers_upward() {
        let c = capped_cone(2.0, 0.0, 2.0);
        // Wide at the base, pointed at the top
        assert!(c.distance(Vec3::new(1.5, 0.0, 0.1)) < 0.0);
        assert!(c.distance(Vec3::new(1.5, 0.0, 1.9)) > 0.0);
        assert!(c.distance(Vec3::new(0.0, 0.0, 1.9)) < 0.0);
        assert!(c.distance(Vec3::new(0.0, 0.0, 2.1)) > 0.0);
    }

    #[test]
    fn capped_cone_with_equal_radii_is_a_cylinder() {
        let cone = capped_cone(1.0, 1.0, 2.0);
        let cyl = cylinder(1.0, 2.0);
        for p in [
            Vec3::new(0.5, 0.0, 1.0),
            Vec3::new(3.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 5.0),
        ] {
            assert_relative_eq!(cone.distance(p), cyl.distance(p), epsilon = 1e-5);
        }
    }

    #[test]
    fn torus_lies_in_xy_plane() {
        let t = torus(2.0, 0.5);
        assert!(t.distance(Vec3::new(2.0, 0.0, 0.0)) < 0.0);
        assert!(t.distance(Vec3::new(0.0, 2.0, 0.0)) < 0.0);
        assert!(t.distance(Vec3::new(0.0, 0.0, 2.0)) > 0.0);
        assert!(t.distance(Vec3::ZERO) > 0.0);
    }

    #[test]
    fn wedge_top_face_is_narrower() {
        let w = wedge(2.0, 2.0, 1.0, 0.5);
        // Near the base every x up to width is inside
        assert!(w.distance(Vec3::new(1.8, 0.1, 0.5)) < 0.0);
        // Near the top only x up to ltx is inside
        assert!(w.distance(Vec3::new(1.8, 1.9, 0.5)) > 0.0);
        assert!(w.distance(Vec3::new(0.2, 1.9, 0.5)) < 0.0);
        assert!(w.distance(Vec3::new(0.2, 1.0, 1.5)) > 0.0);
    }

    #[test]
    fn triangular_wedge_has_finite_distance() {
        let w = wedge(1.0, 1.0, 1.0, 0.0);
        let d = w.distance(Vec3::new(0.2, 0.2, 0.5));
        assert!(d.is_finite());
        assert!(d < 0.0);
        assert!(w.distance(Vec3::new(0.8, 0.8, 0.5)) > 0.0);
    }

    #[test]
    fn ellipse_is_never_inside() {
        let e = ellipse(2.0, 1.0);
        assert!(e.distance(Vec3::ZERO) > 0.0);
        assert_relative_eq!(e.distance(Vec3::new(2.0, 0.0, 0.0)), 0.0, epsilon = 1e-5);
        assert_relative_eq!(e.distance(Vec3::new(0.0, 1.0, 0.0)), 0.0, epsilon = 1e-5);
        assert!(e.distance(Vec3::new(0.0, 0.0, 1.0)) >= 1.0 - 1e-5);
    }
}
