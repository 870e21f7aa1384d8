//! SDF boolean operations

use super::{Aabb, Sdf};
use glam::Vec3;

/// Union of two SDFs (combine shapes)
pub struct Union<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
}

impl<A: Sdf, B: Sdf> Union<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: Sdf, B: Sdf> Sdf for Union<A, B> {
    fn distance(&self, p: Vec3) -> f32 {
        self.a.distance(p).min(self.b.distance(p))
    }

    fn bounds(&self) -> Aabb {
        self.a.bounds().union(&self.b.bounds())
    }
}

/// Subtraction of two SDFs (cut B from A)
pub struct Subtract<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
}

impl<A: Sdf, B: Sdf> Subtract<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: Sdf, B: Sdf> Sdf for Subtract<A, B> {
    fn distance(&self, p: Vec3) -> f32 {
        self.a.distance(p).max(-self.b.distance(p))
    }

    fn bounds(&self) -> Aabb {
        // Subtraction can only reduce, not expand
        self.a.bounds()
    }
}

/// Intersection of two SDFs (keep only overlap)
pub struct Intersect<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
}

impl<A: Sdf, B: Sdf> Intersect<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: Sdf, B: Sdf> Sdf for Intersect<A, B> {
    fn distance(&self, p: Vec3) -> f32 {
        self.a.distance(p).max(self.b.distance(p))
    }

    fn bounds(&self) -> Aabb {
        // Empty when the operands are disjoint
        self.a.bounds().intersection(&self.b.bounds())
    }
}
