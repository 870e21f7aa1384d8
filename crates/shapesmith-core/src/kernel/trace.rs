//! TraceKernel: a symbolic kernel for testing build order
//!
//! Shapes are expression strings such as `subtract(union(A, B), C)` and
//! every kernel call is recorded, so tests can check exactly which calls
//! the builder made and in what order without doing any geometry.

use super::{GeometryKernel, KernelError};
use crate::boolean::BooleanOp;
use crate::primitive::Primitive;
use crate::transform::Transform;
use parking_lot::Mutex;

/// Deterministic test double for [`GeometryKernel`]
#[derive(Debug, Default)]
pub struct TraceKernel {
    calls: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

impl TraceKernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call whose input expression contains `needle` fail
    pub fn failing_on(mut self, needle: impl Into<String>) -> Self {
        self.fail_on = Some(needle.into());
        self
    }

    /// Calls made so far, oldest first
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }

    fn check(&self, input: &str) -> Result<(), KernelError> {
        match &self.fail_on {
            Some(needle) if input.contains(needle.as_str()) => {
                Err(KernelError::new(format!("refusing to touch {input}")))
            }
            _ => Ok(()),
        }
    }
}

fn primitive_expr(primitive: &Primitive) -> String {
    match *primitive {
        Primitive::Cuboid {
            width,
            height,
            depth,
        } => format!("cuboid({width}, {height}, {depth})"),
        Primitive::Sphere { radius } => format!("sphere({radius})"),
        Primitive::Cylinder { radius, height } => format!("cylinder({radius}, {height})"),
        Primitive::Cone {
            radius1,
            radius2,
            height,
        } => format!("cone({radius1}, {radius2}, {height})"),
        Primitive::Wedge {
            width,
            height,
            depth,
            ltx,
        } => format!("wedge({width}, {height}, {depth}, {ltx})"),
        Primitive::Torus { radius1, radius2 } => format!("torus({radius1}, {radius2})"),
        Primitive::Ellipse {
            radius_major,
            radius_minor,
        } => format!("ellipse({radius_major}, {radius_minor})"),
    }
}

fn transform_expr(transform: &Transform, shape: &str) -> String {
    match transform {
        Transform::Translate { offset } => format!("translate{offset}({shape})"),
        Transform::Rotate {
            axis,
            angle,
            origin,
        } => format!("rotate{axis}@{origin}:{angle}({shape})"),
        Transform::Scale { factor, origin } => format!("scale@{origin}:{factor}({shape})"),
        Transform::Mirror { normal, origin } => format!("mirror{normal}@{origin}({shape})"),
    }
}

impl GeometryKernel for TraceKernel {
    type Shape = String;
    type Mesh = String;

    fn make_primitive(&self, primitive: &Primitive) -> Result<String, KernelError> {
        let expr = primitive_expr(primitive);
        self.record(format!("make {expr}"));
        self.check(&expr)?;
        Ok(expr)
    }

    fn apply_transform(
        &self,
        shape: &String,
        transform: &Transform,
    ) -> Result<String, KernelError> {
        self.record(format!("{} {shape}", transform.kind_name()));
        self.check(shape)?;
        Ok(transform_expr(transform, shape))
    }

    fn combine(&self, op: BooleanOp, left: &String, right: &String) -> Result<String, KernelError> {
        self.record(format!("{op} {left} {right}"));
        self.check(left)?;
        self.check(right)?;
        Ok(format!("{op}({left}, {right})"))
    }

    fn tessellate(&self, shape: &String) -> Result<String, KernelError> {
        self.record(format!("tessellate {shape}"));
        self.check(shape)?;
        Ok(format!("mesh({shape})"))
    }
}
