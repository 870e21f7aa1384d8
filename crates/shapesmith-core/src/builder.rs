//! Builder orchestration and tag dispatch
//!
//! Every shape goes through the same fixed sequence:
//!
//! 1. create the initial, unpositioned shape
//! 2. apply the descriptor's `origin`
//! 3. apply its transforms in order
//! 4. post-process by dimension (solids are tessellated, curves are not)
//!
//! Only step 1 and the dimension vary per kind, so positioning behaves the
//! same for every primitive and every boolean result.

use crate::boolean::{self, BooleanOp};
use crate::descriptor::{Descriptor, ShapeKind};
use crate::error::{BuildError, Result};
use crate::kernel::GeometryKernel;
use crate::primitive::{self, Dimension};
use crate::transform::{apply_origin, apply_transforms};
use serde_json::Map;
use tracing::debug;

/// The product of one build: the final shape, plus the mesh when the
/// shape is a solid
pub struct Built<K: GeometryKernel> {
    shape: K::Shape,
    mesh: Option<K::Mesh>,
    dimension: Dimension,
}

impl<K: GeometryKernel> Built<K> {
    pub fn shape(&self) -> &K::Shape {
        &self.shape
    }

    pub fn into_shape(self) -> K::Shape {
        self.shape
    }

    /// Tessellation side artifact; `None` for curves
    pub fn mesh(&self) -> Option<&K::Mesh> {
        self.mesh.as_ref()
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn into_parts(self) -> (K::Shape, Option<K::Mesh>) {
        (self.shape, self.mesh)
    }
}

impl<K: GeometryKernel> Clone for Built<K>
where
    K::Mesh: Clone,
{
    fn clone(&self) -> Self {
        Self {
            shape: self.shape.clone(),
            mesh: self.mesh.clone(),
            dimension: self.dimension,
        }
    }
}

impl<K: GeometryKernel> std::fmt::Debug for Built<K>
where
    K::Shape: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Built")
            .field("shape", &self.shape)
            .field("dimension", &self.dimension)
            .field("meshed", &self.mesh.is_some())
            .finish()
    }
}

/// Dimension-specific post-processing
fn post_process<K: GeometryKernel>(
    kernel: &K,
    shape: &K::Shape,
    dimension: Dimension,
) -> Result<Option<K::Mesh>> {
    match dimension {
        Dimension::Solid => Ok(Some(kernel.tessellate(shape)?)),
        Dimension::Curve => Ok(None),
    }
}

/// Run the fixed origin, transforms, post-process sequence over the shape
/// produced by `initial`
pub fn construct<K, F>(
    kernel: &K,
    descriptor: &Descriptor,
    dimension: Dimension,
    initial: F,
) -> Result<Built<K>>
where
    K: GeometryKernel,
    F: FnOnce(&K) -> Result<K::Shape>,
{
    let shape = initial(kernel)?;
    let shape = apply_origin(kernel, shape, descriptor)?;
    let shape = apply_transforms(kernel, shape, descriptor)?;
    let mesh = post_process(kernel, &shape, dimension)?;
    debug!(kind = %descriptor.kind(), ?dimension, "shape built");
    Ok(Built {
        shape,
        mesh,
        dimension,
    })
}

/// Build a primitive solid or curve from its descriptor
pub fn build<K: GeometryKernel>(kernel: &K, descriptor: &Descriptor) -> Result<Built<K>> {
    let primitive = primitive::from_descriptor(descriptor)?;
    debug!(kind = %descriptor.kind(), ?primitive, "building primitive");
    construct(kernel, descriptor, primitive.dimension(), |k| {
        Ok(k.make_primitive(&primitive)?)
    })
}

/// Build a boolean combination from its descriptor and resolved operands
///
/// The operands are folded first; the descriptor's origin and transforms
/// then position the folded result like any other solid.
pub fn build_boolean_descriptor<K: GeometryKernel>(
    kernel: &K,
    descriptor: &Descriptor,
    operands: &[K::Shape],
) -> Result<Built<K>> {
    let op = descriptor.kind().boolean_op().ok_or_else(|| {
        BuildError::invalid(
            "type",
            format!("'{}' is a primitive, not a boolean operation", descriptor.kind()),
        )
    })?;
    construct(kernel, descriptor, Dimension::Solid, |k| {
        boolean::fold(k, op, operands)
    })
}

/// Build any descriptor kind
///
/// Boolean kinds fold `operands`; primitive kinds take none.
pub fn dispatch<K: GeometryKernel>(
    kernel: &K,
    descriptor: &Descriptor,
    operands: &[K::Shape],
) -> Result<Built<K>> {
    match descriptor.kind() {
        ShapeKind::Union | ShapeKind::Subtract | ShapeKind::Intersect => {
            build_boolean_descriptor(kernel, descriptor, operands)
        }
        ShapeKind::Cuboid
        | ShapeKind::Sphere
        | ShapeKind::Cylinder
        | ShapeKind::Cone
        | ShapeKind::Wedge
        | ShapeKind::Torus
        | ShapeKind::Ellipse => {
            if !operands.is_empty() {
                return Err(BuildError::invalid(
                    "shapes",
                    format!("'{}' does not take operand shapes", descriptor.kind()),
                ));
            }
            build(kernel, descriptor)
        }
    }
}

/// Fold resolved operands with a boolean operator, without a descriptor
///
/// A single operand comes back unchanged; the result is still tessellated.
pub fn build_boolean<K: GeometryKernel>(
    kernel: &K,
    op: BooleanOp,
    operands: &[K::Shape],
) -> Result<Built<K>> {
    let descriptor = Descriptor::new(op.kind(), Map::new());
    build_boolean_descriptor(kernel, &descriptor, operands)
}
