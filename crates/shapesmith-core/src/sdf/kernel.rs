//! The bundled geometry kernel, backed by signed distance functions

use super::operations::{Intersect, Subtract, Union};
use super::primitives::{box3, capped_cone, cylinder, ellipse, sphere, torus, wedge};
use super::transforms::{Mirror, Rotate, Scale, Translate};
use super::{Sdf, SdfNode};
use crate::boolean::BooleanOp;
use crate::config::KernelConfig;
use crate::kernel::{Bounds, GeometryKernel, KernelError, KernelIntrospect};
use crate::mesh::{Mesh, estimate_volume, generate_mesh};
use crate::primitive::Primitive;
use crate::transform::Transform;
use glam::{DVec3, Quat, Vec3};

/// Whether an SDF bounds a volume or only traces a curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Solid,
    Curve,
}

/// Shape handle produced by [`SdfKernel`]
#[derive(Debug, Clone)]
pub struct SdfShape {
    node: SdfNode,
    topology: Topology,
}

impl SdfShape {
    fn solid(node: SdfNode) -> Self {
        Self {
            node,
            topology: Topology::Solid,
        }
    }

    pub fn node(&self) -> &SdfNode {
        &self.node
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Signed distance at a model-space point
    pub fn distance(&self, p: DVec3) -> f64 {
        f64::from(self.node.distance(p.as_vec3()))
    }

    /// Whether `p` lies strictly inside the solid; always false for curves
    pub fn contains(&self, p: DVec3) -> bool {
        self.topology == Topology::Solid && self.distance(p) < 0.0
    }

    fn map(&self, node: SdfNode) -> Self {
        Self {
            node,
            topology: self.topology,
        }
    }
}

/// Geometry kernel evaluating shapes as SDF trees
///
/// Stateless apart from its sampling configuration, so one instance can be
/// shared across threads.
#[derive(Debug, Clone, Default)]
pub struct SdfKernel {
    config: KernelConfig,
}

impl SdfKernel {
    /// Out-of-range settings are clamped, see [`KernelConfig::clamped`]
    pub fn new(config: KernelConfig) -> Self {
        Self {
            config: config.clamped(),
        }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }
}

/// Largest coordinate magnitude the f32 SDFs handle; squared lengths of
/// points this far out still fit in an f32
const MAX_COORDINATE: f64 = 1e18;

/// Smallest non-zero length; its square is still a normal f32
const MIN_LENGTH: f64 = 1e-18;

/// Narrow a length to the f32 the SDFs evaluate in
fn finite_f32(value: f64, what: &str) -> Result<f32, KernelError> {
    let magnitude = value.abs();
    if magnitude <= MAX_COORDINATE && (magnitude == 0.0 || magnitude >= MIN_LENGTH) {
        Ok(value as f32)
    } else {
        Err(KernelError::new(format!("{what} {value} is out of range")))
    }
}

fn finite_vec(v: DVec3, what: &str) -> Result<Vec3, KernelError> {
    if v.is_finite() && v.abs().max_element() <= MAX_COORDINATE {
        Ok(v.as_vec3())
    } else {
        Err(KernelError::new(format!("{what} {v} is out of range")))
    }
}

/// Wrap `node` so `op` acts about `pivot` instead of the origin
fn about_pivot(node: SdfNode, pivot: Vec3, op: impl FnOnce(SdfNode) -> SdfNode) -> SdfNode {
    if pivot == Vec3::ZERO {
        return op(node);
    }
    let centered = SdfNode::new(Translate::new(node, -pivot));
    SdfNode::new(Translate::new(op(centered), pivot))
}

impl GeometryKernel for SdfKernel {
    type Shape = SdfShape;
    type Mesh = Mesh;

    fn make_primitive(&self, primitive: &Primitive) -> Result<SdfShape, KernelError> {
        let node = match *primitive {
            Primitive::Cuboid {
                width,
                height,
                depth,
            } => {
                // Corner at the origin: width along X, depth along Y, height along Z
                let half = Vec3::new(
                    finite_f32(width, "width")?,
                    finite_f32(depth, "depth")?,
                    finite_f32(height, "height")?,
                ) * 0.5;
                SdfNode::new(Translate::new(box3(half), half))
            }
            Primitive::Sphere { radius } => SdfNode::new(sphere(finite_f32(radius, "radius")?)),
            Primitive::Cylinder { radius, height } => SdfNode::new(cylinder(
                finite_f32(radius, "radius")?,
                finite_f32(height, "height")?,
            )),
            Primitive::Cone {
                radius1,
                radius2,
                height,
            } => SdfNode::new(capped_cone(
                finite_f32(radius1, "radius1")?,
                finite_f32(radius2, "radius2")?,
                finite_f32(height, "height")?,
            )),
            Primitive::Wedge {
                width,
                height,
                depth,
                ltx,
            } => SdfNode::new(wedge(
                finite_f32(width, "width")?,
                finite_f32(depth, "depth")?,
                finite_f32(height, "height")?,
                finite_f32(ltx, "ltx")?,
            )),
            Primitive::Torus { radius1, radius2 } => SdfNode::new(torus(
                finite_f32(radius1, "radius1")?,
                finite_f32(radius2, "radius2")?,
            )),
            Primitive::Ellipse {
                radius_major,
                radius_minor,
            } => {
                let curve = ellipse(
                    finite_f32(radius_major, "radiusMajor")?,
                    finite_f32(radius_minor, "radiusMinor")?,
                );
                return Ok(SdfShape {
                    node: SdfNode::new(curve),
                    topology: Topology::Curve,
                });
            }
        };
        Ok(SdfShape::solid(node))
    }

    fn apply_transform(
        &self,
        shape: &SdfShape,
        transform: &Transform,
    ) -> Result<SdfShape, KernelError> {
        let node = shape.node.clone();
        let node = match *transform {
            Transform::Translate { offset } => {
                SdfNode::new(Translate::new(node, finite_vec(offset, "translation")?))
            }
            Transform::Rotate {
                axis,
                angle,
                origin,
            } => {
                let Some(axis) = axis.as_vec3().try_normalize() else {
                    return Err(KernelError::new("rotation axis must be non-zero"));
                };
                let turns = angle % 360.0;
                if !turns.is_finite() {
                    return Err(KernelError::new(format!(
                        "rotation angle must be finite, got {angle}"
                    )));
                }
                let rotation = Quat::from_axis_angle(axis, turns.to_radians() as f32);
                about_pivot(node, finite_vec(origin, "pivot")?, |n| {
                    SdfNode::new(Rotate::new(n, rotation))
                })
            }
            Transform::Scale { factor, origin } => {
                if !(factor.is_finite() && factor > 0.0) {
                    return Err(KernelError::new(format!(
                        "scale factor must be positive, got {factor}"
                    )));
                }
                let factor = finite_f32(factor, "scale factor")?;
                about_pivot(node, finite_vec(origin, "pivot")?, |n| {
                    SdfNode::new(Scale::new(n, factor))
                })
            }
            Transform::Mirror { normal, origin } => {
                if normal.length_squared() == 0.0 {
                    return Err(KernelError::new("mirror normal must be non-zero"));
                }
                SdfNode::new(Mirror::new(
                    node,
                    finite_vec(origin, "mirror origin")?,
                    finite_vec(normal, "mirror normal")?,
                ))
            }
        };
        Ok(shape.map(node))
    }

    fn combine(
        &self,
        op: BooleanOp,
        left: &SdfShape,
        right: &SdfShape,
    ) -> Result<SdfShape, KernelError> {
        if left.topology == Topology::Curve || right.topology == Topology::Curve {
            return Err(KernelError::new(format!(
                "cannot {op} a curve: boolean operands must be solids"
            )));
        }
        let (a, b) = (left.node.clone(), right.node.clone());
        let node = match op {
            BooleanOp::Union => SdfNode::new(Union::new(a, b)),
            BooleanOp::Subtract => SdfNode::new(Subtract::new(a, b)),
            BooleanOp::Intersect => SdfNode::new(Intersect::new(a, b)),
        };
        Ok(SdfShape::solid(node))
    }

    fn tessellate(&self, shape: &SdfShape) -> Result<Mesh, KernelError> {
        match shape.topology {
            Topology::Solid => generate_mesh(&shape.node, &self.config),
            Topology::Curve => Err(KernelError::new("cannot tessellate a curve")),
        }
    }
}

impl KernelIntrospect for SdfKernel {
    fn bounds(&self, shape: &SdfShape) -> Option<Bounds> {
        shape.node.bounds().to_bounds()
    }

    fn volume(&self, shape: &SdfShape) -> f64 {
        match shape.topology {
            Topology::Solid => estimate_volume(&shape.node, self.config.volume_resolution),
            Topology::Curve => 0.0,
        }
    }
}
