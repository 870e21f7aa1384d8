//! Transform pipeline: origin offset, then transform records in order
//!
//! Order is significant. A descriptor's `origin` is applied first, then
//! each record of `transforms` left to right, so later records act on the
//! already transformed shape.

use crate::descriptor::{Descriptor, vec3_from_value};
use crate::error::{BuildError, Result};
use crate::kernel::GeometryKernel;
use glam::{DQuat, DVec3};
use serde_json::{Map, Value};
use tracing::trace;

/// One affine operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Translate {
        offset: DVec3,
    },
    /// Rotation about `axis` through the pivot `origin`
    Rotate {
        axis: DVec3,
        /// Degrees, counter-clockwise looking down the axis
        angle: f64,
        origin: DVec3,
    },
    /// Uniform scale about the pivot `origin`
    Scale {
        factor: f64,
        origin: DVec3,
    },
    /// Reflection across the plane through `origin` with the given normal
    Mirror {
        normal: DVec3,
        origin: DVec3,
    },
}

impl Transform {
    pub fn translate(offset: DVec3) -> Self {
        Self::Translate { offset }
    }

    /// Rotation about an axis through the world origin
    pub fn rotate(axis: DVec3, angle_degrees: f64) -> Self {
        Self::Rotate {
            axis,
            angle: angle_degrees,
            origin: DVec3::ZERO,
        }
    }

    pub fn scale(factor: f64) -> Self {
        Self::Scale {
            factor,
            origin: DVec3::ZERO,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Translate { .. } => "translate",
            Self::Rotate { .. } => "rotate",
            Self::Scale { .. } => "scale",
            Self::Mirror { .. } => "mirror",
        }
    }

    /// Unit quaternion for a rotation, identity otherwise
    pub fn rotation(&self) -> DQuat {
        match self {
            Self::Rotate { axis, angle, .. } => {
                DQuat::from_axis_angle(axis.normalize(), angle.to_radians())
            }
            _ => DQuat::IDENTITY,
        }
    }

    /// Map a point through this transform
    pub fn apply_to_point(&self, p: DVec3) -> DVec3 {
        match *self {
            Self::Translate { offset } => p + offset,
            Self::Rotate { origin, .. } => origin + self.rotation() * (p - origin),
            Self::Scale { factor, origin } => origin + (p - origin) * factor,
            Self::Mirror { normal, origin } => {
                let n = normal.normalize();
                p - 2.0 * (p - origin).dot(n) * n
            }
        }
    }

    /// Parse one transform record
    ///
    /// `{"kind": "rotate", "axis": [0, 0, 1], "angle": 90}`; `type` is
    /// accepted as an alias for `kind`.
    pub fn from_json(record: &Value) -> Result<Self> {
        let Value::Object(map) = record else {
            return Err(BuildError::transform("transform", "expected an object"));
        };
        let kind = map
            .get("kind")
            .or_else(|| map.get("type"))
            .ok_or_else(|| BuildError::transform("kind", "missing"))?;
        let kind = kind
            .as_str()
            .ok_or_else(|| BuildError::transform("kind", "expected a string"))?;

        match kind {
            "translate" => Ok(Self::Translate {
                offset: required_vector(map, "offset")?,
            }),
            "rotate" => {
                let axis = non_zero(required_vector(map, "axis")?, "axis")?;
                Ok(Self::Rotate {
                    axis,
                    angle: required_number(map, "angle")?,
                    origin: pivot(map)?,
                })
            }
            "scale" => {
                let factor = required_number(map, "factor")?;
                if factor <= 0.0 {
                    return Err(BuildError::transform(
                        "factor",
                        format!("must be positive, got {factor}"),
                    ));
                }
                Ok(Self::Scale {
                    factor,
                    origin: pivot(map)?,
                })
            }
            "mirror" => Ok(Self::Mirror {
                normal: non_zero(required_vector(map, "normal")?, "normal")?,
                origin: pivot(map)?,
            }),
            other => Err(BuildError::transform(
                "kind",
                format!("unknown transform kind '{other}'"),
            )),
        }
    }
}

fn required_number(map: &Map<String, Value>, field: &str) -> Result<f64> {
    match map.get(field) {
        None | Some(Value::Null) => Err(BuildError::transform(field, "missing")),
        Some(value) => value
            .as_f64()
            .ok_or_else(|| BuildError::transform(field, "expected a number")),
    }
}

fn required_vector(map: &Map<String, Value>, field: &str) -> Result<DVec3> {
    match map.get(field) {
        None | Some(Value::Null) => Err(BuildError::transform(field, "missing")),
        Some(value) => {
            vec3_from_value(value).map_err(|reason| BuildError::transform(field, reason))
        }
    }
}

fn pivot(map: &Map<String, Value>) -> Result<DVec3> {
    match map.get("origin") {
        None | Some(Value::Null) => Ok(DVec3::ZERO),
        Some(value) => {
            vec3_from_value(value).map_err(|reason| BuildError::transform("origin", reason))
        }
    }
}

fn non_zero(v: DVec3, field: &str) -> Result<DVec3> {
    if v.length_squared() > 0.0 {
        Ok(v)
    } else {
        Err(BuildError::transform(field, "must be a non-zero vector"))
    }
}

/// The descriptor's transform records, in application order
///
/// `transform` holds one record; `transforms` holds one record or an
/// array. Carrying both is ambiguous and rejected.
pub fn transform_records(descriptor: &Descriptor) -> Result<Vec<Transform>> {
    let params = descriptor.params();
    let single = params.get("transform").filter(|v| !v.is_null());
    let many = params.get("transforms").filter(|v| !v.is_null());

    match (single, many) {
        (None, None) => Ok(Vec::new()),
        (Some(_), Some(_)) => Err(BuildError::transform(
            "transforms",
            "both 'transform' and 'transforms' are present",
        )),
        (Some(record), None) | (None, Some(record @ Value::Object(_))) => {
            Ok(vec![Transform::from_json(record)?])
        }
        (None, Some(Value::Array(records))) => records.iter().map(Transform::from_json).collect(),
        (None, Some(_)) => Err(BuildError::transform(
            "transforms",
            "expected an object or an array of objects",
        )),
    }
}

/// Translate `shape` by the descriptor's `origin`, if it has one
pub fn apply_origin<K: GeometryKernel>(
    kernel: &K,
    shape: K::Shape,
    descriptor: &Descriptor,
) -> Result<K::Shape> {
    match descriptor.origin()? {
        Some(offset) => {
            trace!(?offset, "applying origin");
            apply_transform(kernel, &shape, &Transform::translate(offset))
        }
        None => Ok(shape),
    }
}

/// Apply a single transform record
pub fn apply_transform<K: GeometryKernel>(
    kernel: &K,
    shape: &K::Shape,
    transform: &Transform,
) -> Result<K::Shape> {
    trace!(kind = transform.kind_name(), "applying transform");
    Ok(kernel.apply_transform(shape, transform)?)
}

/// Apply the descriptor's transform records in array order
pub fn apply_transforms<K: GeometryKernel>(
    kernel: &K,
    shape: K::Shape,
    descriptor: &Descriptor,
) -> Result<K::Shape> {
    transform_records(descriptor)?
        .iter()
        .try_fold(shape, |shape, transform| {
            apply_transform(kernel, &shape, transform)
        })
}
