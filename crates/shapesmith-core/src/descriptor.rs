//! Shape descriptors: the typed view of one JSON shape request
//!
//! ```rust,ignore
//! let desc = Descriptor::from_json(serde_json::json!({
//!     "type": "sphere",
//!     "radius": 5,
//!     "origin": [0, 0, 10],
//! }))?;
//! assert_eq!(desc.kind(), ShapeKind::Sphere);
//! ```

use crate::boolean::BooleanOp;
use crate::error::{BuildError, Result};
use glam::DVec3;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Every shape kind a descriptor can name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Cuboid,
    Sphere,
    Cylinder,
    Cone,
    Wedge,
    Torus,
    Ellipse,
    Union,
    Subtract,
    Intersect,
}

/// Tag to kind lookup. The set is closed: anything else is `UnknownShapeKind`.
const MANIFEST: [(&str, ShapeKind); 10] = [
    ("cuboid", ShapeKind::Cuboid),
    ("sphere", ShapeKind::Sphere),
    ("cylinder", ShapeKind::Cylinder),
    ("cone", ShapeKind::Cone),
    ("wedge", ShapeKind::Wedge),
    ("torus", ShapeKind::Torus),
    ("ellipse", ShapeKind::Ellipse),
    ("union", ShapeKind::Union),
    ("subtract", ShapeKind::Subtract),
    ("intersect", ShapeKind::Intersect),
];

impl ShapeKind {
    /// All kinds in manifest order
    pub fn all() -> impl Iterator<Item = ShapeKind> {
        MANIFEST.iter().map(|(_, kind)| *kind)
    }

    /// Resolve a type tag
    pub fn from_tag(tag: &str) -> Result<Self> {
        MANIFEST
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| BuildError::UnknownShapeKind(tag.to_string()))
    }

    /// The descriptor tag for this kind
    pub fn tag(self) -> &'static str {
        MANIFEST
            .iter()
            .find(|(_, kind)| *kind == self)
            .map_or("unknown", |(name, _)| name)
    }

    /// The boolean operator for combination kinds, `None` for primitives
    pub fn boolean_op(self) -> Option<BooleanOp> {
        match self {
            Self::Union => Some(BooleanOp::Union),
            Self::Subtract => Some(BooleanOp::Subtract),
            Self::Intersect => Some(BooleanOp::Intersect),
            _ => None,
        }
    }

    pub fn is_boolean(self) -> bool {
        self.boolean_op().is_some()
    }
}

impl FromStr for ShapeKind {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_tag(s)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Parameters may also be nested under this key
const PARAMETERS_KEY: &str = "parameters";

/// One shape request: a kind plus its parameter map.
///
/// The kind comes from the dispatch context (or the `type` field when
/// parsed from a full JSON object); it is not looked up in the map again.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    kind: ShapeKind,
    params: Map<String, Value>,
}

impl Descriptor {
    pub fn new(kind: ShapeKind, params: Map<String, Value>) -> Self {
        Self { kind, params }
    }

    /// Parse a JSON object carrying a string `type` field
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(params) = value else {
            return Err(BuildError::invalid("descriptor", "expected a JSON object"));
        };
        let tag = params
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| BuildError::missing("type"))?;
        let kind = ShapeKind::from_tag(tag)?;
        Ok(Self { kind, params })
    }

    /// Parse descriptor text
    pub fn from_str_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| BuildError::invalid("descriptor", e.to_string()))?;
        Self::from_json(value)
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    /// Look up a field at the top level, falling back to a nested
    /// `parameters` object
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params.get(name).or_else(|| {
            self.params
                .get(PARAMETERS_KEY)
                .and_then(Value::as_object)
                .and_then(|nested| nested.get(name))
        })
    }

    /// A required number
    pub fn number(&self, name: &str) -> Result<f64> {
        self.optional_number(name)?
            .ok_or_else(|| BuildError::missing(name))
    }

    /// A number that may be absent
    pub fn optional_number(&self, name: &str) -> Result<Option<f64>> {
        match self.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| BuildError::invalid(name, "expected a number")),
        }
    }

    /// The `origin` offset, if present
    ///
    /// Accepts `[x, y, z]` or `{"x": .., "y": .., "z": ..}`; missing
    /// components are zero.
    pub fn origin(&self) -> Result<Option<DVec3>> {
        match self.params.get("origin") {
            None | Some(Value::Null) => Ok(None),
            Some(value) => vec3_from_value(value)
                .map(Some)
                .map_err(|reason| BuildError::invalid("origin", reason)),
        }
    }
}

/// Read a 3-vector from an array or an `{x, y, z}` object.
///
/// Missing components default to zero. The error is a reason string so
/// callers can wrap it in whichever error kind fits their field.
pub(crate) fn vec3_from_value(value: &Value) -> std::result::Result<DVec3, String> {
    let mut out = [0.0; 3];
    match value {
        Value::Array(items) => {
            if items.len() > 3 {
                return Err(format!("expected at most 3 components, got {}", items.len()));
            }
            for (slot, item) in out.iter_mut().zip(items) {
                *slot = item
                    .as_f64()
                    .ok_or_else(|| format!("component {item} is not a number"))?;
            }
        }
        Value::Object(map) => {
            for (slot, axis) in out.iter_mut().zip(["x", "y", "z"]) {
                match map.get(axis) {
                    None | Some(Value::Null) => {}
                    Some(item) => {
                        *slot = item
                            .as_f64()
                            .ok_or_else(|| format!("component '{axis}' is not a number"))?;
                    }
                }
            }
        }
        other => return Err(format!("expected a 3-vector, got {other}")),
    }
    Ok(DVec3::from_array(out))
}
