//! Design documents: several shapes, booleans referring to earlier ones by id
//!
//! ```json
//! {
//!   "shapes": [
//!     {"id": "body", "type": "cuboid", "width": 4, "height": 2, "depth": 4},
//!     {"id": "bore", "type": "cylinder", "radius": 1, "height": 2, "origin": [2, 2, 0]},
//!     {"id": "part", "type": "subtract", "shapes": ["body", "bore"]}
//!   ],
//!   "output": "part"
//! }
//! ```

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use serde_json::Value;
use shapesmith_core::builder::{Built, dispatch};
use shapesmith_core::descriptor::Descriptor;
use shapesmith_core::kernel::GeometryKernel;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct Document {
    pub shapes: Vec<Value>,
    /// Id of the shape to report; defaults to the last one
    #[serde(default)]
    pub output: Option<String>,
}

impl Document {
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Invalid design document")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("In {}", path.display()))
    }

    /// The output id, checked against the document's shapes
    pub fn output_id(&self) -> Result<String> {
        let ids = self
            .shapes
            .iter()
            .enumerate()
            .map(|(index, entry)| entry_id(index, entry))
            .collect::<Result<Vec<_>>>()?;
        match &self.output {
            Some(id) if ids.contains(&id.as_str()) => Ok(id.clone()),
            Some(id) => bail!("Output shape '{id}' is not defined"),
            None => ids
                .last()
                .map(|id| (*id).to_string())
                .ok_or_else(|| anyhow!("Document has no shapes")),
        }
    }
}

fn entry_id(index: usize, entry: &Value) -> Result<&str> {
    entry
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("Shape #{index} has no string 'id'"))
}

/// Shapes built so far, by id
pub struct ShapeRegistry<K: GeometryKernel> {
    shapes: HashMap<String, Built<K>>,
}

impl<K: GeometryKernel> Default for ShapeRegistry<K> {
    fn default() -> Self {
        Self {
            shapes: HashMap::new(),
        }
    }
}

impl<K: GeometryKernel> ShapeRegistry<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Built<K>> {
        self.shapes.get(id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Look up operand shapes in order
    ///
    /// `declared` holds every id in the document so a reference to a shape
    /// defined further down can be reported as such.
    fn resolve(&self, owner: &str, ids: &[&str], declared: &[&str]) -> Result<Vec<K::Shape>> {
        ids.iter()
            .map(|id| match self.shapes.get(*id) {
                Some(built) => Ok(built.shape().clone()),
                None if declared.contains(id) => {
                    bail!("Shape '{owner}' refers to '{id}' before it is defined")
                }
                None => bail!("Shape '{owner}' refers to unknown shape '{id}'"),
            })
            .collect()
    }

    /// Build every entry in document order
    pub fn build_document(kernel: &K, document: &Document) -> Result<Self> {
        let declared = document
            .shapes
            .iter()
            .enumerate()
            .map(|(index, entry)| entry_id(index, entry))
            .collect::<Result<Vec<_>>>()?;

        let mut registry = Self::new();
        for (entry, id) in document.shapes.iter().zip(&declared) {
            if registry.shapes.contains_key(*id) {
                bail!("Duplicate shape id '{id}'");
            }

            let operand_ids = operand_ids(id, entry)?;
            let operands = registry.resolve(id, &operand_ids, &declared)?;
            let descriptor = Descriptor::from_json(entry.clone())
                .with_context(|| format!("Shape '{id}'"))?;

            debug!(
                %id,
                kind = %descriptor.kind(),
                operands = operands.len(),
                "Building document shape"
            );
            let built = dispatch(kernel, &descriptor, &operands)
                .with_context(|| format!("Shape '{id}'"))?;
            registry.shapes.insert((*id).to_string(), built);
        }
        Ok(registry)
    }
}

fn operand_ids<'a>(owner: &str, entry: &'a Value) -> Result<Vec<&'a str>> {
    match entry.get("shapes") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| anyhow!("Shape '{owner}': 'shapes' must hold id strings"))
            })
            .collect(),
        Some(_) => bail!("Shape '{owner}': 'shapes' must be an array of ids"),
    }
}
