//! JSON Patch operations over flat DTO snapshots

use super::PatchError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One RFC 6902 operation
///
/// A patch document is a JSON array of these, e.g.
/// `[{"op": "replace", "path": "/tarifa", "value": 250}]`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    Test { path: String, value: Value },
}

impl PatchOperation {
    /// Applies the operation to `fields`
    ///
    /// `defaults` holds the value every field takes when removed.
    pub(crate) fn apply(
        &self,
        fields: &mut Map<String, Value>,
        defaults: &Map<String, Value>,
    ) -> Result<(), PatchError> {
        match self {
            Self::Add { path, value } | Self::Replace { path, value } => {
                let field = resolve(fields, path)?;
                fields.insert(field, value.clone());
            }
            Self::Remove { path } => {
                let field = resolve(fields, path)?;
                reset(fields, defaults, field);
            }
            Self::Move { from, path } => {
                let source = resolve(fields, from)?;
                let target = resolve(fields, path)?;
                if source != target {
                    let value = fields.get(&source).cloned().unwrap_or(Value::Null);
                    reset(fields, defaults, source);
                    fields.insert(target, value);
                }
            }
            Self::Copy { from, path } => {
                let source = resolve(fields, from)?;
                let target = resolve(fields, path)?;
                let value = fields.get(&source).cloned().unwrap_or(Value::Null);
                fields.insert(target, value);
            }
            Self::Test { path, value } => {
                let field = resolve(fields, path)?;
                let current = fields.get(&field).unwrap_or(&Value::Null);
                if !values_equal(current, value) {
                    return Err(PatchError::TestFailed(path.clone()));
                }
            }
        }

        Ok(())
    }
}

/// Maps a `/field` pointer to the snapshot's field name, ignoring case
fn resolve(fields: &Map<String, Value>, pointer: &str) -> Result<String, PatchError> {
    let segment = pointer
        .strip_prefix('/')
        .filter(|segment| !segment.is_empty() && !segment.contains('/'))
        .ok_or_else(|| PatchError::InvalidPath(pointer.to_string()))?;
    let name = segment.replace("~1", "/").replace("~0", "~");

    fields
        .keys()
        .find(|key| key.eq_ignore_ascii_case(&name))
        .cloned()
        .ok_or_else(|| PatchError::UnknownPath(pointer.to_string()))
}

fn reset(fields: &mut Map<String, Value>, defaults: &Map<String, Value>, field: String) {
    let value = defaults.get(&field).cloned().unwrap_or(Value::Null);
    fields.insert(field, value);
}

/// JSON equality where `250` and `250.0` are the same number
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => match (l.as_f64(), r.as_f64()) {
            (Some(l), Some(r)) => l == r,
            _ => l == r,
        },
        _ => left == right,
    }
}
