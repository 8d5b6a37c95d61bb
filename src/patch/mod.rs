//! Patch engine - partial updates of DTO snapshots
//!
//! A patch goes through three states, each a distinct type:
//!
//! ```text
//! Patch<D, Loaded> --apply--> Patch<D, Patched> --validate--> Patch<D, Validated>
//! ```
//!
//! Operations run against a JSON copy of the DTO; the DTO is rebuilt only
//! after every operation succeeded, so a failing patch leaves nothing behind.
//! Nothing here touches storage: the caller maps the validated DTO back to an
//! entity and persists it.

mod operation;

pub use operation::PatchOperation;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::marker::PhantomData;
use thiserror::Error;
use tracing::debug;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("path '{0}' is not a single field pointer")]
    InvalidPath(String),

    #[error("path '{0}' does not name a field")]
    UnknownPath(String),

    #[error("test failed at '{0}'")]
    TestFailed(String),

    #[error("patched document is not valid: {0}")]
    InvalidValue(#[source] serde_json::Error),

    #[error("target is not a flat object")]
    NotAnObject,

    #[error("snapshot could not be serialized: {0}")]
    Snapshot(#[source] serde_json::Error),
}

/// Snapshot taken from the current entity state
#[derive(Debug)]
pub struct Loaded;

/// Operations applied, constraints not yet checked
#[derive(Debug)]
pub struct Patched;

/// Constraints hold; ready to be mapped back and persisted
#[derive(Debug)]
pub struct Validated;

#[derive(Debug)]
pub struct Patch<D, S> {
    dto: D,
    state: PhantomData<S>,
}

impl<D, S> Patch<D, S> {
    pub fn dto(&self) -> &D {
        &self.dto
    }
}

impl<D> Patch<D, Loaded> {
    pub fn load(dto: D) -> Self {
        Self {
            dto,
            state: PhantomData,
        }
    }
}

impl<D: Serialize + DeserializeOwned + Default> Patch<D, Loaded> {
    /// Applies the operations in order
    pub fn apply(self, operations: &[PatchOperation]) -> Result<Patch<D, Patched>, PatchError> {
        let mut fields = to_object(&self.dto)?;
        let defaults = to_object(&D::default())?;

        for operation in operations {
            operation.apply(&mut fields, &defaults)?;
        }

        let dto = serde_json::from_value(Value::Object(fields)).map_err(PatchError::InvalidValue)?;
        debug!("Applied {} patch operations", operations.len());

        Ok(Patch {
            dto,
            state: PhantomData,
        })
    }
}

impl<D: Validate> Patch<D, Patched> {
    /// Re-runs the DTO's field constraints
    pub fn validate(self) -> Result<Patch<D, Validated>, ValidationErrors> {
        self.dto.validate()?;

        Ok(Patch {
            dto: self.dto,
            state: PhantomData,
        })
    }
}

impl<D> Patch<D, Validated> {
    pub fn into_inner(self) -> D {
        self.dto
    }
}

fn to_object<D: Serialize>(dto: &D) -> Result<Map<String, Value>, PatchError> {
    match serde_json::to_value(dto).map_err(PatchError::Snapshot)? {
        Value::Object(fields) => Ok(fields),
        _ => Err(PatchError::NotAnObject),
    }
}
