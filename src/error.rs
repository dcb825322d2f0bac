//! Error taxonomy shared by every map operation.

use crate::value::ValueType;
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MapError {
    /// Backing storage could not be reserved; the structure is unchanged.
    #[error("allocation failed while reserving {what}")]
    AllocationFailure { what: &'static str },

    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// A key path must name at least one key.
    #[error("key path is empty")]
    InvalidPath,

    /// Navigation met a non-map value where a nested map was required.
    #[error("key '{key}' holds a {found}, not a map")]
    TypeConflict { key: String, found: ValueType },

    #[error("key '{key}' not found")]
    NotFound { key: String },

    #[error("could not derive a bucket index: {reason}")]
    HashError { reason: &'static str },

    /// Entry count exceeds the bucket count; never produced by the map's own
    /// growth policy.
    #[error("inconsistent map state: size {size} exceeds capacity {capacity}")]
    InvalidState { size: usize, capacity: usize },

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl MapError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, MapError::NotFound { .. })
    }

    pub fn is_type_conflict(&self) -> bool {
        matches!(self, MapError::TypeConflict { .. })
    }
}
