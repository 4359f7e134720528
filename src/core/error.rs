use std::path::PathBuf;

use thiserror::Error;

use crate::core::name::QualifiedName;

pub type Result<T> = std::result::Result<T, MergeError>;

#[derive(Debug, Error)]
pub enum MergeError {
    //a required value is missing or malformed
    #[error("invalid input: {what}")]
    Validation { what: String },

    #[error("field mapping key `{field}` is not a field of entity `{entity}`")]
    UnknownMappingKey { entity: QualifiedName, field: QualifiedName },

    #[error("field mapping target `{field}` is not a field of entity `{entity}`")]
    UnknownMappingTarget { entity: QualifiedName, field: QualifiedName },

    #[error("field `{target}` is the mapping target of more than one field")]
    NonInjectiveMapping { target: QualifiedName },

    //internal invariant breach, never retried
    #[error("module reduction did not converge: {modules_left} module(s) left from {input_entities} input entities")]
    Convergence { modules_left: usize, input_entities: usize },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {format} document: {message}")]
    Decode { format: &'static str, message: String },
}

impl MergeError {
    pub fn validation(what: impl Into<String>) -> Self {
        MergeError::Validation { what: what.into() }
    }

    /// True for the errors raised while validating a field mapping, before any
    /// merged entity is built.
    pub fn is_field_mapping(&self) -> bool {
        matches!(
            self,
            MergeError::UnknownMappingKey { .. }
                | MergeError::UnknownMappingTarget { .. }
                | MergeError::NonInjectiveMapping { .. }
        )
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, MergeError::Convergence { .. })
    }
}
