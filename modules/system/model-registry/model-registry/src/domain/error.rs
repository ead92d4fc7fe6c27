//! Domain error types for the Model Registry module.

use model_registry_sdk::ModelRegistryError;
use thiserror::Error;

/// Domain-level errors for the Model Registry module.
#[derive(Error, Debug)]
pub enum DomainError {
    /// A binding was offered under no type name at all.
    #[error("Binding must be registered under at least one type name")]
    EmptyTypeNames,

    /// Any other caller contract violation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl DomainError {
    /// Creates an `InvalidArgument` error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

impl From<DomainError> for ModelRegistryError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::EmptyTypeNames => ModelRegistryError::invalid_argument(e.to_string()),
            DomainError::InvalidArgument(msg) => ModelRegistryError::invalid_argument(msg),
            DomainError::Internal(e) => ModelRegistryError::internal(e.to_string()),
        }
    }
}
