//! Public error types for the `model-registry` module.
//!
//! These errors are safe to expose to other modules and consumers.

use thiserror::Error;

/// Errors that can be returned by the `ModelRegistryApi`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelRegistryError {
    /// The caller violated the API contract (e.g. registered under no type).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The registry module has not been initialized yet.
    #[error("Model registry is not initialized")]
    NotInitialized,

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ModelRegistryError {
    /// Creates an `InvalidArgument` error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Creates an `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns `true` if this is an invalid argument error.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Returns `true` if the registry was not initialized.
    #[must_use]
    pub const fn is_not_initialized(&self) -> bool {
        matches!(self, Self::NotInitialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelRegistryError::invalid_argument("no type names");
        assert_eq!(err.to_string(), "Invalid argument: no type names");
        assert!(err.is_invalid_argument());

        assert_eq!(
            ModelRegistryError::NotInitialized.to_string(),
            "Model registry is not initialized"
        );
        assert!(ModelRegistryError::NotInitialized.is_not_initialized());

        let err = ModelRegistryError::internal("boom");
        assert_eq!(err.to_string(), "Internal error: boom");
        assert!(!err.is_invalid_argument());
    }
}
