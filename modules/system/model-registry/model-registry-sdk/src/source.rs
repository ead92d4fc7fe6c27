//! Factory handle behind a model binding.

use std::any::Any;

use thiserror::Error;

/// Failure of a model source to report its own validity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("model source check failed: {0}")]
pub struct ModelSourceError(pub String);

impl ModelSourceError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Opaque producer of model instances, contributed by a plugin module.
///
/// The registry only stores and returns sources; callers downcast via
/// [`ModelSource::as_any`] to the concrete factory they know how to drive.
pub trait ModelSource: Send + Sync + 'static {
    /// Whether the source can still produce models.
    ///
    /// A source may become unusable without its module being unloaded through
    /// the registry (for example when its backing factory is torn down
    /// independently). Such sources are purged by the consistency sweep.
    ///
    /// # Errors
    ///
    /// Returns `ModelSourceError` when validity cannot be determined; the
    /// sweep treats that as invalid.
    fn check_valid(&self) -> Result<bool, ModelSourceError> {
        Ok(true)
    }

    fn as_any(&self) -> &dyn Any;
}
