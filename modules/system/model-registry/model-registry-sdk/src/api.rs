//! `ModelRegistryApi` trait definition.
//!
//! This trait defines the public API for the `model-registry` module.

use async_trait::async_trait;

use crate::content::ContentItem;
use crate::error::ModelRegistryError;
use crate::models::{BindingId, LookupResult, ModelSelector, ModuleId, NewModelBinding};

/// Public API trait for the `model-registry` module.
///
/// Plugin modules register their model bindings on load and unregister them
/// on unload; request handling resolves bindings for content items.
#[async_trait]
pub trait ModelRegistryApi: Send + Sync {
    /// Register a binding under every given type name, owned by `owner`.
    ///
    /// # Errors
    ///
    /// * `InvalidArgument` - If `type_names` is empty
    async fn register(
        &self,
        type_names: Vec<String>,
        binding: NewModelBinding,
        owner: ModuleId,
    ) -> Result<BindingId, ModelRegistryError>;

    /// Remove every binding owned by `owner`.
    ///
    /// Idempotent: unknown or already unloaded modules yield `Ok(0)`.
    ///
    /// # Returns
    ///
    /// The number of removed bindings.
    async fn unregister_module(&self, owner: &ModuleId) -> Result<usize, ModelRegistryError>;

    /// Remove bindings whose source reports itself invalid.
    ///
    /// # Returns
    ///
    /// The number of removed bindings.
    async fn sweep_invalid(&self) -> Result<usize, ModelRegistryError>;

    /// Resolve the most specific bindings for `item`, narrowed by `selector`.
    ///
    /// # Returns
    ///
    /// `None` when nothing matches, otherwise a non-empty, unordered collection.
    async fn lookup_most_specific(
        &self,
        item: &dyn ContentItem,
        selector: ModelSelector,
    ) -> Result<Option<Vec<LookupResult>>, ModelRegistryError>;

    /// Resolve the bindings of every tier along the type walk of `item`.
    async fn lookup_all(
        &self,
        item: &dyn ContentItem,
    ) -> Result<Vec<LookupResult>, ModelRegistryError>;
}
