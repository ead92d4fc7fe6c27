//! Local client implementing the `ModelRegistryApi` trait.

use std::sync::Arc;

use async_trait::async_trait;
use model_registry_sdk::{
    BindingId, ContentItem, LookupResult, ModelRegistryApi, ModelRegistryError, ModelSelector,
    ModuleId, NewModelBinding,
};

use crate::domain::service::ModelRegistryService;

/// Local client for the Model Registry module.
///
/// This client implements the `ModelRegistryApi` trait and delegates
/// to the domain service.
pub struct ModelRegistryLocalClient {
    service: Arc<ModelRegistryService>,
}

impl ModelRegistryLocalClient {
    /// Creates a new local client with the given service.
    #[must_use]
    pub fn new(service: Arc<ModelRegistryService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ModelRegistryApi for ModelRegistryLocalClient {
    async fn register(
        &self,
        type_names: Vec<String>,
        binding: NewModelBinding,
        owner: ModuleId,
    ) -> Result<BindingId, ModelRegistryError> {
        self.service
            .register(type_names, binding, owner)
            .map(|registered| registered.id())
            .map_err(ModelRegistryError::from)
    }

    async fn unregister_module(&self, owner: &ModuleId) -> Result<usize, ModelRegistryError> {
        Ok(self.service.unregister_module(owner))
    }

    async fn sweep_invalid(&self) -> Result<usize, ModelRegistryError> {
        Ok(self.service.sweep_invalid())
    }

    async fn lookup_most_specific(
        &self,
        item: &dyn ContentItem,
        selector: ModelSelector,
    ) -> Result<Option<Vec<LookupResult>>, ModelRegistryError> {
        Ok(self.service.lookup(item, &selector))
    }

    async fn lookup_all(
        &self,
        item: &dyn ContentItem,
    ) -> Result<Vec<LookupResult>, ModelRegistryError> {
        Ok(self.service.lookup_all(item))
    }
}
