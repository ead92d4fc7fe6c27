//! Model Registry SDK
//!
//! This crate provides the public API for the `model-registry` module:
//! - `ModelRegistryApi` trait for inter-module communication
//! - `ContentItem` trait the registry consumes to walk an item's type chain
//! - `ModelSource` trait for the factory handle behind a binding
//! - `ModelCapability` and `CapabilityMatcher` for capability-filtered lookups
//! - `ModelRegistryError` for error handling
//!
//! ## Usage
//!
//! ```ignore
//! use model_registry_sdk::{ModelRegistryApi, ModelSelector, ModuleId, NewModelBinding};
//!
//! // A plugin module registers its model factories when it loads
//! let id = client
//!     .register(
//!         vec!["acme/components/teaser".to_owned()],
//!         NewModelBinding::new(ModelCapability::new("acme.TeaserModel"), source),
//!         ModuleId::new("acme-components"),
//!     )
//!     .await?;
//!
//! // Request handling resolves the most specific models for an item
//! let found = client.lookup_most_specific(&item, ModelSelector::MostSpecific).await?;
//!
//! // And the module's bindings go away with it
//! client.unregister_module(&ModuleId::new("acme-components")).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod capability;
pub mod content;
pub mod error;
pub mod models;
pub mod source;

// Re-export main types at crate root for convenience
pub use api::ModelRegistryApi;
pub use capability::{CapabilityHierarchy, CapabilityMatcher, ExactCapabilityMatcher, ModelCapability};
pub use content::{ContentItem, StaticContentItem, TypeResolutionError};
pub use error::ModelRegistryError;
pub use models::{
    BindingId, LookupResult, ModelBinding, ModelSelector, ModuleId, NewModelBinding, RegistryStats,
};
pub use source::{ModelSource, ModelSourceError};
