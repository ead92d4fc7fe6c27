//! Model Registry Module Implementation
//!
//! Maps content items to the model bindings plugin modules contribute for
//! them. The public API is defined in `model-registry-sdk` and re-exported
//! here.
//!
//! ## Architecture
//!
//! - **Two-phase resolution**: logical type hierarchy walk, most specific
//!   first, then the concrete schema type as a single fallback key
//! - **Single consistency domain**: one reader/writer lock guards the binding
//!   index; the lookup cache is invalidated under the write guard
//! - **Module lifecycle**: bindings carry their owning module and are removed
//!   in bulk when it unloads; a periodic sweep purges bindings whose source
//!   became invalid

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

// === PUBLIC API (from SDK) ===
pub use model_registry_sdk::{
    BindingId, CapabilityHierarchy, CapabilityMatcher, ContentItem, ExactCapabilityMatcher,
    LookupResult, ModelBinding, ModelCapability, ModelRegistryApi, ModelRegistryError,
    ModelSelector, ModelSource, ModelSourceError, ModuleId, NewModelBinding, RegistryStats,
    StaticContentItem, TypeResolutionError,
};

// === MODULE DEFINITION ===
pub mod module;
pub use module::ModelRegistryModule;

// === CONFIGURATION ===
pub mod config;
pub use config::ModelRegistryConfig;

// === LOCAL CLIENT ===
pub mod local_client;
pub use local_client::ModelRegistryLocalClient;

// === INTERNAL MODULES ===
#[doc(hidden)]
pub mod domain;
