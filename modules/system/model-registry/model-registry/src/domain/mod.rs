//! Domain layer for the Model Registry module.
//!
//! Contains the binding index, resolution algorithm, lookup cache,
//! consistency sweep and the service tying them together.

pub mod cache;
pub mod error;
pub mod index;
pub mod lifecycle;
pub mod resolver;
pub mod service;
pub mod sweeper;

pub use error::DomainError;
pub use service::ModelRegistryService;
