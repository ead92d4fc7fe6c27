//! Public models for the `model-registry` module.
//!
//! These are transport-agnostic data structures that define the contract
//! between the `model-registry` module and its consumers.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::capability::ModelCapability;
use crate::source::ModelSource;

/// Identifier of the plugin module that owns a set of bindings.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Registry-assigned identity of a registered binding.
///
/// Identifiers are unique for the lifetime of a registry and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BindingId(pub u64);

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "binding#{}", self.0)
    }
}

/// A module's offer to produce a model, before registration.
#[derive(Clone)]
pub struct NewModelBinding {
    pub capability: ModelCapability,
    pub name: Option<String>,
    pub source: Arc<dyn ModelSource>,
}

impl NewModelBinding {
    #[must_use]
    pub fn new(capability: impl Into<ModelCapability>, source: Arc<dyn ModelSource>) -> Self {
        Self {
            capability: capability.into(),
            name: None,
            source,
        }
    }

    /// Sets the disambiguating binding name (unique per type name, not globally).
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl fmt::Debug for NewModelBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewModelBinding")
            .field("capability", &self.capability)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A registered binding.
#[derive(Clone)]
pub struct ModelBinding {
    id: BindingId,
    owner: ModuleId,
    capability: ModelCapability,
    name: Option<String>,
    source: Arc<dyn ModelSource>,
}

impl ModelBinding {
    #[must_use]
    pub fn new(id: BindingId, owner: ModuleId, binding: NewModelBinding) -> Self {
        Self {
            id,
            owner,
            capability: binding.capability,
            name: binding.name,
            source: binding.source,
        }
    }

    #[must_use]
    pub const fn id(&self) -> BindingId {
        self.id
    }

    #[must_use]
    pub const fn owner(&self) -> &ModuleId {
        &self.owner
    }

    /// Capability of the model this binding produces.
    #[must_use]
    pub const fn capability(&self) -> &ModelCapability {
        &self.capability
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn source(&self) -> &Arc<dyn ModelSource> {
        &self.source
    }
}

impl fmt::Debug for ModelBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBinding")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("capability", &self.capability)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A binding together with the type name under which it matched.
#[derive(Debug, Clone)]
pub struct LookupResult {
    pub binding: Arc<ModelBinding>,
    pub matched_type: Arc<str>,
}

impl LookupResult {
    #[must_use]
    pub fn new(binding: Arc<ModelBinding>, matched_type: Arc<str>) -> Self {
        Self {
            binding,
            matched_type,
        }
    }

    #[must_use]
    pub fn capability(&self) -> &ModelCapability {
        self.binding.capability()
    }
}

/// Narrows a most-specific lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ModelSelector {
    /// Every binding of the most specific tier.
    #[default]
    MostSpecific,
    /// Bindings of the most specific tier whose capability is compatible
    /// with the requested one.
    Capability(ModelCapability),
    /// Bindings of the most specific tier registered under this name.
    Name(String),
}

impl ModelSelector {
    #[must_use]
    pub fn capability(capability: impl Into<ModelCapability>) -> Self {
        Self::Capability(capability.into())
    }

    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }
}

/// Registry diagnostics snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    /// Registered bindings.
    pub bindings: usize,
    /// Distinct type names with at least one binding.
    pub type_names: usize,
    /// Modules owning at least one binding.
    pub modules: usize,
    /// Approximate number of cached lookups.
    pub cached_lookups: u64,
}
