//! Domain service for the Model Registry module.

use std::collections::HashSet;
use std::sync::Arc;

use model_registry_sdk::{
    CapabilityMatcher, ContentItem, LookupResult, ModelBinding, ModelCapability, ModelSelector,
    ModuleId, NewModelBinding, RegistryStats,
};
use parking_lot::RwLock;
use tracing::{debug, info, trace, warn};

use super::cache::{CacheEntry, CacheKey, LookupCache, LookupKind};
use super::error::DomainError;
use super::index::BindingIndex;
use super::resolver::SpecificityResolver;
use super::sweeper;
use crate::config::ModelRegistryConfig;

/// Domain service owning the binding index and its lookup cache.
///
/// The index lock is the single consistency domain: mutations invalidate
/// the cache before releasing the write guard, and lookups populate the cache
/// while holding a read guard, so a lookup can never cache a result computed
/// against a state that a completed mutation has already replaced.
pub struct ModelRegistryService {
    index: RwLock<BindingIndex>,
    cache: LookupCache,
    matcher: Arc<dyn CapabilityMatcher>,
    config: ModelRegistryConfig,
}

impl ModelRegistryService {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(config: ModelRegistryConfig, matcher: Arc<dyn CapabilityMatcher>) -> Self {
        Self {
            index: RwLock::new(BindingIndex::new()),
            cache: LookupCache::new(config.cache_max_entries),
            matcher,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ModelRegistryConfig {
        &self.config
    }

    /// Registers `binding` under every name in `type_names`, owned by `owner`.
    ///
    /// Only cached lookups whose walk visited one of the new type names are
    /// invalidated.
    ///
    /// # Errors
    ///
    /// Returns `EmptyTypeNames` for an empty name set and `InvalidArgument`
    /// for an empty owner id or binding name.
    pub fn register(
        &self,
        type_names: Vec<String>,
        binding: NewModelBinding,
        owner: ModuleId,
    ) -> Result<Arc<ModelBinding>, DomainError> {
        if owner.as_str().is_empty() {
            return Err(DomainError::invalid_argument("owner module id must not be empty"));
        }
        if binding.name.as_deref() == Some("") {
            return Err(DomainError::invalid_argument("binding name must not be empty"));
        }

        let mut index = self.index.write();
        let (registered, types) = index.add(type_names, binding, owner)?;
        self.cache.invalidate_for_types(&types);
        drop(index);

        debug!(
            binding = %registered.id(),
            module = %registered.owner(),
            capability = %registered.capability(),
            type_names = types.len(),
            "Registered model binding"
        );
        Ok(registered)
    }

    /// Removes every binding owned by `owner`. Unknown modules are a no-op.
    ///
    /// Returns the number of removed bindings.
    pub fn unregister_module(&self, owner: &ModuleId) -> usize {
        let mut index = self.index.write();
        let removed = index.remove_by_owner(owner);
        if !removed.is_empty() {
            self.cache.invalidate_all();
        }
        drop(index);

        if removed.is_empty() {
            debug!(module = %owner, "Module has no registered bindings");
        } else {
            info!(module = %owner, removed = removed.len(), "Module unloaded, bindings removed");
        }
        removed.len()
    }

    /// Removes bindings whose source reports itself invalid.
    ///
    /// Validity checks run without holding the index lock; only the removal
    /// takes the write guard. Returns the number of removed bindings.
    pub fn sweep_invalid(&self) -> usize {
        let snapshot = self.index.read().all_bindings();
        let invalid = sweeper::find_invalid(&snapshot);
        if invalid.is_empty() {
            trace!(checked = snapshot.len(), "Consistency sweep found no invalid bindings");
            return 0;
        }

        let mut index = self.index.write();
        let removed = index.remove_invalid(&invalid);
        if !removed.is_empty() {
            self.cache.invalidate_all();
        }
        drop(index);

        info!(
            checked = snapshot.len(),
            removed = removed.len(),
            "Consistency sweep removed invalid bindings"
        );
        removed.len()
    }

    /// Resolves the most specific bindings for `item`, narrowed by `selector`.
    ///
    /// Returns `None` when nothing matches, including when the selector
    /// excludes every binding of the most specific tier.
    #[must_use]
    pub fn lookup(&self, item: &dyn ContentItem, selector: &ModelSelector) -> Option<Vec<LookupResult>> {
        let kind = LookupKind::from(selector.clone());
        let index = self.index.read();

        let entry = match self.logical_entry(&index, item, &kind) {
            CacheEntry::NoBinding => self.schema_entry(&index, item, &kind),
            tier @ CacheEntry::Tier(_) => tier,
        };
        drop(index);

        match entry {
            CacheEntry::Tier(results) if !results.is_empty() => Some(results.to_vec()),
            _ => None,
        }
    }

    #[must_use]
    pub fn lookup_most_specific(&self, item: &dyn ContentItem) -> Option<Vec<LookupResult>> {
        self.lookup(item, &ModelSelector::MostSpecific)
    }

    #[must_use]
    pub fn lookup_most_specific_for(
        &self,
        item: &dyn ContentItem,
        capability: &ModelCapability,
    ) -> Option<Vec<LookupResult>> {
        self.lookup(item, &ModelSelector::Capability(capability.clone()))
    }

    #[must_use]
    pub fn lookup_most_specific_named(&self, item: &dyn ContentItem, name: &str) -> Option<Vec<LookupResult>> {
        self.lookup(item, &ModelSelector::name(name))
    }

    /// Collects the bindings of every tier along the walk of `item`, followed
    /// by the concrete schema tier.
    ///
    /// A binding reachable through several type names is reported once, at
    /// the most specific of them.
    #[must_use]
    pub fn lookup_all(&self, item: &dyn ContentItem) -> Vec<LookupResult> {
        let index = self.index.read();
        let logical = self.logical_entry(&index, item, &LookupKind::All);
        let schema = self.schema_entry(&index, item, &LookupKind::All);
        drop(index);

        let mut seen = HashSet::new();
        let mut results = Vec::new();
        for entry in [logical, schema] {
            if let CacheEntry::Tier(tier) = entry {
                for result in tier.iter() {
                    if seen.insert(result.binding.id()) {
                        results.push(result.clone());
                    }
                }
            }
        }
        results
    }

    fn resolver<'a>(&'a self, index: &'a BindingIndex) -> SpecificityResolver<'a> {
        SpecificityResolver::new(index, self.matcher.as_ref(), self.config.max_hierarchy_depth)
    }

    fn logical_entry(&self, index: &BindingIndex, item: &dyn ContentItem, kind: &LookupKind) -> CacheEntry {
        let key = CacheKey::logical(Arc::from(item.logical_type()), kind.clone());
        if let Some(entry) = self.cache.get(&key) {
            trace!(logical_type = item.logical_type(), "Lookup cache hit");
            return entry;
        }

        trace!(logical_type = item.logical_type(), "Lookup cache miss");
        let resolution = self.resolver(index).resolve_logical(item, kind);
        if resolution.cacheable {
            self.cache.put(key, resolution.entry.clone(), resolution.walked);
        }
        resolution.entry
    }

    fn schema_entry(&self, index: &BindingIndex, item: &dyn ContentItem, kind: &LookupKind) -> CacheEntry {
        let schema_type: Arc<str> = match item.concrete_schema_type() {
            Ok(Some(schema_type)) if !schema_type.is_empty() => Arc::from(schema_type),
            Ok(_) => return CacheEntry::NoBinding,
            Err(e) => {
                warn!(
                    logical_type = item.logical_type(),
                    error = %e,
                    "Concrete schema type resolution failed, skipping fallback"
                );
                return CacheEntry::NoBinding;
            }
        };

        let key = CacheKey::schema(Arc::clone(&schema_type), kind.clone());
        if let Some(entry) = self.cache.get(&key) {
            trace!(schema_type = %schema_type, "Lookup cache hit");
            return entry;
        }

        trace!(schema_type = %schema_type, "Lookup cache miss");
        let entry = self.resolver(index).resolve_schema(&schema_type, kind);
        self.cache.put(key, entry.clone(), vec![schema_type]);
        entry
    }

    /// Removes every binding and clears the cache.
    ///
    /// The registry remains usable afterwards.
    pub fn shutdown(&self) {
        let mut index = self.index.write();
        let removed = index.len();
        index.clear();
        self.cache.invalidate_all();
        drop(index);

        info!(removed, "Model registry shut down");
    }

    /// Number of registered bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.read().is_empty()
    }

    #[must_use]
    pub fn all_bindings(&self) -> Vec<Arc<ModelBinding>> {
        self.index.read().all_bindings()
    }

    #[must_use]
    pub fn bindings_of(&self, owner: &ModuleId) -> Vec<Arc<ModelBinding>> {
        self.index.read().bindings_of(owner)
    }

    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        let index = self.index.read();
        RegistryStats {
            bindings: index.len(),
            type_names: index.type_count(),
            modules: index.module_count(),
            cached_lookups: self.cache.entry_count(),
        }
    }
}
