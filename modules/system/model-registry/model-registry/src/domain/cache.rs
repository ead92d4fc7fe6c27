//! Memoization of resolution results, positive and negative alike.

use std::collections::HashSet;
use std::sync::Arc;

use model_registry_sdk::{LookupResult, ModelCapability, ModelSelector};
use moka::sync::Cache;
use tracing::{debug, warn};

/// What a lookup asks for. Part of every cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LookupKind {
    MostSpecific,
    Capability(ModelCapability),
    Name(String),
    /// Every tier along the walk.
    All,
}

impl From<ModelSelector> for LookupKind {
    fn from(selector: ModelSelector) -> Self {
        match selector {
            ModelSelector::MostSpecific => Self::MostSpecific,
            ModelSelector::Capability(capability) => Self::Capability(capability),
            ModelSelector::Name(name) => Self::Name(name),
        }
    }
}

/// Cache key. The logical walk and the schema fallback are cached separately
/// so that items sharing a logical type but not a schema type stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Logical { type_name: Arc<str>, kind: LookupKind },
    Schema { type_name: Arc<str>, kind: LookupKind },
}

impl CacheKey {
    #[must_use]
    pub fn logical(type_name: Arc<str>, kind: LookupKind) -> Self {
        Self::Logical { type_name, kind }
    }

    #[must_use]
    pub fn schema(type_name: Arc<str>, kind: LookupKind) -> Self {
        Self::Schema { type_name, kind }
    }
}

/// Cached outcome of one resolution phase.
#[derive(Debug, Clone)]
pub enum CacheEntry {
    /// A tier matched. Empty when the selector excluded every binding of the
    /// matched tier.
    Tier(Arc<[LookupResult]>),
    /// No type name visited by the phase had any binding.
    NoBinding,
}

#[derive(Clone)]
struct CachedLookup {
    entry: CacheEntry,
    walked: Arc<[Arc<str>]>,
}

/// Shared lookup cache.
///
/// Each entry remembers the type names its walk visited so that additions
/// can invalidate exactly the entries they could change.
pub struct LookupCache {
    inner: Cache<CacheKey, CachedLookup>,
}

impl LookupCache {
    #[must_use]
    pub fn new(max_entries: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_entries)
            .support_invalidation_closures()
            .build();
        Self { inner }
    }

    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.inner.get(key).map(|cached| cached.entry)
    }

    /// Stores `entry`, produced by a walk over `walked`.
    pub fn put(&self, key: CacheKey, entry: CacheEntry, walked: Vec<Arc<str>>) {
        self.inner.insert(
            key,
            CachedLookup {
                entry,
                walked: walked.into(),
            },
        );
    }

    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Invalidates every entry whose walk visited one of `types`.
    ///
    /// Falls back to full invalidation if predicate invalidation is refused.
    pub fn invalidate_for_types(&self, types: &[Arc<str>]) {
        let types: HashSet<Arc<str>> = types.iter().cloned().collect();
        debug!(types = types.len(), "Invalidating cached lookups for type names");
        let result = self
            .inner
            .invalidate_entries_if(move |_key, cached| cached.walked.iter().any(|t| types.contains(t)));
        if let Err(e) = result {
            warn!(error = %e, "Selective cache invalidation unavailable, clearing cache");
            self.inner.invalidate_all();
        }
    }

    /// Approximate number of cached lookups.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}
