//! Ownership bookkeeping tying bindings to the modules that registered them.

use std::collections::HashMap;

use model_registry_sdk::{BindingId, ModuleId};

/// Inverted index from owning module to the bindings it introduced.
///
/// Lets a module unload remove exactly its own bindings without scanning the
/// whole registry.
#[derive(Debug, Default)]
pub struct ModuleLifecycleTracker {
    owned: HashMap<ModuleId, Vec<BindingId>>,
}

impl ModuleLifecycleTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `binding` as owned by `owner`.
    pub fn track(&mut self, owner: &ModuleId, binding: BindingId) {
        self.owned.entry(owner.clone()).or_default().push(binding);
    }

    /// Forgets every binding of `owner` and returns them.
    ///
    /// Unknown modules yield an empty list.
    pub fn release(&mut self, owner: &ModuleId) -> Vec<BindingId> {
        self.owned.remove(owner).unwrap_or_default()
    }

    /// Forgets a single binding removed through another path (e.g. a sweep).
    pub fn forget(&mut self, owner: &ModuleId, binding: BindingId) {
        if let Some(ids) = self.owned.get_mut(owner) {
            ids.retain(|id| *id != binding);
            if ids.is_empty() {
                self.owned.remove(owner);
            }
        }
    }

    #[must_use]
    pub fn owned_by(&self, owner: &ModuleId) -> &[BindingId] {
        self.owned.get(owner).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn module_count(&self) -> usize {
        self.owned.len()
    }

    pub fn clear(&mut self) {
        self.owned.clear();
    }
}
