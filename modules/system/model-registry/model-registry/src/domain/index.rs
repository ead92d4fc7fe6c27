//! Ground-truth store of bindings keyed by type name.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use model_registry_sdk::{BindingId, ModelBinding, ModuleId, NewModelBinding};

use super::error::DomainError;
use super::lifecycle::ModuleLifecycleTracker;

struct IndexedBinding {
    binding: Arc<ModelBinding>,
    type_names: Vec<Arc<str>>,
}

/// Mapping from type name to the bindings registered under it.
///
/// Logical type names and concrete schema type names share this key space.
/// The index is not synchronized; the service guards it with a single
/// reader/writer lock so every mutation is observed atomically.
#[derive(Default)]
pub struct BindingIndex {
    by_type: HashMap<Arc<str>, Vec<Arc<ModelBinding>>>,
    bindings: HashMap<BindingId, IndexedBinding>,
    owners: ModuleLifecycleTracker,
    next_id: u64,
}

impl BindingIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a binding under every given type name.
    ///
    /// Duplicate type names are collapsed. Returns the registered binding and
    /// the distinct type names it was indexed under.
    ///
    /// # Errors
    ///
    /// Returns `EmptyTypeNames` when no type name is given.
    pub fn add<I, S>(
        &mut self,
        type_names: I,
        binding: NewModelBinding,
        owner: ModuleId,
    ) -> Result<(Arc<ModelBinding>, Vec<Arc<str>>), DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut distinct: Vec<Arc<str>> = Vec::new();
        for name in type_names {
            let name: String = name.into();
            if seen.insert(name.clone()) {
                distinct.push(Arc::from(name));
            }
        }
        let type_names = distinct;

        if type_names.is_empty() {
            return Err(DomainError::EmptyTypeNames);
        }

        self.next_id += 1;
        let id = BindingId(self.next_id);
        self.owners.track(&owner, id);
        let binding = Arc::new(ModelBinding::new(id, owner, binding));

        for name in &type_names {
            self.by_type
                .entry(Arc::clone(name))
                .or_default()
                .push(Arc::clone(&binding));
        }
        self.bindings.insert(
            id,
            IndexedBinding {
                binding: Arc::clone(&binding),
                type_names: type_names.clone(),
            },
        );

        Ok((binding, type_names))
    }

    /// Bindings registered under exactly `type_name`.
    #[must_use]
    pub fn get(&self, type_name: &str) -> &[Arc<ModelBinding>] {
        self.by_type.get(type_name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Removes every binding owned by `owner` and returns the removed ones.
    ///
    /// An empty result means nothing changed.
    pub fn remove_by_owner(&mut self, owner: &ModuleId) -> Vec<Arc<ModelBinding>> {
        let ids = self.owners.release(owner);
        ids.into_iter().filter_map(|id| self.unlink(id)).collect()
    }

    /// Removes the bindings a sweep judged invalid, skipping ids that are
    /// already gone.
    pub fn remove_invalid(&mut self, invalid: &HashSet<BindingId>) -> Vec<Arc<ModelBinding>> {
        let mut removed = Vec::new();
        for id in invalid {
            if let Some(binding) = self.unlink(*id) {
                self.owners.forget(binding.owner(), *id);
                removed.push(binding);
            }
        }
        removed
    }

    fn unlink(&mut self, id: BindingId) -> Option<Arc<ModelBinding>> {
        let indexed = self.bindings.remove(&id)?;
        for name in &indexed.type_names {
            if let Some(tier) = self.by_type.get_mut(name) {
                tier.retain(|b| b.id() != id);
                if tier.is_empty() {
                    self.by_type.remove(name);
                }
            }
        }
        Some(indexed.binding)
    }

    /// Snapshot of every registered binding, in registration order.
    #[must_use]
    pub fn all_bindings(&self) -> Vec<Arc<ModelBinding>> {
        let mut all: Vec<Arc<ModelBinding>> =
            self.bindings.values().map(|b| Arc::clone(&b.binding)).collect();
        all.sort_by_key(|b| b.id());
        all
    }

    #[must_use]
    pub fn bindings_of(&self, owner: &ModuleId) -> Vec<Arc<ModelBinding>> {
        self.owners
            .owned_by(owner)
            .iter()
            .filter_map(|id| self.bindings.get(id))
            .map(|b| Arc::clone(&b.binding))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    #[must_use]
    pub fn type_count(&self) -> usize {
        self.by_type.len()
    }

    #[must_use]
    pub fn module_count(&self) -> usize {
        self.owners.module_count()
    }

    /// Removes everything. Binding ids keep increasing afterwards.
    pub fn clear(&mut self) {
        self.by_type.clear();
        self.bindings.clear();
        self.owners.clear();
    }
}
