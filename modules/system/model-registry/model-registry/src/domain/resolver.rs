//! Most-specific binding resolution.
//!
//! A lookup first walks the item's logical type and its ancestors, most
//! specific first, and stops at the first type name that has any binding.
//! Only when the whole walk comes up empty is the item's concrete schema type
//! probed, as a single key. Selectors filter within the chosen tier and never
//! move the search to a less specific one.

use std::collections::HashSet;
use std::sync::Arc;

use model_registry_sdk::{CapabilityMatcher, ContentItem, LookupResult, ModelBinding};
use tracing::warn;

use super::cache::{CacheEntry, LookupKind};
use super::index::BindingIndex;

enum WalkState {
    Start,
    At(String),
    Done,
}

/// Lazy ancestor walk over a content item's logical type hierarchy.
///
/// Each parent is resolved only when the walk is advanced past its child.
/// Resolution failures, cycles and chains deeper than `max_depth` ancestors
/// end the walk instead of failing it.
pub struct TypeWalk<'a> {
    item: &'a dyn ContentItem,
    state: WalkState,
    visited: HashSet<String>,
    max_depth: usize,
    interrupted: bool,
}

impl<'a> TypeWalk<'a> {
    #[must_use]
    pub fn new(item: &'a dyn ContentItem, max_depth: usize) -> Self {
        Self {
            item,
            state: WalkState::Start,
            visited: HashSet::new(),
            max_depth,
            interrupted: false,
        }
    }

    /// Whether the walk ended on a failed ancestor resolution rather than at
    /// the root of the hierarchy.
    #[must_use]
    pub fn interrupted(&self) -> bool {
        self.interrupted
    }

    fn parent_of(&mut self, child: &str) -> Option<String> {
        let parent = match self.item.parent_type(child) {
            Ok(Some(parent)) if !parent.is_empty() => parent,
            Ok(_) => return None,
            Err(e) => {
                warn!(
                    logical_type = self.item.logical_type(),
                    error = %e,
                    "Ancestor resolution failed, truncating type walk"
                );
                self.interrupted = true;
                return None;
            }
        };

        if self.visited.contains(&parent) {
            warn!(
                logical_type = self.item.logical_type(),
                type_name = %parent,
                "Type hierarchy cycle detected, truncating type walk"
            );
            return None;
        }
        // `visited` holds the logical type plus every ancestor so far
        if self.visited.len() > self.max_depth {
            warn!(
                logical_type = self.item.logical_type(),
                max_depth = self.max_depth,
                "Type hierarchy exceeds maximum depth, truncating type walk"
            );
            return None;
        }
        Some(parent)
    }
}

impl Iterator for TypeWalk<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let current = match std::mem::replace(&mut self.state, WalkState::Done) {
            WalkState::Done => return None,
            WalkState::Start => {
                let logical = self.item.logical_type().to_owned();
                if logical.is_empty() {
                    // Nothing to ascend from, the walk stays at one level.
                    return Some(logical);
                }
                logical
            }
            WalkState::At(previous) => self.parent_of(&previous)?,
        };

        self.visited.insert(current.clone());
        self.state = WalkState::At(current.clone());
        Some(current)
    }
}

/// Outcome of one resolution phase and the type names it visited.
#[derive(Debug)]
pub struct Resolution {
    pub entry: CacheEntry,
    pub walked: Vec<Arc<str>>,
    /// False when a failed ancestor resolution hid part of the hierarchy.
    /// Such results must not be cached: `walked` does not cover the types an
    /// addition could make reachable.
    pub cacheable: bool,
}

/// Resolves tiers against a locked [`BindingIndex`].
pub struct SpecificityResolver<'a> {
    index: &'a BindingIndex,
    matcher: &'a dyn CapabilityMatcher,
    max_depth: usize,
}

impl<'a> SpecificityResolver<'a> {
    #[must_use]
    pub fn new(index: &'a BindingIndex, matcher: &'a dyn CapabilityMatcher, max_depth: usize) -> Self {
        Self {
            index,
            matcher,
            max_depth,
        }
    }

    /// Walks the logical hierarchy of `item`.
    ///
    /// For `LookupKind::All` every non-empty tier along the walk contributes;
    /// otherwise the first non-empty tier is selected and filtered by `kind`.
    /// `CacheEntry::NoBinding` means no visited type name had any binding.
    #[must_use]
    pub fn resolve_logical(&self, item: &dyn ContentItem, kind: &LookupKind) -> Resolution {
        let mut walked: Vec<Arc<str>> = Vec::new();
        let mut collected: Vec<LookupResult> = Vec::new();
        let mut found = false;

        let mut walk = TypeWalk::new(item, self.max_depth);
        for type_name in walk.by_ref() {
            let type_name: Arc<str> = Arc::from(type_name);
            walked.push(Arc::clone(&type_name));

            let tier = self.index.get(&type_name);
            if tier.is_empty() {
                continue;
            }
            found = true;
            collected.extend(self.select(tier, &type_name, kind));
            if *kind != LookupKind::All {
                break;
            }
        }

        let entry = if found {
            CacheEntry::Tier(collected.into())
        } else {
            CacheEntry::NoBinding
        };
        Resolution {
            entry,
            walked,
            cacheable: !walk.interrupted(),
        }
    }

    /// Probes the single tier registered under a concrete schema type name.
    #[must_use]
    pub fn resolve_schema(&self, schema_type: &Arc<str>, kind: &LookupKind) -> CacheEntry {
        let tier = self.index.get(schema_type);
        if tier.is_empty() {
            return CacheEntry::NoBinding;
        }
        CacheEntry::Tier(self.select(tier, schema_type, kind).into())
    }

    fn select(&self, tier: &[Arc<ModelBinding>], type_name: &Arc<str>, kind: &LookupKind) -> Vec<LookupResult> {
        tier.iter()
            .filter(|binding| self.accepts(binding, kind))
            .map(|binding| LookupResult::new(Arc::clone(binding), Arc::clone(type_name)))
            .collect()
    }

    fn accepts(&self, binding: &ModelBinding, kind: &LookupKind) -> bool {
        match kind {
            LookupKind::MostSpecific | LookupKind::All => true,
            LookupKind::Capability(requested) => self.matcher.is_compatible(requested, binding.capability()),
            LookupKind::Name(name) => binding.name() == Some(name.as_str()),
        }
    }
}
