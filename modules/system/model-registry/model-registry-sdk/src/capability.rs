//! Model capabilities and the compatibility predicate used by typed lookups.
//!
//! A binding offers exactly one capability (the model it produces). A typed
//! lookup requests a capability and accepts every binding whose offered
//! capability is compatible with it. Compatibility is an explicit, pure
//! predicate supplied by the host, never runtime reflection.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

/// Identifier of a model type or interface a binding can produce.
///
/// Use [`ModelCapability::of`] to derive the identifier from a Rust type
/// (works for `dyn Trait`), or [`ModelCapability::new`] for names coming from
/// configuration or foreign plugins.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelCapability(Arc<str>);

impl ModelCapability {
    /// Creates a capability from an explicit name.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Capability named after the fully-qualified Rust type `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(Arc::from(std::any::type_name::<T>()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ModelCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ModelCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelCapability {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Decides whether an offered capability satisfies a requested one.
///
/// Implementations must be pure: the registry caches filtered lookups, so the
/// answer for a given pair must not change while bindings are registered.
pub trait CapabilityMatcher: Send + Sync {
    fn is_compatible(&self, requested: &ModelCapability, offered: &ModelCapability) -> bool;
}

/// Only identical capabilities are compatible.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactCapabilityMatcher;

impl CapabilityMatcher for ExactCapabilityMatcher {
    fn is_compatible(&self, requested: &ModelCapability, offered: &ModelCapability) -> bool {
        requested == offered
    }
}

/// Declared "extends" relation between capabilities.
///
/// An offered capability is compatible with a requested one when they are
/// equal or when the requested capability is reachable from the offered one
/// through declared `extends` edges (transitively).
///
/// ```
/// use model_registry_sdk::{CapabilityHierarchy, CapabilityMatcher, ModelCapability};
///
/// let hierarchy = CapabilityHierarchy::new()
///     .with_extends("acme.ExtendedTeaser", "acme.Teaser")
///     .with_extends("acme.Teaser", "acme.Component");
///
/// let component = ModelCapability::new("acme.Component");
/// let extended = ModelCapability::new("acme.ExtendedTeaser");
/// assert!(hierarchy.is_compatible(&component, &extended));
/// assert!(!hierarchy.is_compatible(&extended, &component));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CapabilityHierarchy {
    supertypes: HashMap<ModelCapability, Vec<ModelCapability>>,
}

impl CapabilityHierarchy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares that `sub` can be used wherever `sup` is requested.
    #[must_use]
    pub fn with_extends(
        mut self,
        sub: impl Into<ModelCapability>,
        sup: impl Into<ModelCapability>,
    ) -> Self {
        self.declare_extends(sub, sup);
        self
    }

    pub fn declare_extends(&mut self, sub: impl Into<ModelCapability>, sup: impl Into<ModelCapability>) {
        let sup = sup.into();
        let entry = self.supertypes.entry(sub.into()).or_default();
        if !entry.contains(&sup) {
            entry.push(sup);
        }
    }
}

impl CapabilityMatcher for CapabilityHierarchy {
    fn is_compatible(&self, requested: &ModelCapability, offered: &ModelCapability) -> bool {
        if requested == offered {
            return true;
        }

        let mut seen: HashSet<&ModelCapability> = HashSet::new();
        let mut queue: VecDeque<&ModelCapability> = VecDeque::from([offered]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            for sup in self.supertypes.get(current).into_iter().flatten() {
                if sup == requested {
                    return true;
                }
                queue.push_back(sup);
            }
        }
        false
    }
}
