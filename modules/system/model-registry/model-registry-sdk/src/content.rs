//! Content-item contract consumed by the registry.
//!
//! The registry never loads or parses content. It only asks an item for its
//! logical type, walks the ancestors of that type one step at a time, and
//! (when the walk finds nothing) asks for the concrete storage schema type.

use std::collections::HashMap;

use thiserror::Error;

/// Failure of the host to resolve a type for a content item.
///
/// Never surfaced to lookup callers: the registry truncates the walk instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot resolve type for '{type_name}': {message}")]
pub struct TypeResolutionError {
    pub type_name: String,
    pub message: String,
}

impl TypeResolutionError {
    #[must_use]
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}

/// A content item as seen by the registry.
pub trait ContentItem: Send + Sync {
    /// Declared (semantic) type of the item. May be empty.
    fn logical_type(&self) -> &str;

    /// One ancestor step: the parent of `type_name`, or `None` at the root.
    ///
    /// # Errors
    ///
    /// Returns `TypeResolutionError` when the parent cannot be resolved; the
    /// registry treats this as the end of the ancestor chain.
    fn parent_type(&self, type_name: &str) -> Result<Option<String>, TypeResolutionError>;

    /// Storage-level schema type backing the item, if any.
    ///
    /// # Errors
    ///
    /// Returns `TypeResolutionError` when the schema type cannot be resolved;
    /// the registry then skips the schema fallback.
    fn concrete_schema_type(&self) -> Result<Option<String>, TypeResolutionError>;
}

/// Content item with a fully declared, in-memory type chain.
///
/// ```
/// use model_registry_sdk::{ContentItem, StaticContentItem};
///
/// let item = StaticContentItem::new("acme/page/article")
///     .with_ancestors(["acme/page", "core/page"])
///     .with_schema_type("cms:Page");
///
/// assert_eq!(item.parent_type("acme/page/article").unwrap().as_deref(), Some("acme/page"));
/// assert_eq!(item.parent_type("core/page").unwrap(), None);
/// assert_eq!(item.concrete_schema_type().unwrap().as_deref(), Some("cms:Page"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticContentItem {
    logical_type: String,
    parents: HashMap<String, String>,
    schema_type: Option<String>,
}

impl StaticContentItem {
    #[must_use]
    pub fn new(logical_type: impl Into<String>) -> Self {
        Self {
            logical_type: logical_type.into(),
            ..Self::default()
        }
    }

    /// Declares a single `child -> parent` step.
    #[must_use]
    pub fn with_parent(mut self, child: impl Into<String>, parent: impl Into<String>) -> Self {
        self.parents.insert(child.into(), parent.into());
        self
    }

    /// Declares the ancestor chain of the logical type, most specific first.
    #[must_use]
    pub fn with_ancestors<I, S>(mut self, ancestors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut child = self.logical_type.clone();
        for ancestor in ancestors {
            let ancestor = ancestor.into();
            self.parents.insert(child, ancestor.clone());
            child = ancestor;
        }
        self
    }

    #[must_use]
    pub fn with_schema_type(mut self, schema_type: impl Into<String>) -> Self {
        self.schema_type = Some(schema_type.into());
        self
    }
}

impl ContentItem for StaticContentItem {
    fn logical_type(&self) -> &str {
        &self.logical_type
    }

    fn parent_type(&self, type_name: &str) -> Result<Option<String>, TypeResolutionError> {
        Ok(self.parents.get(type_name).cloned())
    }

    fn concrete_schema_type(&self) -> Result<Option<String>, TypeResolutionError> {
        Ok(self.schema_type.clone())
    }
}
