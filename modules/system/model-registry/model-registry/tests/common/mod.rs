//! Shared test utilities for model registry integration tests.

#![allow(dead_code)]

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use model_registry::ModelRegistryConfig;
use model_registry::domain::ModelRegistryService;
use model_registry_sdk::{
    CapabilityMatcher, ContentItem, ExactCapabilityMatcher, LookupResult, ModelSource,
    ModelSourceError, NewModelBinding, TypeResolutionError,
};

/// Creates a service with default configuration and exact capability matching.
pub fn create_service() -> ModelRegistryService {
    create_service_with(ModelRegistryConfig::default(), Arc::new(ExactCapabilityMatcher))
}

pub fn create_service_with(
    config: ModelRegistryConfig,
    matcher: Arc<dyn CapabilityMatcher>,
) -> ModelRegistryService {
    ModelRegistryService::new(config, matcher)
}

/// Model source whose validity can be flipped from the test.
#[derive(Default)]
pub struct TestSource {
    invalid: AtomicBool,
}

impl TestSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn invalidate(&self) {
        self.invalid.store(true, Ordering::SeqCst);
    }
}

impl ModelSource for TestSource {
    fn check_valid(&self) -> Result<bool, ModelSourceError> {
        Ok(!self.invalid.load(Ordering::SeqCst))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Source whose validity check always errors.
pub struct FailingSource;

impl ModelSource for FailingSource {
    fn check_valid(&self) -> Result<bool, ModelSourceError> {
        Err(ModelSourceError::new("backing factory unreachable"))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Source whose validity check panics.
pub struct PanickingSource;

impl ModelSource for PanickingSource {
    fn check_valid(&self) -> Result<bool, ModelSourceError> {
        panic!("backing factory destroyed")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub fn binding(capability: &str) -> NewModelBinding {
    NewModelBinding::new(capability, TestSource::new())
}

pub fn named_binding(capability: &str, name: &str) -> NewModelBinding {
    binding(capability).with_name(name)
}

pub fn types(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| (*n).to_owned()).collect()
}

/// Sorted capability names of a lookup result, empty for no match.
pub fn capabilities(results: Option<Vec<LookupResult>>) -> Vec<String> {
    capability_list(&results.unwrap_or_default())
}

pub fn capability_list(results: &[LookupResult]) -> Vec<String> {
    let mut caps: Vec<String> = results.iter().map(|r| r.capability().to_string()).collect();
    caps.sort();
    caps
}

/// Content item that records every collaborator call made against it.
pub struct CountingItem {
    logical_type: String,
    parents: HashMap<String, String>,
    schema_type: Option<String>,
    failing_parent_of: Option<String>,
    recovered: AtomicBool,
    pub parent_calls: AtomicUsize,
    pub schema_calls: AtomicUsize,
}

impl CountingItem {
    pub fn new(logical_type: &str) -> Self {
        Self {
            logical_type: logical_type.to_owned(),
            parents: HashMap::new(),
            schema_type: None,
            failing_parent_of: None,
            recovered: AtomicBool::new(false),
            parent_calls: AtomicUsize::new(0),
            schema_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_ancestors(mut self, ancestors: &[&str]) -> Self {
        let mut child = self.logical_type.clone();
        for ancestor in ancestors {
            self.parents.insert(child, (*ancestor).to_owned());
            child = (*ancestor).to_owned();
        }
        self
    }

    pub fn with_schema_type(mut self, schema_type: &str) -> Self {
        self.schema_type = Some(schema_type.to_owned());
        self
    }

    /// Resolving the parent of `type_name` fails.
    pub fn failing_parent_of(mut self, type_name: &str) -> Self {
        self.failing_parent_of = Some(type_name.to_owned());
        self
    }

    /// Ancestor resolution succeeds from now on.
    pub fn recover(&self) {
        self.recovered.store(true, Ordering::SeqCst);
    }

    pub fn collaborator_calls(&self) -> usize {
        self.parent_calls.load(Ordering::SeqCst) + self.schema_calls.load(Ordering::SeqCst)
    }
}

impl ContentItem for CountingItem {
    fn logical_type(&self) -> &str {
        &self.logical_type
    }

    fn parent_type(&self, type_name: &str) -> Result<Option<String>, TypeResolutionError> {
        self.parent_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_parent_of.as_deref() == Some(type_name)
            && !self.recovered.load(Ordering::SeqCst)
        {
            return Err(TypeResolutionError::new(type_name, "resource resolver closed"));
        }
        Ok(self.parents.get(type_name).cloned())
    }

    fn concrete_schema_type(&self) -> Result<Option<String>, TypeResolutionError> {
        self.schema_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.schema_type.clone())
    }
}
