#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for module lifecycle, consistency sweeps and shutdown

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{
    FailingSource, PanickingSource, TestSource, binding, capabilities, create_service, types,
};
use model_registry::{ModelRegistryConfig, ModelRegistryModule};
use model_registry_sdk::{
    ExactCapabilityMatcher, ModelSelector, ModuleId, NewModelBinding, StaticContentItem,
};
use tokio_util::sync::CancellationToken;

// =============================================================================
// Module Unload
// =============================================================================

#[test]
fn test_register_add_then_unregister_scenario() {
    let service = create_service();
    let item = StaticContentItem::new("a/b");

    service
        .register(types(&["a/b"]), binding("C1"), ModuleId::new("M1"))
        .unwrap();
    assert_eq!(capabilities(service.lookup_most_specific(&item)), vec!["C1"]);

    service
        .register(types(&["a/b"]), binding("C2"), ModuleId::new("M2"))
        .unwrap();
    assert_eq!(capabilities(service.lookup_most_specific(&item)), vec!["C1", "C2"]);

    service.unregister_module(&ModuleId::new("M1"));
    assert_eq!(capabilities(service.lookup_most_specific(&item)), vec!["C2"]);
}

#[test]
fn test_unregister_owner_empties_registry() {
    let service = create_service();
    let owner = ModuleId::new("acme");
    service
        .register(types(&["a/b"]), binding("C1"), owner.clone())
        .unwrap();
    service
        .register(types(&["c/d", "cms:D"]), binding("C2"), owner.clone())
        .unwrap();
    assert_eq!(service.len(), 2);

    assert_eq!(service.unregister_module(&owner), 2);
    assert_eq!(service.len(), 0);
    assert!(service.all_bindings().is_empty());
    assert_eq!(service.stats().type_names, 0);
}

#[test]
fn test_unregister_leaves_other_modules_intact() {
    let service = create_service();
    service
        .register(types(&["a/b"]), binding("C1"), ModuleId::new("m1"))
        .unwrap();
    let kept = service
        .register(types(&["a/b"]), binding("C2"), ModuleId::new("m2"))
        .unwrap();

    service.unregister_module(&ModuleId::new("m1"));

    let remaining = service.all_bindings();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id(), kept.id());
    assert_eq!(service.bindings_of(&ModuleId::new("m2")).len(), 1);
    assert!(service.bindings_of(&ModuleId::new("m1")).is_empty());
}

#[test]
fn test_unregister_is_idempotent() {
    let service = create_service();
    service
        .register(types(&["a/b"]), binding("C1"), ModuleId::new("m1"))
        .unwrap();
    service
        .register(types(&["a/b"]), binding("C2"), ModuleId::new("m2"))
        .unwrap();

    assert_eq!(service.unregister_module(&ModuleId::new("m1")), 1);
    let after_once = service.stats();
    assert_eq!(service.unregister_module(&ModuleId::new("m1")), 0);
    assert_eq!(service.stats(), after_once);

    assert_eq!(service.unregister_module(&ModuleId::new("never-loaded")), 0);
}

#[test]
fn test_unregister_removes_cached_results() {
    let service = create_service();
    let item = StaticContentItem::new("a/b").with_ancestors(["a/base"]);
    service
        .register(types(&["a/base"]), binding("Base"), ModuleId::new("base"))
        .unwrap();
    service
        .register(types(&["a/b"]), binding("Child"), ModuleId::new("child"))
        .unwrap();
    assert_eq!(capabilities(service.lookup_most_specific(&item)), vec!["Child"]);

    service.unregister_module(&ModuleId::new("child"));
    assert_eq!(capabilities(service.lookup_most_specific(&item)), vec!["Base"]);

    service.unregister_module(&ModuleId::new("base"));
    assert!(service.lookup_most_specific(&item).is_none());
}

// =============================================================================
// Consistency Sweep
// =============================================================================

#[test]
fn test_sweep_removes_invalid_bindings() {
    let service = create_service();
    let item = StaticContentItem::new("a/b");
    let source = TestSource::new();
    service
        .register(
            types(&["a/b"]),
            NewModelBinding::new("Stale", source.clone()),
            ModuleId::new("m1"),
        )
        .unwrap();
    service
        .register(types(&["a/b"]), binding("Live"), ModuleId::new("m2"))
        .unwrap();

    assert_eq!(service.sweep_invalid(), 0);
    assert_eq!(capabilities(service.lookup_most_specific(&item)), vec!["Live", "Stale"]);

    source.invalidate();
    assert_eq!(service.sweep_invalid(), 1);
    assert_eq!(capabilities(service.lookup_most_specific(&item)), vec!["Live"]);
    assert!(service.bindings_of(&ModuleId::new("m1")).is_empty());
    assert_eq!(service.stats().modules, 1);
}

#[test]
fn test_sweep_treats_failing_checks_as_invalid() {
    let service = create_service();
    service
        .register(
            types(&["a/b"]),
            NewModelBinding::new("Failing", Arc::new(FailingSource)),
            ModuleId::new("m"),
        )
        .unwrap();
    service
        .register(
            types(&["a/b"]),
            NewModelBinding::new("Panicking", Arc::new(PanickingSource)),
            ModuleId::new("m"),
        )
        .unwrap();
    service
        .register(types(&["a/b"]), binding("Live"), ModuleId::new("m"))
        .unwrap();

    assert_eq!(service.sweep_invalid(), 2);
    let remaining = service.all_bindings();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].capability().as_str(), "Live");
}

// =============================================================================
// Shutdown
// =============================================================================

#[test]
fn test_shutdown_clears_all_state() {
    let service = create_service();
    let item = StaticContentItem::new("a/b");
    service
        .register(types(&["a/b"]), binding("C1"), ModuleId::new("m1"))
        .unwrap();
    let _ = service.lookup_most_specific(&item);

    service.shutdown();
    assert!(service.is_empty());
    assert!(service.lookup(&item, &ModelSelector::MostSpecific).is_none());
    assert_eq!(service.stats().modules, 0);
}

// =============================================================================
// Module Shell
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_module_runs_periodic_sweep() {
    let module = ModelRegistryModule::new();
    let config = ModelRegistryConfig {
        sweep_interval: Duration::from_secs(1),
        ..ModelRegistryConfig::default()
    };
    module.init(config, Arc::new(ExactCapabilityMatcher)).unwrap();

    let client = module.client().unwrap();
    let source = TestSource::new();
    client
        .register(
            types(&["a/b"]),
            NewModelBinding::new("Stale", source.clone()),
            ModuleId::new("m"),
        )
        .await
        .unwrap();

    let cancel = CancellationToken::new();
    module.start(cancel.clone()).await.unwrap();

    source.invalidate();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let item = StaticContentItem::new("a/b");
    let found = client
        .lookup_most_specific(&item, ModelSelector::MostSpecific)
        .await
        .unwrap();
    assert!(found.is_none());

    module.stop(cancel).await.unwrap();
}

#[tokio::test]
async fn test_module_stop_clears_registry() {
    let module = ModelRegistryModule::new();
    module
        .init(ModelRegistryConfig::default(), Arc::new(ExactCapabilityMatcher))
        .unwrap();
    let client = module.client().unwrap();
    client
        .register(types(&["a/b"]), binding("C1"), ModuleId::new("m"))
        .await
        .unwrap();

    let cancel = CancellationToken::new();
    module.start(cancel.clone()).await.unwrap();
    module.stop(cancel).await.unwrap();

    assert!(module.service().unwrap().is_empty());
}

#[tokio::test]
async fn test_module_without_sweep() {
    let module = ModelRegistryModule::new();
    let config = ModelRegistryConfig {
        sweep_enabled: false,
        ..ModelRegistryConfig::default()
    };
    module.init(config, Arc::new(ExactCapabilityMatcher)).unwrap();

    let cancel = CancellationToken::new();
    module.start(cancel.clone()).await.unwrap();
    // disabled sweep never registers a task, so a second start is fine
    module.start(cancel.clone()).await.unwrap();
    module.stop(cancel).await.unwrap();
}
