//! Plugin discovery through a catalog.

use std::sync::Arc;

use crate::test_helpers::DummyManager;
use inferlink::backend_manager::{
    adapters::catalog::{PluginCatalog, PluginInitError},
    services::ManagerRegistry,
};
use rstest::rstest;

fn register_onnxruntime(registry: &ManagerRegistry) -> Result<(), PluginInitError> {
    registry
        .register("onnxruntime", Some("ONNXRUNTIME"))?
        .install(DummyManager { tag: "onnxruntime" })?;
    Ok(())
}

fn fail_to_load(_registry: &ManagerRegistry) -> Result<(), PluginInitError> {
    Err("libonnxruntime.so: cannot open shared object file".into())
}

fn catalog_registry(catalog: &PluginCatalog) -> ManagerRegistry {
    ManagerRegistry::new(Arc::new(catalog.clone()))
}

#[rstest]
fn plugin_registers_on_first_lookup() {
    let catalog = PluginCatalog::new();
    catalog.publish("inferlink.backend.onnxruntime", register_onnxruntime);
    let registry = catalog_registry(&catalog);

    assert!(registry.variant("ONNXRUNTIME").is_none());
    assert!(registry.find("onnxruntime").is_some());
    assert!(registry.variant("ONNXRUNTIME").is_some());
    assert!(catalog.is_loaded("inferlink.backend.onnxruntime"));
}

#[rstest]
fn failing_plugin_leaves_backend_absent() {
    let catalog = PluginCatalog::new();
    catalog.publish("inferlink.backend.onnxruntime", fail_to_load);
    let registry = catalog_registry(&catalog);

    assert!(registry.find("onnxruntime").is_none());
    assert!(registry.is_empty());
    assert!(!catalog.is_loaded("inferlink.backend.onnxruntime"));
}

#[rstest]
fn republished_plugin_is_loaded_again() {
    let catalog = PluginCatalog::new();
    catalog.publish("inferlink.backend.onnxruntime", fail_to_load);
    let registry = catalog_registry(&catalog);
    assert!(registry.find("onnxruntime").is_none());

    catalog.publish("inferlink.backend.onnxruntime", register_onnxruntime);

    assert!(registry.find("onnxruntime").is_some());
}

#[rstest]
fn eager_registration_needs_no_plugin() {
    let catalog = PluginCatalog::new();
    let registry = catalog_registry(&catalog);
    registry
        .register("custom", None)
        .expect("valid name")
        .install(DummyManager { tag: "custom" })
        .expect("registration should succeed");

    assert!(registry.find("custom").is_some());
    assert!(catalog.module_paths().is_empty());
}
