//! The process-wide registry.

use crate::test_helpers::{DummyManager, EnvVarGuard};
use inferlink::backend_manager::{
    adapters::rknn::{self, RUNTIME_LIB_ENV},
    services::{DEFAULT_NAMESPACE, backend_managers},
};
use rstest::rstest;

#[rstest]
fn global_registry_is_a_singleton() {
    assert!(std::ptr::eq(backend_managers(), backend_managers()));
    assert_eq!(backend_managers().namespace(), DEFAULT_NAMESPACE);
}

#[rstest]
fn builtin_rknn_backend_is_discovered() {
    let _guard = EnvVarGuard::set(RUNTIME_LIB_ENV, None);
    let manager = backend_managers()
        .find(rknn::BACKEND_NAME)
        .expect("rknn plugin registers");

    assert_eq!(manager.artifact_count(), Some(1));
    let variant = backend_managers()
        .variant(rknn::ENUM_NAME)
        .expect("rknn enumerated");
    assert_eq!(variant.value().as_str(), rknn::BACKEND_NAME);
}

#[rstest]
fn custom_backend_registers_globally() {
    backend_managers()
        .register("global_dummy", Some("GLOBAL_DUMMY"))
        .expect("valid names")
        .install(DummyManager {
            tag: "global_dummy",
        })
        .expect("registration should succeed");

    assert!(backend_managers().find("global_dummy").is_some());
    assert!(
        backend_managers()
            .names()
            .iter()
            .any(|name| name.as_str() == "global_dummy")
    );
}
