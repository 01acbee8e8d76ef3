//! Port contracts for backend managers, wrappers and plugin discovery.
//!
//! Ports define backend-agnostic interfaces; concrete backends live in
//! [`adapters`](crate::backend_manager::adapters).

pub mod discovery;
pub mod manager;
pub mod wrapper;

pub use discovery::{BackendDiscovery, DiscoveryError, DiscoveryResult, NoDiscovery};
pub use manager::{BackendManager, ManagerError, ManagerResult, validate_artifact_count};
pub use wrapper::{
    BackendWrapper, WrapperError, WrapperResult, collect_inputs, name_outputs,
};
