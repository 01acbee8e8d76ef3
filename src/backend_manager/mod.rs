//! Backend manager registration, discovery and wrapper construction.
//!
//! A host selects an inference backend by name at run time. Each backend
//! contributes one [`BackendManager`](ports::BackendManager) that builds
//! [`BackendWrapper`](ports::BackendWrapper)s. The
//! [`ManagerRegistry`](services::ManagerRegistry) maps names to managers,
//! extends the backend enumeration as backends register, and loads backend
//! plugins on demand. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
