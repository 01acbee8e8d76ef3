//! Inferlink: run-time selection of model inference backends.
//!
//! This crate lets an inference host pick among heterogeneous execution
//! backends (accelerator toolkits, GPU runtimes, CPU runtimes) through one
//! calling contract, without compile-time knowledge of which backends are
//! installed.
//!
//! # Architecture
//!
//! Inferlink follows hexagonal architecture principles:
//!
//! - **Domain**: Backend identity, build requests and tensors
//! - **Ports**: Abstract manager, wrapper and discovery contracts
//! - **Adapters**: Concrete backends and plugin discovery
//!
//! # Modules
//!
//! - [`backend_manager`]: Manager registry, discovery and wrapper contracts
//! - [`deploy_config`]: Backend-agnostic deployment configuration

pub mod backend_manager;
pub mod deploy_config;
mod fs_utils;
