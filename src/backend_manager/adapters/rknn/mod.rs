//! Rockchip RKNN backend.
//!
//! The plugin registers [`RknnManager`] as `rknn` (enumerated as `RKNN`)
//! when the registry first looks the backend up.

mod manager;
mod native;
mod toolkit;
mod wrapper;

pub use manager::RknnManager;
pub use native::{DEFAULT_RUNTIME_LIB, LibRknnToolkit, RUNTIME_LIB_ENV};
pub use toolkit::{RknnError, RknnSession, RknnTensorAttr, RknnToolkit};
pub use wrapper::RknnWrapper;

use super::catalog::PluginInitError;
use crate::backend_manager::services::ManagerRegistry;

/// Backend name of the RKNN manager.
pub const BACKEND_NAME: &str = "rknn";

/// Enumeration member of the RKNN backend.
pub const ENUM_NAME: &str = "RKNN";

/// Module path the plugin is published under in the built-in catalog.
pub const MODULE_PATH: &str = "inferlink.backend.rknn";

/// Registers [`RknnManager`] with the default runtime toolkit.
///
/// # Errors
///
/// Returns the registry error when `rknn` cannot be enumerated.
pub fn register_plugin(registry: &ManagerRegistry) -> Result<(), PluginInitError> {
    registry
        .register(BACKEND_NAME, Some(ENUM_NAME))?
        .install(RknnManager::default())?;
    Ok(())
}
