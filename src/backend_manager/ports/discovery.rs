//! Best-effort discovery of backend plugins.

use crate::backend_manager::services::ManagerRegistry;
use std::sync::Arc;
use thiserror::Error;

/// Result type for discovery operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Loads backend plugins so they can register themselves.
///
/// Loading a plugin runs its registration side effect against the given
/// registry. The registry calls `load` without holding its own lock, so a
/// plugin may call back into [`ManagerRegistry`] freely.
pub trait BackendDiscovery: Send + Sync {
    /// Loads the plugin published under `module_path`.
    ///
    /// Loading an already-loaded plugin succeeds without side effects.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::ModuleNotFound`] when no plugin is
    /// published under the path, or [`DiscoveryError::InitFailed`] when the
    /// plugin failed while registering.
    fn load(&self, module_path: &str, registry: &ManagerRegistry) -> DiscoveryResult<()>;
}

/// Discovery that knows no plugins; every backend must register eagerly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiscovery;

impl BackendDiscovery for NoDiscovery {
    fn load(&self, module_path: &str, _registry: &ManagerRegistry) -> DiscoveryResult<()> {
        Err(DiscoveryError::ModuleNotFound(module_path.to_owned()))
    }
}

/// Errors returned by [`BackendDiscovery::load`].
#[derive(Debug, Clone, Error)]
pub enum DiscoveryError {
    /// Nothing is published under the module path.
    #[error("no backend plugin published as `{0}`")]
    ModuleNotFound(String),

    /// The plugin exists but failed while registering.
    #[error("backend plugin `{module}` failed to initialise: {source}")]
    InitFailed {
        /// Module path of the plugin.
        module: String,
        /// Failure raised by the plugin.
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
}

impl DiscoveryError {
    /// Wraps a plugin initialisation failure.
    pub fn init_failed(
        module: impl Into<String>,
        err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::InitFailed {
            module: module.into(),
            source: Arc::from(err.into()),
        }
    }
}
