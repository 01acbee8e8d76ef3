//! Plugin table keyed by module path.

use crate::backend_manager::{
    adapters::rknn,
    ports::{BackendDiscovery, DiscoveryError, DiscoveryResult},
    services::ManagerRegistry,
};
use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

/// Error type returned by plugin initialisers.
pub type PluginInitError = Box<dyn std::error::Error + Send + Sync>;

/// Registration entry point of a backend plugin.
pub type PluginInit = fn(&ManagerRegistry) -> Result<(), PluginInitError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    Pending,
    Loading(ThreadId),
    Loaded,
}

#[derive(Debug)]
struct PluginEntry {
    init: PluginInit,
    state: LoadState,
}

#[derive(Debug, Default)]
struct CatalogState {
    plugins: Mutex<HashMap<String, PluginEntry>>,
    settled: Condvar,
}

/// Thread-safe table of backend plugins.
///
/// Each plugin is loaded at most once: its initialiser runs on the first
/// successful [`load`](BackendDiscovery::load) and is skipped afterwards.
/// A failed initialiser is not remembered, so the next lookup retries it.
///
/// While an initialiser runs, a nested load of the same module from inside
/// the initialiser succeeds immediately. Loads from other threads block
/// until the initialiser finishes.
#[derive(Debug, Clone, Default)]
pub struct PluginCatalog {
    state: Arc<CatalogState>,
}

impl PluginCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog holding the plugins compiled into this crate.
    #[must_use]
    pub fn builtin() -> Self {
        let catalog = Self::new();
        catalog.publish(rknn::MODULE_PATH, rknn::register_plugin);
        catalog
    }

    /// Publishes `init` under `module_path`.
    ///
    /// Republishing a path replaces its initialiser and marks it pending.
    pub fn publish(&self, module_path: impl Into<String>, init: PluginInit) {
        self.entries().insert(
            module_path.into(),
            PluginEntry {
                init,
                state: LoadState::Pending,
            },
        );
    }

    /// Returns `true` when a plugin is published under `module_path`.
    #[must_use]
    pub fn contains(&self, module_path: &str) -> bool {
        self.entries().contains_key(module_path)
    }

    /// Returns `true` when the plugin under `module_path` has loaded.
    #[must_use]
    pub fn is_loaded(&self, module_path: &str) -> bool {
        self.entries()
            .get(module_path)
            .is_some_and(|entry| entry.state == LoadState::Loaded)
    }

    /// Returns the published module paths, sorted.
    #[must_use]
    pub fn module_paths(&self) -> Vec<String> {
        let mut paths: Vec<_> = self.entries().keys().cloned().collect();
        paths.sort();
        paths
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, PluginEntry>> {
        self.state
            .plugins
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims the initialiser of `module_path`, waiting out loads running
    /// on other threads. Returns `None` when nothing is left to run.
    fn claim(&self, module_path: &str) -> DiscoveryResult<Option<PluginInit>> {
        let current = thread::current().id();
        let mut entries = self.entries();
        loop {
            let entry = entries
                .get_mut(module_path)
                .ok_or_else(|| DiscoveryError::ModuleNotFound(module_path.to_owned()))?;
            match entry.state {
                LoadState::Loaded => return Ok(None),
                LoadState::Loading(owner) if owner == current => return Ok(None),
                LoadState::Loading(_) => {
                    entries = self
                        .state
                        .settled
                        .wait(entries)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                LoadState::Pending => {
                    entry.state = LoadState::Loading(current);
                    return Ok(Some(entry.init));
                }
            }
        }
    }

    fn finish(&self, module_path: &str, state: LoadState) {
        if let Some(entry) = self.entries().get_mut(module_path) {
            entry.state = state;
        }
        self.state.settled.notify_all();
    }
}

impl BackendDiscovery for PluginCatalog {
    fn load(&self, module_path: &str, registry: &ManagerRegistry) -> DiscoveryResult<()> {
        let Some(init) = self.claim(module_path)? else {
            return Ok(());
        };

        match init(registry) {
            Ok(()) => {
                self.finish(module_path, LoadState::Loaded);
                Ok(())
            }
            Err(err) => {
                self.finish(module_path, LoadState::Pending);
                Err(DiscoveryError::init_failed(module_path, err))
            }
        }
    }
}
