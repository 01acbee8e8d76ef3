//! Process-wide directory of backend managers.
//!
//! Provides [`ManagerRegistry`], which maps backend names to shared manager
//! instances, owns the open backend enumeration, and discovers plugins on
//! demand. [`backend_managers`] returns the process-wide instance.

use crate::backend_manager::{
    adapters::catalog::PluginCatalog,
    domain::{
        BackendDomainError, BackendEnumeration, BackendName, BackendSymbol, BackendVariant,
        BuildWrapperRequest, EnumName, RegisteredBackend,
    },
    ports::{BackendDiscovery, BackendManager, BackendWrapper, DiscoveryError, ManagerError},
};
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Namespace under which backend plugins are published.
pub const DEFAULT_NAMESPACE: &str = "inferlink.backend";

static BACKEND_MANAGERS: OnceLock<ManagerRegistry> = OnceLock::new();

/// Returns the process-wide registry.
///
/// The registry is created on first use, before any plugin can run its
/// registration, and discovers the built-in plugins of
/// [`PluginCatalog::builtin`]. It is never torn down.
pub fn backend_managers() -> &'static ManagerRegistry {
    BACKEND_MANAGERS.get_or_init(|| ManagerRegistry::new(Arc::new(PluginCatalog::builtin())))
}

/// Service-level errors for registry operations.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// A backend or enum name failed validation, or conflicts with the
    /// enumeration.
    #[error(transparent)]
    Domain(#[from] BackendDomainError),

    /// No manager is registered under the name.
    #[error("no backend manager registered for `{0}`")]
    NotRegistered(String),

    /// The manager failed to build a wrapper.
    #[error(transparent)]
    Manager(#[from] ManagerError),
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

struct RegistryEntry {
    manager: Arc<dyn BackendManager>,
    registered_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Default)]
struct RegistryState {
    managers: HashMap<BackendName, RegistryEntry>,
    enumeration: BackendEnumeration,
}

/// Name-to-manager directory with lazy plugin discovery.
///
/// The manager map and the backend enumeration are guarded by one mutex,
/// so a reader never sees an enumeration member without its manager or the
/// reverse. Discovery runs outside the lock, which lets plugins register
/// from inside [`find`](Self::find).
pub struct ManagerRegistry {
    state: Mutex<RegistryState>,
    discovery: Arc<dyn BackendDiscovery>,
    namespace: String,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl ManagerRegistry {
    /// Creates an empty registry using `discovery` to find plugins.
    #[must_use]
    pub fn new(discovery: Arc<dyn BackendDiscovery>) -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            discovery,
            namespace: DEFAULT_NAMESPACE.to_owned(),
            clock: Arc::new(DefaultClock),
        }
    }

    /// Sets the namespace prefix used to derive plugin module paths.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the clock used to timestamp registrations.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the plugin namespace prefix.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the plugin module path for a backend name.
    #[must_use]
    pub fn module_path(&self, name: &BackendName) -> String {
        format!("{}.{}", self.namespace, name)
    }

    /// Starts registering a manager under `name`.
    ///
    /// The enum name defaults to the upper-cased backend name. Nothing is
    /// stored until [`Registrar::install`] runs.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Domain`] when `name` or `enum_name` is not a
    /// valid identifier.
    pub fn register(&self, name: &str, enum_name: Option<&str>) -> RegistryResult<Registrar<'_>> {
        let backend = BackendName::new(name)?;
        let member = match enum_name {
            Some(raw) => EnumName::new(raw)?,
            None => EnumName::derive(&backend),
        };
        Ok(Registrar {
            registry: self,
            name: backend,
            enum_name: member,
        })
    }

    /// Finds the manager registered under `name`, loading its plugin first.
    ///
    /// Discovery is best effort: a missing plugin or a plugin that fails to
    /// initialise is logged and otherwise ignored. Returns `None` when no
    /// manager is registered afterwards, including for names that are not
    /// valid backend identifiers.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<Arc<dyn BackendManager>> {
        let backend = match BackendName::new(name) {
            Ok(backend) => backend,
            Err(err) => {
                debug!(backend = name, error = %err, "ignoring lookup of invalid backend name");
                return None;
            }
        };
        self.discover(&backend);
        self.get_validated(&backend)
    }

    /// Returns the manager registered under `name` without discovery.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn BackendManager>> {
        BackendName::new(name)
            .ok()
            .and_then(|backend| self.get_validated(&backend))
    }

    /// Finds the manager for `name` and builds a wrapper with it.
    ///
    /// The registry lock is not held while the wrapper is built.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotRegistered`] when no manager is found, or
    /// [`RegistryError::Manager`] when the manager fails.
    pub fn build_wrapper(
        &self,
        name: &str,
        request: BuildWrapperRequest,
    ) -> RegistryResult<Box<dyn BackendWrapper>> {
        let manager = self
            .find(name)
            .ok_or_else(|| RegistryError::NotRegistered(name.to_owned()))?;
        Ok(manager.build_wrapper(request)?)
    }

    /// Returns the enumeration member with the given enum name.
    #[must_use]
    pub fn variant(&self, enum_name: &str) -> Option<BackendVariant> {
        let member = EnumName::new(enum_name).ok()?;
        self.lock().enumeration.get(&member).cloned()
    }

    /// Returns the enumeration member of a backend name.
    #[must_use]
    pub fn variant_for(&self, name: &str) -> Option<BackendVariant> {
        let backend = BackendName::new(name).ok()?;
        self.lock().enumeration.variant_for(&backend).cloned()
    }

    /// Resolves a symbol to its enumeration member.
    #[must_use]
    pub fn resolve(&self, symbol: BackendSymbol) -> Option<BackendVariant> {
        self.lock().enumeration.resolve(symbol).cloned()
    }

    /// Returns all enumeration members in creation order.
    #[must_use]
    pub fn variants(&self) -> Vec<BackendVariant> {
        self.lock().enumeration.iter().cloned().collect()
    }

    /// Returns a snapshot of every registration, in enumeration order.
    #[must_use]
    pub fn registrations(&self) -> Vec<RegisteredBackend> {
        let state = self.lock();
        state
            .enumeration
            .iter()
            .filter_map(|variant| {
                state.managers.get(variant.value()).map(|entry| {
                    RegisteredBackend::new(
                        variant.clone(),
                        entry.manager.manager_name(),
                        entry.registered_at,
                        entry.updated_at,
                    )
                })
            })
            .collect()
    }

    /// Returns the registered backend names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<BackendName> {
        let mut names: Vec<_> = self.lock().managers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the number of registered backends.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().managers.len()
    }

    /// Returns `true` when no backend is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().managers.is_empty()
    }

    fn discover(&self, name: &BackendName) {
        let module_path = self.module_path(name);
        match self.discovery.load(&module_path, self) {
            Ok(()) => {}
            Err(DiscoveryError::ModuleNotFound(_)) => {
                debug!(backend = %name, module = %module_path, "no backend plugin to load");
            }
            Err(err) => {
                warn!(backend = %name, module = %module_path, error = %err, "backend plugin failed to load");
            }
        }
    }

    fn get_validated(&self, name: &BackendName) -> Option<Arc<dyn BackendManager>> {
        self.lock()
            .managers
            .get(name)
            .map(|entry| Arc::clone(&entry.manager))
    }

    fn install(
        &self,
        name: BackendName,
        enum_name: EnumName,
        manager: Arc<dyn BackendManager>,
    ) -> RegistryResult<BackendVariant> {
        let timestamp = self.clock.utc();
        let mut state = self.lock();

        let (variant, created) = state.enumeration.extend(enum_name.clone(), name.clone())?;
        if created {
            info!(
                enum_name = %variant.enum_name(),
                backend = %name,
                symbol = %variant.symbol(),
                "registered new backend: {variant}"
            );
        } else if *variant.enum_name() != enum_name {
            info!(
                alias = %enum_name,
                enum_name = %variant.enum_name(),
                backend = %name,
                symbol = %variant.symbol(),
                "bound {enum_name} as an alias of {variant}"
            );
        }

        match state.managers.entry(name) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                info!(
                    backend = %variant.value(),
                    previous = entry.manager.manager_name(),
                    replacement = manager.manager_name(),
                    "backend manager of `{}` has already been registered",
                    variant.value()
                );
                entry.manager = manager;
                entry.updated_at = timestamp;
            }
            Entry::Vacant(vacant) => {
                vacant.insert(RegistryEntry {
                    manager,
                    registered_at: timestamp,
                    updated_at: timestamp,
                });
            }
        }
        Ok(variant)
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        // Every mutation validates before writing, so a poisoned guard
        // still holds consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ManagerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagerRegistry")
            .field("namespace", &self.namespace)
            .field("backends", &self.names())
            .finish_non_exhaustive()
    }
}

/// Pending registration returned by [`ManagerRegistry::register`].
///
/// Installing a manager hands it back unchanged, so registration can sit
/// beside ordinary construction:
///
/// ```
/// use std::sync::Arc;
/// use inferlink::backend_manager::{
///     ports::{BackendManager, NoDiscovery},
///     services::ManagerRegistry,
/// };
///
/// struct EchoManager;
/// impl BackendManager for EchoManager {}
///
/// let registry = ManagerRegistry::new(Arc::new(NoDiscovery));
/// let manager = registry.register("echo", None)?.install(EchoManager)?;
/// assert!(registry.variant("ECHO").is_some());
/// # let _ = manager;
/// # Ok::<(), inferlink::backend_manager::services::RegistryError>(())
/// ```
#[must_use = "nothing is registered until a manager is installed"]
pub struct Registrar<'a> {
    registry: &'a ManagerRegistry,
    name: BackendName,
    enum_name: EnumName,
}

impl Registrar<'_> {
    /// Returns the backend name being registered.
    #[must_use]
    pub const fn name(&self) -> &BackendName {
        &self.name
    }

    /// Returns the enum name the backend will be enumerated under.
    #[must_use]
    pub const fn enum_name(&self) -> &EnumName {
        &self.enum_name
    }

    /// Registers `manager`, replacing any previous manager for the name,
    /// and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Domain`] when the enum name conflicts with
    /// an existing enumeration member; nothing is changed in that case.
    pub fn install<M: BackendManager>(self, manager: M) -> RegistryResult<Arc<M>> {
        self.install_shared(Arc::new(manager))
    }

    /// Registers an already shared manager and returns it.
    ///
    /// # Errors
    ///
    /// See [`install`](Self::install).
    pub fn install_shared<M: BackendManager>(self, manager: Arc<M>) -> RegistryResult<Arc<M>> {
        let shared: Arc<dyn BackendManager> = Arc::clone(&manager) as Arc<dyn BackendManager>;
        self.registry.install(self.name, self.enum_name, shared)?;
        Ok(manager)
    }
}
