//! Application services for backend manager registration and lookup.

mod registry;

pub use registry::{
    DEFAULT_NAMESPACE, ManagerRegistry, Registrar, RegistryError, RegistryResult,
    backend_managers,
};
