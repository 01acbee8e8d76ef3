//! Domain model for backend manager registration and lookup.
//!
//! The domain covers backend identity (names and the open enumeration of
//! known backends), the arguments used to build wrappers, and the tensors
//! wrappers exchange. Locking, discovery and native resources are kept
//! outside the domain boundary.

mod device;
mod enumeration;
mod error;
mod name;
mod registration;
mod request;
mod symbol;
mod tensor;

pub use device::{DEFAULT_DEVICE_KIND, Device};
pub use enumeration::BackendEnumeration;
pub use error::BackendDomainError;
pub use name::{BackendName, MAX_BACKEND_NAME_LEN};
pub use registration::RegisteredBackend;
pub use request::BuildWrapperRequest;
pub use symbol::{BackendSymbol, BackendVariant, EnumName};
pub use tensor::{Tensor, TensorMap};
