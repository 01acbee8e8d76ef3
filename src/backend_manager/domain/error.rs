//! Error types for backend manager domain validation.

use super::{BackendName, EnumName};
use thiserror::Error;

/// Errors returned while constructing backend manager domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendDomainError {
    /// The backend name is empty.
    #[error("backend name is empty")]
    EmptyBackendName,

    /// The backend name holds a character outside `[a-z0-9_-]`.
    #[error("backend name '{0}' may only use lower-case ASCII letters, digits, '_' and '-'")]
    InvalidBackendName(String),

    /// The backend name is longer than 100 bytes.
    #[error("backend name '{0}' is longer than 100 bytes")]
    BackendNameTooLong(String),

    /// The enumeration name is not an upper-case identifier.
    #[error("enum name '{0}' must be a non-empty upper-case identifier")]
    InvalidEnumName(String),

    /// The enum name already denotes a different backend.
    #[error("enum name {enum_name} already denotes backend '{existing}', not '{requested}'")]
    EnumNameConflict {
        /// Enumeration member that is already taken.
        enum_name: EnumName,
        /// Backend the member is bound to.
        existing: BackendName,
        /// Backend that attempted to claim it.
        requested: BackendName,
    },

    /// No further enumeration symbols can be allocated.
    #[error("backend enumeration has no symbols left to allocate")]
    EnumerationExhausted,

    /// The device selector could not be parsed.
    #[error("invalid device selector '{0}' (expected `kind` or `kind:index`)")]
    InvalidDevice(String),

    /// Tensor dimensions describe more elements than `usize` can count.
    #[error("tensor dims {0:?} describe more elements than can be addressed")]
    TensorTooLarge(Vec<usize>),

    /// Tensor dimensions do not describe the supplied values.
    #[error("tensor dims {dims:?} describe {expected} elements but {actual} were supplied")]
    TensorShapeMismatch {
        /// Declared dimensions.
        dims: Vec<usize>,
        /// Element count implied by `dims`.
        expected: usize,
        /// Number of supplied values.
        actual: usize,
    },
}
