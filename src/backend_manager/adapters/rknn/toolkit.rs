//! Seam between the RKNN manager and the native runtime.

use crate::backend_manager::domain::{BackendDomainError, Tensor};
use thiserror::Error;

/// Name and shape of a model input or output as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RknnTensorAttr {
    /// Tensor name embedded in the model.
    pub name: String,
    /// Tensor dimensions.
    pub dims: Vec<usize>,
}

/// Loads RKNN models into runtime sessions.
#[cfg_attr(test, mockall::automock)]
pub trait RknnToolkit: Send + Sync {
    /// Returns `true` when the native runtime can be loaded.
    fn is_available(&self) -> bool;

    /// Creates a session from the bytes of an `.rknn` model.
    ///
    /// # Errors
    ///
    /// Returns [`RknnError`] when the runtime is missing or rejects the
    /// model.
    fn load(&self, model: &[u8]) -> Result<Box<dyn RknnSession>, RknnError>;
}

/// A model loaded into the native runtime.
///
/// Dropping the session releases its native context.
pub trait RknnSession: Send {
    /// Returns the model inputs in index order.
    fn inputs(&self) -> &[RknnTensorAttr];

    /// Returns the model outputs in index order.
    fn outputs(&self) -> &[RknnTensorAttr];

    /// Runs the model on inputs given in index order.
    ///
    /// # Errors
    ///
    /// Returns [`RknnError`] when the runtime fails.
    fn run(&mut self, inputs: Vec<Tensor>) -> Result<Vec<Tensor>, RknnError>;
}

/// Errors raised by the RKNN runtime seam.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RknnError {
    /// The shared runtime library could not be opened or lacks a symbol.
    #[error("failed to load RKNN runtime {path}: {reason}")]
    Library {
        /// Library that was opened.
        path: String,
        /// Loader message.
        reason: String,
    },

    /// A runtime call returned a non-success code.
    #[error("{function} failed with code {code}")]
    Call {
        /// Native function that failed.
        function: &'static str,
        /// Returned status code.
        code: i32,
    },

    /// A buffer does not fit the runtime's 32-bit size fields.
    #[error("buffer of {0} bytes exceeds the RKNN size limit")]
    TooLarge(usize),

    /// The runtime returned an output that is not a valid tensor.
    #[error("malformed output tensor: {0}")]
    OutputShape(BackendDomainError),

    /// The wrong number of input tensors was supplied.
    #[error("model takes {expected} input(s), got {actual}")]
    InputCount {
        /// Inputs declared by the model.
        expected: usize,
        /// Inputs supplied.
        actual: usize,
    },
}
