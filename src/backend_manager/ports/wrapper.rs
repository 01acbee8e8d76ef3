//! Adapter contract exposed by every constructed backend.

use crate::backend_manager::domain::{BackendName, Tensor, TensorMap};
use std::sync::Arc;
use thiserror::Error;

/// Result type for wrapper operations.
pub type WrapperResult<T> = Result<T, WrapperError>;

/// Per-session adapter over one backend's native resources.
///
/// A wrapper is owned exclusively by its caller. Native handles are
/// released when the wrapper is dropped.
pub trait BackendWrapper: Send {
    /// Returns the backend that built this wrapper.
    fn backend(&self) -> &BackendName;

    /// Returns the ordered graph input names.
    fn input_names(&self) -> &[String];

    /// Returns the ordered graph output names.
    fn output_names(&self) -> &[String];

    /// Runs inference on `inputs`, keyed by [`input_names`].
    ///
    /// The returned map is keyed by [`output_names`].
    ///
    /// # Errors
    ///
    /// Returns [`WrapperError::MissingInput`] when an input is absent, or
    /// another [`WrapperError`] when the backend fails.
    ///
    /// [`input_names`]: BackendWrapper::input_names
    /// [`output_names`]: BackendWrapper::output_names
    fn forward(&mut self, inputs: TensorMap) -> WrapperResult<TensorMap>;
}

/// Removes `names` from `inputs` in order.
///
/// # Errors
///
/// Returns [`WrapperError::MissingInput`] for the first absent name.
pub fn collect_inputs(names: &[String], mut inputs: TensorMap) -> WrapperResult<Vec<Tensor>> {
    names
        .iter()
        .map(|name| {
            inputs
                .remove(name)
                .ok_or_else(|| WrapperError::MissingInput(name.clone()))
        })
        .collect()
}

/// Pairs positional outputs with `names`.
///
/// # Errors
///
/// Returns [`WrapperError::OutputCount`] when the counts differ.
pub fn name_outputs(names: &[String], outputs: Vec<Tensor>) -> WrapperResult<TensorMap> {
    if names.len() != outputs.len() {
        return Err(WrapperError::OutputCount {
            expected: names.len(),
            actual: outputs.len(),
        });
    }
    Ok(names.iter().cloned().zip(outputs).collect())
}

/// Errors returned by [`BackendWrapper::forward`].
#[derive(Debug, Clone, Error)]
pub enum WrapperError {
    /// A named input was not supplied.
    #[error("missing input tensor `{0}`")]
    MissingInput(String),

    /// The backend produced a different number of outputs than declared.
    #[error("backend produced {actual} output(s), expected {expected}")]
    OutputCount {
        /// Declared output count.
        expected: usize,
        /// Produced output count.
        actual: usize,
    },

    /// The backend failed while executing.
    #[error("{backend} inference failed: {source}")]
    Execution {
        /// Backend that failed.
        backend: BackendName,
        /// Native failure.
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
}

impl WrapperError {
    /// Wraps a native execution failure.
    pub fn execution(
        backend: BackendName,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Execution {
            backend,
            source: Arc::new(err),
        }
    }
}
