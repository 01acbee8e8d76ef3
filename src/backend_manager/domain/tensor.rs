//! Minimal host-side tensor exchanged with backend wrappers.

use super::BackendDomainError;
use std::collections::BTreeMap;

/// Named tensors passed to and returned from a wrapper.
pub type TensorMap = BTreeMap<String, Tensor>;

/// Dense, row-major `f32` tensor held in host memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    dims: Vec<usize>,
    values: Vec<f32>,
}

impl Tensor {
    /// Creates a tensor after checking that `dims` describes `values`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendDomainError::TensorTooLarge`] when the product of
    /// `dims` overflows `usize`, or
    /// [`BackendDomainError::TensorShapeMismatch`] when it differs from
    /// `values.len()`.
    pub fn new(dims: Vec<usize>, values: Vec<f32>) -> Result<Self, BackendDomainError> {
        let Some(expected) = Self::element_count(&dims) else {
            return Err(BackendDomainError::TensorTooLarge(dims));
        };
        if expected != values.len() {
            return Err(BackendDomainError::TensorShapeMismatch {
                dims,
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { dims, values })
    }

    /// Returns the number of elements `dims` describes, or `None` on
    /// overflow.
    #[must_use]
    pub fn element_count(dims: &[usize]) -> Option<usize> {
        dims.iter().try_fold(1_usize, |count, &dim| count.checked_mul(dim))
    }

    /// Creates a rank-1 tensor over `values`.
    #[must_use]
    pub fn from_vec(values: Vec<f32>) -> Self {
        Self {
            dims: vec![values.len()],
            values,
        }
    }

    /// Returns the dimensions.
    #[must_use]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Returns the element values.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when the tensor holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consumes the tensor, returning its dimensions and values.
    #[must_use]
    pub fn into_parts(self) -> (Vec<usize>, Vec<f32>) {
        (self.dims, self.values)
    }
}
