//! Factory contract implemented once per backend.

use super::BackendWrapper;
use crate::backend_manager::domain::{BuildWrapperRequest, Device};
use crate::deploy_config::DeployConfigError;
use std::sync::Arc;
use thiserror::Error;

/// Result type for manager operations.
pub type ManagerResult<T> = Result<T, ManagerError>;

/// Factory that turns backend artifacts into a ready [`BackendWrapper`].
///
/// One shared, stateless instance is registered per backend. Because the
/// registry hands out `Arc` references and does not serialise calls,
/// implementations must tolerate concurrent [`build_wrapper`] calls.
///
/// [`build_wrapper`]: BackendManager::build_wrapper
pub trait BackendManager: Send + Sync + 'static {
    /// Returns the implementing type's name for diagnostics.
    fn manager_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Builds a wrapper bound to freshly constructed backend resources.
    ///
    /// Implementations validate the request before allocating anything
    /// native, and return either a fully initialised wrapper or an error.
    /// Every call yields an independent wrapper.
    ///
    /// # Errors
    ///
    /// The default implementation always returns
    /// [`ManagerError::NotImplemented`]; reaching it is a programming defect
    /// in the backend, not a condition to route around. Implementations
    /// return configuration errors for bad requests and
    /// [`ManagerError::BackendInit`] when the native runtime rejects the
    /// artifacts.
    fn build_wrapper(&self, request: BuildWrapperRequest) -> ManagerResult<Box<dyn BackendWrapper>> {
        let _ = request;
        let manager = self.manager_name();
        tracing::error!(manager, "build_wrapper is not implemented");
        Err(ManagerError::NotImplemented { manager })
    }

    /// Reports whether the backend runtime can be used on this host.
    fn is_available(&self) -> bool {
        true
    }

    /// Returns the backend runtime version, when known.
    fn version(&self) -> Option<String> {
        None
    }

    /// Returns how many backend files a build request must carry, when the
    /// backend expects a fixed number.
    fn artifact_count(&self) -> Option<usize> {
        None
    }
}

/// Checks that a request carries exactly `expected` backend files.
///
/// # Errors
///
/// Returns [`ManagerError::ArtifactCount`] on mismatch.
pub fn validate_artifact_count(
    backend: &'static str,
    expected: usize,
    files: &[String],
) -> ManagerResult<()> {
    if files.len() == expected {
        Ok(())
    } else {
        Err(ManagerError::ArtifactCount {
            backend,
            expected,
            actual: files.len(),
        })
    }
}

/// Errors returned by [`BackendManager::build_wrapper`].
#[derive(Debug, Clone, Error)]
pub enum ManagerError {
    /// The manager did not override `build_wrapper`.
    #[error("build_wrapper has not been implemented for {manager}")]
    NotImplemented {
        /// Type name of the offending manager.
        manager: &'static str,
    },

    /// The request carried the wrong number of backend files.
    #[error("{backend} expects {expected} backend file(s), got {actual}")]
    ArtifactCount {
        /// Backend that rejected the request.
        backend: &'static str,
        /// Number of files the backend needs.
        expected: usize,
        /// Number of files supplied.
        actual: usize,
    },

    /// A backend file could not be read.
    #[error("failed to read backend file {path}: {source}")]
    ArtifactUnreadable {
        /// Location that failed.
        path: String,
        /// Underlying I/O failure.
        source: Arc<std::io::Error>,
    },

    /// The backend cannot run on the requested device.
    #[error("{backend} does not support device {device}")]
    UnsupportedDevice {
        /// Backend that rejected the request.
        backend: &'static str,
        /// Requested device.
        device: Device,
    },

    /// Input or output names are missing or inconsistent.
    #[error("invalid I/O names: {0}")]
    InvalidIoNames(String),

    /// The backend's configuration section is malformed.
    #[error(transparent)]
    InvalidDeployConfig(#[from] DeployConfigError),

    /// The native runtime failed to construct the backend resources.
    #[error("{backend} failed to initialise: {source}")]
    BackendInit {
        /// Backend that failed.
        backend: &'static str,
        /// Native failure.
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
}

impl ManagerError {
    /// Wraps a native runtime failure.
    pub fn backend_init(
        backend: &'static str,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::BackendInit {
            backend,
            source: Arc::new(err),
        }
    }

    /// Returns `true` when the caller supplied an unusable request.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::ArtifactCount { .. }
                | Self::ArtifactUnreadable { .. }
                | Self::UnsupportedDevice { .. }
                | Self::InvalidIoNames(_)
                | Self::InvalidDeployConfig(_)
        )
    }
}
