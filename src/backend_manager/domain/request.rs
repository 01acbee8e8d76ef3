//! Parameter object for building backend wrappers.

use super::Device;
use crate::deploy_config::DeployConfig;
use serde_json::{Map, Value};

/// Request payload for [`BackendManager::build_wrapper`].
///
/// [`BackendManager::build_wrapper`]: crate::backend_manager::ports::BackendManager::build_wrapper
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildWrapperRequest {
    backend_files: Vec<String>,
    device: Device,
    input_names: Option<Vec<String>>,
    output_names: Option<Vec<String>>,
    deploy_cfg: DeployConfig,
    extra_options: Map<String, Value>,
}

impl BuildWrapperRequest {
    /// Creates a request for the given backend artifacts.
    ///
    /// The device defaults to `cpu`, I/O names are left for the manager to
    /// derive and the deployment configuration is empty.
    #[must_use]
    pub fn new<I, S>(backend_files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            backend_files: backend_files.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the target device.
    #[must_use]
    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Sets the ordered graph input names.
    #[must_use]
    pub fn with_input_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the ordered graph output names.
    #[must_use]
    pub fn with_output_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the deployment configuration.
    #[must_use]
    pub fn with_deploy_config(mut self, deploy_cfg: DeployConfig) -> Self {
        self.deploy_cfg = deploy_cfg;
        self
    }

    /// Adds a backend-specific option.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_options.insert(key.into(), value.into());
        self
    }

    /// Returns the artifact locations in order.
    #[must_use]
    pub fn backend_files(&self) -> &[String] {
        &self.backend_files
    }

    /// Returns the target device.
    #[must_use]
    pub const fn device(&self) -> &Device {
        &self.device
    }

    /// Returns the caller-supplied input names, if any.
    #[must_use]
    pub fn input_names(&self) -> Option<&[String]> {
        self.input_names.as_deref()
    }

    /// Returns the caller-supplied output names, if any.
    #[must_use]
    pub fn output_names(&self) -> Option<&[String]> {
        self.output_names.as_deref()
    }

    /// Returns the deployment configuration.
    #[must_use]
    pub const fn deploy_config(&self) -> &DeployConfig {
        &self.deploy_cfg
    }

    /// Returns a backend-specific option.
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.extra_options.get(key)
    }

    /// Returns all backend-specific options.
    #[must_use]
    pub const fn extra_options(&self) -> &Map<String, Value> {
        &self.extra_options
    }
}
