//! RKNN backend manager.

use super::{BACKEND_NAME, LibRknnToolkit, RknnTensorAttr, RknnToolkit, RknnWrapper};
use crate::backend_manager::{
    domain::{BackendName, BuildWrapperRequest},
    ports::{BackendManager, BackendWrapper, ManagerError, ManagerResult, validate_artifact_count},
};
use crate::deploy_config::{DeployConfig, DeployConfigError};
use crate::fs_utils;
use camino::Utf8Path;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

const SUPPORTED_DEVICES: [&str; 2] = ["cpu", "npu"];

/// Builds [`RknnWrapper`]s from a single `.rknn` model file.
///
/// The manager itself holds no per-build state; every call reads the model
/// and opens a fresh runtime session through the shared toolkit.
#[derive(Clone)]
pub struct RknnManager {
    toolkit: Arc<dyn RknnToolkit>,
}

impl RknnManager {
    /// Creates a manager over the given runtime toolkit.
    #[must_use]
    pub fn new(toolkit: Arc<dyn RknnToolkit>) -> Self {
        Self { toolkit }
    }
}

impl Default for RknnManager {
    fn default() -> Self {
        Self::new(Arc::new(LibRknnToolkit::from_env()))
    }
}

impl std::fmt::Debug for RknnManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RknnManager").finish_non_exhaustive()
    }
}

impl BackendManager for RknnManager {
    fn build_wrapper(&self, request: BuildWrapperRequest) -> ManagerResult<Box<dyn BackendWrapper>> {
        validate_artifact_count(BACKEND_NAME, 1, request.backend_files())?;
        if !SUPPORTED_DEVICES.contains(&request.device().kind()) {
            return Err(ManagerError::UnsupportedDevice {
                backend: BACKEND_NAME,
                device: request.device().clone(),
            });
        }

        let deploy_cfg = request.deploy_config();
        check_backend_type(deploy_cfg)?;
        let target_platform = target_platform(deploy_cfg)?;
        let requested_inputs = resolve_names(request.input_names(), deploy_cfg.onnx_input_names()?)?;
        let requested_outputs =
            resolve_names(request.output_names(), deploy_cfg.onnx_output_names()?)?;

        let model_path = request
            .backend_files()
            .first()
            .ok_or(ManagerError::ArtifactCount {
                backend: BACKEND_NAME,
                expected: 1,
                actual: 0,
            })?;
        let model = fs_utils::read_bytes(Utf8Path::new(model_path)).map_err(|err| {
            ManagerError::ArtifactUnreadable {
                path: model_path.clone(),
                source: Arc::new(err),
            }
        })?;

        debug!(
            model = %model_path,
            bytes = model.len(),
            device = %request.device(),
            target_platform = target_platform.as_deref(),
            "loading RKNN model"
        );
        let session = self
            .toolkit
            .load(&model)
            .map_err(|err| ManagerError::backend_init(BACKEND_NAME, err))?;

        let input_names = names_for(requested_inputs, session.inputs(), "input")?;
        let output_names = names_for(requested_outputs, session.outputs(), "output")?;

        Ok(Box::new(RknnWrapper::new(
            BackendName::from_static(BACKEND_NAME),
            session,
            input_names,
            output_names,
            target_platform,
        )))
    }

    fn is_available(&self) -> bool {
        self.toolkit.is_available()
    }

    fn artifact_count(&self) -> Option<usize> {
        Some(1)
    }
}

/// Rejects documents deployed for another backend.
fn check_backend_type(deploy_cfg: &DeployConfig) -> ManagerResult<()> {
    match deploy_cfg.backend_type()? {
        Some(kind) if kind != BACKEND_NAME => Err(DeployConfigError::malformed(
            "backend_config.type",
            format!("expected `{BACKEND_NAME}`, found `{kind}`"),
        )
        .into()),
        _ => Ok(()),
    }
}

fn target_platform(deploy_cfg: &DeployConfig) -> ManagerResult<Option<String>> {
    let common = deploy_cfg.common_config()?;
    match common.get("target_platform") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(platform)) => Ok(Some(platform.clone())),
        Some(other) => Err(DeployConfigError::malformed(
            "backend_config.common_config.target_platform",
            format!("expected a string, found {other}"),
        )
        .into()),
    }
}

/// Prefers caller-supplied names over configured ones and rejects
/// duplicates.
fn resolve_names(
    requested: Option<&[String]>,
    configured: Option<Vec<String>>,
) -> ManagerResult<Option<Vec<String>>> {
    let names = requested.map(<[String]>::to_vec).or(configured);
    if let Some(list) = &names {
        let mut seen = HashSet::new();
        if let Some(duplicate) = list.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(ManagerError::InvalidIoNames(format!(
                "`{duplicate}` is listed more than once"
            )));
        }
    }
    Ok(names)
}

/// Falls back to the names embedded in the model, and checks the count of
/// explicit names against it.
fn names_for(
    requested: Option<Vec<String>>,
    attrs: &[RknnTensorAttr],
    kind: &str,
) -> ManagerResult<Vec<String>> {
    match requested {
        Some(names) if names.len() == attrs.len() => Ok(names),
        Some(names) => Err(ManagerError::InvalidIoNames(format!(
            "{} {kind} name(s) given but the model has {} {kind}(s)",
            names.len(),
            attrs.len()
        ))),
        None => Ok(attrs.iter().map(|attr| attr.name.clone()).collect()),
    }
}
