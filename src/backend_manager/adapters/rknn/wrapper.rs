//! Wrapper over a loaded RKNN session.

use super::toolkit::RknnSession;
use crate::backend_manager::{
    domain::{BackendName, TensorMap},
    ports::{BackendWrapper, WrapperError, WrapperResult, collect_inputs, name_outputs},
};

/// Inference adapter owning one RKNN runtime session.
pub struct RknnWrapper {
    backend: BackendName,
    session: Box<dyn RknnSession>,
    input_names: Vec<String>,
    output_names: Vec<String>,
    target_platform: Option<String>,
}

impl RknnWrapper {
    pub(super) fn new(
        backend: BackendName,
        session: Box<dyn RknnSession>,
        input_names: Vec<String>,
        output_names: Vec<String>,
        target_platform: Option<String>,
    ) -> Self {
        Self {
            backend,
            session,
            input_names,
            output_names,
            target_platform,
        }
    }

    /// Returns the target platform named by the deployment configuration.
    #[must_use]
    pub fn target_platform(&self) -> Option<&str> {
        self.target_platform.as_deref()
    }
}

impl BackendWrapper for RknnWrapper {
    fn backend(&self) -> &BackendName {
        &self.backend
    }

    fn input_names(&self) -> &[String] {
        &self.input_names
    }

    fn output_names(&self) -> &[String] {
        &self.output_names
    }

    fn forward(&mut self, inputs: TensorMap) -> WrapperResult<TensorMap> {
        let ordered = collect_inputs(&self.input_names, inputs)?;
        let outputs = self
            .session
            .run(ordered)
            .map_err(|err| WrapperError::execution(self.backend.clone(), err))?;
        name_outputs(&self.output_names, outputs)
    }
}

impl std::fmt::Debug for RknnWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RknnWrapper")
            .field("input_names", &self.input_names)
            .field("output_names", &self.output_names)
            .field("target_platform", &self.target_platform)
            .finish_non_exhaustive()
    }
}
