//! Managers and wrappers shared by the unit tests.

use crate::backend_manager::{
    domain::{BackendName, BuildWrapperRequest, TensorMap},
    ports::{BackendManager, BackendWrapper, ManagerResult, WrapperResult},
};

/// Manager that relies on every default of the contract.
pub struct BareManager;

impl BackendManager for BareManager {}

/// Manager returning an [`EchoWrapper`] tagged with `tag`.
pub struct EchoManager {
    pub tag: &'static str,
}

impl BackendManager for EchoManager {
    fn build_wrapper(&self, request: BuildWrapperRequest) -> ManagerResult<Box<dyn BackendWrapper>> {
        Ok(Box::new(EchoWrapper {
            backend: BackendName::new(self.tag).expect("valid tag"),
            input_names: request.input_names().map(<[String]>::to_vec).unwrap_or_default(),
            output_names: request.output_names().map(<[String]>::to_vec).unwrap_or_default(),
        }))
    }
}

/// Wrapper that renames its inputs to its outputs.
pub struct EchoWrapper {
    backend: BackendName,
    input_names: Vec<String>,
    output_names: Vec<String>,
}

impl BackendWrapper for EchoWrapper {
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
        let ordered = crate::backend_manager::ports::collect_inputs(&self.input_names, inputs)?;
        crate::backend_manager::ports::name_outputs(&self.output_names, ordered)
    }
}
