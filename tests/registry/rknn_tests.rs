//! The RKNN manager driven through its public toolkit seam.

use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::test_helpers::EnvVarGuard;
use inferlink::backend_manager::{
    adapters::rknn::{
        DEFAULT_RUNTIME_LIB, LibRknnToolkit, RUNTIME_LIB_ENV, RknnError, RknnManager,
        RknnSession, RknnTensorAttr, RknnToolkit,
    },
    domain::{BuildWrapperRequest, Tensor, TensorMap},
    ports::{BackendManager, NoDiscovery},
    services::ManagerRegistry,
};
use inferlink::deploy_config::DeployConfig;
use rstest::rstest;
use tempfile::NamedTempFile;

/// Toolkit that records the models it loads.
#[derive(Default)]
struct RecordingToolkit {
    loaded: Mutex<Vec<Vec<u8>>>,
}

impl RknnToolkit for RecordingToolkit {
    fn is_available(&self) -> bool {
        true
    }

    fn load(&self, model: &[u8]) -> Result<Box<dyn RknnSession>, RknnError> {
        self.loaded
            .lock()
            .expect("recording lock")
            .push(model.to_vec());
        Ok(Box::new(PassthroughSession {
            inputs: vec![attr("images")],
            outputs: vec![attr("logits")],
        }))
    }
}

struct PassthroughSession {
    inputs: Vec<RknnTensorAttr>,
    outputs: Vec<RknnTensorAttr>,
}

impl RknnSession for PassthroughSession {
    fn inputs(&self) -> &[RknnTensorAttr] {
        &self.inputs
    }

    fn outputs(&self) -> &[RknnTensorAttr] {
        &self.outputs
    }

    fn run(&mut self, inputs: Vec<Tensor>) -> Result<Vec<Tensor>, RknnError> {
        Ok(inputs)
    }
}

fn attr(name: &str) -> RknnTensorAttr {
    RknnTensorAttr {
        name: name.to_owned(),
        dims: vec![1, 4],
    }
}

#[rstest]
fn rknn_manager_builds_from_deploy_config() {
    let mut model = NamedTempFile::new().expect("temporary model");
    model.write_all(b"RKNN-model-bytes").expect("write model");
    let model_path = model.path().to_str().expect("utf-8 path").to_owned();

    let toolkit = Arc::new(RecordingToolkit::default());
    let registry = ManagerRegistry::new(Arc::new(NoDiscovery));
    registry
        .register("rknn", Some("RKNN"))
        .expect("valid names")
        .install(RknnManager::new(Arc::clone(&toolkit) as Arc<dyn RknnToolkit>))
        .expect("registration should succeed");
    let deploy_cfg = DeployConfig::from_json_str(
        r#"{
            "onnx_config": {"input_names": ["input"], "output_names": ["output"]},
            "backend_config": {"type": "rknn", "common_config": {"target_platform": "rk3588"}}
        }"#,
    )
    .expect("valid deploy config");

    let mut wrapper = registry
        .build_wrapper(
            "rknn",
            BuildWrapperRequest::new([model_path]).with_deploy_config(deploy_cfg),
        )
        .expect("wrapper builds");

    assert_eq!(wrapper.input_names(), &["input".to_owned()]);
    assert_eq!(wrapper.output_names(), &["output".to_owned()]);
    let loaded = toolkit.loaded.lock().expect("recording lock").clone();
    assert_eq!(loaded, vec![b"RKNN-model-bytes".to_vec()]);

    let inputs = TensorMap::from([(
        "input".to_owned(),
        Tensor::new(vec![1, 4], vec![0.0, 1.0, 2.0, 3.0]).expect("valid tensor"),
    )]);
    let outputs = wrapper.forward(inputs).expect("forward succeeds");
    assert!(outputs.contains_key("output"));
}

#[rstest]
#[case(Some("/opt/rknn/lib/librknnrt.so"), "/opt/rknn/lib/librknnrt.so")]
#[case(Some("   "), DEFAULT_RUNTIME_LIB)]
#[case(None, DEFAULT_RUNTIME_LIB)]
fn runtime_library_location_comes_from_the_environment(
    #[case] value: Option<&str>,
    #[case] expected: &str,
) {
    let _guard = EnvVarGuard::set(RUNTIME_LIB_ENV, value);

    assert_eq!(LibRknnToolkit::from_env().path(), expected);
}

#[rstest]
fn manager_without_runtime_is_unavailable() {
    let manager = RknnManager::new(Arc::new(LibRknnToolkit::new(
        "/nonexistent/librknnrt.so",
    )));

    assert!(!manager.is_available());
}
