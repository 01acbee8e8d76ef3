//! Shared managers and environment guards for integration tests.

use std::env;
use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, OnceLock};

use inferlink::backend_manager::{
    domain::{BackendName, BuildWrapperRequest, TensorMap},
    ports::{
        BackendManager, BackendWrapper, ManagerResult, WrapperResult, collect_inputs,
        name_outputs,
    },
};

static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Guard that applies a scoped environment variable update.
pub struct EnvVarGuard {
    previous: Vec<(OsString, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    /// Sets or removes `key` for the guard lifetime.
    pub fn set(key: &str, value: Option<&str>) -> Self {
        let lock = env_lock();
        let key = OsString::from(key);
        let previous = vec![(key.clone(), env::var_os(&key))];
        unsafe {
            // SAFETY: the global mutex serializes environment mutations in tests.
            match value {
                Some(new_value) => env::set_var(&key, new_value),
                None => env::remove_var(&key),
            }
        }
        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            unsafe {
                // SAFETY: the global mutex serializes environment mutations in tests.
                match value {
                    Some(previous) => env::set_var(&key, &previous),
                    None => env::remove_var(&key),
                }
            }
        }
    }
}

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Manager that builds [`DummyWrapper`]s tagged with its own name.
#[derive(Debug, Clone, Copy)]
pub struct DummyManager {
    /// Backend name reported by built wrappers.
    pub tag: &'static str,
}

impl BackendManager for DummyManager {
    fn build_wrapper(&self, request: BuildWrapperRequest) -> ManagerResult<Box<dyn BackendWrapper>> {
        Ok(Box::new(DummyWrapper {
            backend: BackendName::new(self.tag).expect("valid tag"),
            input_names: request.input_names().unwrap_or_default().to_vec(),
            output_names: request.output_names().unwrap_or_default().to_vec(),
        }))
    }
}

/// Wrapper that forwards each input to the output in the same position.
#[derive(Debug)]
pub struct DummyWrapper {
    backend: BackendName,
    input_names: Vec<String>,
    output_names: Vec<String>,
}

impl BackendWrapper for DummyWrapper {
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
        name_outputs(&self.output_names, ordered)
    }
}

/// Manager that keeps the default, unimplemented `build_wrapper`.
#[derive(Debug, Clone, Copy)]
pub struct BareManager;

impl BackendManager for BareManager {}
