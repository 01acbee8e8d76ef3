//! `librknnrt` bindings resolved at run time.
//!
//! The runtime is opened with `libloading` on first use, so hosts without
//! an NPU still link and simply report the backend as unavailable.

use super::toolkit::{RknnError, RknnSession, RknnTensorAttr, RknnToolkit};
use crate::backend_manager::domain::Tensor;
use libloading::Library;
use std::ffi::{CStr, c_int, c_void};
use std::ptr;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

/// Environment variable overriding the runtime library location.
pub const RUNTIME_LIB_ENV: &str = "RKNN_RUNTIME_LIB";

/// Runtime library opened when [`RUNTIME_LIB_ENV`] is unset.
pub const DEFAULT_RUNTIME_LIB: &str = "librknnrt.so";

#[cfg(target_pointer_width = "64")]
type RknnContext = u64;
#[cfg(not(target_pointer_width = "64"))]
type RknnContext = u32;

const RKNN_SUCC: c_int = 0;
const RKNN_QUERY_IN_OUT_NUM: c_int = 0;
const RKNN_QUERY_INPUT_ATTR: c_int = 1;
const RKNN_QUERY_OUTPUT_ATTR: c_int = 2;
const RKNN_TENSOR_FLOAT32: c_int = 0;
const RKNN_TENSOR_NCHW: c_int = 0;
const RKNN_MAX_DIMS: usize = 16;
const RKNN_MAX_NAME_LEN: usize = 256;

#[repr(C)]
#[derive(Default)]
struct RawInputOutputNum {
    n_input: u32,
    n_output: u32,
}

#[repr(C)]
#[expect(dead_code, reason = "mirrors the C layout; only the runtime reads some fields")]
struct RawTensorAttr {
    index: u32,
    n_dims: u32,
    dims: [u32; RKNN_MAX_DIMS],
    name: [u8; RKNN_MAX_NAME_LEN],
    n_elems: u32,
    size: u32,
    fmt: c_int,
    kind: c_int,
    qnt_type: c_int,
    fl: i8,
    zp: i32,
    scale: f32,
    w_stride: u32,
    size_with_stride: u32,
    pass_through: u8,
    h_stride: u32,
}

impl RawTensorAttr {
    const fn for_index(index: u32) -> Self {
        Self {
            index,
            n_dims: 0,
            dims: [0; RKNN_MAX_DIMS],
            name: [0; RKNN_MAX_NAME_LEN],
            n_elems: 0,
            size: 0,
            fmt: 0,
            kind: 0,
            qnt_type: 0,
            fl: 0,
            zp: 0,
            scale: 0.0,
            w_stride: 0,
            size_with_stride: 0,
            pass_through: 0,
            h_stride: 0,
        }
    }

    fn to_attr(&self) -> RknnTensorAttr {
        let name = CStr::from_bytes_until_nul(&self.name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dims = self
            .dims
            .iter()
            .take(self.n_dims as usize)
            .map(|&dim| dim as usize)
            .collect();
        RknnTensorAttr { name, dims }
    }
}

#[repr(C)]
#[expect(dead_code, reason = "mirrors the C layout; only the runtime reads some fields")]
struct RawInput {
    index: u32,
    buf: *mut c_void,
    size: u32,
    pass_through: u8,
    kind: c_int,
    fmt: c_int,
}

#[repr(C)]
#[expect(dead_code, reason = "mirrors the C layout; only the runtime reads some fields")]
struct RawOutput {
    want_float: u8,
    is_prealloc: u8,
    index: u32,
    buf: *mut c_void,
    size: u32,
}

type InitFn = unsafe extern "C" fn(*mut RknnContext, *mut c_void, u32, u32, *mut c_void) -> c_int;
type DestroyFn = unsafe extern "C" fn(RknnContext) -> c_int;
type QueryFn = unsafe extern "C" fn(RknnContext, c_int, *mut c_void, u32) -> c_int;
type InputsSetFn = unsafe extern "C" fn(RknnContext, u32, *mut RawInput) -> c_int;
type RunFn = unsafe extern "C" fn(RknnContext, *mut c_void) -> c_int;
type OutputsGetFn = unsafe extern "C" fn(RknnContext, u32, *mut RawOutput, *mut c_void) -> c_int;
type OutputsReleaseFn = unsafe extern "C" fn(RknnContext, u32, *mut RawOutput) -> c_int;

/// Entry points resolved from the runtime library.
///
/// The library handle lives as long as any session, so the copied function
/// pointers stay valid.
struct RknnApi {
    _library: Library,
    init: InitFn,
    destroy: DestroyFn,
    query: QueryFn,
    inputs_set: InputsSetFn,
    run: RunFn,
    outputs_get: OutputsGetFn,
    outputs_release: OutputsReleaseFn,
}

impl RknnApi {
    fn open(path: &str) -> Result<Self, RknnError> {
        let library_error = |err: libloading::Error| RknnError::Library {
            path: path.to_owned(),
            reason: err.to_string(),
        };
        // SAFETY: opening the vendor runtime runs its initialisers, which have
        // no preconditions on our side.
        let library = unsafe { Library::new(path) }.map_err(library_error)?;
        // SAFETY: each symbol is declared with the signature published in
        // `rknn_api.h`.
        unsafe {
            Ok(Self {
                init: *library.get::<InitFn>(b"rknn_init\0").map_err(library_error)?,
                destroy: *library.get::<DestroyFn>(b"rknn_destroy\0").map_err(library_error)?,
                query: *library.get::<QueryFn>(b"rknn_query\0").map_err(library_error)?,
                inputs_set: *library
                    .get::<InputsSetFn>(b"rknn_inputs_set\0")
                    .map_err(library_error)?,
                run: *library.get::<RunFn>(b"rknn_run\0").map_err(library_error)?,
                outputs_get: *library
                    .get::<OutputsGetFn>(b"rknn_outputs_get\0")
                    .map_err(library_error)?,
                outputs_release: *library
                    .get::<OutputsReleaseFn>(b"rknn_outputs_release\0")
                    .map_err(library_error)?,
                _library: library,
            })
        }
    }
}

const fn check(function: &'static str, code: c_int) -> Result<(), RknnError> {
    if code == RKNN_SUCC {
        Ok(())
    } else {
        Err(RknnError::Call { function, code })
    }
}

fn byte_len(len: usize) -> Result<u32, RknnError> {
    u32::try_from(len).map_err(|_| RknnError::TooLarge(len))
}

/// [`RknnToolkit`] backed by the vendor `librknnrt` shared library.
pub struct LibRknnToolkit {
    path: String,
    api: OnceLock<Result<Arc<RknnApi>, RknnError>>,
}

impl LibRknnToolkit {
    /// Creates a toolkit that opens the library at `path` on first use.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            api: OnceLock::new(),
        }
    }

    /// Creates a toolkit for the library named by [`RUNTIME_LIB_ENV`], or
    /// [`DEFAULT_RUNTIME_LIB`].
    #[must_use]
    pub fn from_env() -> Self {
        let path = std::env::var(RUNTIME_LIB_ENV)
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_RUNTIME_LIB.to_owned());
        Self::new(path)
    }

    /// Returns the library location.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    fn api(&self) -> Result<Arc<RknnApi>, RknnError> {
        self.api
            .get_or_init(|| {
                let opened = RknnApi::open(&self.path).map(Arc::new);
                if let Err(err) = &opened {
                    debug!(path = %self.path, error = %err, "RKNN runtime unavailable");
                }
                opened
            })
            .clone()
    }
}

impl std::fmt::Debug for LibRknnToolkit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibRknnToolkit")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl RknnToolkit for LibRknnToolkit {
    fn is_available(&self) -> bool {
        self.api().is_ok()
    }

    fn load(&self, model: &[u8]) -> Result<Box<dyn RknnSession>, RknnError> {
        let api = self.api()?;
        let mut owned = model.to_vec();
        let size = byte_len(owned.len())?;
        let mut ctx: RknnContext = 0;
        // SAFETY: `owned` outlives the call and `ctx` is a valid out-pointer.
        let code = unsafe {
            (api.init)(
                &raw mut ctx,
                owned.as_mut_ptr().cast::<c_void>(),
                size,
                0,
                ptr::null_mut(),
            )
        };
        check("rknn_init", code)?;

        // From here on the session owns the context and destroys it on drop.
        let mut session = NativeSession {
            api,
            ctx,
            inputs: Vec::new(),
            outputs: Vec::new(),
        };
        session.describe()?;
        Ok(Box::new(session))
    }
}

struct NativeSession {
    api: Arc<RknnApi>,
    ctx: RknnContext,
    inputs: Vec<RknnTensorAttr>,
    outputs: Vec<RknnTensorAttr>,
}

impl NativeSession {
    fn describe(&mut self) -> Result<(), RknnError> {
        let mut counts = RawInputOutputNum::default();
        self.query(
            RKNN_QUERY_IN_OUT_NUM,
            ptr::from_mut(&mut counts).cast(),
            size_of::<RawInputOutputNum>(),
        )?;
        self.inputs = (0..counts.n_input)
            .map(|index| self.query_attr(RKNN_QUERY_INPUT_ATTR, index))
            .collect::<Result<_, _>>()?;
        self.outputs = (0..counts.n_output)
            .map(|index| self.query_attr(RKNN_QUERY_OUTPUT_ATTR, index))
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    fn query_attr(&self, cmd: c_int, index: u32) -> Result<RknnTensorAttr, RknnError> {
        let mut raw = RawTensorAttr::for_index(index);
        self.query(cmd, ptr::from_mut(&mut raw).cast(), size_of::<RawTensorAttr>())?;
        Ok(raw.to_attr())
    }

    fn query(&self, cmd: c_int, info: *mut c_void, len: usize) -> Result<(), RknnError> {
        let size = byte_len(len)?;
        // SAFETY: `info` points at a live, correctly sized struct for `cmd`.
        let code = unsafe { (self.api.query)(self.ctx, cmd, info, size) };
        check("rknn_query", code)
    }

    fn collect_outputs(&self, raw_outputs: &[RawOutput]) -> Result<Vec<Tensor>, RknnError> {
        raw_outputs
            .iter()
            .zip(&self.outputs)
            .map(|(raw, attr)| {
                let count = (raw.size as usize)
                    .checked_div(size_of::<f32>())
                    .unwrap_or_default();
                let values = if raw.buf.is_null() {
                    Vec::new()
                } else {
                    // SAFETY: with `want_float` set the runtime fills `buf`
                    // with `size` bytes of aligned `f32` data, valid until
                    // `rknn_outputs_release`.
                    unsafe { std::slice::from_raw_parts(raw.buf.cast::<f32>(), count) }.to_vec()
                };
                if Tensor::element_count(&attr.dims) == Some(values.len()) {
                    Tensor::new(attr.dims.clone(), values).map_err(RknnError::OutputShape)
                } else {
                    Ok(Tensor::from_vec(values))
                }
            })
            .collect()
    }
}

impl RknnSession for NativeSession {
    fn inputs(&self) -> &[RknnTensorAttr] {
        &self.inputs
    }

    fn outputs(&self) -> &[RknnTensorAttr] {
        &self.outputs
    }

    fn run(&mut self, inputs: Vec<Tensor>) -> Result<Vec<Tensor>, RknnError> {
        if inputs.len() != self.inputs.len() {
            return Err(RknnError::InputCount {
                expected: self.inputs.len(),
                actual: inputs.len(),
            });
        }

        let mut raw_inputs = inputs
            .iter()
            .zip(0_u32..)
            .map(|(tensor, index)| {
                Ok(RawInput {
                    index,
                    buf: tensor.values().as_ptr().cast_mut().cast::<c_void>(),
                    size: byte_len(size_of_val(tensor.values()))?,
                    pass_through: 0,
                    kind: RKNN_TENSOR_FLOAT32,
                    fmt: RKNN_TENSOR_NCHW,
                })
            })
            .collect::<Result<Vec<_>, RknnError>>()?;
        let n_inputs = byte_len(raw_inputs.len())?;
        // SAFETY: every `buf` borrows a tensor in `inputs`, alive for the call.
        check("rknn_inputs_set", unsafe {
            (self.api.inputs_set)(self.ctx, n_inputs, raw_inputs.as_mut_ptr())
        })?;
        // SAFETY: the context is initialised and owned by this session.
        check("rknn_run", unsafe { (self.api.run)(self.ctx, ptr::null_mut()) })?;

        let mut raw_outputs = (0_u32..)
            .take(self.outputs.len())
            .map(|index| RawOutput {
                want_float: 1,
                is_prealloc: 0,
                index,
                buf: ptr::null_mut(),
                size: 0,
            })
            .collect::<Vec<_>>();
        let n_outputs = byte_len(raw_outputs.len())?;
        // SAFETY: `raw_outputs` holds `n_outputs` initialised descriptors.
        check("rknn_outputs_get", unsafe {
            (self.api.outputs_get)(self.ctx, n_outputs, raw_outputs.as_mut_ptr(), ptr::null_mut())
        })?;

        let tensors = self.collect_outputs(&raw_outputs);
        // SAFETY: releases exactly the buffers returned by `rknn_outputs_get`.
        let released = unsafe {
            (self.api.outputs_release)(self.ctx, n_outputs, raw_outputs.as_mut_ptr())
        };
        check("rknn_outputs_release", released)?;
        tensors
    }
}

impl Drop for NativeSession {
    fn drop(&mut self) {
        // SAFETY: the context was created by `rknn_init` and is destroyed once.
        let code = unsafe { (self.api.destroy)(self.ctx) };
        if code != RKNN_SUCC {
            warn!(code, "rknn_destroy failed");
        }
    }
}
