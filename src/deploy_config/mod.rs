//! Backend-agnostic deployment configuration.
//!
//! A deployment configuration is an opaque JSON document describing how a
//! model is deployed. Backends never parse the whole document; they read
//! their own section through the accessors here:
//!
//! ```json
//! {
//!   "onnx_config": { "input_names": ["input"], "output_names": ["dets"] },
//!   "backend_config": {
//!     "type": "rknn",
//!     "common_config": { "target_platform": "rk3588" }
//!   }
//! }
//! ```

mod error;

pub use error::DeployConfigError;

use crate::fs_utils;
use camino::Utf8Path;
use serde_json::{Map, Value};
use std::sync::Arc;

const BACKEND_CONFIG: &str = "backend_config";
const COMMON_CONFIG: &str = "common_config";
const ONNX_CONFIG: &str = "onnx_config";

/// Opaque deployment configuration document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeployConfig {
    root: Map<String, Value>,
}

impl DeployConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already-parsed JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`DeployConfigError::NotAnObject`] when `value` is not a JSON
    /// object.
    pub fn from_value(value: Value) -> Result<Self, DeployConfigError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(DeployConfigError::NotAnObject(json_type(&other))),
        }
    }

    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`DeployConfigError::Parse`] for invalid JSON or
    /// [`DeployConfigError::NotAnObject`] for a non-object root.
    pub fn from_json_str(raw: &str) -> Result<Self, DeployConfigError> {
        let value = serde_json::from_str(raw).map_err(|err| DeployConfigError::Parse(Arc::new(err)))?;
        Self::from_value(value)
    }

    /// Loads a JSON document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`DeployConfigError::Read`] when the file cannot be read, or
    /// any error of [`from_json_str`](Self::from_json_str).
    pub fn load(path: &Utf8Path) -> Result<Self, DeployConfigError> {
        let contents = fs_utils::read_to_string(path).map_err(|err| DeployConfigError::Read {
            path: path.to_string(),
            source: Arc::new(err),
        })?;
        Self::from_json_str(&contents)
    }

    /// Returns the raw document.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Returns `true` when the document has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Returns the `backend_config` section, if present.
    ///
    /// # Errors
    ///
    /// Returns [`DeployConfigError::MalformedSection`] when the section is
    /// not an object.
    pub fn backend_config(&self) -> Result<Option<&Map<String, Value>>, DeployConfigError> {
        object_section(&self.root, BACKEND_CONFIG, "backend_config")
    }

    /// Returns `backend_config.type`, the backend the document targets.
    ///
    /// # Errors
    ///
    /// Returns [`DeployConfigError::MalformedSection`] when the section or
    /// the `type` key has the wrong shape.
    pub fn backend_type(&self) -> Result<Option<&str>, DeployConfigError> {
        let Some(section) = self.backend_config()? else {
            return Ok(None);
        };
        match section.get("type") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(kind)) => Ok(Some(kind.as_str())),
            Some(other) => Err(DeployConfigError::malformed(
                "backend_config.type",
                format!("expected a string, found {}", json_type(other)),
            )),
        }
    }

    /// Returns `backend_config.common_config`, or an empty map when absent.
    ///
    /// # Errors
    ///
    /// Returns [`DeployConfigError::MalformedSection`] when either section
    /// is not an object.
    pub fn common_config(&self) -> Result<Map<String, Value>, DeployConfigError> {
        let Some(section) = self.backend_config()? else {
            return Ok(Map::new());
        };
        Ok(object_section(section, COMMON_CONFIG, "backend_config.common_config")?
            .cloned()
            .unwrap_or_default())
    }

    /// Returns `onnx_config.input_names`, if declared.
    ///
    /// # Errors
    ///
    /// Returns [`DeployConfigError::MalformedSection`] when the list is not
    /// an array of strings.
    pub fn onnx_input_names(&self) -> Result<Option<Vec<String>>, DeployConfigError> {
        self.onnx_names("input_names", "onnx_config.input_names")
    }

    /// Returns `onnx_config.output_names`, if declared.
    ///
    /// # Errors
    ///
    /// Returns [`DeployConfigError::MalformedSection`] when the list is not
    /// an array of strings.
    pub fn onnx_output_names(&self) -> Result<Option<Vec<String>>, DeployConfigError> {
        self.onnx_names("output_names", "onnx_config.output_names")
    }

    fn onnx_names(
        &self,
        key: &str,
        section: &'static str,
    ) -> Result<Option<Vec<String>>, DeployConfigError> {
        let Some(onnx) = object_section(&self.root, ONNX_CONFIG, "onnx_config")? else {
            return Ok(None);
        };
        match onnx.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_owned).ok_or_else(|| {
                        DeployConfigError::malformed(
                            section,
                            format!("expected strings, found {}", json_type(item)),
                        )
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(other) => Err(DeployConfigError::malformed(
                section,
                format!("expected an array, found {}", json_type(other)),
            )),
        }
    }
}

impl TryFrom<Value> for DeployConfig {
    type Error = DeployConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

fn object_section<'a>(
    parent: &'a Map<String, Value>,
    key: &str,
    section: &'static str,
) -> Result<Option<&'a Map<String, Value>>, DeployConfigError> {
    match parent.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(DeployConfigError::malformed(
            section,
            format!("expected an object, found {}", json_type(other)),
        )),
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
