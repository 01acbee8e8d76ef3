//! Errors raised while reading deployment configurations.

use std::sync::Arc;
use thiserror::Error;

/// Errors returned by [`DeployConfig`](super::DeployConfig) constructors and
/// accessors.
#[derive(Debug, Clone, Error)]
pub enum DeployConfigError {
    /// The document root is not a JSON object.
    #[error("deployment configuration must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    /// The document is not valid JSON.
    #[error("deployment configuration is not valid JSON: {0}")]
    Parse(Arc<serde_json::Error>),

    /// The document could not be read from disk.
    #[error("failed to read deployment configuration {path}: {source}")]
    Read {
        /// Location that was read.
        path: String,
        /// Underlying I/O failure.
        source: Arc<std::io::Error>,
    },

    /// A section exists but has the wrong shape.
    #[error("malformed `{section}` section: {reason}")]
    MalformedSection {
        /// Dotted path of the offending section.
        section: &'static str,
        /// What was expected.
        reason: String,
    },
}

impl DeployConfigError {
    pub(crate) fn malformed(section: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedSection {
            section,
            reason: reason.into(),
        }
    }
}
