//! Backend identifiers.

use super::BackendDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest accepted backend name, in bytes.
pub const MAX_BACKEND_NAME_LEN: usize = 100;

/// Name a backend registers under, such as `rknn` or `onnx-runtime`.
///
/// Names are matched exactly: they must already be lower-case and carry no
/// surrounding whitespace. The name also selects the discovery module, so
/// `rknn` is looked up as `<namespace>.rknn`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BackendName(String);

const fn is_name_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '-')
}

impl BackendName {
    /// Validates `value` as a backend name.
    ///
    /// # Errors
    ///
    /// [`BackendDomainError::EmptyBackendName`] for an empty string,
    /// [`BackendDomainError::BackendNameTooLong`] past
    /// [`MAX_BACKEND_NAME_LEN`], and
    /// [`BackendDomainError::InvalidBackendName`] for anything outside
    /// `[a-z0-9_-]`, including upper-case letters and whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, BackendDomainError> {
        let candidate = value.into();
        match candidate.len() {
            0 => Err(BackendDomainError::EmptyBackendName),
            len if len > MAX_BACKEND_NAME_LEN => {
                Err(BackendDomainError::BackendNameTooLong(candidate))
            }
            _ if !candidate.chars().all(is_name_char) => {
                Err(BackendDomainError::InvalidBackendName(candidate))
            }
            _ => Ok(Self(candidate)),
        }
    }

    /// Builds a name from a literal known to be valid.
    pub(crate) fn from_static(name: &'static str) -> Self {
        debug_assert!(Self::new(name).is_ok(), "invalid backend literal `{name}`");
        Self(name.to_owned())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for BackendName {
    type Err = BackendDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for BackendName {
    type Error = BackendDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BackendName> for String {
    fn from(name: BackendName) -> Self {
        name.0
    }
}

impl AsRef<str> for BackendName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BackendName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
