//! Logical device selectors.

use super::BackendDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Device kind used when a caller does not name one.
pub const DEFAULT_DEVICE_KIND: &str = "cpu";

/// Logical device selector of the form `kind` or `kind:index`
/// (e.g. `cpu`, `cuda:0`, `npu`).
///
/// The selector only names a device; whether a backend can use it is the
/// manager's decision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Device {
    kind: String,
    index: Option<u32>,
}

impl Device {
    /// Returns the generic CPU device.
    #[must_use]
    pub fn cpu() -> Self {
        Self {
            kind: DEFAULT_DEVICE_KIND.to_owned(),
            index: None,
        }
    }

    /// Parses a device selector.
    ///
    /// # Errors
    ///
    /// Returns [`BackendDomainError::InvalidDevice`] when the kind is empty
    /// or not `[a-z0-9_]`, or the index is not an unsigned integer.
    pub fn parse(raw: &str) -> Result<Self, BackendDomainError> {
        let normalized = raw.trim().to_ascii_lowercase();
        let (kind, index) = match normalized.split_once(':') {
            Some((kind, index)) => {
                let parsed = index
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| BackendDomainError::InvalidDevice(raw.to_owned()))?;
                (kind.trim(), Some(parsed))
            }
            None => (normalized.as_str(), None),
        };

        let is_valid = !kind.is_empty()
            && kind
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !is_valid {
            return Err(BackendDomainError::InvalidDevice(raw.to_owned()));
        }

        Ok(Self {
            kind: kind.to_owned(),
            index,
        })
    }

    /// Returns the device kind (e.g. `cuda`).
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the device ordinal, if one was given.
    #[must_use]
    pub const fn index(&self) -> Option<u32> {
        self.index
    }

    /// Returns `true` for the generic CPU device kind.
    #[must_use]
    pub fn is_cpu(&self) -> bool {
        self.kind == DEFAULT_DEVICE_KIND
    }
}

impl Default for Device {
    fn default() -> Self {
        Self::cpu()
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}:{index}", self.kind),
            None => f.write_str(&self.kind),
        }
    }
}

impl FromStr for Device {
    type Err = BackendDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Device {
    type Error = BackendDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Device> for String {
    fn from(device: Device) -> Self {
        device.to_string()
    }
}
