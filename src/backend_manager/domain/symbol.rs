//! Members of the open backend enumeration.

use super::{BackendDomainError, BackendName};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper-case identifier naming a member of the backend enumeration
/// (e.g. `RKNN`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EnumName(String);

impl EnumName {
    /// Creates a validated enum name.
    ///
    /// Only `[A-Z0-9_]` is accepted and the first character must not be a
    /// digit. The input is taken as is, without trimming or case folding.
    ///
    /// # Errors
    ///
    /// Returns [`BackendDomainError::InvalidEnumName`] when the value is not
    /// an upper-case identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, BackendDomainError> {
        let raw = value.into();

        let starts_well = raw
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_uppercase() || c == '_');
        let is_valid = starts_well
            && raw
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');

        if !is_valid {
            return Err(BackendDomainError::InvalidEnumName(raw));
        }

        Ok(Self(raw))
    }

    /// Derives the conventional enum name for a backend: the upper-cased
    /// name with hyphens mapped to underscores.
    #[must_use]
    pub fn derive(name: &BackendName) -> Self {
        let derived = name
            .as_str()
            .chars()
            .map(|c| if c == '-' { '_' } else { c.to_ascii_uppercase() })
            .collect::<String>();
        if derived.starts_with(|c: char| c.is_ascii_digit()) {
            Self(format!("_{derived}"))
        } else {
            Self(derived)
        }
    }

    /// Returns the enum name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnumName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EnumName {
    type Error = BackendDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EnumName> for String {
    fn from(name: EnumName) -> Self {
        name.0
    }
}

/// Opaque token identifying one enumeration member.
///
/// Tokens are allocated sequentially by
/// [`BackendEnumeration`](super::BackendEnumeration) and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendSymbol(u32);

impl BackendSymbol {
    /// Creates a symbol from a raw token.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw token.
    #[must_use]
    pub const fn into_inner(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BackendSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One member of the open backend enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendVariant {
    symbol: BackendSymbol,
    enum_name: EnumName,
    value: BackendName,
}

impl BackendVariant {
    pub(crate) const fn new(symbol: BackendSymbol, enum_name: EnumName, value: BackendName) -> Self {
        Self {
            symbol,
            enum_name,
            value,
        }
    }

    /// Returns the opaque symbol.
    #[must_use]
    pub const fn symbol(&self) -> BackendSymbol {
        self.symbol
    }

    /// Returns the member name (e.g. `RKNN`).
    #[must_use]
    pub const fn enum_name(&self) -> &EnumName {
        &self.enum_name
    }

    /// Returns the backend name the member stands for (e.g. `rknn`).
    #[must_use]
    pub const fn value(&self) -> &BackendName {
        &self.value
    }
}

impl fmt::Display for BackendVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.enum_name, self.value)
    }
}
