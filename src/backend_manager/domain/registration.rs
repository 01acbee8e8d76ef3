//! Snapshot of a registry entry.

use super::BackendVariant;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Read-only view of one registered backend manager.
///
/// Serializes as a flat record for host diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredBackend {
    variant: BackendVariant,
    manager_name: &'static str,
    registered_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RegisteredBackend {
    pub(crate) const fn new(
        variant: BackendVariant,
        manager_name: &'static str,
        registered_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            variant,
            manager_name,
            registered_at,
            updated_at,
        }
    }

    /// Returns the enumeration member of the backend.
    #[must_use]
    pub const fn variant(&self) -> &BackendVariant {
        &self.variant
    }

    /// Returns the type name of the current manager.
    #[must_use]
    pub const fn manager_name(&self) -> &'static str {
        self.manager_name
    }

    /// Returns when the backend name was first registered.
    #[must_use]
    pub const fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Returns when the manager was last installed or replaced.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
