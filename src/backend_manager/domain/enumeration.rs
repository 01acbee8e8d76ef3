//! Open enumeration of known backends.

use super::{BackendDomainError, BackendName, BackendSymbol, BackendVariant, EnumName};
use std::collections::HashMap;

/// Run-time extensible enumeration of backend identifiers.
///
/// Members are appended the first time a backend registers and are never
/// removed. The enumeration keeps a forward index by enum name and a reverse
/// index by backend name so both `RKNN` and `rknn` resolve to the same
/// member. Several enum names may alias one member.
#[derive(Debug, Clone, Default)]
pub struct BackendEnumeration {
    variants: Vec<BackendVariant>,
    by_enum_name: HashMap<EnumName, usize>,
    by_value: HashMap<BackendName, usize>,
}

impl BackendEnumeration {
    /// Creates an empty enumeration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the member with the given enum name.
    #[must_use]
    pub fn get(&self, enum_name: &EnumName) -> Option<&BackendVariant> {
        self.by_enum_name
            .get(enum_name)
            .and_then(|&index| self.variants.get(index))
    }

    /// Returns the member standing for the given backend name.
    #[must_use]
    pub fn variant_for(&self, name: &BackendName) -> Option<&BackendVariant> {
        self.by_value
            .get(name)
            .and_then(|&index| self.variants.get(index))
    }

    /// Resolves a symbol back to its member.
    #[must_use]
    pub fn resolve(&self, symbol: BackendSymbol) -> Option<&BackendVariant> {
        usize::try_from(symbol.into_inner())
            .ok()
            .and_then(|index| self.variants.get(index))
    }

    /// Iterates members in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &BackendVariant> {
        self.variants.iter()
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Returns `true` when no member has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Checks whether [`extend`](Self::extend) would succeed without
    /// mutating the enumeration.
    ///
    /// # Errors
    ///
    /// See [`extend`](Self::extend).
    pub fn check(&self, enum_name: &EnumName, name: &BackendName) -> Result<(), BackendDomainError> {
        match self.get(enum_name) {
            Some(existing) if existing.value() != name => Err(BackendDomainError::EnumNameConflict {
                enum_name: enum_name.clone(),
                existing: existing.value().clone(),
                requested: name.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Adds `enum_name = name` unless it already exists.
    ///
    /// A backend that is already enumerated keeps its symbol; a new
    /// `enum_name` for it becomes an alias of the existing member. Returns
    /// the member and whether it was created by this call.
    ///
    /// # Errors
    ///
    /// Returns [`BackendDomainError::EnumNameConflict`] when `enum_name`
    /// already stands for another backend, or
    /// [`BackendDomainError::EnumerationExhausted`] when no symbol is left.
    /// The enumeration is unchanged on error.
    pub fn extend(
        &mut self,
        enum_name: EnumName,
        name: BackendName,
    ) -> Result<(BackendVariant, bool), BackendDomainError> {
        self.check(&enum_name, &name)?;

        if let Some(&index) = self.by_value.get(&name)
            && let Some(existing) = self.variants.get(index)
        {
            let member = existing.clone();
            self.by_enum_name.entry(enum_name).or_insert(index);
            return Ok((member, false));
        }

        let index = self.variants.len();
        let raw =
            u32::try_from(index).map_err(|_| BackendDomainError::EnumerationExhausted)?;
        let variant = BackendVariant::new(BackendSymbol::from_raw(raw), enum_name, name);
        self.by_enum_name.insert(variant.enum_name().clone(), index);
        self.by_value.insert(variant.value().clone(), index);
        self.variants.push(variant.clone());
        Ok((variant, true))
    }
}
