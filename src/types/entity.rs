//! Defines the municipality records loaded from the IBGE registry and the outcome of
//! resolving a free-text station or municipality name against them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An authoritative municipality record from the IBGE registry.
///
/// The registry endpoint returns many more fields (micro-region, state, ...); only the
/// code and the official name are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalEntity {
    /// The IBGE municipality code (e.g. `3550308` for São Paulo).
    pub id: u32,
    /// The official municipality name, diacritics included.
    #[serde(alias = "nome")]
    pub name: String,
}

impl CanonicalEntity {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// The fallback step that produced a [`Resolution::Resolved`] id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionTier {
    /// The normalized name matched a registry entry directly.
    ExactMatch,
    /// The raw name was found in the alias table and its substitute matched the registry.
    Alias,
    /// The id came from the hardcoded override table.
    Override,
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResolutionTier::ExactMatch => "exact",
            ResolutionTier::Alias => "alias",
            ResolutionTier::Override => "override",
        };
        write!(f, "{}", label)
    }
}

/// Result of mapping a raw name to an IBGE municipality code.
///
/// `Unresolved` is the single "not found" signal used across the crate. It is an
/// expected outcome, not an error: harvesters keep such rows with an empty code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    Resolved { id: u32, tier: ResolutionTier },
    Unresolved,
}

impl Resolution {
    /// The resolved municipality code, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use agroclima::{Resolution, ResolutionTier};
    ///
    /// let hit = Resolution::Resolved { id: 2927408, tier: ResolutionTier::ExactMatch };
    /// assert_eq!(hit.id(), Some(2927408));
    /// assert_eq!(Resolution::Unresolved.id(), None);
    /// ```
    pub fn id(&self) -> Option<u32> {
        match self {
            Resolution::Resolved { id, .. } => Some(*id),
            Resolution::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved { .. })
    }
}
