use crate::resolve::normalize::normalize_name;
use crate::resolve::tables::ResolverTables;
use crate::types::entity::{CanonicalEntity, Resolution, ResolutionTier};
use log::trace;

/// Maps free-text station and municipality names to IBGE municipality codes.
///
/// The registry is normalized once at construction; the resolver is immutable
/// afterwards and can be shared freely between threads.
///
/// Tiers, first success wins:
/// 1. exact match of the normalized name against the normalized registry names
///    (first registry entry wins on duplicates),
/// 2. alias table lookup of the raw name, then exact match of the substitute,
/// 3. override table lookup of the substitute (or of the raw name when no alias exists).
#[derive(Debug, Clone)]
pub struct EntityResolver {
    // (normalized name, id) in registry order
    entries: Vec<(String, u32)>,
    tables: ResolverTables,
}

impl EntityResolver {
    pub fn new(registry: &[CanonicalEntity], tables: ResolverTables) -> Self {
        let entries = registry
            .iter()
            .map(|entity| (normalize_name(&entity.name), entity.id))
            .collect();
        Self { entries, tables }
    }

    /// Resolves a bare municipality name.
    ///
    /// # Examples
    ///
    /// ```
    /// use agroclima::{CanonicalEntity, EntityResolver, ResolverTables};
    ///
    /// let registry = vec![CanonicalEntity::new(3550308, "São Paulo")];
    /// let resolver = EntityResolver::new(&registry, ResolverTables::inmet());
    ///
    /// assert_eq!(resolver.resolve("SAO PAULO").id(), Some(3550308));
    /// assert_eq!(resolver.resolve("Santana do Livramento").id(), Some(430016));
    /// assert!(!resolver.resolve("Atlantis").is_resolved());
    /// ```
    pub fn resolve(&self, raw_name: &str) -> Resolution {
        self.resolve_tiers(raw_name, &[raw_name])
    }

    /// Resolves an INMET station name such as `"SANTANA DO LIVRAMENTO (A) - RS"`.
    ///
    /// The registry match uses the name before the station-type suffix, while the
    /// alias table is consulted with the full station name first, as its keys are
    /// full station names.
    pub fn resolve_station(&self, station_name: &str) -> Resolution {
        let bare = strip_station_suffix(station_name);
        self.resolve_tiers(bare, &[station_name, bare])
    }

    /// Alias targets that neither match the registry nor have an override.
    pub fn unreachable_aliases(&self) -> Vec<(&str, &str)> {
        let mut unreachable: Vec<(&str, &str)> = self
            .tables
            .aliases()
            .filter(|(_, canonical)| {
                self.exact_match(canonical).is_none()
                    && self.tables.override_id(canonical).is_none()
            })
            .collect();
        unreachable.sort_unstable();
        unreachable
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn exact_match(&self, name: &str) -> Option<u32> {
        let normalized = normalize_name(name);
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == normalized)
            .map(|(_, id)| *id)
    }

    fn resolve_tiers(&self, match_name: &str, alias_keys: &[&str]) -> Resolution {
        if let Some(id) = self.exact_match(match_name) {
            trace!("'{}' resolved to {} by exact match", match_name, id);
            return Resolution::Resolved {
                id,
                tier: ResolutionTier::ExactMatch,
            };
        }

        let substitute = alias_keys.iter().find_map(|key| self.tables.alias(key));
        if let Some(canonical) = substitute {
            if let Some(id) = self.exact_match(canonical) {
                trace!("'{}' resolved to {} via alias '{}'", match_name, id, canonical);
                return Resolution::Resolved {
                    id,
                    tier: ResolutionTier::Alias,
                };
            }
        }

        match self.tables.override_id(substitute.unwrap_or(match_name)) {
            Some(id) => {
                trace!("'{}' resolved to {} via override", match_name, id);
                Resolution::Resolved {
                    id,
                    tier: ResolutionTier::Override,
                }
            }
            None => {
                trace!("'{}' is unresolved", match_name);
                Resolution::Unresolved
            }
        }
    }
}

/// Resolves `raw_name` against `registry` with the INMET alias and override tables.
///
/// Builds a throwaway [`EntityResolver`]; prefer constructing one resolver per run
/// when resolving many names.
pub fn resolve(raw_name: &str, registry: &[CanonicalEntity]) -> Resolution {
    EntityResolver::new(registry, ResolverTables::inmet()).resolve(raw_name)
}

/// Drops the station-type and state suffix: `"ABROLHOS (A) - BA"` becomes `"ABROLHOS"`.
pub fn strip_station_suffix(station_name: &str) -> &str {
    station_name
        .split_once('(')
        .map_or(station_name, |(head, _)| head)
        .trim()
}
