//! Pattern Library: picks the next target pattern for a session.

use drill_core::{ButtonLayout, Difficulty, Mode, Pattern};
use log::warn;
use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogEntry, Family};
use crate::error::ConfigError;

/// Which families the "custom" mode draws from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilySet {
    pub basic: bool,
    pub motions: bool,
    pub combos: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomConfig {
    pub families: FamilySet,
    /// Per-attempt window override in milliseconds.
    pub duration_ms: Option<u64>,
}

/// Everything the library needs to answer a selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectRequest {
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub custom: Option<CustomConfig>,
    pub custom_combo: Option<Pattern>,
}

struct Entry {
    pattern: Pattern,
    tier: Difficulty,
}

pub struct PatternLibrary {
    families: FxHashMap<Family, Vec<Entry>>,
}

impl FamilySet {
    pub fn all() -> Self {
        Self {
            basic: true,
            motions: true,
            combos: true,
        }
    }

    pub fn only(family: Family) -> Self {
        let mut set = Self::default();
        set.insert(family);
        set
    }

    pub fn insert(&mut self, family: Family) {
        match family {
            Family::Basic => self.basic = true,
            Family::Motions => self.motions = true,
            Family::Combos => self.combos = true,
        }
    }

    pub fn contains(&self, family: Family) -> bool {
        match family {
            Family::Basic => self.basic,
            Family::Motions => self.motions,
            Family::Combos => self.combos,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.basic || self.motions || self.combos)
    }

    pub fn iter(&self) -> impl Iterator<Item = Family> + '_ {
        Family::ALL.into_iter().filter(|f| self.contains(*f))
    }
}

impl SelectRequest {
    pub fn new(mode: Mode, difficulty: Difficulty) -> Self {
        Self {
            mode,
            difficulty,
            custom: None,
            custom_combo: None,
        }
    }

    pub fn with_custom(mut self, custom: CustomConfig) -> Self {
        self.custom = Some(custom);
        self
    }

    pub fn with_custom_combo(mut self, pattern: Pattern) -> Self {
        self.custom_combo = Some(pattern);
        self
    }

    pub fn duration_override(&self) -> Option<u64> {
        match self.mode {
            Mode::Custom | Mode::CustomCombo => self.custom.as_ref().and_then(|c| c.duration_ms),
            _ => None,
        }
    }
}

impl PatternLibrary {
    /// Library over the built-in catalog.
    pub fn standard() -> Self {
        let mut families = FxHashMap::default();
        for family in Family::ALL {
            families.insert(family, build_entries(family.entries()));
        }
        Self { families }
    }

    fn family_for(mode: Mode) -> Option<Family> {
        match mode {
            Mode::Motion => Some(Family::Basic),
            Mode::SpecialMotions => Some(Family::Motions),
            Mode::Combos => Some(Family::Combos),
            Mode::Custom | Mode::CustomCombo => None,
        }
    }

    /// Candidate pool for a request, filtered by tier and button layout.
    pub fn pool<'a>(
        &'a self,
        request: &'a SelectRequest,
        layout: ButtonLayout,
    ) -> Result<Vec<&'a Pattern>, ConfigError> {
        let families = match request.mode {
            Mode::CustomCombo => {
                let pattern = request
                    .custom_combo
                    .as_ref()
                    .ok_or(ConfigError::MissingCustomCombo)?;
                if let Some(symbol) = pattern.symbols().iter().find(|s| !layout.allows(**s)) {
                    return Err(ConfigError::DisabledSymbol(*symbol));
                }
                return Ok(vec![pattern]);
            }
            Mode::Custom => {
                let set = request
                    .custom
                    .as_ref()
                    .map(|c| c.families)
                    .unwrap_or_default();
                if set.is_empty() {
                    return Err(ConfigError::NoFamilyEnabled);
                }
                set.iter().collect::<Vec<_>>()
            }
            mode => Self::family_for(mode).into_iter().collect(),
        };

        let pool: Vec<&Pattern> = families
            .iter()
            .filter_map(|family| self.families.get(family))
            .flat_map(|entries| entries.iter())
            .filter(|entry| request.difficulty.includes(entry.tier))
            .filter(|entry| entry.pattern.symbols().iter().all(|s| layout.allows(*s)))
            .map(|entry| &entry.pattern)
            .collect();

        if pool.is_empty() {
            return Err(ConfigError::EmptyPool {
                mode: request.mode,
                difficulty: request.difficulty,
            });
        }
        Ok(pool)
    }

    /// Checks a request without drawing from it.
    pub fn validate(&self, request: &SelectRequest, layout: ButtonLayout) -> Result<(), ConfigError> {
        self.pool(request, layout).map(|_| ())
    }

    pub fn select<R: Rng + ?Sized>(
        &self,
        request: &SelectRequest,
        layout: ButtonLayout,
        rng: &mut R,
    ) -> Result<Pattern, ConfigError> {
        let pool = self.pool(request, layout)?;
        pool.choose(rng)
            .map(|p| (*p).clone())
            .ok_or(ConfigError::EmptyPool {
                mode: request.mode,
                difficulty: request.difficulty,
            })
    }
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::standard()
    }
}

fn build_entries(catalog: &[CatalogEntry]) -> Vec<Entry> {
    catalog
        .iter()
        .filter_map(|entry| match entry.to_pattern() {
            Ok(pattern) => Some(Entry {
                pattern,
                tier: entry.tier,
            }),
            Err(err) => {
                warn!("skipping catalog entry {}: {}", entry.name, err);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BASIC, COMBOS, MOTIONS};
    use drill_core::Symbol;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool_len(lib: &PatternLibrary, request: &SelectRequest, layout: ButtonLayout) -> usize {
        lib.pool(request, layout).map(|p| p.len()).unwrap_or(0)
    }

    #[test]
    fn test_standard_library_loads_whole_catalog() {
        let lib = PatternLibrary::standard();
        let request = SelectRequest::new(Mode::Custom, Difficulty::Hard).with_custom(CustomConfig {
            families: FamilySet::all(),
            duration_ms: None,
        });
        assert_eq!(
            pool_len(&lib, &request, ButtonLayout::Six),
            BASIC.len() + MOTIONS.len() + COMBOS.len()
        );
    }

    #[test]
    fn test_harder_tiers_never_shrink_pool() {
        let lib = PatternLibrary::standard();
        for mode in [Mode::Motion, Mode::SpecialMotions, Mode::Combos] {
            let easy = pool_len(&lib, &SelectRequest::new(mode, Difficulty::Easy), ButtonLayout::Six);
            let medium =
                pool_len(&lib, &SelectRequest::new(mode, Difficulty::Medium), ButtonLayout::Six);
            let hard = pool_len(&lib, &SelectRequest::new(mode, Difficulty::Hard), ButtonLayout::Six);
            assert!(easy > 0);
            assert!(easy <= medium && medium <= hard, "{mode}");
        }
    }

    #[test]
    fn test_easy_motion_pool_only_easy_entries() {
        let lib = PatternLibrary::standard();
        let request = SelectRequest::new(Mode::Motion, Difficulty::Easy);
        let pool = lib.pool(&request, ButtonLayout::Six).unwrap();
        assert!(pool
            .iter()
            .all(|p| p.meta().and_then(|m| m.tier) == Some(Difficulty::Easy)));
    }

    #[test]
    fn test_custom_without_families_rejected() {
        let lib = PatternLibrary::standard();
        let request = SelectRequest::new(Mode::Custom, Difficulty::Easy);
        assert!(matches!(
            lib.validate(&request, ButtonLayout::Six),
            Err(ConfigError::NoFamilyEnabled)
        ));
        let request = request.with_custom(CustomConfig::default());
        assert!(matches!(
            lib.validate(&request, ButtonLayout::Six),
            Err(ConfigError::NoFamilyEnabled)
        ));
    }

    #[test]
    fn test_custom_union_of_enabled_families() {
        let lib = PatternLibrary::standard();
        let mut families = FamilySet::only(Family::Basic);
        families.insert(Family::Combos);
        let request = SelectRequest::new(Mode::Custom, Difficulty::Hard).with_custom(CustomConfig {
            families,
            duration_ms: Some(1500),
        });
        assert_eq!(
            pool_len(&lib, &request, ButtonLayout::Six),
            BASIC.len() + COMBOS.len()
        );
        assert_eq!(request.duration_override(), Some(1500));
    }

    #[test]
    fn test_custom_combo_is_deterministic() {
        let lib = PatternLibrary::standard();
        let combo = Pattern::parse("down down_right right hp").unwrap();
        let request =
            SelectRequest::new(Mode::CustomCombo, Difficulty::Easy).with_custom_combo(combo.clone());
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..5 {
            assert_eq!(lib.select(&request, ButtonLayout::Six, &mut rng).unwrap(), combo);
        }
    }

    #[test]
    fn test_custom_combo_missing_rejected() {
        let lib = PatternLibrary::standard();
        let request = SelectRequest::new(Mode::CustomCombo, Difficulty::Easy);
        assert!(matches!(
            lib.select(&request, ButtonLayout::Six, &mut StdRng::seed_from_u64(1)),
            Err(ConfigError::MissingCustomCombo)
        ));
    }

    #[test]
    fn test_custom_combo_respects_button_layout() {
        let lib = PatternLibrary::standard();
        let request = SelectRequest::new(Mode::CustomCombo, Difficulty::Easy)
            .with_custom_combo(Pattern::new([Symbol::Down, Symbol::Mp]).unwrap());
        assert!(matches!(
            lib.validate(&request, ButtonLayout::Four),
            Err(ConfigError::DisabledSymbol(Symbol::Mp))
        ));
        assert!(lib.validate(&request, ButtonLayout::Six).is_ok());
    }

    #[test]
    fn test_four_button_layout_excludes_disabled_attacks() {
        let lib = PatternLibrary::standard();
        for mode in [Mode::Motion, Mode::SpecialMotions, Mode::Combos] {
            let request = SelectRequest::new(mode, Difficulty::Hard);
            let pool = lib.pool(&request, ButtonLayout::Four).unwrap();
            assert!(pool.iter().all(|p| !p.symbols().contains(&Symbol::Mp)));
            assert!(pool.iter().all(|p| !p.symbols().contains(&Symbol::Mk)));
            assert!(pool.len() < pool_len(&lib, &request, ButtonLayout::Six));
        }
    }

    #[test]
    fn test_select_draws_from_pool() {
        let lib = PatternLibrary::standard();
        let request = SelectRequest::new(Mode::SpecialMotions, Difficulty::Medium);
        let pool: Vec<Pattern> = lib
            .pool(&request, ButtonLayout::Six)
            .unwrap()
            .into_iter()
            .cloned()
            .collect();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let picked = lib.select(&request, ButtonLayout::Six, &mut rng).unwrap();
            assert!(pool.contains(&picked));
        }
    }

    #[test]
    fn test_duration_override_ignored_for_fixed_modes() {
        let request = SelectRequest::new(Mode::Combos, Difficulty::Easy).with_custom(CustomConfig {
            families: FamilySet::all(),
            duration_ms: Some(500),
        });
        assert_eq!(request.duration_override(), None);
    }
}
