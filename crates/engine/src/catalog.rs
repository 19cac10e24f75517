//! Static pattern catalog, grouped by family and tagged by tier.

use drill_core::{Difficulty, Pattern, PatternError, PatternMeta, Symbol};
use serde::{Deserialize, Serialize};

use Difficulty::{Easy, Hard, Medium};
use Symbol::*;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// Single directions and buttons.
    Basic,
    /// Motion shapes with an attack finish.
    Motions,
    /// Chains of buttons and motions.
    Combos,
}

#[derive(Clone, Copy, Debug)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub notation: &'static str,
    pub symbols: &'static [Symbol],
    pub tier: Difficulty,
}

impl CatalogEntry {
    const fn new(
        name: &'static str,
        notation: &'static str,
        symbols: &'static [Symbol],
        tier: Difficulty,
    ) -> Self {
        Self {
            name,
            notation,
            symbols,
            tier,
        }
    }

    pub fn to_pattern(&self) -> Result<Pattern, PatternError> {
        Ok(Pattern::new(self.symbols.iter().copied())?.with_meta(PatternMeta {
            name: self.name.to_string(),
            notation: self.notation.to_string(),
            tier: Some(self.tier),
        }))
    }
}

impl Family {
    pub const ALL: [Family; 3] = [Family::Basic, Family::Motions, Family::Combos];

    pub fn entries(self) -> &'static [CatalogEntry] {
        match self {
            Family::Basic => BASIC,
            Family::Motions => MOTIONS,
            Family::Combos => COMBOS,
        }
    }
}

pub const BASIC: &[CatalogEntry] = &[
    CatalogEntry::new("Up", "8", &[Up], Easy),
    CatalogEntry::new("Down", "2", &[Down], Easy),
    CatalogEntry::new("Back", "4", &[Left], Easy),
    CatalogEntry::new("Forward", "6", &[Right], Easy),
    CatalogEntry::new("Light Punch", "LP", &[Lp], Easy),
    CatalogEntry::new("Light Kick", "LK", &[Lk], Easy),
    CatalogEntry::new("Up Forward", "9", &[UpRight], Medium),
    CatalogEntry::new("Down Forward", "3", &[DownRight], Medium),
    CatalogEntry::new("Down Back", "1", &[DownLeft], Medium),
    CatalogEntry::new("Up Back", "7", &[UpLeft], Medium),
    CatalogEntry::new("Heavy Punch", "HP", &[Hp], Medium),
    CatalogEntry::new("Heavy Kick", "HK", &[Hk], Medium),
    CatalogEntry::new("Medium Punch", "MP", &[Mp], Hard),
    CatalogEntry::new("Medium Kick", "MK", &[Mk], Hard),
];

pub const MOTIONS: &[CatalogEntry] = &[
    CatalogEntry::new("Fireball", "236LP", &[Down, DownRight, Right, Lp], Easy),
    CatalogEntry::new("Hurricane Kick", "214LK", &[Down, DownLeft, Left, Lk], Easy),
    CatalogEntry::new("Dragon Punch", "623HP", &[Right, Down, DownRight, Hp], Medium),
    CatalogEntry::new("Reverse Dragon Punch", "421HP", &[Left, Down, DownLeft, Hp], Medium),
    CatalogEntry::new(
        "Half Circle Forward",
        "41236HK",
        &[Left, DownLeft, Down, DownRight, Right, Hk],
        Medium,
    ),
    CatalogEntry::new(
        "Half Circle Back",
        "63214HP",
        &[Right, DownRight, Down, DownLeft, Left, Hp],
        Medium,
    ),
    CatalogEntry::new(
        "Double Fireball",
        "236236HP",
        &[Down, DownRight, Right, Down, DownRight, Right, Hp],
        Hard,
    ),
    CatalogEntry::new(
        "Double Hurricane",
        "214214MK",
        &[Down, DownLeft, Left, Down, DownLeft, Left, Mk],
        Hard,
    ),
    CatalogEntry::new(
        "Full Circle",
        "632147LP",
        &[Right, DownRight, Down, DownLeft, Left, UpLeft, Lp],
        Hard,
    ),
];

pub const COMBOS: &[CatalogEntry] = &[
    CatalogEntry::new("Jab Jab Jab", "LP LP LP", &[Lp, Lp, Lp], Easy),
    CatalogEntry::new("Target Combo", "LP LP HP", &[Lp, Lp, Hp], Easy),
    CatalogEntry::new("Kick String", "LK LK HK", &[Lk, Lk, Hk], Easy),
    CatalogEntry::new(
        "Jab Fireball",
        "LP xx 236LP",
        &[Lp, Down, DownRight, Right, Lp],
        Medium,
    ),
    CatalogEntry::new(
        "Low Confirm",
        "2LK xx 236HP",
        &[Down, Lk, Down, DownRight, Right, Hp],
        Medium,
    ),
    CatalogEntry::new("Medium Chain", "MP MK HP", &[Mp, Mk, Hp], Medium),
    CatalogEntry::new(
        "Jab Uppercut",
        "LP LP xx 623HP",
        &[Lp, Lp, Right, Down, DownRight, Hp],
        Hard,
    ),
    CatalogEntry::new(
        "Full Punish",
        "HP HK xx 236236HP",
        &[Hp, Hk, Down, DownRight, Right, Down, DownRight, Right, Hp],
        Hard,
    ),
    CatalogEntry::new(
        "Cross-up Chain",
        "j.HK 2MK xx 236HP",
        &[UpRight, Hk, Down, Mk, Down, DownRight, Right, Hp],
        Hard,
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn all_entries() -> impl Iterator<Item = &'static CatalogEntry> {
        Family::ALL.into_iter().flat_map(|f| f.entries().iter())
    }

    #[test]
    fn test_every_entry_builds() {
        for entry in all_entries() {
            let pattern = entry.to_pattern().unwrap();
            assert_eq!(pattern.len(), entry.symbols.len());
            assert_eq!(pattern.meta().and_then(|m| m.tier), Some(entry.tier));
        }
    }

    #[test]
    fn test_multi_symbol_entries_finish_with_attack() {
        for entry in all_entries().filter(|e| e.symbols.len() > 1) {
            let pattern = entry.to_pattern().unwrap();
            assert!(pattern.ends_with_attack(), "{} must end with an attack", entry.name);
        }
    }

    #[test]
    fn test_motion_prefixes_are_directional() {
        for entry in MOTIONS {
            let (last, prefix) = entry.symbols.split_last().unwrap();
            assert!(last.is_attack());
            assert!(prefix.iter().all(|s| s.is_direction()), "{}", entry.name);
        }
    }

    #[test]
    fn test_basic_family_is_single_symbol() {
        assert!(BASIC.iter().all(|e| e.symbols.len() == 1));
    }

    #[test]
    fn test_each_family_has_easy_entries() {
        for family in Family::ALL {
            assert!(family.entries().iter().any(|e| e.tier == Easy));
        }
    }
}
