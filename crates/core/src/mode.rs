//! Training modes and difficulty tiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Single directions and buttons.
    Motion,
    /// Special-move motions ending in an attack.
    SpecialMotions,
    /// Multi-step combo chains.
    Combos,
    /// Union of the pattern families the player enabled.
    Custom,
    /// One user-authored pattern, repeated.
    CustomCombo,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Harder settings include every entry tagged at or below their own tier.
    pub fn includes(self, tier: Difficulty) -> bool {
        tier <= self
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Motion,
        Mode::SpecialMotions,
        Mode::Combos,
        Mode::Custom,
        Mode::CustomCombo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Motion => "motion",
            Mode::SpecialMotions => "special-motions",
            Mode::Combos => "combos",
            Mode::Custom => "custom",
            Mode::CustomCombo => "custom-combo",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(other.to_string()),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "motion" => Ok(Mode::Motion),
            "motions" | "special-motions" | "special_motions" => Ok(Mode::SpecialMotions),
            "combos" => Ok(Mode::Combos),
            "custom" => Ok(Mode::Custom),
            "custom-combo" | "custom_combo" => Ok(Mode::CustomCombo),
            other => Err(other.to_string()),
        }
    }
}
