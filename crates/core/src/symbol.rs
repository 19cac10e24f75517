//! Logical input symbols: directions and attack buttons.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::PatternError;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    Lp,
    Mp,
    Hp,
    Lk,
    Mk,
    Hk,
}

/// Attack-button configuration reported by the settings provider.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonLayout {
    Four,
    #[default]
    Six,
}

impl Symbol {
    pub const ALL: [Symbol; 14] = [
        Symbol::Up,
        Symbol::Down,
        Symbol::Left,
        Symbol::Right,
        Symbol::UpLeft,
        Symbol::UpRight,
        Symbol::DownLeft,
        Symbol::DownRight,
        Symbol::Lp,
        Symbol::Mp,
        Symbol::Hp,
        Symbol::Lk,
        Symbol::Mk,
        Symbol::Hk,
    ];

    pub const DIRECTIONS: [Symbol; 8] = [
        Symbol::Up,
        Symbol::Down,
        Symbol::Left,
        Symbol::Right,
        Symbol::UpLeft,
        Symbol::UpRight,
        Symbol::DownLeft,
        Symbol::DownRight,
    ];

    pub const ATTACKS: [Symbol; 6] = [
        Symbol::Lp,
        Symbol::Mp,
        Symbol::Hp,
        Symbol::Lk,
        Symbol::Mk,
        Symbol::Hk,
    ];

    pub fn is_direction(self) -> bool {
        !self.is_attack()
    }

    pub fn is_attack(self) -> bool {
        matches!(
            self,
            Symbol::Lp | Symbol::Mp | Symbol::Hp | Symbol::Lk | Symbol::Mk | Symbol::Hk
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::Up => "up",
            Symbol::Down => "down",
            Symbol::Left => "left",
            Symbol::Right => "right",
            Symbol::UpLeft => "up_left",
            Symbol::UpRight => "up_right",
            Symbol::DownLeft => "down_left",
            Symbol::DownRight => "down_right",
            Symbol::Lp => "lp",
            Symbol::Mp => "mp",
            Symbol::Hp => "hp",
            Symbol::Lk => "lk",
            Symbol::Mk => "mk",
            Symbol::Hk => "hk",
        }
    }

    /// Numpad notation for directions (player facing right), button name for attacks.
    pub fn notation(self) -> &'static str {
        match self {
            Symbol::DownLeft => "1",
            Symbol::Down => "2",
            Symbol::DownRight => "3",
            Symbol::Left => "4",
            Symbol::Right => "6",
            Symbol::UpLeft => "7",
            Symbol::Up => "8",
            Symbol::UpRight => "9",
            Symbol::Lp => "LP",
            Symbol::Mp => "MP",
            Symbol::Hp => "HP",
            Symbol::Lk => "LK",
            Symbol::Mk => "MK",
            Symbol::Hk => "HK",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symbol {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        let symbol = match normalized.as_str() {
            "up" => Symbol::Up,
            "down" => Symbol::Down,
            "left" => Symbol::Left,
            "right" => Symbol::Right,
            "upleft" => Symbol::UpLeft,
            "upright" => Symbol::UpRight,
            "downleft" => Symbol::DownLeft,
            "downright" => Symbol::DownRight,
            "lp" => Symbol::Lp,
            "mp" => Symbol::Mp,
            "hp" => Symbol::Hp,
            "lk" => Symbol::Lk,
            "mk" => Symbol::Mk,
            "hk" => Symbol::Hk,
            _ => return Err(PatternError::UnknownSymbol(s.to_string())),
        };
        Ok(symbol)
    }
}

impl ButtonLayout {
    pub fn attacks(self) -> &'static [Symbol] {
        match self {
            ButtonLayout::Four => &[Symbol::Lp, Symbol::Hp, Symbol::Lk, Symbol::Hk],
            ButtonLayout::Six => &Symbol::ATTACKS,
        }
    }

    /// Directions are always available; attacks depend on the button count.
    pub fn allows(self, symbol: Symbol) -> bool {
        symbol.is_direction() || self.attacks().contains(&symbol)
    }
}
