//! Target patterns and their display metadata.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{Difficulty, PatternError, Symbol};

pub type SymbolSeq = SmallVec<[Symbol; 8]>;

#[derive(Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct PatternMeta {
    pub name: String,
    pub notation: String,
    pub tier: Option<Difficulty>,
}

/// An ordered, non-empty sequence of symbols the player must reproduce.
#[derive(Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPattern")]
pub struct Pattern {
    symbols: SymbolSeq,
    meta: Option<PatternMeta>,
}

#[derive(Deserialize)]
struct RawPattern {
    symbols: SymbolSeq,
    #[serde(default)]
    meta: Option<PatternMeta>,
}

impl TryFrom<RawPattern> for Pattern {
    type Error = PatternError;

    fn try_from(raw: RawPattern) -> Result<Self, Self::Error> {
        let pattern = Pattern::new(raw.symbols)?;
        Ok(match raw.meta {
            Some(meta) => pattern.with_meta(meta),
            None => pattern,
        })
    }
}

impl Pattern {
    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Result<Self, PatternError> {
        let symbols: SymbolSeq = symbols.into_iter().collect();
        if symbols.is_empty() {
            return Err(PatternError::Empty);
        }
        Ok(Self {
            symbols,
            meta: None,
        })
    }

    /// Parses a whitespace or comma separated list such as `"down, down_right, right, lp"`.
    pub fn parse(text: &str) -> Result<Self, PatternError> {
        let symbols = text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Symbol>, _>>()?;
        Self::new(symbols)
    }

    pub fn single(symbol: Symbol) -> Self {
        Self {
            symbols: SmallVec::from_slice(&[symbol]),
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: PatternMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn meta(&self) -> Option<&PatternMeta> {
        self.meta.as_ref()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn ends_with_attack(&self) -> bool {
        self.symbols.last().is_some_and(|s| s.is_attack())
    }

    pub fn display_name(&self) -> String {
        match &self.meta {
            Some(meta) => meta.name.clone(),
            None => self.notation(),
        }
    }

    /// Space separated notation, e.g. `2 3 6 LP`.
    pub fn notation(&self) -> String {
        if let Some(meta) = &self.meta {
            return meta.notation.clone();
        }
        self.symbols
            .iter()
            .map(|s| s.notation())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.symbols.iter().map(|s| s.as_str()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
