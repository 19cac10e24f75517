use drill_core::{Difficulty, Mode, PatternError, Symbol};
use thiserror::Error;

/// Configuration rejected before any attempt is created.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown training mode `{0}`")]
    UnknownMode(String),
    #[error("select at least one pattern family")]
    NoFamilyEnabled,
    #[error("select a custom combo first")]
    MissingCustomCombo,
    #[error("no {mode} patterns available at {difficulty} with the current button layout")]
    EmptyPool { mode: Mode, difficulty: Difficulty },
    #[error("`{0}` is not on the active button layout")]
    DisabledSymbol(Symbol),
    #[error("invalid timing: {0}")]
    InvalidTiming(String),
    #[error("target attempt count must be at least 1")]
    InvalidAttemptCount,
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
