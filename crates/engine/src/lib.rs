//! drill-engine - pattern selection, sequence matching, timing and scoring.
//!
//! Everything here is clock-agnostic: callers pass host time in milliseconds.

pub mod catalog;
pub mod config;
pub mod error;
pub mod ledger;
pub mod library;
pub mod matcher;
pub mod streak;
pub mod timer;

pub use catalog::{CatalogEntry, Family};
pub use config::{ScoringConfig, TimingConfig, TrainerConfig};
pub use error::ConfigError;
pub use ledger::{success_points, time_bonus, ScoreDelta, ScoreLedger};
pub use library::{CustomConfig, FamilySet, PatternLibrary, SelectRequest};
pub use matcher::{
    evaluate, longest_prefix_suffix, Attempt, AttemptStatus, MatchState, Resolution,
    ResolutionKind, SequenceMatcher,
};
pub use streak::StreakTracker;
pub use timer::{cooldown_after, per_input_duration, AttemptClock, Countdown, ElapsedClock};
