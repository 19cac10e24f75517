//! Drill core crate - value types shared by the matching engine and session layer.

mod error;
mod input;
mod mode;
mod pattern;
mod score;
mod symbol;

pub use error::PatternError;
pub use input::{InputEvent, InputLog, DEFAULT_LOG_WINDOW};
pub use mode::{Difficulty, Mode};
pub use pattern::{Pattern, PatternMeta, SymbolSeq};
pub use score::{accuracy_percent, Score};
pub use symbol::{ButtonLayout, Symbol};
