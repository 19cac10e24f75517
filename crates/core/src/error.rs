use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern must contain at least one symbol")]
    Empty,
    #[error("unknown input symbol `{0}`")]
    UnknownSymbol(String),
}
