use kvpouch_asyncmap::MapError;
use thiserror::Error;

/// Message the host storage interface matches to recognise a missing key.
pub const NOT_FOUND: &str = "NotFound";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    /// The key is absent. Displays as exactly `NotFound`.
    #[error("NotFound")]
    NotFound,

    /// A byte key or value is not valid UTF-8.
    #[error("level: invalid encoding: {0}")]
    Encoding(String),

    /// Failure from the underlying map, unchanged.
    #[error(transparent)]
    Map(#[from] MapError),
}

impl LevelError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LevelError::NotFound)
    }
}

pub type LevelResult<T> = Result<T, LevelError>;
