use kvpouch_level::LevelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PouchError {
    #[error("pouch: invalid adapter: {0}")]
    InvalidAdapter(String),

    #[error("pouch: invalid options: {0}")]
    InvalidOptions(String),

    /// Failure raised by the engine library while constructing a database.
    #[error("pouch: core error: {0}")]
    Core(String),

    #[error(transparent)]
    Level(#[from] LevelError),
}
