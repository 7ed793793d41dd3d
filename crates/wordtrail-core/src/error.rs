use thiserror::Error;

/// Grid generation could not produce a grid for a word
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("word is empty")]
    EmptyWord,
    #[error("word {word:?} contains {letter:?}, which is not in the alphabet")]
    InvalidLetter { word: String, letter: char },
    #[error("word {word:?} has {len} letters but a {size}x{size} grid holds only {capacity}")]
    WordTooLong {
        word: String,
        len: usize,
        size: usize,
        capacity: usize,
    },
    #[error("no snake path for {word:?} found after {attempts} attempts")]
    Exhausted { word: String, attempts: usize },
}

/// Rejected configuration values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid size {0} is out of range (1..={max})", max = crate::config::MAX_GRID_SIZE)]
    GridSize(usize),
    #[error("alphabet is empty")]
    EmptyAlphabet,
    #[error("alphabet character {0:?} is not alphabetic")]
    NonAlphabetic(char),
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,
}

/// Persistence failures
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid save data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage backend {0} is unavailable")]
    Unavailable(&'static str),
}

/// Any error surfaced by the core
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, Error>;
