//! Core engine for the WordTrail path-tracing word puzzle.
//!
//! Each target word gets its own square grid with the word laid out along a
//! random orthogonal path and every other cell filled with noise letters.
//! The player traces adjacent cells; a trace that spells the word is recorded
//! and survives restarts through a [`SolvedRecordBackend`].

pub mod config;
pub mod error;
pub mod grid;
pub mod highlight;
pub mod persistence;
pub mod placer;
pub mod position;
pub mod rng;
pub mod selection;
pub mod session;
pub mod store;
pub mod supply;

pub use config::{GameConfig, DEFAULT_ALPHABET, MAX_GRID_SIZE};
pub use error::{ConfigError, Error, PlacementError, Result, StorageError};
pub use grid::{Cell, Grid};
pub use highlight::HighlightTimer;
pub use persistence::{JsonFileBackend, MemoryBackend, SaveData, SolvedRecordBackend, SAVE_VERSION};
pub use placer::{GridPlacer, Placement};
pub use position::{PathDefect, Position, WordPath};
pub use rng::{RandomSource, SimpleRng};
pub use selection::{
    EventLog, NoopObserver, SelectionEngine, SelectionEvent, SelectionObserver, SelectionOutcome,
    SelectionPhase,
};
pub use session::Session;
pub use store::{canonical_word, WordGridStore};
pub use supply::{Era, EraWordList, WordSupply};
