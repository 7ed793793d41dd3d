//! One running game: the explicit context object handed to entry points

use crate::config::GameConfig;
use crate::error::{PlacementError, Result, StorageError};
use crate::grid::Grid;
use crate::highlight::HighlightTimer;
use crate::persistence::{SaveData, SolvedRecordBackend};
use crate::placer::GridPlacer;
use crate::position::Position;
use crate::rng::{RandomSource, SimpleRng};
use crate::selection::{SelectionEngine, SelectionObserver, SelectionOutcome};
use crate::store::{canonical_word, WordGridStore};
use crate::supply::WordSupply;
use std::time::Instant;

/// Ties the grid store, the selection engine, the word supply, persistence
/// and the hint flash together for one player.
pub struct Session<R: RandomSource = SimpleRng> {
    config: GameConfig,
    store: WordGridStore<R>,
    engine: SelectionEngine,
    supply: Box<dyn WordSupply>,
    backend: Box<dyn SolvedRecordBackend>,
    highlight: HighlightTimer,
    current: Option<String>,
    skipped: Vec<String>,
    storage_error: Option<StorageError>,
}

impl Session<SimpleRng> {
    /// Start a session with an OS-seeded grid generator
    pub fn new(
        config: GameConfig,
        supply: Box<dyn WordSupply>,
        backend: Box<dyn SolvedRecordBackend>,
    ) -> Result<Self> {
        config.validate()?;
        let placer = GridPlacer::new(config.clone());
        Self::with_placer(placer, supply, backend)
    }
}

impl<R: RandomSource> Session<R> {
    /// Start a session, loading solved records from `backend`
    pub fn with_placer(
        placer: GridPlacer<R>,
        supply: Box<dyn WordSupply>,
        backend: Box<dyn SolvedRecordBackend>,
    ) -> Result<Self> {
        let config = placer.config().clone();
        config.validate()?;

        let data = backend.load()?;
        if data.grid_size != 0 && data.grid_size != config.grid_size {
            log::warn!(
                "save was made on a {}x{} grid, now playing {}x{}",
                data.grid_size,
                data.grid_size,
                config.grid_size,
                config.grid_size
            );
        }

        let mut store = WordGridStore::new(placer);
        let total = data.solved.len();
        let kept = store.load_records(data.solved);
        log::info!(
            "loaded {}/{} solved words from {}",
            kept,
            total,
            backend.backend_name()
        );

        Ok(Self {
            highlight: HighlightTimer::new(config.highlight_duration()),
            config,
            store,
            engine: SelectionEngine::new(),
            supply,
            backend,
            current: None,
            skipped: Vec::new(),
            storage_error: None,
        })
    }

    pub fn set_observer(&mut self, observer: Box<dyn SelectionObserver>) {
        self.engine.set_observer(observer);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &WordGridStore<R> {
        &self.store
    }

    pub fn engine(&self) -> &SelectionEngine {
        &self.engine
    }

    pub fn supply(&self) -> &dyn WordSupply {
        self.supply.as_ref()
    }

    pub fn current_word(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Grid of the current word
    pub fn grid(&self) -> Option<&Grid> {
        self.current.as_deref().and_then(|w| self.store.grid(w))
    }

    pub fn is_current_solved(&self) -> bool {
        self.current
            .as_deref()
            .is_some_and(|w| self.store.is_solved(w))
    }

    /// Words the generator could not place
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Show `word`, generating its grid on first visit
    pub fn open_word(&mut self, word: &str) -> std::result::Result<&Grid, PlacementError> {
        let key = canonical_word(word);
        self.highlight.cancel();

        if let Err(e) = self.store.get_or_create(&key).map(|_| ()) {
            log::warn!("skipping {}: {}", key, e);
            if !self.skipped.contains(&key) {
                self.skipped.push(key);
            }
            return Err(e);
        }

        self.engine.attach(&mut self.store, &key);
        self.current = Some(key.clone());
        Ok(self.store.get_or_create(&key)?)
    }

    /// Pull the next word from the supply and open it.
    ///
    /// `None` once the supply is exhausted. A word that cannot be placed is
    /// returned as an error and remembered in [`Session::skipped`]; call again
    /// to move past it.
    pub fn next_puzzle(&mut self) -> Option<std::result::Result<String, PlacementError>> {
        let word = self.supply.next_word()?;
        Some(self.open_word(&word).map(|_| canonical_word(&word)))
    }

    /// Replace the word pool (e.g. after a language switch). Every cached
    /// grid is dropped; solved records are kept.
    pub fn reset_word_pool(&mut self, supply: Box<dyn WordSupply>) {
        self.engine.detach(&mut self.store);
        self.store.reset_grids();
        self.highlight.cancel();
        self.supply = supply;
        self.current = None;
        self.skipped.clear();
    }

    pub fn begin_selection(&mut self, pos: Position) -> SelectionOutcome {
        self.engine.begin_selection(&mut self.store, pos)
    }

    pub fn extend_selection(&mut self, pos: Position) -> SelectionOutcome {
        self.engine.extend_selection(&mut self.store, pos)
    }

    /// Judge the trace; a correct word is saved right away
    pub fn end_selection(&mut self) -> SelectionOutcome {
        let outcome = self.engine.end_selection(&mut self.store);
        self.after_judgement(&outcome);
        outcome
    }

    pub fn cancel_selection(&mut self) -> SelectionOutcome {
        let outcome = self.engine.cancel_selection(&mut self.store);
        self.after_judgement(&outcome);
        outcome
    }

    fn after_judgement(&mut self, outcome: &SelectionOutcome) {
        if let SelectionOutcome::Accepted(_) = outcome {
            self.highlight.cancel();
            if let Err(e) = self.save() {
                log::warn!("could not save progress: {}", e);
                self.storage_error = Some(e);
            }
        }
    }

    /// Write every solved record through the backend
    pub fn save(&mut self) -> std::result::Result<(), StorageError> {
        let data = SaveData::new(self.config.grid_size, self.store.solved_records());
        self.backend.save(&data)
    }

    /// The last save failure, if any, cleared on read
    pub fn take_storage_error(&mut self) -> Option<StorageError> {
        self.storage_error.take()
    }

    /// Flash the first letter of the current word. Returns the flashed cell.
    pub fn hint(&mut self, now: Instant) -> Option<Position> {
        let word = self.current.as_deref()?;
        if self.store.is_solved(word) {
            return None;
        }
        let first = self.store.answer_key(word)?.positions().first().copied()?;
        self.highlight.start(first, now);
        Some(first)
    }

    pub fn highlighted(&self, now: Instant) -> Option<Position> {
        self.highlight.active_at(now)
    }

    /// The flashing cell with how far through its flash it is, in `[0, 1]`
    pub fn highlight_progress(&self, now: Instant) -> Option<(Position, f32)> {
        Some((self.highlighted(now)?, self.highlight.progress(now)?))
    }

    /// Advance timers; call once per frame
    pub fn tick(&mut self, now: Instant) {
        self.highlight.tick(now);
    }

    /// (solved, total) for the active era
    pub fn era_progress(&self) -> (usize, usize) {
        let words = self.supply.all_words_for_era(self.supply.active_era());
        (self.store.solved_count(&words), words.len())
    }

    /// Forget every solved word and save the empty record set
    pub fn clear_progress(&mut self) -> std::result::Result<(), StorageError> {
        self.engine.detach(&mut self.store);
        self.store.clear_progress();
        if let Some(word) = self.current.clone() {
            self.engine.attach(&mut self.store, &word);
        }
        self.save()
    }
}
