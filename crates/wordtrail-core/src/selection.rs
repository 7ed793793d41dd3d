//! Interactive letter selection.
//!
//! Pointer or key events become a trace over the grid of the word the engine
//! is attached to. The trace only grows by orthogonally adjacent, unsolved,
//! not yet selected cells; releasing it compares the letters to the word.

use crate::position::{Position, WordPath};
use crate::rng::RandomSource;
use crate::store::{canonical_word, WordGridStore};
use std::cell::RefCell;
use std::rc::Rc;

/// Whether a trace is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPhase {
    #[default]
    Idle,
    Selecting,
}

/// What a selection call did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Nothing changed (misuse, non-adjacent cell, solved cell, ...)
    Ignored,
    /// The trace changed; holds the cells in selection order
    Changed(Vec<Position>),
    /// The trace spelled the word; holds the traced path
    Accepted(WordPath),
    /// The trace was released without spelling the word
    Rejected,
}

/// Signals for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    SelectionChanged(Vec<Position>),
    WordAccepted { word: String, path: WordPath },
    WordRejected { word: String },
}

/// Receives selection signals. Draws lines, plays sounds, updates scores.
pub trait SelectionObserver {
    fn on_selection_changed(&mut self, cells: &[Position]);
    fn on_word_accepted(&mut self, word: &str, path: &WordPath);
    fn on_word_rejected(&mut self, word: &str);
}

/// Observer that ignores everything
#[derive(Debug, Default)]
pub struct NoopObserver;

impl SelectionObserver for NoopObserver {
    fn on_selection_changed(&mut self, _cells: &[Position]) {}
    fn on_word_accepted(&mut self, _word: &str, _path: &WordPath) {}
    fn on_word_rejected(&mut self, _word: &str) {}
}

/// Shared queue of selection events. Clones see the same queue.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<SelectionEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued event
    pub fn drain(&self) -> Vec<SelectionEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    fn push(&self, event: SelectionEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl SelectionObserver for EventLog {
    fn on_selection_changed(&mut self, cells: &[Position]) {
        self.push(SelectionEvent::SelectionChanged(cells.to_vec()));
    }

    fn on_word_accepted(&mut self, word: &str, path: &WordPath) {
        self.push(SelectionEvent::WordAccepted {
            word: word.to_string(),
            path: path.clone(),
        });
    }

    fn on_word_rejected(&mut self, word: &str) {
        self.push(SelectionEvent::WordRejected {
            word: word.to_string(),
        });
    }
}

/// Selection state machine: `Idle -> Selecting -> Idle`
pub struct SelectionEngine {
    target: Option<String>,
    phase: SelectionPhase,
    selected: Vec<Position>,
    observer: Box<dyn SelectionObserver>,
}

impl Default for SelectionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self::with_observer(Box::new(NoopObserver))
    }

    pub fn with_observer(observer: Box<dyn SelectionObserver>) -> Self {
        Self {
            target: None,
            phase: SelectionPhase::Idle,
            selected: Vec::new(),
            observer,
        }
    }

    pub fn set_observer(&mut self, observer: Box<dyn SelectionObserver>) {
        self.observer = observer;
    }

    /// Point the engine at a word. Any trace in progress is dropped without
    /// judging it.
    pub fn attach<R: RandomSource>(&mut self, store: &mut WordGridStore<R>, word: &str) {
        self.reset(store);
        self.target = Some(canonical_word(word));
    }

    pub fn detach<R: RandomSource>(&mut self, store: &mut WordGridStore<R>) {
        self.reset(store);
        self.target = None;
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    pub fn is_selecting(&self) -> bool {
        self.phase == SelectionPhase::Selecting
    }

    /// Cells of the current trace, in selection order
    pub fn selection(&self) -> &[Position] {
        &self.selected
    }

    /// Start a trace at `pos`, discarding any stale one first
    pub fn begin_selection<R: RandomSource>(
        &mut self,
        store: &mut WordGridStore<R>,
        pos: Position,
    ) -> SelectionOutcome {
        if self.is_selecting() {
            log::debug!("begin_selection while selecting, resetting stale trace");
            self.reset(store);
        }

        let Some(word) = self.target.clone() else {
            log::debug!("begin_selection ignored: no word attached");
            return SelectionOutcome::Ignored;
        };
        if store.is_solved(&word) {
            log::debug!("begin_selection ignored: {} is already solved", word);
            return SelectionOutcome::Ignored;
        }
        let Some(grid) = store.grid_mut(&word) else {
            log::debug!("begin_selection ignored: no grid for {}", word);
            return SelectionOutcome::Ignored;
        };
        match grid.get(pos) {
            None => {
                log::debug!("begin_selection ignored: {} is outside the grid", pos);
                return SelectionOutcome::Ignored;
            }
            Some(cell) if cell.is_solved() => {
                log::debug!("begin_selection ignored: {} is already solved", pos);
                return SelectionOutcome::Ignored;
            }
            Some(_) => {}
        }

        grid.cell_mut(pos).set_selected(true);
        self.phase = SelectionPhase::Selecting;
        self.selected.clear();
        self.selected.push(pos);
        self.changed()
    }

    /// Add `pos` to the trace if it is adjacent to the last selected cell.
    /// Anything else is silently ignored, as drags cross non-adjacent cells
    /// all the time.
    pub fn extend_selection<R: RandomSource>(
        &mut self,
        store: &mut WordGridStore<R>,
        pos: Position,
    ) -> SelectionOutcome {
        if !self.is_selecting() {
            log::debug!("extend_selection ignored: not selecting");
            return SelectionOutcome::Ignored;
        }
        if self.selected.contains(&pos) {
            return SelectionOutcome::Ignored;
        }
        let Some(last) = self.selected.last().copied() else {
            return SelectionOutcome::Ignored;
        };
        if !last.is_adjacent_to(pos) {
            return SelectionOutcome::Ignored;
        }

        let Some(word) = self.target.as_deref() else {
            return SelectionOutcome::Ignored;
        };
        if store.is_solved(word) {
            return SelectionOutcome::Ignored;
        }
        let Some(grid) = store.grid_mut(word) else {
            return SelectionOutcome::Ignored;
        };
        match grid.get(pos) {
            Some(cell) if !cell.is_solved() => {}
            _ => return SelectionOutcome::Ignored,
        }

        grid.cell_mut(pos).set_selected(true);
        self.selected.push(pos);
        self.changed()
    }

    /// Release the trace and judge it against the attached word.
    ///
    /// On a match the path is recorded in the store, which marks the cells
    /// solved. A match the store refuses to record is a rejection. Either way
    /// the trace is cleared and the engine returns to idle.
    pub fn end_selection<R: RandomSource>(
        &mut self,
        store: &mut WordGridStore<R>,
    ) -> SelectionOutcome {
        if !self.is_selecting() {
            log::debug!("end_selection ignored: not selecting");
            return SelectionOutcome::Ignored;
        }

        let Some(word) = self.target.clone() else {
            self.reset(store);
            return SelectionOutcome::Ignored;
        };
        let Some(grid) = store.grid_mut(&word) else {
            log::debug!("end_selection: grid for {} is gone, dropping trace", word);
            self.reset(store);
            return SelectionOutcome::Ignored;
        };

        let candidate = grid.spell(&self.selected);
        grid.clear_selection();

        let path = WordPath::new(std::mem::take(&mut self.selected));
        self.phase = SelectionPhase::Idle;
        self.observer.on_selection_changed(&[]);

        if candidate.to_uppercase() == word && store.record_solved(&word, path.clone()) {
            self.observer.on_word_accepted(&word, &path);
            SelectionOutcome::Accepted(path)
        } else {
            log::debug!("traced {} for {}", candidate, word);
            self.observer.on_word_rejected(&word);
            SelectionOutcome::Rejected
        }
    }

    /// Pointer released off the grid. Ends the trace like any other release.
    pub fn cancel_selection<R: RandomSource>(
        &mut self,
        store: &mut WordGridStore<R>,
    ) -> SelectionOutcome {
        self.end_selection(store)
    }

    fn changed(&mut self) -> SelectionOutcome {
        self.observer.on_selection_changed(&self.selected);
        SelectionOutcome::Changed(self.selected.clone())
    }

    /// Clear transient state without judging
    fn reset<R: RandomSource>(&mut self, store: &mut WordGridStore<R>) {
        if let Some(grid) = self.target.as_deref().and_then(|w| store.grid_mut(w)) {
            grid.clear_selection();
        }
        self.phase = SelectionPhase::Idle;
        if !self.selected.is_empty() {
            self.selected.clear();
            self.observer.on_selection_changed(&[]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::grid::Grid;
    use crate::placer::GridPlacer;
    use proptest::prelude::*;

    const P: fn(usize, usize) -> Position = Position::new;

    /// Store seeded with a fixed grid for `word`:
    ///
    /// ```text
    /// C A T Q
    /// X Z A R
    /// C A T N
    /// O P M L
    /// ```
    fn fixture(word: &str) -> (WordGridStore, SelectionEngine, EventLog) {
        let config = GameConfig::standard().with_grid_size(4);
        let mut store = WordGridStore::new(GridPlacer::with_seed(config, 11));
        let grid = Grid::from_rows(&["CATQ", "XZAR", "CATN", "OPML"]).unwrap();
        assert!(store.insert_grid(word, grid));

        let log = EventLog::new();
        let mut engine = SelectionEngine::with_observer(Box::new(log.clone()));
        engine.attach(&mut store, word);
        (store, engine, log)
    }

    fn trace(
        engine: &mut SelectionEngine,
        store: &mut WordGridStore,
        cells: &[Position],
    ) -> SelectionOutcome {
        engine.begin_selection(store, cells[0]);
        for &pos in &cells[1..] {
            engine.extend_selection(store, pos);
        }
        engine.end_selection(store)
    }

    #[test]
    fn test_trace_cat_is_accepted() {
        let (mut store, mut engine, log) = fixture("cat");
        let path = [P(0, 0), P(0, 1), P(0, 2)];

        let outcome = trace(&mut engine, &mut store, &path);
        assert_eq!(outcome, SelectionOutcome::Accepted(WordPath::new(path.to_vec())));
        assert_eq!(engine.phase(), SelectionPhase::Idle);
        assert!(engine.selection().is_empty());
        assert!(store.is_solved("CAT"));

        let grid = store.grid("CAT").unwrap();
        assert_eq!(grid.solved_positions(), path.to_vec());
        assert!(grid.selected_positions().is_empty());

        let events = log.drain();
        assert_eq!(events.len(), 5);
        assert_eq!(events[3], SelectionEvent::SelectionChanged(Vec::new()));
        assert_eq!(
            events[4],
            SelectionEvent::WordAccepted {
                word: "CAT".into(),
                path: WordPath::new(path.to_vec()),
            }
        );
    }

    #[test]
    fn test_alternate_path_is_accepted_and_recorded() {
        // Row 0 and row 2 both spell CAT; either trace solves the word
        let (mut store, mut engine, _log) = fixture("CAT");
        let path = [P(2, 0), P(2, 1), P(2, 2)];
        let outcome = trace(&mut engine, &mut store, &path);
        assert_eq!(outcome, SelectionOutcome::Accepted(WordPath::new(path.to_vec())));
        assert_eq!(store.solved_path("CAT"), Some(&WordPath::new(path.to_vec())));
        assert!(!store.grid("CAT").unwrap().cell(P(0, 0)).is_solved());
    }

    #[test]
    fn test_lowercase_target_matches() {
        let (mut store, mut engine, _log) = fixture("cat");
        assert_eq!(engine.target(), Some("CAT"));
        let outcome = trace(&mut engine, &mut store, &[P(0, 0), P(0, 1), P(0, 2)]);
        assert!(matches!(outcome, SelectionOutcome::Accepted(_)));
    }

    #[test]
    fn test_diagonal_extension_ignored() {
        let (mut store, mut engine, _log) = fixture("CAT");
        engine.begin_selection(&mut store, P(0, 0));
        engine.extend_selection(&mut store, P(0, 1));

        // (1, 2) is diagonal to (0, 1)
        assert_eq!(
            engine.extend_selection(&mut store, P(1, 2)),
            SelectionOutcome::Ignored
        );
        assert_eq!(engine.selection(), &[P(0, 0), P(0, 1)]);
        assert_eq!(engine.phase(), SelectionPhase::Selecting);
    }

    #[test]
    fn test_reselecting_and_jumping_ignored() {
        let (mut store, mut engine, _log) = fixture("CAT");
        engine.begin_selection(&mut store, P(0, 0));
        engine.extend_selection(&mut store, P(0, 1));

        assert_eq!(engine.extend_selection(&mut store, P(0, 0)), SelectionOutcome::Ignored);
        assert_eq!(engine.extend_selection(&mut store, P(0, 3)), SelectionOutcome::Ignored);
        assert_eq!(engine.extend_selection(&mut store, P(9, 9)), SelectionOutcome::Ignored);
        assert_eq!(engine.selection().len(), 2);
    }

    #[test]
    fn test_wrong_word_rejected() {
        let (mut store, mut engine, log) = fixture("CAT");
        let outcome = trace(&mut engine, &mut store, &[P(0, 0), P(1, 0), P(2, 0)]);

        assert_eq!(outcome, SelectionOutcome::Rejected);
        assert_eq!(engine.phase(), SelectionPhase::Idle);
        assert!(!store.is_solved("CAT"));

        let grid = store.grid("CAT").unwrap();
        assert!(grid.solved_positions().is_empty());
        assert!(grid.selected_positions().is_empty());
        assert_eq!(
            log.drain().last(),
            Some(&SelectionEvent::WordRejected { word: "CAT".into() })
        );
    }

    #[test]
    fn test_begin_on_solved_cell_rejected() {
        let (mut store, mut engine, _log) = fixture("CAT");
        store
            .grid_mut("CAT")
            .unwrap()
            .mark_solved(&WordPath::new(vec![P(0, 0)]));

        assert_eq!(engine.begin_selection(&mut store, P(0, 0)), SelectionOutcome::Ignored);
        assert_eq!(engine.phase(), SelectionPhase::Idle);
        assert!(engine.selection().is_empty());
    }

    #[test]
    fn test_extend_into_solved_cell_rejected() {
        let (mut store, mut engine, _log) = fixture("CAT");
        store
            .grid_mut("CAT")
            .unwrap()
            .mark_solved(&WordPath::new(vec![P(2, 1)]));

        engine.begin_selection(&mut store, P(1, 1));
        assert_eq!(engine.extend_selection(&mut store, P(2, 1)), SelectionOutcome::Ignored);
        assert_eq!(engine.selection(), &[P(1, 1)]);
    }

    #[test]
    fn test_solved_word_blocks_new_trace() {
        let (mut store, mut engine, _log) = fixture("CAT");
        trace(&mut engine, &mut store, &[P(0, 0), P(0, 1), P(0, 2)]);

        assert_eq!(engine.begin_selection(&mut store, P(3, 3)), SelectionOutcome::Ignored);
        assert_eq!(engine.phase(), SelectionPhase::Idle);
    }

    #[test]
    fn test_idle_misuse_is_noop() {
        let (mut store, mut engine, log) = fixture("CAT");
        assert_eq!(engine.extend_selection(&mut store, P(0, 0)), SelectionOutcome::Ignored);
        assert_eq!(engine.end_selection(&mut store), SelectionOutcome::Ignored);
        assert!(log.is_empty());
    }

    #[test]
    fn test_begin_resets_stale_trace() {
        let (mut store, mut engine, _log) = fixture("CAT");
        engine.begin_selection(&mut store, P(0, 0));
        engine.extend_selection(&mut store, P(0, 1));

        engine.begin_selection(&mut store, P(3, 3));
        assert_eq!(engine.selection(), &[P(3, 3)]);
        assert_eq!(store.grid("CAT").unwrap().selected_positions(), vec![P(3, 3)]);
    }

    #[test]
    fn test_clearing_a_trace_notifies_empty_selection() {
        let (mut store, mut engine, log) = fixture("CAT");
        engine.begin_selection(&mut store, P(0, 0));
        engine.extend_selection(&mut store, P(0, 1));
        log.drain();

        // Stale trace replaced by a new one
        engine.begin_selection(&mut store, P(3, 3));
        assert_eq!(
            log.drain(),
            vec![
                SelectionEvent::SelectionChanged(Vec::new()),
                SelectionEvent::SelectionChanged(vec![P(3, 3)]),
            ]
        );

        // Re-attaching drops the trace
        engine.attach(&mut store, "CAT");
        assert_eq!(log.drain(), vec![SelectionEvent::SelectionChanged(Vec::new())]);
        assert!(store.grid("CAT").unwrap().selected_positions().is_empty());

        // Nothing to clear, nothing sent
        engine.attach(&mut store, "CAT");
        assert!(log.is_empty());
    }

    #[test]
    fn test_match_on_foreign_sized_grid_is_not_accepted() {
        let config = GameConfig::standard().with_grid_size(3);
        let mut store = WordGridStore::new(GridPlacer::with_seed(config, 2));
        let grid = Grid::from_rows(&["QQQQ", "QQQQ", "QQQQ", "QCAT"]).unwrap();
        assert!(!store.insert_grid("CAT", grid));

        let log = EventLog::new();
        let mut engine = SelectionEngine::with_observer(Box::new(log.clone()));
        engine.attach(&mut store, "CAT");
        let outcome = trace(&mut engine, &mut store, &[P(3, 1), P(3, 2), P(3, 3)]);

        assert_eq!(outcome, SelectionOutcome::Ignored);
        assert!(!store.is_solved("CAT"));
        assert!(!log
            .drain()
            .iter()
            .any(|e| matches!(e, SelectionEvent::WordAccepted { .. })));
    }

    #[test]
    fn test_match_the_store_refuses_is_rejected() {
        let (mut store, mut engine, log) = fixture("CAT");
        // Another path already holds the record, so this one cannot be stored
        assert!(store.record_solved("CAT", WordPath::new(vec![P(2, 0), P(2, 1), P(2, 2)])));
        engine.phase = SelectionPhase::Selecting;
        engine.selected = vec![P(0, 0), P(0, 1), P(0, 2)];

        assert_eq!(engine.end_selection(&mut store), SelectionOutcome::Rejected);
        assert_eq!(
            store.solved_path("CAT"),
            Some(&WordPath::new(vec![P(2, 0), P(2, 1), P(2, 2)]))
        );
        assert!(!store.grid("CAT").unwrap().cell(P(0, 0)).is_solved());
        assert_eq!(
            log.drain().last(),
            Some(&SelectionEvent::WordRejected { word: "CAT".into() })
        );
    }

    #[test]
    fn test_cancel_goes_through_end() {
        let (mut store, mut engine, _log) = fixture("CAT");
        engine.begin_selection(&mut store, P(0, 0));
        assert_eq!(engine.cancel_selection(&mut store), SelectionOutcome::Rejected);
        assert_eq!(engine.phase(), SelectionPhase::Idle);
        assert!(store.grid("CAT").unwrap().selected_positions().is_empty());
    }

    #[test]
    fn test_no_target_is_ignored() {
        let config = GameConfig::standard();
        let mut store = WordGridStore::new(GridPlacer::with_seed(config, 0));
        let mut engine = SelectionEngine::new();
        assert_eq!(engine.begin_selection(&mut store, P(0, 0)), SelectionOutcome::Ignored);
    }

    #[test]
    fn test_generated_grid_round_trip() {
        let mut store = WordGridStore::new(GridPlacer::with_seed(GameConfig::standard(), 8));
        let mut engine = SelectionEngine::new();
        store.get_or_create("ELEPHANT").unwrap();
        engine.attach(&mut store, "ELEPHANT");

        let key = store.answer_key("ELEPHANT").unwrap().clone();
        let outcome = trace(&mut engine, &mut store, key.positions());
        assert_eq!(outcome, SelectionOutcome::Accepted(key.clone()));

        store.reset_grids();
        let grid = store.get_or_create("ELEPHANT").unwrap();
        let mut solved = grid.solved_positions();
        let mut expected = key.into_inner();
        solved.sort();
        expected.sort();
        assert_eq!(solved, expected);
    }

    proptest! {
        #[test]
        fn accepted_extensions_are_adjacent_and_fresh(
            moves in prop::collection::vec((0usize..4, 0usize..4), 1..40)
        ) {
            let (mut store, mut engine, _log) = fixture("QUIZ");
            let (r, c) = moves[0];
            engine.begin_selection(&mut store, P(r, c));

            for &(r, c) in &moves[1..] {
                let before = engine.selection().to_vec();
                if let SelectionOutcome::Changed(after) = engine.extend_selection(&mut store, P(r, c)) {
                    let last = *before.last().unwrap();
                    prop_assert!(last.is_adjacent_to(P(r, c)));
                    prop_assert!(!before.contains(&P(r, c)));
                    prop_assert_eq!(after.len(), before.len() + 1);
                } else {
                    prop_assert_eq!(engine.selection(), before.as_slice());
                }
            }

            prop_assert!(WordPath::new(engine.selection().to_vec()).is_valid_for(4));
        }
    }
}
