//! Per-word grid cache and solved-path records

use crate::error::PlacementError;
use crate::grid::Grid;
use crate::placer::GridPlacer;
use crate::position::WordPath;
use crate::rng::{RandomSource, SimpleRng};
use std::collections::{BTreeMap, HashMap};

/// Canonical key for a word: trimmed and uppercased
pub fn canonical_word(word: &str) -> String {
    word.trim().to_uppercase()
}

/// Owns one generated grid per word and the path each solved word was traced along
pub struct WordGridStore<R: RandomSource = SimpleRng> {
    placer: GridPlacer<R>,
    grids: HashMap<String, Grid>,
    answer_keys: HashMap<String, WordPath>,
    solved: BTreeMap<String, WordPath>,
}

impl<R: RandomSource> WordGridStore<R> {
    pub fn new(placer: GridPlacer<R>) -> Self {
        Self {
            placer,
            grids: HashMap::new(),
            answer_keys: HashMap::new(),
            solved: BTreeMap::new(),
        }
    }

    pub fn grid_size(&self) -> usize {
        self.placer.grid_size()
    }

    /// Return the cached grid for `word`, generating it on first visit.
    ///
    /// A freshly generated grid has any recorded solved path re-applied.
    /// Cache hits are returned untouched.
    pub fn get_or_create(&mut self, word: &str) -> Result<&Grid, PlacementError> {
        let key = canonical_word(word);

        if !self.grids.contains_key(&key) {
            let placement = self.placer.place(&key)?;
            let mut grid = placement.grid;
            self.restore_solved_visuals(&key, &mut grid);
            self.answer_keys.insert(key.clone(), placement.path);
            self.grids.insert(key.clone(), grid);
        }

        Ok(&self.grids[&key])
    }

    /// Install a pre-built grid for `word`, replacing any cached one.
    /// A recorded solved path is re-applied as for a generated grid.
    ///
    /// Returns `false` and keeps nothing if the grid is not the store's size.
    pub fn insert_grid(&mut self, word: &str, mut grid: Grid) -> bool {
        let key = canonical_word(word);
        if grid.size() != self.grid_size() {
            log::warn!(
                "refusing {}x{} grid for {} in a {}x{} store",
                grid.size(),
                grid.size(),
                key,
                self.grid_size(),
                self.grid_size()
            );
            return false;
        }
        self.restore_solved_visuals(&key, &mut grid);
        self.answer_keys.remove(&key);
        self.grids.insert(key, grid);
        true
    }

    /// The cached grid, without generating one
    pub fn grid(&self, word: &str) -> Option<&Grid> {
        self.grids.get(&canonical_word(word))
    }

    pub fn grid_mut(&mut self, word: &str) -> Option<&mut Grid> {
        self.grids.get_mut(&canonical_word(word))
    }

    /// The path the generator wrote the word along
    pub fn answer_key(&self, word: &str) -> Option<&WordPath> {
        self.answer_keys.get(&canonical_word(word))
    }

    /// Store the traced path for a solved word and mark its cells on the live grid.
    ///
    /// The first record wins: returns `false` and changes nothing if the word
    /// is already solved, the path does not fit the grid or its length is not
    /// the word's.
    pub fn record_solved(&mut self, word: &str, path: WordPath) -> bool {
        let key = canonical_word(word);

        if self.solved.contains_key(&key) {
            log::debug!("{} already solved, keeping the first path", key);
            return false;
        }
        if let Some(defect) = record_defect(&key, &path, self.grid_size()) {
            log::warn!("refusing solved path for {}: {}", key, defect);
            return false;
        }

        if let Some(grid) = self.grids.get_mut(&key) {
            grid.mark_solved(&path);
        }
        log::info!("{} solved along {} cells", key, path.len());
        self.solved.insert(key, path);
        true
    }

    pub fn is_solved(&self, word: &str) -> bool {
        self.solved.contains_key(&canonical_word(word))
    }

    pub fn solved_path(&self, word: &str) -> Option<&WordPath> {
        self.solved.get(&canonical_word(word))
    }

    /// Re-apply a recorded solved path to a freshly built grid.
    ///
    /// A record that no longer fits the grid is discarded and the word is
    /// treated as unsolved. Returns whether any cells were marked.
    pub fn restore_solved_visuals(&mut self, word: &str, grid: &mut Grid) -> bool {
        let key = canonical_word(word);
        let Some(path) = self.solved.get(&key) else {
            return false;
        };

        if let Err(defect) = path.validate(grid.size()) {
            log::warn!("discarding solved record for {}: {}", key, defect);
            self.solved.remove(&key);
            return false;
        }

        grid.mark_solved(path);
        true
    }

    /// Seed solved records loaded from storage. Records that do not fit the
    /// current grid size, or whose length differs from the word, are dropped.
    /// Returns the number of records kept.
    pub fn load_records<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = (String, WordPath)>,
    {
        let size = self.grid_size();
        let mut kept = 0;

        for (word, path) in records {
            let key = canonical_word(&word);
            if let Some(defect) = record_defect(&key, &path, size) {
                log::warn!("discarding solved record for {}: {}", key, defect);
                continue;
            }
            if self.solved.contains_key(&key) {
                continue;
            }

            if let Some(grid) = self.grids.get_mut(&key) {
                grid.mark_solved(&path);
            }
            self.solved.insert(key, path);
            kept += 1;
        }

        kept
    }

    pub fn solved_records(&self) -> &BTreeMap<String, WordPath> {
        &self.solved
    }

    /// Count how many of `words` are solved
    pub fn solved_count<S: AsRef<str>>(&self, words: &[S]) -> usize {
        words.iter().filter(|w| self.is_solved(w.as_ref())).count()
    }

    /// Drop every cached grid (word pool reset). Solved records survive and
    /// are re-applied when grids are generated again.
    pub fn reset_grids(&mut self) {
        log::info!("dropping {} cached grids", self.grids.len());
        self.grids.clear();
        self.answer_keys.clear();
    }

    /// Forget all solved records and clear solved flags on cached grids
    pub fn clear_progress(&mut self) {
        self.solved.clear();
        for grid in self.grids.values_mut() {
            grid.clear_solved();
        }
    }

    pub fn cached_len(&self) -> usize {
        self.grids.len()
    }
}

/// Why a solved record cannot be kept on a `size` grid, if it cannot.
/// Shared by fresh solves and loaded records so both keep the same records.
fn record_defect(key: &str, path: &WordPath, size: usize) -> Option<String> {
    if let Err(defect) = path.validate(size) {
        return Some(defect.to_string());
    }
    let letters = key.chars().count();
    if path.len() != letters {
        return Some(format!("{} cells for {} letters", path.len(), letters));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::position::Position;

    fn store(seed: u64) -> WordGridStore {
        WordGridStore::new(GridPlacer::with_seed(GameConfig::standard(), seed))
    }

    fn row_path(len: usize) -> WordPath {
        WordPath::new((0..len).map(|c| Position::new(0, c)).collect())
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut store = store(1);
        let first = store.get_or_create("cat").unwrap().clone();
        let second = store.get_or_create("CAT").unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(store.cached_len(), 1);

        let key = store.answer_key("CAT").unwrap();
        assert_eq!(first.spell(key.positions()), "CAT");
    }

    #[test]
    fn test_placement_failure_is_not_cached() {
        let config = GameConfig::standard().with_grid_size(2);
        let mut store = WordGridStore::new(GridPlacer::with_seed(config, 0));
        assert!(matches!(
            store.get_or_create("ELEPHANT"),
            Err(PlacementError::WordTooLong { .. })
        ));
        assert!(store.grid("ELEPHANT").is_none());
    }

    #[test]
    fn test_record_solved_marks_live_grid() {
        let mut store = store(2);
        store.get_or_create("CAT").unwrap();
        let path = store.answer_key("CAT").unwrap().clone();

        assert!(store.record_solved("cat", path.clone()));
        assert!(store.is_solved("CAT"));

        let grid = store.grid("CAT").unwrap();
        let mut solved = grid.solved_positions();
        let mut expected = path.into_inner();
        solved.sort();
        expected.sort();
        assert_eq!(solved, expected);
    }

    #[test]
    fn test_first_solve_wins() {
        let mut store = store(3);
        assert!(store.record_solved("CAT", row_path(3)));

        let other = WordPath::new(vec![
            Position::new(1, 0),
            Position::new(1, 1),
            Position::new(1, 2),
        ]);
        assert!(!store.record_solved("CAT", other));
        assert_eq!(store.solved_path("CAT"), Some(&row_path(3)));
    }

    #[test]
    fn test_record_solved_rejects_out_of_bounds() {
        let mut store = store(3);
        let bad = WordPath::new(vec![Position::new(0, 5), Position::new(0, 6)]);
        assert!(!store.record_solved("AT", bad));
        assert!(!store.is_solved("AT"));
    }

    #[test]
    fn test_record_solved_rejects_wrong_length() {
        let mut store = store(3);
        assert!(!store.record_solved("CAT", row_path(2)));
        assert!(!store.is_solved("CAT"));
        assert!(store.record_solved("CAT", row_path(3)));
    }

    #[test]
    fn test_recorded_solves_survive_reload() {
        let mut first = store(3);
        first.record_solved("CAT", row_path(2));
        first.record_solved("OX", row_path(2));

        // Every record the store accepted comes back on the next start
        let mut reloaded = store(4);
        let records = first.solved_records().clone();
        assert_eq!(reloaded.load_records(records), first.solved_records().len());
        assert!(reloaded.is_solved("OX"));
        assert!(!reloaded.is_solved("CAT"));
    }

    #[test]
    fn test_insert_grid_rejects_other_size() {
        let mut store = store(3);
        let grid = Grid::from_rows(&["CATQ", "XZAR", "CATN", "OPML"]).unwrap();
        assert!(!store.insert_grid("CAT", grid));
        assert!(store.grid("CAT").is_none());

        let config = GameConfig::standard().with_grid_size(4);
        let mut four = WordGridStore::new(GridPlacer::with_seed(config, 0));
        let grid = Grid::from_rows(&["CATQ", "XZAR", "CATN", "OPML"]).unwrap();
        assert!(four.insert_grid("cat", grid));
        assert_eq!(four.grid("CAT").unwrap().letter(Position::new(0, 2)), Some('T'));
    }

    #[test]
    fn test_restore_after_reset() {
        let mut store = store(4);
        store.get_or_create("CAT").unwrap();
        let path = store.answer_key("CAT").unwrap().clone();
        store.record_solved("CAT", path.clone());

        store.reset_grids();
        assert_eq!(store.cached_len(), 0);

        let grid = store.get_or_create("CAT").unwrap();
        let mut solved = grid.solved_positions();
        let mut expected = path.into_inner();
        solved.sort();
        expected.sort();
        assert_eq!(solved, expected);
    }

    #[test]
    fn test_restore_discards_out_of_bounds_record() {
        let mut store = store(5);
        store.record_solved("CAT", row_path(3));

        // A smaller grid no longer contains the recorded cells
        let mut small = Grid::from_rows(&["CA", "TX"]).unwrap();
        assert!(!store.restore_solved_visuals("CAT", &mut small));
        assert!(!store.is_solved("CAT"));
        assert!(small.solved_positions().is_empty());
    }

    #[test]
    fn test_load_records_filters_corrupt_entries() {
        let mut store = store(6);
        let records = vec![
            ("cat".to_string(), row_path(3)),
            ("DOG".to_string(), row_path(2)),
            (
                "EMU".to_string(),
                WordPath::new(vec![
                    Position::new(0, 4),
                    Position::new(0, 5),
                    Position::new(0, 6),
                ]),
            ),
            (
                "OX".to_string(),
                WordPath::new(vec![Position::new(0, 0), Position::new(1, 1)]),
            ),
        ];

        assert_eq!(store.load_records(records), 1);
        assert!(store.is_solved("CAT"));
        assert!(!store.is_solved("DOG"));
        assert!(!store.is_solved("EMU"));
        assert!(!store.is_solved("OX"));
    }

    #[test]
    fn test_solved_count_and_clear_progress() {
        let mut store = store(7);
        store.get_or_create("CAT").unwrap();
        store.record_solved("CAT", row_path(3));
        store.record_solved("OX", row_path(2));

        let era = ["CAT", "OX", "EMU"];
        assert_eq!(store.solved_count(&era), 2);

        store.clear_progress();
        assert_eq!(store.solved_count(&era), 0);
        assert!(store.grid("CAT").unwrap().solved_positions().is_empty());
    }
}
