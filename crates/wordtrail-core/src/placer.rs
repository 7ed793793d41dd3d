//! Snake placement: lays a word along a self-avoiding orthogonal path and
//! fills the rest of the grid with noise letters.

use crate::config::GameConfig;
use crate::error::PlacementError;
use crate::grid::Grid;
use crate::position::{Position, WordPath};
use crate::rng::{RandomSource, SimpleRng};

/// A generated grid together with the path the word was written along
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub grid: Grid,
    /// Answer key. Any other adjacent path spelling the word is an equally
    /// valid solve.
    pub path: WordPath,
    /// Start cells tried before the path was found
    pub attempts: usize,
}

/// Grid generator for one word at a time
pub struct GridPlacer<R: RandomSource = SimpleRng> {
    config: GameConfig,
    alphabet: Vec<char>,
    rng: R,
}

impl GridPlacer<SimpleRng> {
    /// Create a placer seeded from the operating system
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, SimpleRng::new())
    }

    /// Create a placer with a specific seed for reproducibility
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, SimpleRng::with_seed(seed))
    }
}

impl<R: RandomSource> GridPlacer<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        let alphabet = config.alphabet_chars();
        Self {
            config,
            alphabet,
            rng,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid_size(&self) -> usize {
        self.config.grid_size
    }

    /// Generate a grid containing `word` along a snake path.
    ///
    /// Each start cell (in shuffled order) gets one greedy attempt; a dead end
    /// moves on to the next start instead of backtracking. Gives up after
    /// `max_attempts` starts.
    pub fn place(&mut self, word: &str) -> Result<Placement, PlacementError> {
        let word = self.normalize(word)?;
        let size = self.config.grid_size;
        let capacity = size * size;

        if word.len() > capacity {
            return Err(PlacementError::WordTooLong {
                word: word.iter().collect(),
                len: word.len(),
                size,
                capacity,
            });
        }

        let mut starts: Vec<Position> = Position::all(size).collect();
        self.rng.shuffle(&mut starts);

        let budget = self.config.effective_attempts();
        for (attempt, &start) in starts.iter().take(budget).enumerate() {
            if let Some(path) = self.grow_path(start, word.len()) {
                let grid = self.fill(&word, &path);
                log::debug!(
                    "placed {} on {}x{} grid after {} attempt(s)",
                    grid.spell(path.positions()),
                    size,
                    size,
                    attempt + 1
                );
                return Ok(Placement {
                    grid,
                    path,
                    attempts: attempt + 1,
                });
            }
        }

        let word: String = word.iter().collect();
        log::warn!(
            "could not place {} on {}x{} grid within {} attempts",
            word,
            size,
            size,
            budget
        );
        Err(PlacementError::Exhausted {
            word,
            attempts: budget,
        })
    }

    /// Uppercase the word and check it against the alphabet
    fn normalize(&self, word: &str) -> Result<Vec<char>, PlacementError> {
        let letters: Vec<char> = word.trim().chars().flat_map(char::to_uppercase).collect();
        if letters.is_empty() {
            return Err(PlacementError::EmptyWord);
        }
        if let Some(&letter) = letters.iter().find(|c| !self.alphabet.contains(c)) {
            return Err(PlacementError::InvalidLetter {
                word: letters.iter().collect(),
                letter,
            });
        }
        Ok(letters)
    }

    /// Random self-avoiding walk of `len` cells from `start`, or `None` on a dead end
    fn grow_path(&mut self, start: Position, len: usize) -> Option<WordPath> {
        let size = self.config.grid_size;
        let mut path = vec![start];

        while path.len() < len {
            let tail = path[path.len() - 1];
            let mut neighbors = tail.neighbors(size);
            self.rng.shuffle(&mut neighbors);

            let next = neighbors.into_iter().find(|n| !path.contains(n))?;
            path.push(next);
        }

        Some(WordPath::new(path))
    }

    /// Write the word along the path, then noise everywhere else
    fn fill(&mut self, word: &[char], path: &WordPath) -> Grid {
        let size = self.config.grid_size;
        let mut letters: Vec<Option<char>> = vec![None; size * size];

        for (&pos, &letter) in path.iter().zip(word) {
            letters[pos.row * size + pos.col] = Some(letter);
        }

        let letters: Vec<char> = letters
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| self.noise_letter()))
            .collect();

        Grid::filled(size, &letters)
    }

    fn noise_letter(&mut self) -> char {
        let idx = self.rng.next_usize(self.alphabet.len());
        self.alphabet[idx]
    }
}
