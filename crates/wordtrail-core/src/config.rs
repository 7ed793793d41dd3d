use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Largest supported grid edge
pub const MAX_GRID_SIZE: usize = 26;

pub const DEFAULT_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Configuration for grid generation and play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Edge length N of the N x N grid
    pub grid_size: usize,
    /// Letters used for noise cells and accepted in words
    pub alphabet: String,
    /// Maximum start cells tried before giving up on a word
    pub max_attempts: usize,
    /// How long the first-letter hint flash lasts, in milliseconds
    pub highlight_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl GameConfig {
    /// 5x5 grid for short words
    pub fn compact() -> Self {
        Self {
            grid_size: 5,
            alphabet: DEFAULT_ALPHABET.to_string(),
            max_attempts: 25,
            highlight_ms: 1500,
        }
    }

    pub fn standard() -> Self {
        Self {
            grid_size: 6,
            alphabet: DEFAULT_ALPHABET.to_string(),
            max_attempts: 100,
            highlight_ms: 1500,
        }
    }

    /// 8x8 grid for long words
    pub fn large() -> Self {
        Self {
            grid_size: 8,
            alphabet: DEFAULT_ALPHABET.to_string(),
            max_attempts: 200,
            highlight_ms: 1500,
        }
    }

    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_alphabet(mut self, alphabet: &str) -> Self {
        self.alphabet = alphabet.to_string();
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 || self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridSize(self.grid_size));
        }
        if self.alphabet.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }
        if let Some(c) = self.alphabet.chars().find(|c| !c.is_alphabetic()) {
            return Err(ConfigError::NonAlphabetic(c));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(())
    }

    /// The alphabet uppercased with duplicates removed, in first-seen order
    pub fn alphabet_chars(&self) -> Vec<char> {
        let mut out: Vec<char> = Vec::new();
        for c in self.alphabet.chars().flat_map(char::to_uppercase) {
            if !out.contains(&c) {
                out.push(c);
            }
        }
        out
    }

    /// Start cells actually tried: one attempt per cell at most
    pub fn effective_attempts(&self) -> usize {
        self.max_attempts.min(self.grid_size * self.grid_size)
    }

    pub fn highlight_duration(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }
}
