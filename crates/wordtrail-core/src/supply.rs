//! Target words grouped by era

use crate::rng::{RandomSource, SimpleRng};
use crate::store::canonical_word;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Hands out target words. Words are opaque uppercase tokens.
pub trait WordSupply {
    /// Next target word of the active era, or `None` when the era is used up
    fn next_word(&mut self) -> Option<String>;

    /// Every word of an era, in authored order
    fn all_words_for_era(&self, era: &str) -> Vec<String>;

    /// Name of the active era
    fn active_era(&self) -> &str;
}

/// A named group of words
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Era {
    pub name: String,
    pub words: Vec<String>,
}

impl Era {
    pub fn new<S: AsRef<str>>(name: &str, words: &[S]) -> Self {
        Self {
            name: name.to_string(),
            words: words.iter().map(|w| canonical_word(w.as_ref())).collect(),
        }
    }
}

/// Eras with a shuffled queue for the active one
pub struct EraWordList<R: RandomSource = SimpleRng> {
    eras: Vec<Era>,
    active: usize,
    queue: VecDeque<String>,
    rng: R,
}

impl EraWordList<SimpleRng> {
    pub fn new(eras: Vec<Era>) -> Self {
        Self::with_rng(eras, SimpleRng::new())
    }

    pub fn with_seed(eras: Vec<Era>, seed: u64) -> Self {
        Self::with_rng(eras, SimpleRng::with_seed(seed))
    }
}

impl<R: RandomSource> EraWordList<R> {
    pub fn with_rng(eras: Vec<Era>, rng: R) -> Self {
        let eras = eras
            .into_iter()
            .map(|era| Era {
                words: era.words.iter().map(|w| canonical_word(w)).collect(),
                name: era.name,
            })
            .collect();

        let mut list = Self {
            eras,
            active: 0,
            queue: VecDeque::new(),
            rng,
        };
        list.refill();
        list
    }

    pub fn eras(&self) -> &[Era] {
        &self.eras
    }

    pub fn era_names(&self) -> Vec<&str> {
        self.eras.iter().map(|e| e.name.as_str()).collect()
    }

    /// Switch to the named era (case-insensitive) and reshuffle its words
    pub fn select_era(&mut self, name: &str) -> bool {
        match self
            .eras
            .iter()
            .position(|e| e.name.eq_ignore_ascii_case(name))
        {
            Some(idx) => {
                self.active = idx;
                self.refill();
                true
            }
            None => false,
        }
    }

    /// Move to the following era, wrapping around
    pub fn next_era(&mut self) {
        if !self.eras.is_empty() {
            self.active = (self.active + 1) % self.eras.len();
            self.refill();
        }
    }

    /// Words left in the active era's queue
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    fn refill(&mut self) {
        let mut words = self
            .eras
            .get(self.active)
            .map(|e| e.words.clone())
            .unwrap_or_default();
        self.rng.shuffle(&mut words);
        self.queue = words.into();
    }
}

impl<R: RandomSource> WordSupply for EraWordList<R> {
    fn next_word(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    fn all_words_for_era(&self, era: &str) -> Vec<String> {
        self.eras
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(era))
            .map(|e| e.words.clone())
            .unwrap_or_default()
    }

    fn active_era(&self) -> &str {
        self.eras
            .get(self.active)
            .map(|e| e.name.as_str())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eras() -> Vec<Era> {
        vec![
            Era::new("Ancient", &["pyramid", "scroll", "chariot"]),
            Era::new("Medieval", &["castle", "knight"]),
        ]
    }

    #[test]
    fn test_words_are_canonical() {
        let list = EraWordList::with_seed(eras(), 1);
        assert_eq!(
            list.all_words_for_era("ancient"),
            vec!["PYRAMID", "SCROLL", "CHARIOT"]
        );
        assert!(list.all_words_for_era("Future").is_empty());
    }

    #[test]
    fn test_next_word_drains_active_era() {
        let mut list = EraWordList::with_seed(eras(), 2);
        assert_eq!(list.active_era(), "Ancient");

        let mut drawn = Vec::new();
        while let Some(word) = list.next_word() {
            drawn.push(word);
        }
        drawn.sort();
        assert_eq!(drawn, vec!["CHARIOT", "PYRAMID", "SCROLL"]);
        assert_eq!(list.remaining(), 0);
    }

    #[test]
    fn test_select_era() {
        let mut list = EraWordList::with_seed(eras(), 3);
        assert!(list.select_era("MEDIEVAL"));
        assert_eq!(list.active_era(), "Medieval");
        assert_eq!(list.remaining(), 2);
        assert!(!list.select_era("Future"));
        assert_eq!(list.active_era(), "Medieval");
    }

    #[test]
    fn test_next_era_wraps() {
        let mut list = EraWordList::with_seed(eras(), 4);
        list.next_era();
        assert_eq!(list.active_era(), "Medieval");
        list.next_era();
        assert_eq!(list.active_era(), "Ancient");
        assert_eq!(list.era_names(), vec!["Ancient", "Medieval"]);
    }

    #[test]
    fn test_empty_supply() {
        let mut list = EraWordList::with_seed(Vec::new(), 5);
        assert_eq!(list.active_era(), "");
        assert_eq!(list.next_word(), None);
        list.next_era();
    }
}
