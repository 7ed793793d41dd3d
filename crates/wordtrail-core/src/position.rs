use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell coordinate on a square grid. Serialized as a `[row, col]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Iterate over every position of a `size` x `size` grid in row-major order
    pub fn all(size: usize) -> impl Iterator<Item = Position> {
        (0..size).flat_map(move |row| (0..size).map(move |col| Position::new(row, col)))
    }

    /// Check if the position lies inside a `size` x `size` grid
    pub fn in_bounds(&self, size: usize) -> bool {
        self.row < size && self.col < size
    }

    pub fn manhattan_distance(&self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Orthogonal adjacency: exactly one step along a row or a column
    pub fn is_adjacent_to(&self, other: Position) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// The up to four orthogonal neighbours that lie inside the grid.
    /// Order is up, down, left, right.
    pub fn neighbors(&self, size: usize) -> Vec<Position> {
        let mut out = Vec::with_capacity(4);
        if self.row > 0 {
            out.push(Position::new(self.row - 1, self.col));
        }
        if self.row + 1 < size {
            out.push(Position::new(self.row + 1, self.col));
        }
        if self.col > 0 {
            out.push(Position::new(self.row, self.col - 1));
        }
        if self.col + 1 < size {
            out.push(Position::new(self.row, self.col + 1));
        }
        out
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl From<Position> for (usize, usize) {
    fn from(pos: Position) -> Self {
        (pos.row, pos.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Why a path fails the word-path invariants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathDefect {
    Empty,
    OutOfBounds(Position),
    Repeated(Position),
    NotAdjacent(Position, Position),
}

impl fmt::Display for PathDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "path is empty"),
            Self::OutOfBounds(p) => write!(f, "position {} is outside the grid", p),
            Self::Repeated(p) => write!(f, "position {} appears twice", p),
            Self::NotAdjacent(a, b) => write!(f, "{} and {} are not adjacent", a, b),
        }
    }
}

/// Ordered cells spelling a word: consecutive cells orthogonally adjacent,
/// no cell repeated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordPath(Vec<Position>);

impl WordPath {
    pub fn new(positions: Vec<Position>) -> Self {
        Self(positions)
    }

    pub fn positions(&self) -> &[Position] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.0.contains(&pos)
    }

    pub fn last(&self) -> Option<Position> {
        self.0.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Position> {
        self.0
    }

    /// Check every invariant against a `size` x `size` grid
    pub fn validate(&self, size: usize) -> Result<(), PathDefect> {
        if self.0.is_empty() {
            return Err(PathDefect::Empty);
        }

        for (i, &pos) in self.0.iter().enumerate() {
            if !pos.in_bounds(size) {
                return Err(PathDefect::OutOfBounds(pos));
            }
            if self.0[..i].contains(&pos) {
                return Err(PathDefect::Repeated(pos));
            }
            if i > 0 && !self.0[i - 1].is_adjacent_to(pos) {
                return Err(PathDefect::NotAdjacent(self.0[i - 1], pos));
            }
        }

        Ok(())
    }

    pub fn is_valid_for(&self, size: usize) -> bool {
        self.validate(size).is_ok()
    }
}

impl From<Vec<Position>> for WordPath {
    fn from(positions: Vec<Position>) -> Self {
        Self(positions)
    }
}

impl<'a> IntoIterator for &'a WordPath {
    type Item = &'a Position;
    type IntoIter = std::slice::Iter<'a, Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
