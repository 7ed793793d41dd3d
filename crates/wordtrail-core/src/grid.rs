use crate::position::{Position, WordPath};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single lettered cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    letter: char,
    position: Position,
    #[serde(skip)]
    selected: bool,
    solved: bool,
}

impl Cell {
    pub fn new(letter: char, position: Position) -> Self {
        Self {
            letter,
            position,
            selected: false,
            solved: false,
        }
    }

    pub fn letter(&self) -> char {
        self.letter
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Part of the selection currently being traced
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Part of a correctly found word
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub(crate) fn set_solved(&mut self, solved: bool) {
        self.solved = solved;
    }
}

/// Square letter grid. Letters are fixed once built; only the selected and
/// solved flags change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid from `size * size` letters in row-major order.
    /// Returns `None` if the count does not match.
    pub fn from_letters(size: usize, letters: &[char]) -> Option<Self> {
        if size == 0 || letters.len() != size * size {
            return None;
        }
        Some(Self::filled(size, letters))
    }

    /// Caller guarantees `letters.len() == size * size`
    pub(crate) fn filled(size: usize, letters: &[char]) -> Self {
        let cells = Position::all(size)
            .zip(letters)
            .map(|(pos, &letter)| Cell::new(letter, pos))
            .collect();

        Self { size, cells }
    }

    /// Parse rows like `["CAT", "XYZ", "QRS"]`, uppercasing every letter
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        let size = rows.len();
        let mut letters = Vec::with_capacity(size * size);
        for row in rows {
            let chars: Vec<char> = row.chars().flat_map(char::to_uppercase).collect();
            if chars.len() != size {
                return None;
            }
            letters.extend(chars);
        }
        Self::from_letters(size, &letters)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, pos: Position) -> usize {
        pos.row * self.size + pos.col
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.in_bounds(self.size)
    }

    /// Panics if `pos` is outside the grid
    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[self.index(pos)]
    }

    pub fn get(&self, pos: Position) -> Option<&Cell> {
        if self.contains(pos) {
            Some(self.cell(pos))
        } else {
            None
        }
    }

    pub(crate) fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        let idx = self.index(pos);
        &mut self.cells[idx]
    }

    pub fn letter(&self, pos: Position) -> Option<char> {
        self.get(pos).map(Cell::letter)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Rows of cells, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size)
    }

    /// Letters along a path, in path order. Out-of-bounds positions are skipped.
    pub fn spell(&self, path: &[Position]) -> String {
        path.iter().filter_map(|&p| self.letter(p)).collect()
    }

    pub fn solved_positions(&self) -> Vec<Position> {
        self.cells
            .iter()
            .filter(|c| c.solved)
            .map(Cell::position)
            .collect()
    }

    pub fn selected_positions(&self) -> Vec<Position> {
        self.cells
            .iter()
            .filter(|c| c.selected)
            .map(Cell::position)
            .collect()
    }

    /// Mark every in-bounds cell of the path as solved
    pub(crate) fn mark_solved(&mut self, path: &WordPath) {
        for &pos in path {
            if self.contains(pos) {
                self.cell_mut(pos).set_solved(true);
            }
        }
    }

    pub(crate) fn clear_solved(&mut self) {
        for cell in &mut self.cells {
            cell.solved = false;
        }
    }

    pub(crate) fn clear_selection(&mut self) {
        for cell in &mut self.cells {
            cell.selected = false;
        }
    }

    /// Letters only, without any solved or selected state
    pub fn to_string_compact(&self) -> String {
        self.cells.iter().map(Cell::letter).collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: Vec<String> = row.iter().map(|c| c.letter.to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
