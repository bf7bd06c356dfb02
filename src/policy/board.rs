//! Grid board for turn-based games
//!
//! A flat cols x rows grid of optional marks, shared by tic-tac-toe
//! (3x3, run of 3) and connect four (7x6, gravity drops, run of 4).
//! Row 0 is the top row, matching canvas orientation.

use serde::{Deserialize, Serialize};

use crate::sim::world::ConfigError;

/// A player mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A rectangular board of optional marks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cols: usize,
    rows: usize,
    cells: Vec<Option<Mark>>,
}

impl Board {
    pub fn new(cols: usize, rows: usize) -> Result<Self, ConfigError> {
        if cols == 0 || rows == 0 {
            return Err(ConfigError::InvalidBoard { cols, rows });
        }
        Ok(Self { cols, rows, cells: vec![None; cols * rows] })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn idx(&self, col: usize, row: usize) -> usize {
        row * self.cols + col
    }

    /// Mark at (col, row); `None` when empty or out of range.
    pub fn get(&self, col: usize, row: usize) -> Option<Mark> {
        if col < self.cols && row < self.rows {
            self.cells[self.idx(col, row)]
        } else {
            None
        }
    }

    /// Mark at a flat cell index (row-major).
    pub fn cell(&self, idx: usize) -> Option<Mark> {
        self.cells.get(idx).copied().flatten()
    }

    /// Place a mark at a flat cell index. Returns false for an occupied
    /// or out-of-range cell - an illegal move, not an error.
    pub fn place(&mut self, idx: usize, mark: Mark) -> bool {
        match self.cells.get_mut(idx) {
            Some(cell @ None) => {
                *cell = Some(mark);
                true
            }
            _ => false,
        }
    }

    /// Clear a cell (search backtracking).
    pub fn clear(&mut self, idx: usize) {
        if let Some(cell) = self.cells.get_mut(idx) {
            *cell = None;
        }
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// Empty flat cell indices, ascending.
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells.iter().enumerate().filter(|(_, c)| c.is_none()).map(|(i, _)| i)
    }

    /// Columns that still accept a drop, ascending.
    pub fn open_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.cols).filter(|&col| self.get(col, 0).is_none())
    }

    /// Drop a mark down a column; it lands on the lowest empty row.
    /// Returns the landing row, or `None` for a full column.
    pub fn drop(&mut self, col: usize, mark: Mark) -> Option<usize> {
        if col >= self.cols {
            return None;
        }
        for row in (0..self.rows).rev() {
            let idx = self.idx(col, row);
            if self.cells[idx].is_none() {
                self.cells[idx] = Some(mark);
                return Some(row);
            }
        }
        None
    }

    /// Remove the topmost mark in a column (undo for search).
    pub fn undo_drop(&mut self, col: usize) {
        if col >= self.cols {
            return;
        }
        for row in 0..self.rows {
            let idx = self.idx(col, row);
            if self.cells[idx].is_some() {
                self.cells[idx] = None;
                return;
            }
        }
    }

    /// First mark owning a straight run of `run` cells, scanning cells in
    /// row-major order and directions right/down/down-right/up-right.
    pub fn winner(&self, run: usize) -> Option<Mark> {
        if run == 0 {
            return None;
        }
        const DIRS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];
        for row in 0..self.rows {
            for col in 0..self.cols {
                let Some(mark) = self.get(col, row) else { continue };
                for (dc, dr) in DIRS {
                    let mut count = 1;
                    while count < run {
                        let c = col as isize + dc * count as isize;
                        let r = row as isize + dr * count as isize;
                        if c < 0 || r < 0 {
                            break;
                        }
                        if self.get(c as usize, r as usize) != Some(mark) {
                            break;
                        }
                        count += 1;
                    }
                    if count == run {
                        return Some(mark);
                    }
                }
            }
        }
        None
    }
}
