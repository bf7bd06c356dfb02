//! Canonical connect four
//!
//! 7x6 board with gravity drops. The opponent plays the classic
//! heuristic: win if possible, block if threatened, otherwise prefer
//! central columns.

use serde::{Deserialize, Serialize};

use super::tictactoe::RoundOutcome;
use crate::policy::board::{Board, Mark};
use crate::policy::minimax::heuristic_drop;
use crate::sim::world::ConfigError;

pub const COLS: usize = 7;
pub const ROWS: usize = 6;
/// Run length that wins.
pub const CONNECT: usize = 4;

/// A connect-four round against the heuristic opponent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectFour {
    pub board: Board,
    pub human: Mark,
    pub outcome: Option<RoundOutcome>,
}

impl ConnectFour {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self { board: Board::new(COLS, ROWS)?, human: Mark::X, outcome: None })
    }

    /// Clear the board for another round.
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        self.board = Board::new(COLS, ROWS)?;
        self.outcome = None;
        Ok(())
    }

    fn ai_mark(&self) -> Mark {
        self.human.other()
    }

    /// Human drop. Returns the landing row, or `None` when refused
    /// (full column, out of range, or round already over).
    pub fn play(&mut self, col: usize) -> Option<usize> {
        if self.outcome.is_some() {
            return None;
        }
        let row = self.board.drop(col, self.human)?;
        self.settle();
        Some(row)
    }

    /// Heuristic reply. Returns the column played, or `None` when the
    /// round is over or the board is full.
    pub fn ai_respond(&mut self) -> Option<usize> {
        if self.outcome.is_some() {
            return None;
        }
        let col = heuristic_drop(&self.board, self.ai_mark(), CONNECT)?;
        self.board.drop(col, self.ai_mark());
        self.settle();
        Some(col)
    }

    fn settle(&mut self) {
        if let Some(winner) = self.board.winner(CONNECT) {
            self.outcome = Some(RoundOutcome::Win(winner));
        } else if self.board.is_full() {
            self.outcome = Some(RoundOutcome::Draw);
        }
    }
}
