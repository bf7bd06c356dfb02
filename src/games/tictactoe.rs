//! Canonical tic-tac-toe
//!
//! Human marks X, the opponent runs exhaustive minimax as O. Illegal
//! moves are refused, not errors; a full board with no winner is a draw.

use serde::{Deserialize, Serialize};

use crate::policy::board::{Board, Mark};
use crate::policy::minimax::best_move_3x3;
use crate::sim::world::ConfigError;

/// How a finished round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Win(Mark),
    Draw,
}

/// A tic-tac-toe round against the minimax opponent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicTacToe {
    pub board: Board,
    pub human: Mark,
    pub outcome: Option<RoundOutcome>,
}

impl TicTacToe {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self { board: Board::new(3, 3)?, human: Mark::X, outcome: None })
    }

    /// Clear the board for another round.
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        self.board = Board::new(3, 3)?;
        self.outcome = None;
        Ok(())
    }

    fn ai_mark(&self) -> Mark {
        self.human.other()
    }

    /// Human move at a flat cell index. Returns false when refused
    /// (occupied cell, out of range, or round already over).
    pub fn play(&mut self, cell: usize) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        if !self.board.place(cell, self.human) {
            return false;
        }
        self.settle();
        true
    }

    /// Minimax reply. Returns the cell played, or `None` when the round
    /// is over or the board is full (pass/draw).
    pub fn ai_respond(&mut self) -> Option<usize> {
        if self.outcome.is_some() {
            return None;
        }
        let cell = best_move_3x3(&self.board, self.ai_mark())?;
        self.board.place(cell, self.ai_mark());
        self.settle();
        Some(cell)
    }

    fn settle(&mut self) {
        if let Some(winner) = self.board.winner(3) {
            self.outcome = Some(RoundOutcome::Win(winner));
        } else if self.board.is_full() {
            self.outcome = Some(RoundOutcome::Draw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_occupied_cells_and_finished_rounds() {
        let mut game = TicTacToe::new().unwrap();
        assert!(game.play(4));
        assert!(!game.play(4), "occupied cell refused");

        game.outcome = Some(RoundOutcome::Draw);
        assert!(!game.play(0), "finished round refused");
    }

    #[test]
    fn ai_completes_its_own_winning_line() {
        let mut game = TicTacToe::new().unwrap();
        // O on 0 and 1, X scattered; O to move takes 2.
        game.board.place(0, Mark::O);
        game.board.place(1, Mark::O);
        game.board.place(3, Mark::X);
        game.board.place(4, Mark::X);
        assert_eq!(game.ai_respond(), Some(2));
        assert_eq!(game.outcome, Some(RoundOutcome::Win(Mark::O)));
    }

    #[test]
    fn full_board_without_winner_is_a_draw() {
        let mut game = TicTacToe::new().unwrap();
        let layout = [
            (0, Mark::X),
            (1, Mark::O),
            (2, Mark::X),
            (3, Mark::X),
            (4, Mark::O),
            (5, Mark::O),
            (6, Mark::O),
            (7, Mark::X),
        ];
        for (cell, mark) in layout {
            game.board.place(cell, mark);
        }
        assert!(game.play(8));
        assert_eq!(game.outcome, Some(RoundOutcome::Draw));
    }

    #[test]
    fn ai_passes_on_a_full_board() {
        let mut game = TicTacToe::new().unwrap();
        // X O X / X O O / O X X - full, no winner.
        let layout = [
            Mark::X, Mark::O, Mark::X,
            Mark::X, Mark::O, Mark::O,
            Mark::O, Mark::X, Mark::X,
        ];
        for (cell, mark) in layout.into_iter().enumerate() {
            game.board.place(cell, mark);
        }
        assert_eq!(game.ai_respond(), None);
    }
}
