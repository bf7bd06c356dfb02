//! Board-game opponent policies
//!
//! Exhaustive minimax for the 3x3 board (tic-tac-toe is small enough to
//! search completely) and the classic win/block/center heuristic for
//! larger drop boards (connect four). Both are deterministic: ties break
//! to the lowest cell or column index.

use super::board::{Board, Mark};

/// Run length that wins on a 3x3 board.
const TTT_RUN: usize = 3;

/// Best cell for `ai` on a 3x3 board via exhaustive minimax.
///
/// Scores wins as `10 - depth` and losses as `depth - 10`, so the search
/// prefers fast wins and slow losses. Returns `None` only when no legal
/// move exists (full board - a pass/draw signal, not an error).
pub fn best_move_3x3(board: &Board, ai: Mark) -> Option<usize> {
    let mut board = board.clone();
    let mut best_score = i32::MIN;
    let mut best_move = None;

    let cells: Vec<usize> = board.empty_cells().collect();
    for idx in cells {
        board.place(idx, ai);
        let score = minimax(&mut board, ai, 0, false);
        board.clear(idx);
        // Strict comparison keeps the lowest index on ties.
        if score > best_score {
            best_score = score;
            best_move = Some(idx);
        }
    }
    best_move
}

fn minimax(board: &mut Board, ai: Mark, depth: i32, maximizing: bool) -> i32 {
    if let Some(winner) = board.winner(TTT_RUN) {
        return if winner == ai { 10 - depth } else { depth - 10 };
    }
    if board.is_full() {
        return 0;
    }

    let mover = if maximizing { ai } else { ai.other() };
    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    let cells: Vec<usize> = board.empty_cells().collect();
    for idx in cells {
        board.place(idx, mover);
        let score = minimax(board, ai, depth + 1, !maximizing);
        board.clear(idx);
        best = if maximizing { best.max(score) } else { best.min(score) };
    }
    best
}

/// Best column for `ai` on a drop board, by depth-limited heuristic:
/// win if possible, else block an imminent opponent win, else prefer
/// central columns. Ties break to the lowest column index.
///
/// Returns `None` only when every column is full.
pub fn heuristic_drop(board: &Board, ai: Mark, run: usize) -> Option<usize> {
    let mut board = board.clone();
    let open: Vec<usize> = board.open_columns().collect();

    // Win if possible.
    for &col in &open {
        board.drop(col, ai);
        let won = board.winner(run) == Some(ai);
        board.undo_drop(col);
        if won {
            return Some(col);
        }
    }

    // Block an opponent win.
    let opponent = ai.other();
    for &col in &open {
        board.drop(col, opponent);
        let threatened = board.winner(run) == Some(opponent);
        board.undo_drop(col);
        if threatened {
            return Some(col);
        }
    }

    // Center preference: closest to the middle, lowest index on ties.
    let center = (board.cols() - 1) as f32 / 2.0;
    open.into_iter().min_by(|&a, &b| {
        let da = (a as f32 - center).abs();
        let db = (b as f32 - center).abs();
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal).then(a.cmp(&b))
    })
}
