//! Canonical per-game configuration tables
//!
//! Each game wires the generic core together: entity kinds, a collision
//! rule table, boundary policies, a win condition, and its canonical
//! constants. One ruleset per game.

pub mod breakout;
pub mod connect_four;
pub mod defense;
pub mod flappy;
pub mod pong;
pub mod tictactoe;

pub use breakout::Breakout;
pub use connect_four::ConnectFour;
pub use defense::Defense;
pub use flappy::Flappy;
pub use pong::Pong;
pub use tictactoe::{RoundOutcome, TicTacToe};
