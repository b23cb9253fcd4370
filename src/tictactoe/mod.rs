//! Tic-tac-toe
//!
//! `board` holds the rules, `minimax` the computer opponent and `game`
//! the turn flow with its delayed computer reply.

pub mod board;
pub mod game;
pub mod minimax;

pub use board::{Board, Mark, WINNING_LINES, check_winner, is_draw};
pub use game::{MoveRejected, Opponent, Outcome, TicTacToeGame};
pub use minimax::{best_move, random_cell};
