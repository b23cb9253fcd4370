//! Full-depth minimax with a fallible opponent
//!
//! Scores are fixed: computer win +10, human win -10, draw 0, with no depth
//! shaping. Strength is tuned by fallibility instead: at *every* node the
//! search draws a uniform value and, if it exceeds `difficulty / 100`,
//! plays a random legal move there (scored as a neutral 0) rather than
//! recursing. Weak opponents therefore search shallow, noisy trees all the
//! way down, which reads as more human than a single top-level coin flip.
//! At difficulty 100 the search is exact and the computer never loses.

use rand::Rng;

use super::board::{Board, Mark};
use crate::sim::difficulty::Difficulty;

/// Terminal score for a win, from the computer's side
pub const WIN_SCORE: i32 = 10;

/// Score of a subtree and the move that reaches it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scored {
    score: i32,
    index: Option<usize>,
}

impl Scored {
    fn leaf(score: i32) -> Self {
        Self { score, index: None }
    }
}

/// Pick the computer's move
///
/// Returns `None` only when the game is already decided or the board is
/// full. Ties go to the lowest cell index.
pub fn best_move<R: Rng + ?Sized>(
    board: &Board,
    to_move: Mark,
    difficulty: Difficulty,
    human: Mark,
    computer: Mark,
    rng: &mut R,
) -> Option<usize> {
    if board.is_terminal() {
        return None;
    }

    let search = Search {
        accuracy: difficulty.fraction(),
        human,
        computer,
    };
    search
        .minimax(board, to_move, rng)
        .index
        .or_else(|| random_cell(board, rng))
}

/// Uniformly random empty cell
pub fn random_cell<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<usize> {
    let spots: Vec<usize> = board.empty_cells().collect();
    if spots.is_empty() {
        None
    } else {
        Some(spots[rng.random_range(0..spots.len())])
    }
}

struct Search {
    /// Probability of searching a node properly
    accuracy: f64,
    human: Mark,
    computer: Mark,
}

impl Search {
    fn minimax<R: Rng + ?Sized>(&self, board: &Board, to_move: Mark, rng: &mut R) -> Scored {
        match board.winner() {
            Some(mark) if mark == self.human => return Scored::leaf(-WIN_SCORE),
            Some(_) => return Scored::leaf(WIN_SCORE),
            None => {}
        }

        let spots: Vec<usize> = board.empty_cells().collect();
        if spots.is_empty() {
            return Scored::leaf(0);
        }

        // Fallibility cutoff
        if rng.random::<f64>() > self.accuracy {
            return Scored {
                score: 0,
                index: Some(spots[rng.random_range(0..spots.len())]),
            };
        }

        let maximizing = to_move == self.computer;
        let mut best: Option<Scored> = None;

        for spot in spots {
            let child = board.with(spot, to_move);
            let score = self.minimax(&child, to_move.opposite(), rng).score;

            let improves = match best {
                None => true,
                Some(b) if maximizing => score > b.score,
                Some(b) => score < b.score,
            };
            if improves {
                best = Some(Scored {
                    score,
                    index: Some(spot),
                });
            }
        }

        best.unwrap_or(Scored::leaf(0))
    }
}
