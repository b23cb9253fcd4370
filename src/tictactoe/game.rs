//! A tic-tac-toe match
//!
//! X always opens. Against the computer, each human move arms a short
//! timer; the computer answers only when that timer fires, and tearing
//! the match down cancels it so no move ever lands on a stale board.

use rand_pcg::Pcg32;
use thiserror::Error;

use super::board::{Board, Mark};
use super::minimax::best_move;
use crate::consts::COMPUTER_MOVE_DELAY_MS;
use crate::schedule::{Ticket, Timer};
use crate::sim::difficulty::Difficulty;
use crate::sim::state::RngState;

/// Why a move was refused. The board is never touched on rejection.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejected {
    #[error("cell {0} is off the board")]
    OutOfRange(usize),
    #[error("cell {0} is already taken")]
    Occupied(usize),
    #[error("the game is already decided")]
    GameOver,
    #[error("it is not your turn")]
    NotYourTurn,
}

/// Who sits across the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opponent {
    /// Second local player (hot seat)
    Human,
    /// Minimax opponent playing `mark`
    Computer { mark: Mark, difficulty: Difficulty },
}

/// State of play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Won(Mark),
    Draw,
}

/// One match on one board, reset in place between rounds
pub struct TicTacToeGame {
    board: Board,
    to_move: Mark,
    opponent: Opponent,
    timer: Timer,
    rng: Pcg32,
}

impl TicTacToeGame {
    /// Fresh match. If the computer plays X its first move is scheduled
    /// right away.
    pub fn new(opponent: Opponent, seed: u64, now_ms: f64) -> Self {
        let mut game = Self {
            board: Board::new(),
            to_move: Mark::X,
            opponent,
            timer: Timer::new(),
            rng: RngState::new(seed).to_rng(),
        };
        game.schedule_computer(now_ms);
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    pub fn opponent(&self) -> Opponent {
        self.opponent
    }

    pub fn outcome(&self) -> Outcome {
        if let Some(mark) = self.board.winner() {
            Outcome::Won(mark)
        } else if self.board.is_full() {
            Outcome::Draw
        } else {
            Outcome::InProgress
        }
    }

    fn computer_mark(&self) -> Option<Mark> {
        match self.opponent {
            Opponent::Computer { mark, .. } => Some(mark),
            Opponent::Human => None,
        }
    }

    /// Whether the side to move is the computer
    pub fn computer_to_move(&self) -> bool {
        self.computer_mark() == Some(self.to_move)
    }

    /// Human move at `index`
    pub fn play(&mut self, index: usize, now_ms: f64) -> Result<Outcome, MoveRejected> {
        if self.computer_to_move() && self.outcome() == Outcome::InProgress {
            log::debug!("Rejected move at {}: computer's turn", index);
            return Err(MoveRejected::NotYourTurn);
        }
        let outcome = self.apply_move(index)?;
        self.schedule_computer(now_ms);
        Ok(outcome)
    }

    /// Place the side-to-move's mark, validating the cell and game state
    fn apply_move(&mut self, index: usize) -> Result<Outcome, MoveRejected> {
        let rejection = if index >= 9 {
            Some(MoveRejected::OutOfRange(index))
        } else if self.outcome() != Outcome::InProgress {
            Some(MoveRejected::GameOver)
        } else if !self.board.is_empty_at(index) {
            Some(MoveRejected::Occupied(index))
        } else {
            None
        };
        if let Some(rejection) = rejection {
            log::debug!("Rejected move at {}: {}", index, rejection);
            return Err(rejection);
        }

        self.board.place(index, self.to_move);
        self.to_move = self.to_move.opposite();

        let outcome = self.outcome();
        if outcome != Outcome::InProgress {
            log::info!("Tic-tac-toe finished: {:?}", outcome);
        }
        Ok(outcome)
    }

    /// Arm the computer's timer if it is now its turn
    fn schedule_computer(&mut self, now_ms: f64) {
        if self.computer_to_move() && self.outcome() == Outcome::InProgress {
            self.timer.set(now_ms, COMPUTER_MOVE_DELAY_MS);
        }
    }

    /// Ticket and due time of the pending computer move, for hosts that
    /// schedule a callback
    pub fn pending_computer_move(&self) -> Option<(Ticket, f64)> {
        self.timer.pending()
    }

    /// Host timeout for `ticket` fired. Returns the cell the computer took.
    pub fn computer_turn(&mut self, ticket: Ticket, now_ms: f64) -> Option<usize> {
        if !self.timer.fire(ticket, now_ms) {
            return None;
        }
        self.make_computer_move()
    }

    /// Polling variant of `computer_turn`
    pub fn poll(&mut self, now_ms: f64) -> Option<usize> {
        if !self.timer.poll(now_ms) {
            return None;
        }
        self.make_computer_move()
    }

    fn make_computer_move(&mut self) -> Option<usize> {
        let Opponent::Computer { mark, difficulty } = self.opponent else {
            return None;
        };
        if self.to_move != mark {
            return None;
        }

        let index = best_move(
            &self.board,
            mark,
            difficulty,
            mark.opposite(),
            mark,
            &mut self.rng,
        )?;
        self.apply_move(index).ok()?;
        Some(index)
    }

    /// Clear the board and start over with X to move
    pub fn reset(&mut self, now_ms: f64) {
        self.timer.cancel();
        self.board = Board::new();
        self.to_move = Mark::X;
        self.schedule_computer(now_ms);
    }

    /// Cancel any pending computer move
    pub fn teardown(&mut self) {
        self.timer.cancel();
    }

    pub fn status_message(&self) -> String {
        match self.outcome() {
            Outcome::Won(mark) => format!("Winner: Player {}!", mark),
            Outcome::Draw => "It's a Draw!".to_string(),
            Outcome::InProgress => format!("Next Player: {}", self.to_move),
        }
    }
}
