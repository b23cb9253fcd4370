//! Tic-tac-toe board and rules
//!
//! ```text
//! 0 | 1 | 2
//! ---------
//! 3 | 4 | 5
//! ---------
//! 6 | 7 | 8
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A player's mark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opposite(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

/// The eight winning triples, scanned in this order
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2], // top row
    [3, 4, 5], // middle row
    [6, 7, 8], // bottom row
    [0, 3, 6], // left column
    [1, 4, 7], // center column
    [2, 5, 8], // right column
    [0, 4, 8], // main diagonal
    [2, 4, 6], // anti-diagonal
];

/// Nine cells, row-major
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [Option<Mark>; 9],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Option<Mark>; 9]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Option<Mark>; 9] {
        &self.cells
    }

    /// Mark at `index`; out-of-range reads as empty
    pub fn get(&self, index: usize) -> Option<Mark> {
        self.cells.get(index).copied().flatten()
    }

    pub fn is_empty_at(&self, index: usize) -> bool {
        index < self.cells.len() && self.cells[index].is_none()
    }

    /// Copy of the board with `mark` placed at `index`
    pub fn with(&self, index: usize, mark: Mark) -> Self {
        let mut next = *self;
        next.cells[index] = Some(mark);
        next
    }

    pub(crate) fn place(&mut self, index: usize, mark: Mark) {
        self.cells[index] = Some(mark);
    }

    /// Empty cell indices in increasing order
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(i, _)| i)
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|c| **c == Some(mark)).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// Mark owning the first completed line, if any
    pub fn winner(&self) -> Option<Mark> {
        for line in WINNING_LINES {
            if let Some(mark) = self.cells[line[0]] {
                if self.cells[line[1]] == Some(mark) && self.cells[line[2]] == Some(mark) {
                    return Some(mark);
                }
            }
        }
        None
    }

    /// Full board without a line
    pub fn is_draw(&self) -> bool {
        self.winner().is_none() && self.is_full()
    }

    pub fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            if row > 0 {
                writeln!(f, "-----------")?;
            }
            for col in 0..3 {
                if col > 0 {
                    write!(f, "|")?;
                }
                match self.cells[row * 3 + col] {
                    Some(mark) => write!(f, " {} ", mark)?,
                    None => write!(f, "   ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Winner of `board`, scanning lines in fixed order
pub fn check_winner(board: &Board) -> Option<Mark> {
    board.winner()
}

/// True iff there is no winner and every cell is taken
pub fn is_draw(board: &Board) -> bool {
    board.is_draw()
}

#[cfg(test)]
pub(crate) fn parse(rows: &str) -> Board {
    let mut cells = [None; 9];
    for (i, c) in rows.chars().filter(|c| !c.is_whitespace()).enumerate() {
        cells[i] = match c {
            'X' => Some(Mark::X),
            'O' => Some(Mark::O),
            _ => None,
        };
    }
    Board::from_cells(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_row_wins() {
        assert_eq!(check_winner(&parse("XXX ...  ...")), Some(Mark::X));
    }

    #[test]
    fn test_every_line_detected() {
        for line in WINNING_LINES {
            let mut board = Board::new();
            for i in line {
                board.place(i, Mark::O);
            }
            assert_eq!(check_winner(&board), Some(Mark::O), "line {:?}", line);
        }
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let board = parse("XOX XOO OXX");
        assert_eq!(check_winner(&board), None);
        assert!(is_draw(&board));
    }

    #[test]
    fn test_full_board_with_line_is_not_draw() {
        let board = parse("XXX OOX OXO");
        assert_eq!(check_winner(&board), Some(Mark::X));
        assert!(!is_draw(&board));
    }

    #[test]
    fn test_empty_board() {
        let board = Board::new();
        assert_eq!(check_winner(&board), None);
        assert!(!is_draw(&board));
        assert_eq!(board.empty_cells().count(), 9);
    }

    #[test]
    fn test_empty_cells_in_order() {
        let board = parse("X.O .X. ..O");
        assert_eq!(board.empty_cells().collect::<Vec<_>>(), vec![1, 3, 5, 6, 7]);
        assert_eq!(board.count(Mark::X), 2);
        assert_eq!(board.count(Mark::O), 2);
    }

    #[test]
    fn test_out_of_range_reads_empty() {
        let board = Board::new();
        assert_eq!(board.get(9), None);
        assert!(!board.is_empty_at(9));
    }

    #[test]
    fn test_display() {
        let board = parse("X.. .O. ...");
        let text = board.to_string();
        assert!(text.starts_with(" X |   |   \n"));
    }
}
