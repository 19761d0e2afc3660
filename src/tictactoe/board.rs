//! Board state representation and mutation primitives
//!
//! The board is the only piece of shared mutable state in an episode. The
//! episode driver owns it and applies moves with [`Board::place`]; policies
//! get hypothetical access through [`Board::probe`], which restores the cell
//! on every exit path so lookahead can never leak a mutation.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lines::LineScanner;
use crate::error::{Error, Result};

/// Side length of the board
pub const BOARD_SIZE: usize = 3;

/// Number of cells on the board
pub const BOARD_AREA: usize = BOARD_SIZE * BOARD_SIZE;

/// A cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }

    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::X => Some(Mark::X),
            Cell::O => Some(Mark::O),
            Cell::Empty => None,
        }
    }
}

/// A player's mark. X always belongs to the first mover of an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Get the opposing mark
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Convert mark to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Mark::X => Cell::X,
            Mark::O => Cell::O,
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

/// Terminal classification of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win(Mark),
    Draw,
}

impl Outcome {
    /// Whether this outcome is a win for the given mark
    pub fn is_win_for(self, mark: Mark) -> bool {
        matches!(self, Outcome::Win(winner) if winner == mark)
    }
}

/// Game status as seen by the evaluator: still running, or finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    InProgress,
    Over(Outcome),
}

impl Status {
    /// The terminal outcome, if the game is over
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            Status::InProgress => None,
            Status::Over(outcome) => Some(outcome),
        }
    }
}

/// The 3x3 game board, stored row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    pub cells: [Cell; BOARD_AREA],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [Cell::Empty; BOARD_AREA],
        }
    }

    /// Create a board from a 9-character string ('.', 'X', 'O'),
    /// whitespace filtered out. Intended for tests and diagnostics.
    pub fn from_string(s: &str) -> Result<Self> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() != BOARD_AREA {
            return Err(Error::InvalidConfiguration {
                message: format!("board string must have {BOARD_AREA} cells, got {}", chars.len()),
            });
        }
        let mut cells = [Cell::Empty; BOARD_AREA];
        for (i, &c) in chars.iter().enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| Error::InvalidConfiguration {
                message: format!("invalid cell character '{c}' at position {i}"),
            })?;
        }
        Ok(Board { cells })
    }

    /// Get cell at position (0-8)
    pub fn get(&self, pos: usize) -> Cell {
        self.cells[pos]
    }

    /// Check if a position is empty
    pub fn is_empty(&self, pos: usize) -> bool {
        self.cells[pos] == Cell::Empty
    }

    /// Get all empty positions in scan order
    pub fn empty_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Count empty cells
    pub fn empty_count(&self) -> usize {
        LineScanner::empty_count(&self.cells)
    }

    /// Place a mark at a position, mutating the board in place.
    ///
    /// This is the canonical mutation path; only the episode driver should
    /// call it on a live board.
    ///
    /// # Errors
    ///
    /// Returns an error if the position is out of bounds or occupied.
    pub fn place(&mut self, pos: usize, mark: Mark) -> Result<()> {
        if pos >= BOARD_AREA {
            return Err(Error::OutOfBounds { position: pos });
        }
        if self.cells[pos] != Cell::Empty {
            return Err(Error::Occupied { position: pos });
        }
        self.cells[pos] = mark.to_cell();
        Ok(())
    }

    /// Run a closure against the board with `mark` hypothetically placed at
    /// `pos`. The cell is restored on every exit path, including a panic
    /// inside the closure, so lookahead never leaves a side effect.
    ///
    /// # Errors
    ///
    /// Returns an error if the position is out of bounds or occupied.
    pub fn probe<T>(&mut self, pos: usize, mark: Mark, f: impl FnOnce(&Board) -> T) -> Result<T> {
        if pos >= BOARD_AREA {
            return Err(Error::OutOfBounds { position: pos });
        }
        if self.cells[pos] != Cell::Empty {
            return Err(Error::Occupied { position: pos });
        }

        struct Revert<'a> {
            board: &'a mut Board,
            pos: usize,
        }

        impl Drop for Revert<'_> {
            fn drop(&mut self) {
                self.board.cells[self.pos] = Cell::Empty;
            }
        }

        let guard = Revert { board: self, pos };
        guard.board.cells[pos] = mark.to_cell();
        Ok(f(guard.board))
    }

    /// Get the winner if there is one
    pub fn winner(&self) -> Option<Mark> {
        LineScanner::winner(&self.cells)
    }

    /// Check if the game is over (win or full board)
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.empty_count() == 0
    }

    /// Classify the board: in progress, won, or drawn
    pub fn status(&self) -> Status {
        if let Some(winner) = self.winner() {
            Status::Over(Outcome::Win(winner))
        } else if self.empty_count() == 0 {
            Status::Over(Outcome::Draw)
        } else {
            Status::InProgress
        }
    }

    /// Produce a boxed human-readable rendering of the board
    pub fn render(&self) -> String {
        let rule = "-".repeat(BOARD_SIZE * 4 + 1);
        let mut out = String::new();
        for row in 0..BOARD_SIZE {
            out.push_str(&rule);
            out.push('\n');
            out.push('|');
            for col in 0..BOARD_SIZE {
                let cell = self.cells[row * BOARD_SIZE + col];
                match cell {
                    Cell::Empty => out.push_str("   |"),
                    _ => {
                        out.push(' ');
                        out.push(cell.to_char());
                        out.push_str(" |");
                    }
                }
            }
            out.push('\n');
        }
        out.push_str(&rule);
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.cells.iter().enumerate() {
            write!(f, "{}", cell.to_char())?;
            if (i + 1).is_multiple_of(BOARD_SIZE) && i < BOARD_AREA - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
