//! Human-controlled participant reading moves from the terminal
//!
//! Input handling is recoverable by construction: malformed or illegal
//! coordinates are rejected and re-prompted without touching the board or
//! advancing the episode. The human carries no value table and no episode
//! history; the learning machinery never attaches to it.

use std::io::{self, BufRead, Write};

use crate::{
    Result,
    error::Error,
    policy::Policy,
    tictactoe::{BOARD_SIZE, Board, Mark},
};

/// A human participant prompted on stdin
pub struct Human {
    name: String,
}

impl Human {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Keep prompting `input` until it yields a legal move for `board`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the stream fails or closes before a legal
    /// move arrives.
    fn read_move(&self, input: &mut impl BufRead, board: &Board, mark: Mark) -> Result<usize> {
        loop {
            print!("{} ({mark}), enter move (row col): ", self.name);
            io::stdout()
                .flush()
                .map_err(|e| Error::io("flush stdout", e))?;

            let mut line = String::new();
            let read = input
                .read_line(&mut line)
                .map_err(|e| Error::io("read move input", e))?;
            if read == 0 {
                return Err(Error::io(
                    "read move input",
                    io::Error::new(io::ErrorKind::UnexpectedEof, "input stream closed"),
                ));
            }

            match parse_move(&line) {
                Some(pos) if board.is_empty(pos) => return Ok(pos),
                _ => println!("invalid move"),
            }
        }
    }
}

/// Parse a "row col" move entry into a board position.
///
/// Accepts two whitespace-separated zero-based indices. Returns `None` for
/// anything malformed or out of range; the caller re-prompts.
pub fn parse_move(input: &str) -> Option<usize> {
    let mut fields = input.split_whitespace();
    let row: usize = fields.next()?.parse().ok()?;
    let col: usize = fields.next()?.parse().ok()?;
    if fields.next().is_some() || row >= BOARD_SIZE || col >= BOARD_SIZE {
        return None;
    }
    Some(row * BOARD_SIZE + col)
}

impl Policy for Human {
    fn select_move(&mut self, board: &mut Board, mark: Mark) -> Result<usize> {
        if board.empty_count() == 0 {
            return Err(Error::NoValidMoves);
        }

        println!("{}", board.render());
        self.read_move(&mut io::stdin().lock(), board, mark)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
