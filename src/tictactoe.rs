//! Tic-Tac-Toe board representation and outcome evaluation

pub mod board;
pub mod lines;

pub use board::{BOARD_AREA, BOARD_SIZE, Board, Cell, Mark, Outcome, Status};
pub use lines::{LineScanner, WINNING_LINES};
