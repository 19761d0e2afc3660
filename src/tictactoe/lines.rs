//! Winning line analysis for the 3x3 board

use super::board::{BOARD_AREA, Cell, Mark};

/// Winning line indices, in evaluation order: rows, then columns, then the
/// two diagonals. Only one mark can legally complete a line, so the order
/// only fixes the scan, not the answer.
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Pure functions over a cell array: winner detection and empty counting
pub struct LineScanner;

impl LineScanner {
    /// Find the winning mark, if any line is completed
    pub fn winner(cells: &[Cell; BOARD_AREA]) -> Option<Mark> {
        for line in &WINNING_LINES {
            let first = cells[line[0]];
            if first != Cell::Empty && line.iter().all(|&idx| cells[idx] == first) {
                return first.mark();
            }
        }
        None
    }

    /// Check if a mark has completed a line
    pub fn has_won(cells: &[Cell; BOARD_AREA], mark: Mark) -> bool {
        Self::winner(cells) == Some(mark)
    }

    /// Count empty cells
    pub fn empty_count(cells: &[Cell; BOARD_AREA]) -> usize {
        cells.iter().filter(|&&c| c == Cell::Empty).count()
    }
}
