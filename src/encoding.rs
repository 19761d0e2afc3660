//! Base-3 perspective encoding of board states
//!
//! Each cell contributes one base-3 digit at weight 3^position (row-major):
//! 0 if occupied by the viewing mark, 1 if empty, 2 if occupied by the
//! opponent. The encoding is deliberately perspective-relative: the same
//! physical board yields a different fingerprint for each mark, so each
//! agent learns a self-centered value function while both share this codec.

use crate::tictactoe::{BOARD_AREA, Board, Cell, Mark};

/// Integer state id of a board viewed from one mark's perspective
pub type Fingerprint = u64;

/// Encode a board from `viewpoint`'s perspective.
///
/// Deterministic and total; visits cells in row-major order. Fingerprints
/// computed for different marks on the same board are unrelated by design.
pub fn fingerprint(board: &Board, viewpoint: Mark) -> Fingerprint {
    let own = viewpoint.to_cell();
    let mut hash: u64 = 0;
    let mut weight: u64 = 1;
    for &cell in &board.cells {
        let digit: u64 = if cell == own {
            0
        } else if cell == Cell::Empty {
            1
        } else {
            2
        };
        hash += digit * weight;
        weight *= 3;
    }
    hash
}

/// Reconstruct a board from a fingerprint, placing `viewpoint`'s mark in
/// "self" cells and its opponent's mark in "opponent" cells.
///
/// Lossy by construction: the fingerprint only records self/empty/opponent,
/// so the caller chooses which physical marks to render. Used by diagnostic
/// exports to show tracked states as boards.
pub fn board_from_fingerprint(fp: Fingerprint, viewpoint: Mark) -> Board {
    let mut board = Board::new();
    let mut rest = fp;
    for pos in 0..BOARD_AREA {
        let digit = rest % 3;
        board.cells[pos] = match digit {
            0 => viewpoint.to_cell(),
            1 => Cell::Empty,
            _ => viewpoint.opponent().to_cell(),
        };
        rest /= 3;
    }
    board
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_fingerprint() {
        // every cell contributes digit 1: sum of 3^k for k in 0..9
        let expected: u64 = (0..9).map(|k| 3u64.pow(k)).sum();
        let board = Board::new();
        assert_eq!(fingerprint(&board, Mark::X), expected);
        assert_eq!(fingerprint(&board, Mark::O), expected);
    }

    #[test]
    fn test_perspective_relative() {
        let board = Board::from_string("XO.......").unwrap();
        let from_x = fingerprint(&board, Mark::X);
        let from_o = fingerprint(&board, Mark::O);
        assert_ne!(from_x, from_o);

        // X sees: self, opponent, then 7 empties
        let expected_x: u64 = 2 * 3 + (2..9).map(|k| 3u64.pow(k)).sum::<u64>();
        assert_eq!(from_x, expected_x);
        // O sees: opponent, self, then 7 empties
        let expected_o: u64 = 2 + (2..9).map(|k| 3u64.pow(k)).sum::<u64>();
        assert_eq!(from_o, expected_o);
    }

    #[test]
    fn test_injective_per_perspective() {
        // Distinct boards differing in exactly one cell land on distinct
        // fingerprints for a fixed viewpoint, at every position.
        let base = Board::new();
        let base_fp = fingerprint(&base, Mark::X);
        for pos in 0..BOARD_AREA {
            for mark in [Mark::X, Mark::O] {
                let mut other = base;
                other.cells[pos] = mark.to_cell();
                assert_ne!(fingerprint(&other, Mark::X), base_fp, "pos {pos} mark {mark}");
            }
        }
    }

    #[test]
    fn test_injective_over_all_cell_assignments() {
        // Every one of the 3^9 cell assignments lands on a distinct
        // fingerprint, which covers all reachable positions.
        use std::collections::HashSet;

        let total = 3u64.pow(BOARD_AREA as u32);
        let mut seen = HashSet::new();
        for code in 0..total {
            let mut board = Board::new();
            let mut rest = code;
            for pos in 0..BOARD_AREA {
                board.cells[pos] = match rest % 3 {
                    0 => Cell::Empty,
                    1 => Cell::X,
                    _ => Cell::O,
                };
                rest /= 3;
            }
            assert!(
                seen.insert(fingerprint(&board, Mark::X)),
                "collision at assignment {code}"
            );
        }
        assert_eq!(seen.len() as u64, total);
    }

    #[test]
    fn test_deterministic() {
        let board = Board::from_string("XOX.O.X..").unwrap();
        assert_eq!(fingerprint(&board, Mark::O), fingerprint(&board, Mark::O));
    }

    #[test]
    fn test_decode_roundtrip() {
        let board = Board::from_string("XOX.O.X..").unwrap();
        let fp = fingerprint(&board, Mark::X);
        let decoded = board_from_fingerprint(fp, Mark::X);
        assert_eq!(decoded, board);
    }

    #[test]
    fn test_decode_respects_viewpoint() {
        let board = Board::from_string("XO.......").unwrap();
        let fp = fingerprint(&board, Mark::X);
        // Decoding from O's viewpoint swaps the physical marks.
        let decoded = board_from_fingerprint(fp, Mark::O);
        assert_eq!(decoded, Board::from_string("OX.......").unwrap());
    }
}
