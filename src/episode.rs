//! Episode driver: one complete game between two policies
//!
//! The driver owns the canonical board and is the only component that
//! mutates it outside reverted lookahead probes. One call runs the state
//! machine from the fresh empty grid to a terminal outcome: alternate
//! turns, apply each selected move, let every participant observe the new
//! position from its own perspective, and trigger each participant's
//! end-of-episode update exactly once.

use crate::{
    Result,
    policy::Policy,
    tictactoe::{Board, Mark, Outcome, Status},
};

/// Run one episode to completion. `first` moves first and plays X;
/// `second` plays O. The caller decides who goes first (commonly a coin
/// flip per episode to keep first-move bias out of the learned values).
///
/// # Errors
///
/// Propagates participant failures (e.g. a closed input stream for a human
/// participant). A legal-move failure here indicates a driver bug, since
/// policies only return empty positions.
pub fn run_episode(first: &mut dyn Policy, second: &mut dyn Policy) -> Result<Outcome> {
    let mut board = Board::new();
    let mut turn = Mark::X;

    loop {
        let mover: &mut dyn Policy = if turn == Mark::X {
            &mut *first
        } else {
            &mut *second
        };
        let pos = mover.select_move(&mut board, turn)?;
        board.place(pos, turn)?;

        // Each participant records the new position from its own
        // perspective, regardless of who just moved.
        first.observe(&board, Mark::X);
        second.observe(&board, Mark::O);

        if let Status::Over(outcome) = board.status() {
            first.finish(outcome, Mark::X)?;
            second.finish(outcome, Mark::O)?;
            return Ok(outcome);
        }
        turn = turn.opponent();
    }
}
