//! Policy port shared by agent- and human-controlled participants
//!
//! The episode driver only speaks to participants through this trait, so
//! the learning machinery attaches to the agent implementation alone and a
//! human participant short-circuits it entirely via the defaults.

use crate::{
    Result,
    tictactoe::{Board, Mark, Outcome},
};

/// A participant that can act on a board.
///
/// Implemented by the value-learning [`Agent`](crate::agent::Agent) and the
/// terminal-driven [`Human`](crate::human::Human).
pub trait Policy: Send {
    /// Choose an empty position (0-8) to play on the given board.
    ///
    /// The board is mutable so implementations can run reverted lookahead
    /// probes; the board must be returned to the caller unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidMoves`](crate::Error::NoValidMoves) if the
    /// board has no empty cell. The driver never calls this on a terminal
    /// board, so that error signals a driver bug.
    fn select_move(&mut self, board: &mut Board, mark: Mark) -> Result<usize>;

    /// Called by the driver after every applied move (by either side) with
    /// the participant's own mark. Learning participants append their
    /// own-perspective fingerprint to the episode history here.
    fn observe(&mut self, _board: &Board, _mark: Mark) {}

    /// Called exactly once per episode when the board reaches a terminal
    /// outcome. Learning participants run their value update and clear the
    /// episode history here.
    fn finish(&mut self, _outcome: Outcome, _mark: Mark) -> Result<()> {
        Ok(())
    }

    /// The participant's display name
    fn name(&self) -> &str;

    /// Enable downcasting to concrete participant types (e.g. to export an
    /// agent's value table after a session)
    fn as_any(&self) -> &dyn std::any::Any;
}
