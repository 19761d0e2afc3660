//! Tabular temporal-difference learning for tic-tac-toe.
//!
//! Two participants repeatedly play full games ("episodes"). Learning
//! participants encode each board they see as a base-3 fingerprint from
//! their own perspective, remember the episode's fingerprint history, and
//! on termination walk it backward applying a fixed-rate TD correction
//! toward the terminal reward. Move selection is ε-greedy over a one-step
//! lookahead.
//!
//! The crate splits into:
//!
//! - [`tictactoe`]: board, marks, win detection
//! - [`encoding`]: perspective fingerprints and their lossy decode
//! - [`value`]: learning parameters, the value table, backward propagation
//! - [`policy`], [`agent`], [`human`]: participants
//! - [`episode`], [`session`]: the game driver and repeated-play runner
//! - [`export`]: CSV and text dumps of learned state
//! - [`cli`]: the `tictactd` command-line surface

pub mod agent;
pub mod cli;
pub mod encoding;
pub mod episode;
pub mod error;
pub mod export;
pub mod human;
pub mod policy;
pub mod session;
pub mod tictactoe;
pub mod value;

pub use agent::{Agent, SavedAgent};
pub use encoding::{Fingerprint, board_from_fingerprint, fingerprint};
pub use episode::run_episode;
pub use error::{Error, Result};
pub use human::Human;
pub use policy::Policy;
pub use session::{SessionConfig, SessionResult, run_session};
pub use value::{LearnParams, ValueHistory, ValueTable};
