//! CLI command implementations

pub mod export;
pub mod play;
pub mod session;
pub mod train;
