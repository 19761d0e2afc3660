//! CLI infrastructure for the tictactd trainer
//!
//! This module provides the command-line interface for training agents by
//! self-play, playing against a trained agent, running interactive
//! multi-participant sessions, and exporting learned tables.

pub mod commands;
pub mod output;
pub mod prompt;
