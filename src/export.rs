//! CSV export of learned value tables and diagnostics
//!
//! Export is inspection-only: nothing here is ever read back by the core.
//! Records are written headerless, one `(fingerprint, value)` pair per row,
//! ordered by descending value so the most preferred states come first.

use std::{fs, path::Path};

use crate::{
    Result,
    encoding::board_from_fingerprint,
    tictactoe::Mark,
    value::{ValueHistory, ValueTable},
};

/// Write a value table as headerless CSV rows of `fingerprint,value`.
///
/// Returns the number of records written.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written; the in-memory
/// table is unaffected either way.
pub fn export_values<P: AsRef<Path>>(table: &ValueTable, path: P) -> Result<usize> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    let mut written = 0;
    for (state, value) in table.ranked() {
        writer.write_record(&[state.to_string(), format!("{value}")])?;
        written += 1;
    }
    writer.flush().map_err(|e| crate::Error::io("flush CSV export", e))?;
    Ok(written)
}

/// Write tracked value trajectories as headerless CSV rows of
/// `fingerprint,episode,value`.
///
/// Returns the number of records written.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn export_value_history<P: AsRef<Path>>(history: &ValueHistory, path: P) -> Result<usize> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    let mut written = 0;
    for (state, samples) in history.iter() {
        for (episode, value) in samples.iter().enumerate() {
            writer.write_record(&[
                state.to_string(),
                episode.to_string(),
                format!("{value}"),
            ])?;
            written += 1;
        }
    }
    writer.flush().map_err(|e| crate::Error::io("flush CSV export", e))?;
    Ok(written)
}

/// Write a text file showing each tracked fingerprint decoded back into a
/// board, rendered from the X perspective ("self" cells show X).
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn export_tracked_boards<P: AsRef<Path>>(history: &ValueHistory, path: P) -> Result<()> {
    let mut out = String::new();
    for (state, _) in history.iter() {
        let board = board_from_fingerprint(state, Mark::X);
        out.push_str(&state.to_string());
        out.push('\n');
        out.push_str(&board.render());
        out.push_str("\n\n");
    }
    fs::write(&path, out)
        .map_err(|e| crate::Error::io(format!("write {}", path.as_ref().display()), e))?;
    Ok(())
}
