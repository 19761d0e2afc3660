//! Session runner: repeated episodes between a pair of participants
//!
//! A session plays a configured number of episodes, flipping a fair coin
//! before each one to decide who moves first (first-move advantage would
//! otherwise contaminate the learned values), and accounts wins per
//! participant.

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    episode::run_episode,
    policy::Policy,
    tictactoe::{Mark, Outcome},
};

/// Configuration for a session of episodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Number of episodes to play
    pub episodes: usize,

    /// Random seed for the first-mover coin flips
    pub seed: Option<u64>,

    /// Whether to show a progress bar
    pub progress: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            episodes: 500,
            seed: None,
            progress: true,
        }
    }
}

/// Result of a session, counted per participant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResult {
    /// Total episodes played
    pub episodes: usize,

    /// Wins for the first participant passed to [`run_session`]
    pub wins_a: usize,

    /// Wins for the second participant
    pub wins_b: usize,

    /// Drawn episodes
    pub draws: usize,
}

impl SessionResult {
    /// Win rate of the first participant
    pub fn win_rate_a(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.wins_a as f64 / self.episodes as f64
        }
    }

    /// Win rate of the second participant
    pub fn win_rate_b(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.wins_b as f64 / self.episodes as f64
        }
    }

    /// Save the result as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or serialized.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

fn build_progress_bar(total: usize) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
            .map_err(|e| crate::Error::InvalidConfiguration {
                message: format!("progress bar template: {e}"),
            })?
            .progress_chars("=>-"),
    );
    Ok(pb)
}

/// Play `config.episodes` games between `a` and `b`, randomizing the first
/// mover each episode and counting wins per participant.
///
/// # Errors
///
/// Propagates the first participant failure; completed episodes up to that
/// point are not reported.
pub fn run_session(
    a: &mut dyn Policy,
    b: &mut dyn Policy,
    config: &SessionConfig,
) -> Result<SessionResult> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let pb = if config.progress {
        Some(build_progress_bar(config.episodes)?)
    } else {
        None
    };

    let mut result = SessionResult {
        episodes: 0,
        wins_a: 0,
        wins_b: 0,
        draws: 0,
    };

    for _ in 0..config.episodes {
        let a_first = rng.random_bool(0.5);
        let outcome = if a_first {
            run_episode(a, b)?
        } else {
            run_episode(b, a)?
        };

        match outcome {
            Outcome::Win(Mark::X) => {
                if a_first {
                    result.wins_a += 1;
                } else {
                    result.wins_b += 1;
                }
            }
            Outcome::Win(Mark::O) => {
                if a_first {
                    result.wins_b += 1;
                } else {
                    result.wins_a += 1;
                }
            }
            Outcome::Draw => result.draws += 1,
        }
        result.episodes += 1;

        if let Some(pb) = &pb {
            pb.set_position(result.episodes as u64);
            pb.set_message(format!(
                "{}:{} {}:{} D:{}",
                a.name(),
                result.wins_a,
                b.name(),
                result.wins_b,
                result.draws
            ));
        }
    }

    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }

    Ok(result)
}
