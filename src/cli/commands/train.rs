//! Train command - self-play training of two value-learning agents

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    agent::Agent,
    cli::output::{format_rate, print_kv, print_section},
    export::{export_tracked_boards, export_value_history, export_values},
    session::{SessionConfig, run_session},
    value::LearnParams,
};

#[derive(Parser, Debug)]
#[command(about = "Train two agents by self-play", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Number of self-play episodes
    #[arg(long, short = 'e', default_value_t = 10_000)]
    pub episodes: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Exploration probability ε
    #[arg(long, default_value_t = 0.1)]
    pub epsilon: f64,

    /// Learning rate α
    #[arg(long, default_value_t = 0.5)]
    pub alpha: f64,

    /// Discount factor γ
    #[arg(long, default_value_t = 1.0)]
    pub gamma: f64,

    /// Terminal reward for a draw
    #[arg(long, default_value_t = 0.5)]
    pub draw_reward: f64,

    /// Mean of the default value for unseen states
    #[arg(long, default_value_t = 0.5)]
    pub default_mean: f64,

    /// Fluctuation half-width of the default value
    #[arg(long, default_value_t = 0.2)]
    pub default_fluctuation: f64,

    /// Save the trained first agent as JSON
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Export the first agent's value table as CSV
    #[arg(long)]
    pub values_csv: Option<PathBuf>,

    /// Export the first agent's tracked value histories as CSV
    #[arg(long)]
    pub history_csv: Option<PathBuf>,

    /// Write decoded boards for tracked states to a text file
    #[arg(long)]
    pub boards_txt: Option<PathBuf>,

    /// Save a session summary JSON
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Suppress the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let params = LearnParams {
        epsilon: args.epsilon,
        alpha: args.alpha,
        gamma: args.gamma,
        draw_reward: args.draw_reward,
        default_mean: args.default_mean,
        default_fluctuation: args.default_fluctuation,
        ..LearnParams::default()
    };

    let mut left = Agent::new("left", params).context("creating left agent")?;
    let mut right = Agent::new("right", params).context("creating right agent")?;
    if let Some(seed) = args.seed {
        left = left.with_seed(seed);
        right = right.with_seed(seed.wrapping_add(1));
    }

    let config = SessionConfig {
        episodes: args.episodes,
        seed: args.seed,
        progress: !args.no_progress,
    };
    let result = run_session(&mut left, &mut right, &config)?;

    print_section("Training summary");
    print_kv("episodes", &result.episodes.to_string());
    print_kv(
        "left wins",
        &format!("{} ({})", result.wins_a, format_rate(result.win_rate_a())),
    );
    print_kv(
        "right wins",
        &format!("{} ({})", result.wins_b, format_rate(result.win_rate_b())),
    );
    print_kv("draws", &result.draws.to_string());
    print_kv("left table size", &left.table().len().to_string());
    print_kv("right table size", &right.table().len().to_string());

    if let Some(path) = &args.summary {
        result.save(path).context("writing session summary")?;
        println!("summary saved to {}", path.display());
    }
    if let Some(path) = &args.output {
        left.save(path).context("saving trained agent")?;
        println!("agent saved to {}", path.display());
    }
    if let Some(path) = &args.values_csv {
        let records = export_values(left.table(), path).context("exporting value table")?;
        println!("{records} state-values saved to {}", path.display());
    }
    if let Some(path) = &args.history_csv {
        let records =
            export_value_history(left.value_history(), path).context("exporting value history")?;
        println!("{records} history samples saved to {}", path.display());
    }
    if let Some(path) = &args.boards_txt {
        export_tracked_boards(left.value_history(), path).context("exporting tracked boards")?;
        println!("tracked boards saved to {}", path.display());
    }

    Ok(())
}
