//! Export command - dump a saved agent's value table

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    agent::Agent,
    cli::output::{print_kv, print_section},
    encoding::board_from_fingerprint,
    export::export_values,
    policy::Policy,
    tictactoe::Mark,
};

#[derive(Parser, Debug)]
#[command(about = "Export a saved agent's value table as CSV")]
pub struct ExportArgs {
    /// Saved agent JSON file
    #[arg(long, short = 'a')]
    pub agent: PathBuf,

    /// Output CSV path
    #[arg(long, short = 'O', default_value = "values.csv")]
    pub output: PathBuf,

    /// Print the top N states with decoded boards
    #[arg(long)]
    pub top: Option<usize>,
}

pub fn execute(args: ExportArgs) -> Result<()> {
    let agent = Agent::load(&args.agent)
        .with_context(|| format!("loading agent from {}", args.agent.display()))?;

    print_section("Agent");
    print_kv("name", agent.name());
    print_kv("known states", &agent.table().len().to_string());

    let records = export_values(agent.table(), &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("{records} state-values saved to {}", args.output.display());

    if let Some(top) = args.top {
        print_section(&format!("Top {top} states"));
        for (state, value) in agent.table().ranked().into_iter().take(top) {
            let visits = agent.counts().get(&state).copied().unwrap_or(0);
            println!("fingerprint {state}  value {value:.4}  visits {visits}");
            println!("{}", board_from_fingerprint(state, Mark::X).render());
            println!();
        }
    }

    Ok(())
}
