use anyhow::Result;
use clap::{Parser, Subcommand};

use tictactd::cli::commands::{export, play, session, train};

#[derive(Parser)]
#[command(name = "tictactd", version, about = "Tabular TD learning for tic-tac-toe")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Train(train::TrainArgs),
    Play(play::PlayArgs),
    Session(session::SessionArgs),
    Export(export::ExportArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Train(args) => train::execute(args),
        Commands::Play(args) => play::execute(args),
        Commands::Session(args) => session::execute(args),
        Commands::Export(args) => export::execute(args),
    }
}
