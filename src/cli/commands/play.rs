//! Play command - human games against a learning agent

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    agent::Agent,
    cli::output::{print_kv, print_section},
    episode::run_episode,
    human::Human,
    policy::Policy,
    session::{SessionConfig, run_session},
    tictactoe::{Mark, Outcome},
    value::LearnParams,
};

#[derive(Parser, Debug)]
#[command(about = "Play against a trained agent")]
pub struct PlayArgs {
    /// Load a previously trained agent from JSON
    #[arg(long, short = 'a')]
    pub agent: Option<PathBuf>,

    /// Self-play warm-up episodes when no agent file is given
    #[arg(long, default_value_t = 10_000)]
    pub warmup: usize,

    /// Your display name
    #[arg(long, default_value = "human")]
    pub name: String,

    /// Number of games to play
    #[arg(long, short = 'g', default_value_t = 1)]
    pub games: usize,

    /// Random seed for warm-up and first-mover coin flips
    #[arg(long)]
    pub seed: Option<u64>,

    /// Save the agent back to this path after play
    #[arg(long)]
    pub save: Option<PathBuf>,
}

fn load_or_train(args: &PlayArgs) -> Result<Agent> {
    if let Some(path) = &args.agent {
        let agent = Agent::load(path)
            .with_context(|| format!("loading agent from {}", path.display()))?;
        println!(
            "loaded agent '{}' with {} known states",
            agent.name(),
            agent.table().len()
        );
        return Ok(agent);
    }

    println!("no agent file given, training a fresh one ({} episodes)", args.warmup);
    let mut agent = Agent::new("robot", LearnParams::default())?;
    let mut sparring = Agent::new("sparring", LearnParams::default())?;
    if let Some(seed) = args.seed {
        agent = agent.with_seed(seed);
        sparring = sparring.with_seed(seed.wrapping_add(1));
    }
    let config = SessionConfig {
        episodes: args.warmup,
        seed: args.seed,
        progress: true,
    };
    run_session(&mut agent, &mut sparring, &config)?;
    Ok(agent)
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let mut agent = load_or_train(&args)?;
    let mut human = Human::new(args.name.clone());

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let mut human_wins = 0usize;
    let mut agent_wins = 0usize;
    let mut draws = 0usize;

    for game in 1..=args.games {
        let human_first = rng.random_bool(0.5);
        println!(
            "\ngame {game}: {} move first",
            if human_first { "you" } else { "they" }
        );

        let outcome = if human_first {
            run_episode(&mut human, &mut agent)?
        } else {
            run_episode(&mut agent, &mut human)?
        };

        match outcome {
            Outcome::Draw => {
                draws += 1;
                println!("draw");
            }
            Outcome::Win(mark) => {
                let human_mark = if human_first { Mark::X } else { Mark::O };
                if mark == human_mark {
                    human_wins += 1;
                    println!("you win");
                } else {
                    agent_wins += 1;
                    println!("{} wins", agent.name());
                }
            }
        }
    }

    print_section("Results");
    print_kv(&args.name, &human_wins.to_string());
    print_kv(agent.name(), &agent_wins.to_string());
    print_kv("draws", &draws.to_string());

    if let Some(path) = &args.save {
        agent.save(path).context("saving agent")?;
        println!("agent saved to {}", path.display());
    }

    Ok(())
}
