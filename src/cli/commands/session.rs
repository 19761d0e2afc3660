//! Session command - interactive roster of humans and robots

use std::{
    io::{self, BufRead},
    path::PathBuf,
};

use anyhow::{Context, Result, bail};
use clap::Parser;

use crate::{
    agent::Agent,
    cli::{
        output::{format_rate, print_kv, print_section},
        prompt::{
            prompt_bool, prompt_bool_from, prompt_f64_or_from, prompt_parse, prompt_string_from,
        },
    },
    export::export_values,
    human::Human,
    policy::Policy,
    session::{SessionConfig, run_session},
    value::LearnParams,
};

#[derive(Parser, Debug)]
#[command(about = "Run an interactive session with a roster of participants")]
pub struct SessionArgs {
    /// Random seed for first-mover coin flips
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory for per-robot value table exports written on exit
    #[arg(long)]
    pub export_dir: Option<PathBuf>,
}

/// Prompt for a parameter on the [0, 1] scale, re-prompting until the
/// entered value is in range
fn prompt_unit_from(input: &mut impl BufRead, label: &str, default: f64) -> Result<f64> {
    loop {
        let value = prompt_f64_or_from(input, &format!("{label} [{default}]: "), default)?;
        if (0.0..=1.0).contains(&value) {
            return Ok(value);
        }
        println!("{label} must be in [0, 1]");
    }
}

fn prompt_fluctuation_from(input: &mut impl BufRead, default: f64) -> Result<f64> {
    loop {
        let value = prompt_f64_or_from(
            input,
            &format!("default value fluctuation [{default}]: "),
            default,
        )?;
        if value.is_finite() && value >= 0.0 {
            return Ok(value);
        }
        println!("default value fluctuation must be non-negative");
    }
}

fn prompt_participant_from(input: &mut impl BufRead, index: usize) -> Result<Box<dyn Policy>> {
    let name = prompt_string_from(input, &format!("participant {index} name: "))?;
    if !prompt_bool_from(input, &format!("is {name} a robot? (y/n): "))? {
        return Ok(Box::new(Human::new(name)));
    }

    let defaults = LearnParams::default();
    loop {
        let params = LearnParams {
            epsilon: prompt_unit_from(input, "epsilon", defaults.epsilon)?,
            alpha: prompt_unit_from(input, "alpha", defaults.alpha)?,
            gamma: prompt_unit_from(input, "gamma", defaults.gamma)?,
            draw_reward: prompt_unit_from(input, "draw reward", defaults.draw_reward)?,
            default_mean: prompt_unit_from(input, "default value mean", defaults.default_mean)?,
            default_fluctuation: prompt_fluctuation_from(input, defaults.default_fluctuation)?,
            ..defaults
        };
        // any residual validation failure re-prompts the whole block
        match Agent::new(name.clone(), params) {
            Ok(agent) => return Ok(Box::new(agent)),
            Err(e) => println!("{e}"),
        }
    }
}

fn prompt_participant(index: usize) -> Result<Box<dyn Policy>> {
    prompt_participant_from(&mut io::stdin().lock(), index)
}

/// Seed for one pairing: repeated pairings under a fixed base seed get
/// distinct coin-flip sequences
fn pairing_seed(seed: Option<u64>, round: u64) -> Option<u64> {
    seed.map(|s| s.wrapping_add(round))
}

/// Borrow two distinct roster entries mutably.
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> Option<(&mut T, &mut T)> {
    if i == j || i >= items.len() || j >= items.len() {
        return None;
    }
    if i < j {
        let (head, tail) = items.split_at_mut(j);
        Some((&mut head[i], &mut tail[0]))
    } else {
        let (head, tail) = items.split_at_mut(i);
        Some((&mut tail[0], &mut head[j]))
    }
}

pub fn execute(args: SessionArgs) -> Result<()> {
    let count: usize = prompt_parse("number of participants: ")?;
    if count < 2 {
        bail!("a session needs at least two participants");
    }

    let mut roster: Vec<Box<dyn Policy>> = Vec::with_capacity(count);
    for index in 0..count {
        roster.push(prompt_participant(index)?);
    }

    let mut round: u64 = 0;
    loop {
        println!();
        for (index, participant) in roster.iter().enumerate() {
            println!("  [{index}] {}", participant.name());
        }
        let i: usize = prompt_parse("first participant index: ")?;
        let j: usize = prompt_parse("second participant index: ")?;
        let Some((a, b)) = pair_mut(&mut roster, i, j) else {
            println!("pick two distinct indices from the list");
            continue;
        };

        let episodes: usize = prompt_parse("number of episodes: ")?;
        let config = SessionConfig {
            episodes,
            seed: pairing_seed(args.seed, round),
            // no progress bar for a single interactive game
            progress: episodes > 1,
        };
        round += 1;
        let result = run_session(&mut **a, &mut **b, &config)?;

        print_section("Session result");
        print_kv("episodes", &result.episodes.to_string());
        print_kv(
            a.name(),
            &format!("{} ({})", result.wins_a, format_rate(result.win_rate_a())),
        );
        print_kv(
            b.name(),
            &format!("{} ({})", result.wins_b, format_rate(result.win_rate_b())),
        );
        print_kv("draws", &result.draws.to_string());

        if !prompt_bool("run another pairing? (y/n): ")? {
            break;
        }
    }

    if let Some(dir) = &args.export_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
        for participant in &roster {
            let Some(agent) = participant.as_any().downcast_ref::<Agent>() else {
                continue;
            };
            let path = dir.join(format!("{}-values.csv", agent.name()));
            let records = export_values(agent.table(), &path)
                .with_context(|| format!("exporting {}", path.display()))?;
            println!("{records} state-values saved to {}", path.display());
        }
    }

    Ok(())
}
