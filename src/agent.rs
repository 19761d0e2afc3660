//! Value-learning agent: ε-greedy action selection over a learned table
//!
//! The agent owns its value table, per-episode state history, and rng. Move
//! selection either explores uniformly at random (probability ε) or runs a
//! one-step lookahead over every empty cell, valuing each hypothetical
//! successor from the table; unseen terminal successors are valued by their
//! terminal reward and unseen non-terminal successors by a synthesized
//! default. Learning happens once per episode in [`Agent::finish`].

use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    encoding::{Fingerprint, fingerprint},
    error::{Error, Result},
    policy::Policy,
    tictactoe::{BOARD_AREA, Board, Mark, Outcome, Status},
    value::{LearnParams, ValueHistory, ValueTable},
};

/// How many early-encountered states an agent tracks for value-history
/// diagnostics by default
pub const DEFAULT_TRACKED_STATES: usize = 10;

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// A learning participant
#[derive(Debug, Clone)]
pub struct Agent {
    name: String,
    params: LearnParams,
    table: ValueTable,
    history: Vec<Fingerprint>,
    counts: HashMap<Fingerprint, u64>,
    tracker: ValueHistory,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl Agent {
    /// Create a new agent with the given learning parameters
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters fail validation.
    pub fn new(name: impl Into<String>, params: LearnParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            name: name.into(),
            params,
            table: ValueTable::new(),
            history: Vec::new(),
            counts: HashMap::new(),
            tracker: ValueHistory::new(DEFAULT_TRACKED_STATES),
            rng: build_rng(None),
            rng_seed: None,
        })
    }

    /// Seed the agent's rng for reproducible runs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// Track value histories for up to `capacity` early states
    pub fn with_tracked_states(mut self, capacity: usize) -> Self {
        self.tracker = ValueHistory::new(capacity);
        self
    }

    /// The agent's learning parameters
    pub fn params(&self) -> &LearnParams {
        &self.params
    }

    /// The learned value table
    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    /// Fingerprints observed so far in the current episode
    pub fn history(&self) -> &[Fingerprint] {
        &self.history
    }

    /// Per-fingerprint visit counts accumulated across episodes
    pub fn counts(&self) -> &HashMap<Fingerprint, u64> {
        &self.counts
    }

    /// Value-history diagnostics for tracked states
    pub fn value_history(&self) -> &ValueHistory {
        &self.tracker
    }

    fn explore(&mut self, board: &Board) -> Result<usize> {
        let empties = board.empty_positions();
        empties
            .choose(&mut self.rng)
            .copied()
            .ok_or(Error::NoValidMoves)
    }

    fn exploit(&mut self, board: &mut Board, mark: Mark) -> Result<usize> {
        let mut best_value = -1.0;
        let mut best_pos = None;

        for pos in 0..BOARD_AREA {
            if !board.is_empty(pos) {
                continue;
            }
            let value = board.probe(pos, mark, |probed| {
                let state = fingerprint(probed, mark);
                match self.table.get(state) {
                    Some(known) => known,
                    // A terminal successor the table has never seen is
                    // worth exactly its reward; loss is impossible here
                    // since the agent itself just completed the board.
                    None => match probed.status() {
                        Status::Over(outcome) => self.params.reward_for(outcome, mark),
                        Status::InProgress => self.params.default_value(&mut self.rng),
                    },
                }
            })?;
            // Strict comparison: the first cell in scan order keeps ties.
            if value > best_value {
                best_value = value;
                best_pos = Some(pos);
            }
        }

        best_pos.ok_or(Error::NoValidMoves)
    }

    /// Save the agent to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or serialized.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(&path)
            .map_err(|e| Error::io(format!("create {}", path.as_ref().display()), e))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &SavedAgent::from(self))?;
        Ok(())
    }

    /// Load an agent from a JSON file produced by [`Agent::save`]
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// saved parameters fail validation.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)
            .map_err(|e| Error::io(format!("open {}", path.as_ref().display()), e))?;
        let reader = BufReader::new(file);
        let saved: SavedAgent = serde_json::from_reader(reader)?;
        saved.into_agent()
    }
}

impl Policy for Agent {
    fn select_move(&mut self, board: &mut Board, mark: Mark) -> Result<usize> {
        if board.empty_count() == 0 {
            return Err(Error::NoValidMoves);
        }
        if self.rng.random::<f64>() < self.params.epsilon {
            self.explore(board)
        } else {
            self.exploit(board, mark)
        }
    }

    fn observe(&mut self, board: &Board, mark: Mark) {
        let state = fingerprint(board, mark);
        self.tracker.watch(state);
        self.history.push(state);
    }

    fn finish(&mut self, outcome: Outcome, mark: Mark) -> Result<()> {
        let reward = self.params.reward_for(outcome, mark);
        for &state in &self.history {
            *self.counts.entry(state).or_insert(0) += 1;
        }
        self.table
            .propagate(&self.history, reward, &self.params, &mut self.rng);
        self.history.clear();
        self.tracker.record(&self.table);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// On-disk form of an [`Agent`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAgent {
    pub version: u32,
    pub name: String,
    pub params: LearnParams,
    values: ValueTable,
    counts: HashMap<Fingerprint, u64>,
    rng_seed: Option<u64>,
}

impl SavedAgent {
    const VERSION: u32 = 1;

    fn into_agent(self) -> Result<Agent> {
        self.params.validate()?;
        Ok(Agent {
            name: self.name,
            params: self.params,
            table: self.values,
            history: Vec::new(),
            counts: self.counts,
            tracker: ValueHistory::new(DEFAULT_TRACKED_STATES),
            rng: build_rng(self.rng_seed),
            rng_seed: self.rng_seed,
        })
    }
}

impl From<&Agent> for SavedAgent {
    fn from(agent: &Agent) -> Self {
        Self {
            version: Self::VERSION,
            name: agent.name.clone(),
            params: agent.params,
            values: agent.table.clone(),
            counts: agent.counts.clone(),
            rng_seed: agent.rng_seed,
        }
    }
}
