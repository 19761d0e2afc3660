//! Per-state value estimates and the backward TD update
//!
//! The update rule is the fixed-learning-rate correction
//! `V(s) ← V(s) + α(γ·target − V(s))` applied backward along one episode's
//! state history, with the terminal state's value overwritten by the
//! terminal reward unconditionally. γ defaults to 1.0. The count-weighted
//! running-average variant is intentionally not implemented; visit counts
//! exist only as diagnostics (see the agent).

use std::collections::{BTreeMap, HashMap};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    encoding::Fingerprint,
    error::{Error, Result},
    tictactoe::{Mark, Outcome},
};

/// Immutable learning parameters, fixed per agent at construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearnParams {
    /// Exploration probability ε
    pub epsilon: f64,
    /// Learning rate α
    pub alpha: f64,
    /// Discount factor γ applied to the backed-up target
    pub gamma: f64,
    /// Terminal reward for a win
    pub win_reward: f64,
    /// Terminal reward for a draw
    pub draw_reward: f64,
    /// Terminal reward for a loss
    pub loss_reward: f64,
    /// Mean of the synthesized default value for unseen states
    pub default_mean: f64,
    /// Half-width of the uniform fluctuation around the default mean
    pub default_fluctuation: f64,
}

impl Default for LearnParams {
    fn default() -> Self {
        Self {
            epsilon: 0.1,
            alpha: 0.5,
            gamma: 1.0,
            win_reward: 1.0,
            draw_reward: 0.5,
            loss_reward: 0.0,
            default_mean: 0.5,
            default_fluctuation: 0.2,
        }
    }
}

impl LearnParams {
    /// Validate parameter ranges
    ///
    /// # Errors
    ///
    /// Returns an error when a probability falls outside [0, 1] or a reward
    /// falls outside the [0, 1] value scale.
    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(Error::InvalidConfiguration {
                    message: format!("{name} must be in [0, 1], got {v}"),
                })
            }
        };
        unit("epsilon", self.epsilon)?;
        unit("alpha", self.alpha)?;
        unit("gamma", self.gamma)?;
        unit("win_reward", self.win_reward)?;
        unit("draw_reward", self.draw_reward)?;
        unit("loss_reward", self.loss_reward)?;
        unit("default_mean", self.default_mean)?;
        if !self.default_fluctuation.is_finite() || self.default_fluctuation < 0.0 {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "default_fluctuation must be non-negative and finite, got {}",
                    self.default_fluctuation
                ),
            });
        }
        Ok(())
    }

    /// Terminal reward for `mark` given the episode outcome
    pub fn reward_for(&self, outcome: Outcome, mark: Mark) -> f64 {
        match outcome {
            Outcome::Win(winner) if winner == mark => self.win_reward,
            Outcome::Win(_) => self.loss_reward,
            Outcome::Draw => self.draw_reward,
        }
    }

    /// Synthesize a default value for an unseen state: mean ± fluctuation,
    /// clamped to [0, 1]. The jitter breaks ties between equally-unknown
    /// states so the first-enumerated cell gets no false preference.
    pub fn default_value(&self, rng: &mut impl Rng) -> f64 {
        let v = self.default_mean + self.default_fluctuation * (rng.random::<f64>() - 0.5);
        v.clamp(0.0, 1.0)
    }
}

/// Mapping from fingerprint to learned value estimate.
///
/// Owned by exactly one agent; entries are created lazily on first lookup
/// or update and the table never shrinks within a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValueTable {
    values: HashMap<Fingerprint, f64>,
}

impl ValueTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the value for a fingerprint
    pub fn get(&self, state: Fingerprint) -> Option<f64> {
        self.values.get(&state).copied()
    }

    /// Set the value for a fingerprint
    pub fn set(&mut self, state: Fingerprint, value: f64) {
        self.values.insert(state, value);
    }

    /// Number of stored state values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over stored (fingerprint, value) pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (Fingerprint, f64)> + '_ {
        self.values.iter().map(|(&s, &v)| (s, v))
    }

    /// All entries sorted by descending value, ties broken by fingerprint.
    /// Gives exports and inspection views a stable order.
    pub fn ranked(&self) -> Vec<(Fingerprint, f64)> {
        let mut entries: Vec<(Fingerprint, f64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        entries
    }

    /// Backward TD propagation for one finished episode.
    ///
    /// Walks `history` from the most recent fingerprint to the earliest.
    /// The most recent entry (the terminal state) takes the terminal
    /// `reward` as ground truth. Every earlier entry is corrected toward
    /// the discounted value of its successor:
    /// `V(s) ← V(s) + α(γ·target − V(s))`, with the freshly updated value
    /// becoming the target for the next step back. Unseen states start from
    /// a synthesized default, which is why an rng is threaded through.
    pub fn propagate(
        &mut self,
        history: &[Fingerprint],
        reward: f64,
        params: &LearnParams,
        rng: &mut impl Rng,
    ) {
        let mut target = reward;
        for (i, &state) in history.iter().enumerate().rev() {
            let updated = if i + 1 == history.len() {
                // Terminal reward is ground truth, overwrite unconditionally.
                target
            } else {
                let existing = self
                    .get(state)
                    .unwrap_or_else(|| params.default_value(rng));
                existing + params.alpha * (params.gamma * target - existing)
            };
            self.set(state, updated);
            target = updated;
        }
    }
}

/// Value trajectories for the first states an agent encounters.
///
/// Watches up to `capacity` distinct fingerprints in encounter order and
/// records one sample of each tracked state's value per episode. Purely
/// diagnostic: lets a session plot how early-game estimates settle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueHistory {
    capacity: usize,
    series: BTreeMap<Fingerprint, Vec<f64>>,
}

impl ValueHistory {
    /// Track up to `capacity` states
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            series: BTreeMap::new(),
        }
    }

    /// Start tracking a state if capacity allows; already-tracked states
    /// and overflow are ignored
    pub fn watch(&mut self, state: Fingerprint) {
        if self.series.len() < self.capacity {
            self.series.entry(state).or_default();
        }
    }

    /// Sample the current value of every tracked state
    pub fn record(&mut self, table: &ValueTable) {
        for (&state, samples) in &mut self.series {
            if let Some(value) = table.get(state) {
                samples.push(value);
            }
        }
    }

    /// Number of tracked states
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether no states are tracked
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Iterate over tracked states and their sample series
    pub fn iter(&self) -> impl Iterator<Item = (Fingerprint, &[f64])> + '_ {
        self.series.iter().map(|(&s, v)| (s, v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_terminal_overwrite() {
        let mut table = ValueTable::new();
        table.set(7, 0.2);
        let params = LearnParams::default();
        let mut rng = StdRng::seed_from_u64(1);

        table.propagate(&[7], 1.0, &params, &mut rng);
        assert_eq!(table.get(7), Some(1.0), "terminal state takes the raw reward");
    }

    #[test]
    fn test_backward_correction() {
        let mut table = ValueTable::new();
        table.set(3, 0.5);
        table.set(9, 0.5);
        let params = LearnParams::default();
        let mut rng = StdRng::seed_from_u64(1);

        table.propagate(&[3, 9], 1.0, &params, &mut rng);
        // terminal: 1.0; earlier: 0.5 + 0.5*(1.0 - 0.5) = 0.75
        assert_eq!(table.get(9), Some(1.0));
        assert!((table.get(3).unwrap() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_propagate_deterministic_with_seed() {
        let params = LearnParams::default();
        let history = [100, 200, 300];

        let run = || {
            let mut table = ValueTable::new();
            let mut rng = StdRng::seed_from_u64(42);
            table.propagate(&history, 1.0, &params, &mut rng);
            table.ranked()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_repeated_propagation_converges_to_win_reward() {
        // The state one step before a forced win must approach the win
        // reward: after 1000 identical episodes its value exceeds 0.9.
        let params = LearnParams::default();
        let mut table = ValueTable::new();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1000 {
            table.propagate(&[11, 22], params.win_reward, &params, &mut rng);
        }
        assert!(table.get(11).unwrap() > 0.9);
        assert_eq!(table.get(22), Some(1.0));
    }

    #[test]
    fn test_loss_propagates_toward_zero() {
        let params = LearnParams::default();
        let mut table = ValueTable::new();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1000 {
            table.propagate(&[11, 22], params.loss_reward, &params, &mut rng);
        }
        assert!(table.get(11).unwrap() < 0.1);
        assert_eq!(table.get(22), Some(0.0));
    }

    #[test]
    fn test_empty_history_is_a_no_op() {
        let mut table = ValueTable::new();
        let mut rng = StdRng::seed_from_u64(1);
        table.propagate(&[], 1.0, &LearnParams::default(), &mut rng);
        assert!(table.is_empty());
    }

    #[test]
    fn test_default_value_bounds() {
        let params = LearnParams {
            default_mean: 0.95,
            default_fluctuation: 0.5,
            ..LearnParams::default()
        };
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..1000 {
            let v = params.default_value(&mut rng);
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_reward_for() {
        let params = LearnParams::default();
        assert_eq!(params.reward_for(Outcome::Win(Mark::X), Mark::X), 1.0);
        assert_eq!(params.reward_for(Outcome::Win(Mark::O), Mark::X), 0.0);
        assert_eq!(params.reward_for(Outcome::Draw, Mark::X), 0.5);
    }

    #[test]
    fn test_validate_rejects_bad_epsilon() {
        let params = LearnParams {
            epsilon: 1.5,
            ..LearnParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_ranked_order() {
        let mut table = ValueTable::new();
        table.set(1, 0.3);
        table.set(2, 0.9);
        table.set(3, 0.6);
        let ranked = table.ranked();
        assert_eq!(ranked, vec![(2, 0.9), (3, 0.6), (1, 0.3)]);
    }

    #[test]
    fn test_value_history_capacity_and_recording() {
        let mut history = ValueHistory::new(2);
        history.watch(10);
        history.watch(20);
        history.watch(30); // beyond capacity, ignored
        assert_eq!(history.len(), 2);

        let mut table = ValueTable::new();
        table.set(10, 0.4);
        history.record(&table);
        history.record(&table);

        let series: Vec<_> = history.iter().collect();
        assert_eq!(series[0], (10, &[0.4, 0.4][..]));
        // 20 has no table entry yet, so nothing was sampled
        assert_eq!(series[1], (20, &[][..]));
    }
}
