/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! Minimum Information Partition search: the Phi-proxy of one state.
//!
//! ```text
//! whole  = D(T, s)
//! score(A|B) = 0                          if no edge crosses A|B
//!            = | whole − D(cut(T, A|B), s) |   otherwise
//! Phi    = min over bipartitions of score
//! ```
//!
//! where `D` is [`crate::distance::whole_system_distance`] and `cut` is
//! [`crate::partition::cut_model`].  Bipartitions are visited in the
//! canonical order of [`crate::partition::bipartitions`]; a later split
//! only replaces the current best when its score is strictly lower, so
//! ties go to the first-found split.
//!
//! # Faults
//!
//! A [`PhiError::ComputationFault`] raised for one state becomes a
//! [`PhiResult`] with `phi = 0.0` and [`PhiStatus::Faulted`].  Shape and
//! state-length errors still fail fast.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::PhiConfig;
use crate::distance::whole_system_distance;
use crate::error::{PhiError, Result};
use crate::network::{NetworkModel, State};
use crate::partition::{bipartitions, cut_model, Bipartition};

/// Label stored with every result so downstream consumers know what they hold.
pub const METHOD: &str = "Phi-proxy (partition-based integration heuristic)";

/// Whether a per-state computation produced a value or a fault.
#[derive(Clone, Debug, PartialEq)]
pub enum PhiStatus {
    /// Phi was computed.
    Computed,
    /// Computation failed; `phi` is reported as 0.0.
    Faulted {
        /// Human-readable description of the failure.
        diagnostic: String,
    },
}

/// Outcome of one MIP search.  Built fresh per call, never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct PhiResult {
    /// Network identity.
    pub network: String,
    /// State the search was run at.
    pub state: State,
    /// Phi-proxy, rounded per [`PhiConfig::phi_decimals`].  Always ≥ 0.
    pub phi: f64,
    /// Minimising split; `None` for `n ≤ 1` and faulted results.
    pub best_cut: Option<Bipartition>,
    /// Number of bipartitions scored (`2^(n−1) − 1` on success).
    pub partitions_evaluated: usize,
    /// Wall-clock time spent in the search.
    pub compute_time: Duration,
    /// Value or fault.
    pub status: PhiStatus,
}

impl PhiResult {
    /// True if the computation faulted.
    pub fn is_faulted(&self) -> bool {
        matches!(self.status, PhiStatus::Faulted { .. })
    }

    /// Fault description, if any.
    pub fn diagnostic(&self) -> Option<&str> {
        match &self.status {
            PhiStatus::Faulted { diagnostic } => Some(diagnostic),
            PhiStatus::Computed => None,
        }
    }
}

/// Raw result of the minimisation, before timing and rounding.
#[derive(Clone, Debug, PartialEq)]
pub struct MipOutcome {
    /// Minimum partition score (unrounded).
    pub phi: f64,
    /// First split reaching the minimum.
    pub best_cut: Option<Bipartition>,
    /// Bipartitions scored.
    pub partitions_evaluated: usize,
}

/// Anything that can run a MIP search for one state.
///
/// [`MipSearch`] is the engine; sweeps, validation and composition are
/// generic over this trait so alternative evaluators can be substituted.
pub trait PhiEvaluator {
    /// Engine configuration.
    fn config(&self) -> &PhiConfig;

    /// Minimise over bipartitions.  `state` has already been length-checked.
    fn search(&self, model: &NetworkModel, state: &State) -> Result<MipOutcome>;

    /// Full per-state computation with timing, rounding and fault capture.
    fn phi(&self, model: &NetworkModel, state: &State) -> Result<PhiResult> {
        model.check_state(state)?;
        let start = Instant::now();

        match self.search(model, state) {
            Ok(outcome) => {
                let compute_time = start.elapsed();
                let phi = self.config().round_phi(outcome.phi);
                debug!(
                    network = model.name(),
                    state = %state,
                    phi,
                    cut = ?outcome.best_cut.map(|c| c.to_string()),
                    elapsed_us = compute_time.as_micros() as u64,
                    "phi computed"
                );
                Ok(PhiResult {
                    network: model.name().to_owned(),
                    state: state.clone(),
                    phi,
                    best_cut: outcome.best_cut,
                    partitions_evaluated: outcome.partitions_evaluated,
                    compute_time,
                    status: PhiStatus::Computed,
                })
            }
            Err(PhiError::ComputationFault(diagnostic)) => {
                warn!(network = model.name(), state = %state, %diagnostic, "phi computation faulted");
                Ok(PhiResult {
                    network: model.name().to_owned(),
                    state: state.clone(),
                    phi: 0.0,
                    best_cut: None,
                    partitions_evaluated: 0,
                    compute_time: start.elapsed(),
                    status: PhiStatus::Faulted { diagnostic },
                })
            }
            Err(e) => Err(e),
        }
    }
}

/// Exhaustive bipartition search.
#[derive(Clone, Debug, Default)]
pub struct MipSearch {
    config: PhiConfig,
}

impl MipSearch {
    /// Search with a custom configuration.
    pub fn new(config: PhiConfig) -> Self {
        Self { config }
    }
}

impl PhiEvaluator for MipSearch {
    fn config(&self) -> &PhiConfig {
        &self.config
    }

    fn search(&self, model: &NetworkModel, state: &State) -> Result<MipOutcome> {
        let n = model.node_count();
        if n <= 1 {
            return Ok(MipOutcome { phi: 0.0, best_cut: None, partitions_evaluated: 0 });
        }

        let whole = whole_system_distance(model, state)?;

        let mut best: Option<(f64, Bipartition)> = None;
        let mut evaluated = 0;
        for split in bipartitions(n) {
            evaluated += 1;
            let score = if split.is_crossed_by(model) {
                let cut = whole_system_distance(&cut_model(model, &split), state)?;
                (whole - cut).abs()
            } else {
                0.0
            };
            if !score.is_finite() {
                return Err(PhiError::ComputationFault(format!(
                    "non-finite partition score for '{}' at {state} under {split}",
                    model.name()
                )));
            }
            if best.map_or(true, |(b, _)| score < b) {
                best = Some((score, split));
            }
        }

        let (phi, best_cut) = match best {
            Some((phi, split)) => (phi, Some(split)),
            None => (0.0, None),
        };
        Ok(MipOutcome { phi, best_cut, partitions_evaluated: evaluated })
    }
}

/// Phi of `model` at `state` with the default engine.
pub fn phi(model: &NetworkModel, state: &State) -> Result<PhiResult> {
    MipSearch::default().phi(model, state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(name: &str, rows: [[u8; 2]; 4]) -> NetworkModel {
        NetworkModel::new(
            name,
            rows.iter().map(|r| r.iter().map(|&b| f64::from(b)).collect()).collect(),
            vec![vec![1, 1], vec![1, 1]],
            vec!["A", "B"],
        )
        .unwrap()
    }

    #[test]
    fn single_node_has_zero_phi() {
        let m = NetworkModel::new("one", vec![vec![1.0], vec![0.0]], vec![vec![1]], vec!["A"])
            .unwrap();
        for bit in [0u8, 1] {
            let r = phi(&m, &State::from_bits(&[bit])).unwrap();
            assert_eq!(r.phi, 0.0);
            assert!(r.best_cut.is_none());
            assert_eq!(r.partitions_evaluated, 0);
        }
    }

    #[test]
    fn xor_all_active() {
        let m = gate("xor_2", [[0, 0], [1, 1], [1, 1], [0, 0]]);
        let r = phi(&m, &State::from_bits(&[1, 1])).unwrap();
        assert!((r.phi - 1.5).abs() < 1e-9, "phi = {}", r.phi);
        assert_eq!(r.best_cut.unwrap().part_a(), vec![0]);
        assert_eq!(r.status, PhiStatus::Computed);
        assert_eq!(r.network, "xor_2");
    }

    #[test]
    fn disconnected_split_scores_zero() {
        let m = NetworkModel::new(
            "pair",
            vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]],
            vec![vec![1, 0], vec![0, 1]],
            vec!["A", "B"],
        )
        .unwrap();
        let r = phi(&m, &State::from_bits(&[1, 0])).unwrap();
        assert_eq!(r.phi, 0.0);
        assert!(r.best_cut.is_some());
    }

    #[test]
    fn invalid_state_fails_fast() {
        let m = gate("and_2", [[0, 0], [0, 0], [0, 0], [1, 1]]);
        assert_eq!(
            phi(&m, &State::from_bits(&[1])).unwrap_err(),
            PhiError::InvalidState { expected: 2, actual: 1 }
        );
    }

    struct Broken(PhiConfig);

    impl PhiEvaluator for Broken {
        fn config(&self) -> &PhiConfig {
            &self.0
        }
        fn search(&self, _: &NetworkModel, _: &State) -> Result<MipOutcome> {
            Err(PhiError::ComputationFault("degenerate normalisation".into()))
        }
    }

    #[test]
    fn fault_becomes_zero_phi_result() {
        let m = gate("or_2", [[0, 0], [1, 1], [1, 1], [1, 1]]);
        let r = Broken(PhiConfig::default()).phi(&m, &State::from_bits(&[0, 1])).unwrap();
        assert_eq!(r.phi, 0.0);
        assert!(r.is_faulted());
        assert_eq!(r.diagnostic(), Some("degenerate normalisation"));
        assert!(r.best_cut.is_none());
    }
}
