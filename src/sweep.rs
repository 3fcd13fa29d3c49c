//! Phi across many states of one network.
//!
//! Every state is evaluated independently and in order.  A faulted state
//! is kept in the results and counted, but contributes nothing to the
//! max/min/mean statistics.

use tracing::info;

use crate::error::Result;
use crate::mip::{PhiEvaluator, PhiResult};
use crate::network::{NetworkModel, State};

/// Which states a sweep visits.
#[derive(Clone, Debug, PartialEq)]
pub enum StateSelection {
    /// All `2ⁿ` states in index order.
    All,
    /// The first `min(2ⁿ, max_sweep_states)` states from the evaluator's config.
    Capped,
    /// The first `min(2ⁿ, k)` states.
    First(usize),
    /// An explicit list, visited in the given order.
    States(Vec<State>),
}

impl StateSelection {
    /// Resolve to a concrete state list for an `n`-node network.
    pub fn resolve(&self, n: usize, max_sweep_states: usize) -> Vec<State> {
        let total = 1usize << n;
        let take = match self {
            Self::All => total,
            Self::Capped => total.min(max_sweep_states),
            Self::First(k) => total.min(*k),
            Self::States(states) => return states.clone(),
        };
        (0..take).map(|i| State::from_index(i, n)).collect()
    }
}

/// Aggregated sweep statistics plus every per-state result.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepSummary {
    /// Network identity.
    pub network: String,
    /// Largest Phi among computed states (0.0 if none).
    pub max: f64,
    /// Smallest Phi among computed states (0.0 if none).
    pub min: f64,
    /// Mean Phi among computed states (0.0 if none).
    pub mean: f64,
    /// Number of states that produced a value.
    pub count: usize,
    /// Number of states that faulted.
    pub faulted: usize,
    /// One entry per faulted state: the state and its diagnostic.
    pub diagnostics: Vec<(State, String)>,
    /// Per-state results in visit order, faulted ones included.
    pub results: Vec<PhiResult>,
}

impl SweepSummary {
    /// Total states visited.
    pub fn states_tested(&self) -> usize {
        self.results.len()
    }

    /// Result for the all-active state, if it was visited.
    pub fn all_active(&self) -> Option<&PhiResult> {
        self.results.iter().find(|r| r.state.is_all_active())
    }

    /// Result for a specific state, if it was visited.
    pub fn result_at(&self, state: &State) -> Option<&PhiResult> {
        self.results.iter().find(|r| &r.state == state)
    }

    fn from_results(network: &str, results: Vec<PhiResult>) -> Self {
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        let mut sum = 0.0;
        let mut count = 0;
        let mut diagnostics = Vec::new();

        for r in &results {
            match r.diagnostic() {
                Some(d) => diagnostics.push((r.state.clone(), d.to_owned())),
                None => {
                    max = max.max(r.phi);
                    min = min.min(r.phi);
                    sum += r.phi;
                    count += 1;
                }
            }
        }

        let (max, min, mean) = if count == 0 {
            (0.0, 0.0, 0.0)
        } else {
            (max, min, sum / count as f64)
        };

        Self {
            network: network.to_owned(),
            max,
            min,
            mean,
            count,
            faulted: diagnostics.len(),
            diagnostics,
            results,
        }
    }
}

/// Run `evaluator` over the selected states of `model`.
///
/// Fails fast only on states of the wrong length.
pub fn sweep<E: PhiEvaluator + ?Sized>(
    evaluator: &E,
    model: &NetworkModel,
    selection: &StateSelection,
) -> Result<SweepSummary> {
    let states = selection.resolve(model.node_count(), evaluator.config().max_sweep_states);
    let results = states
        .iter()
        .map(|s| evaluator.phi(model, s))
        .collect::<Result<Vec<_>>>()?;

    let summary = SweepSummary::from_results(model.name(), results);
    info!(
        network = model.name(),
        states = summary.states_tested(),
        faulted = summary.faulted,
        max = summary.max,
        mean = summary.mean,
        "sweep complete"
    );
    Ok(summary)
}
