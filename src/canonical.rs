/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! Canonical gate battery: known qualitative orderings the proxy must keep.
//!
//! | Network | Nodes | Expectation |
//! |---------|-------|-------------|
//! | XOR | 2 | High: both inputs needed to predict the output |
//! | AND | 2 | Lower than XOR: one OFF input fixes the output |
//! | OR | 2 | Lower than XOR: one ON input fixes the output |
//! | Majority | 3 | Non-zero: redundancy, but still integrated |
//! | Feedforward chain A→B→C | 3 | Low: no feedback |
//! | Recurrent loop A→B→C→A | 3 | Higher than the chain |
//!
//! Each network is swept over its full state space.  These check
//! orderings, not magnitudes.

use tracing::info;

use crate::error::Result;
use crate::mip::{MipSearch, PhiEvaluator};
use crate::network::NetworkModel;
use crate::partition::Bipartition;
use crate::sweep::{sweep, StateSelection, SweepSummary};

fn deterministic<const N: usize>(
    name: &str,
    rows: &[[u8; N]],
    connectivity: [[u8; N]; N],
    labels: [&str; N],
) -> Result<NetworkModel> {
    NetworkModel::new(
        name,
        rows.iter().map(|r| r.iter().map(|&b| f64::from(b)).collect()).collect(),
        connectivity.iter().map(|r| r.to_vec()).collect(),
        labels.to_vec(),
    )
}

/// XOR gate: both nodes become `A XOR B`.
pub fn xor_2() -> Result<NetworkModel> {
    deterministic("xor_2", &[[0, 0], [1, 1], [1, 1], [0, 0]], [[1, 1], [1, 1]], ["A_xor", "B_xor"])
}

/// AND gate: both nodes become `A AND B`.
pub fn and_2() -> Result<NetworkModel> {
    deterministic("and_2", &[[0, 0], [0, 0], [0, 0], [1, 1]], [[1, 1], [1, 1]], ["A_and", "B_and"])
}

/// OR gate: both nodes become `A OR B`.
pub fn or_2() -> Result<NetworkModel> {
    deterministic("or_2", &[[0, 0], [1, 1], [1, 1], [1, 1]], [[1, 1], [1, 1]], ["A_or", "B_or"])
}

/// Three-node majority vote over all nodes including self.
pub fn majority_3() -> Result<NetworkModel> {
    deterministic(
        "majority_3",
        &[
            [0, 0, 0],
            [0, 0, 0],
            [0, 0, 0],
            [1, 1, 1],
            [0, 0, 0],
            [1, 1, 1],
            [1, 1, 1],
            [1, 1, 1],
        ],
        [[1, 1, 1], [1, 1, 1], [1, 1, 1]],
        ["V1", "V2", "V3"],
    )
}

/// Chain A→B→C: A holds, B copies A, C copies B.
pub fn feedforward_chain_3() -> Result<NetworkModel> {
    deterministic(
        "feedforward_chain",
        &[
            [0, 0, 0],
            [1, 1, 0],
            [0, 0, 1],
            [1, 1, 1],
            [0, 0, 0],
            [1, 1, 0],
            [0, 0, 1],
            [1, 1, 1],
        ],
        [[1, 1, 0], [0, 0, 1], [0, 0, 0]],
        ["FF_A", "FF_B", "FF_C"],
    )
}

/// Loop A→B→C→A: each node copies its predecessor.
pub fn recurrent_loop_3() -> Result<NetworkModel> {
    deterministic(
        "recurrent_loop",
        &[
            [0, 0, 0],
            [0, 1, 0],
            [0, 0, 1],
            [0, 1, 1],
            [1, 0, 0],
            [1, 1, 0],
            [1, 0, 1],
            [1, 1, 1],
        ],
        [[0, 1, 0], [0, 0, 1], [1, 0, 0]],
        ["Loop_A", "Loop_B", "Loop_C"],
    )
}

/// Sweep of one battery network.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkReport {
    /// Human-readable name.
    pub display_name: &'static str,
    /// Expected qualitative behaviour.
    pub expectation: &'static str,
    /// Node count.
    pub nodes: usize,
    /// Full-state-space sweep.
    pub sweep: SweepSummary,
}

impl NetworkReport {
    /// Phi at the all-active state (0.0 if it faulted).
    pub fn phi_all_active(&self) -> f64 {
        self.sweep.all_active().map_or(0.0, |r| r.phi)
    }

    /// MIP at the all-active state.
    pub fn mip_active(&self) -> Option<Bipartition> {
        self.sweep.all_active().and_then(|r| r.best_cut)
    }
}

/// One ordering assertion.
#[derive(Clone, Debug, PartialEq)]
pub struct Validation {
    /// What is asserted.
    pub name: &'static str,
    /// Outcome.
    pub passed: bool,
    /// The compared values, formatted.
    pub values: String,
}

/// Every network sweep and every assertion, passed or not.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationReport {
    /// Battery sweeps in battery order.
    pub networks: Vec<NetworkReport>,
    /// Assertions in a fixed order.
    pub validations: Vec<Validation>,
}

impl ValidationReport {
    /// Assertions that held.
    pub fn passed(&self) -> usize {
        self.validations.iter().filter(|v| v.passed).count()
    }

    /// Assertions evaluated.
    pub fn total(&self) -> usize {
        self.validations.len()
    }

    /// Pass percentage rounded to one decimal place.
    pub fn pass_rate(&self) -> f64 {
        if self.validations.is_empty() {
            return 0.0;
        }
        (self.passed() as f64 / self.total() as f64 * 1000.0).round() / 10.0
    }

    /// True when every assertion held.
    pub fn all_passed(&self) -> bool {
        self.passed() == self.total()
    }

    /// Look up a battery network by name.
    pub fn network(&self, name: &str) -> Option<&NetworkReport> {
        self.networks.iter().find(|r| r.sweep.network == name)
    }
}

/// Runs the battery with any evaluator.
pub struct CanonicalValidator<E: PhiEvaluator> {
    evaluator: E,
}

impl<E: PhiEvaluator> CanonicalValidator<E> {
    /// Validator over `evaluator`.
    pub fn new(evaluator: E) -> Self {
        Self { evaluator }
    }

    fn sweep_network(
        &self,
        model: NetworkModel,
        display_name: &'static str,
        expectation: &'static str,
    ) -> Result<NetworkReport> {
        let summary = sweep(&self.evaluator, &model, &StateSelection::All)?;
        info!(
            network = model.name(),
            phi_max = summary.max,
            phi_mean = summary.mean,
            "canonical network swept"
        );
        Ok(NetworkReport {
            display_name,
            expectation,
            nodes: model.node_count(),
            sweep: summary,
        })
    }

    /// Sweep every battery network and evaluate every assertion.
    pub fn run(&self) -> Result<ValidationReport> {
        let xor = self.sweep_network(xor_2()?, "XOR-2", "High integration: both inputs needed")?;
        let and = self.sweep_network(
            and_2()?,
            "AND-2",
            "Lower than XOR: one input can determine output",
        )?;
        let or = self.sweep_network(
            or_2()?,
            "OR-2",
            "Lower than XOR: one input can determine output",
        )?;
        let majority = self.sweep_network(
            majority_3()?,
            "3-Node Majority",
            "Moderate: redundancy reduces integration",
        )?;
        let chain = self.sweep_network(
            feedforward_chain_3()?,
            "Feedforward Chain (A→B→C)",
            "Low: no feedback",
        )?;
        let ring = self.sweep_network(
            recurrent_loop_3()?,
            "Recurrent Loop (A→B→C→A)",
            "Higher than chain: feedback creates integration",
        )?;

        let validations = vec![
            Validation {
                name: "XOR > AND",
                passed: xor.sweep.max > and.sweep.max,
                values: format!("XOR_max={:.6} vs AND_max={:.6}", xor.sweep.max, and.sweep.max),
            },
            Validation {
                name: "XOR > OR",
                passed: xor.sweep.max > or.sweep.max,
                values: format!("XOR_max={:.6} vs OR_max={:.6}", xor.sweep.max, or.sweep.max),
            },
            Validation {
                name: "Recurrent Loop > Feedforward Chain",
                passed: ring.sweep.max > chain.sweep.max,
                values: format!("Loop_max={:.6} vs FF_max={:.6}", ring.sweep.max, chain.sweep.max),
            },
            Validation {
                name: "Recurrent Loop(active) >= Feedforward Chain(active)",
                passed: ring.phi_all_active() >= chain.phi_all_active(),
                values: format!(
                    "Loop_active={:.6} vs FF_active={:.6}",
                    ring.phi_all_active(),
                    chain.phi_all_active()
                ),
            },
            Validation {
                name: "Majority-3 has non-zero Phi",
                passed: majority.sweep.max > 0.0,
                values: format!("Majority_max={:.6}", majority.sweep.max),
            },
        ];

        let report = ValidationReport {
            networks: vec![xor, and, or, majority, chain, ring],
            validations,
        };
        info!(passed = report.passed(), total = report.total(), "canonical validation complete");
        Ok(report)
    }
}

/// Run the battery with the default engine.
pub fn run_canonical_validation() -> Result<ValidationReport> {
    CanonicalValidator::new(MipSearch::default()).run()
}
