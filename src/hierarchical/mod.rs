/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! Hierarchical composition: several small modules plus one meta-network.
//!
//! Exact search costs O(n · 2^(2n−1)) and is hopeless past 6–8 nodes.  A
//! larger architecture is approximated by decomposing it into Level-1
//! modules (5–6 nodes each) that are swept independently, and a Level-2
//! meta-network with one node per module.
//!
//! # Combination rule
//!
//! ```text
//! L1avg = mean over modules of (max Phi over the module's sampled states)
//! L2max = max Phi of the meta-network over its sampled states
//! H     = (L1avg × 0.6 + L2max × 0.4) × (1 + 0.1 · ln(1 + total_nodes))
//! ```
//!
//! `total_nodes` is the sum of module node counts (meta nodes excluded).
//! The rule is a heuristic, reproduced exactly.
//!
//! # Activations
//!
//! Each module's max Phi is mapped through
//! `clamp(phi / activation_scale, activation_floor, 1.0)`.  The value is
//! reported for inspection only: the meta-network's update law is the
//! fixed Boolean rule supplied with the [`ModuleSet`].
//!
//! Enabled by `features = ["hierarchical"]`.  The reference module set
//! lives in [`workspace`].

pub mod workspace;

use heapless::Vec as HVec;
use tracing::info;

use crate::config::PhiConfig;
use crate::error::{PhiError, Result};
use crate::mip::{MipSearch, PhiEvaluator};
use crate::network::{NetworkModel, State};
use crate::partition::Bipartition;
use crate::sweep::{sweep, StateSelection, SweepSummary};

/// Maximum number of Level-1 modules in one set.
pub const MAX_MODULES: usize = 8;

/// Weight of the mean Level-1 maximum.
pub const LEVEL1_WEIGHT: f64 = 0.6;

/// Weight of the Level-2 maximum.
pub const LEVEL2_WEIGHT: f64 = 0.4;

/// Coefficient of the `ln(1 + total_nodes)` size bonus.
pub const SIZE_BONUS: f64 = 0.1;

/// `1 + 0.1 · ln(1 + total_nodes)`.
pub fn scale_factor(total_nodes: usize) -> f64 {
    1.0 + SIZE_BONUS * (total_nodes as f64).ln_1p()
}

/// `(level1_avg × 0.6 + level2_max × 0.4) × scale_factor(total_nodes)`.
pub fn hierarchical_value(level1_avg: f64, level2_max: f64, total_nodes: usize) -> f64 {
    (level1_avg * LEVEL1_WEIGHT + level2_max * LEVEL2_WEIGHT) * scale_factor(total_nodes)
}

/// Map a module's Phi to an activation: `min(1, max(floor, phi / scale))`.
///
/// Never panics: a floor above 1.0 yields 1.0 and a NaN floor is ignored.
pub fn phi_to_activation(phi: f64, config: &PhiConfig) -> f64 {
    (phi / config.activation_scale).max(config.activation_floor).min(1.0)
}

// ─── ModuleSet ───────────────────────────────────────────────────────────────

/// Boolean update law of the meta-network over module-activation bits.
pub type MetaRule = Box<dyn Fn(&State) -> Vec<bool>>;

/// Level-2 definition: one node per module, in module order.
pub struct MetaNetworkSpec {
    /// Meta-network identity.
    pub name: String,
    /// Next activation of every module node.
    pub rule: MetaRule,
    /// `k × k` inter-module connectivity.
    pub connectivity: Vec<Vec<u8>>,
    /// One label per module node.
    pub labels: Vec<String>,
}

/// Level-1 modules plus the Level-2 meta-network definition.
pub struct ModuleSet {
    modules: HVec<NetworkModel, MAX_MODULES>,
    meta: MetaNetworkSpec,
}

impl ModuleSet {
    /// Empty set with the given meta-network definition.
    pub fn new(meta: MetaNetworkSpec) -> Self {
        Self { modules: HVec::new(), meta }
    }

    /// Append a Level-1 module.
    pub fn push(&mut self, module: NetworkModel) -> Result<()> {
        self.modules.push(module).map_err(|_| PhiError::ShapeMismatch {
            what: "module set capacity",
            expected: MAX_MODULES,
            actual: MAX_MODULES + 1,
        })
    }

    /// Level-1 modules in insertion order.
    pub fn modules(&self) -> &[NetworkModel] {
        &self.modules
    }

    /// Sum of module node counts.
    pub fn total_nodes(&self) -> usize {
        self.modules.iter().map(NetworkModel::node_count).sum()
    }

    /// Materialise the meta-network.  Its node count must equal the module count.
    pub fn meta_network(&self) -> Result<NetworkModel> {
        if self.meta.labels.len() != self.modules.len() {
            return Err(PhiError::ShapeMismatch {
                what: "meta-network nodes",
                expected: self.modules.len(),
                actual: self.meta.labels.len(),
            });
        }
        NetworkModel::from_rule(
            self.meta.name.clone(),
            |s| (self.meta.rule)(s),
            self.meta.connectivity.clone(),
            self.meta.labels.clone(),
        )
    }
}

// ─── Reports ─────────────────────────────────────────────────────────────────

/// Statistics for one network in the hierarchy.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelReport {
    /// Network identity.
    pub name: String,
    /// Node count.
    pub nodes: usize,
    /// Node labels.
    pub labels: Vec<String>,
    /// Phi at the all-active state.
    pub phi_active: f64,
    /// MIP at the all-active state.
    pub mip_active: Option<Bipartition>,
    /// Largest Phi over the sampled states.
    pub phi_max: f64,
    /// Smallest Phi over the sampled states.
    pub phi_min: f64,
    /// Mean Phi over the sampled states.
    pub phi_mean: f64,
    /// States sampled.
    pub states_tested: usize,
    /// Faulted evaluations, including an all-active state evaluated
    /// outside the sampled prefix.
    pub faulted: usize,
    /// One `"<state>: <diagnostic>"` entry per faulted evaluation.
    pub diagnostics: Vec<String>,
    /// Mapped activation (Level-1 modules only).
    pub activation: Option<f64>,
}

/// Outcome of one composition.
#[derive(Clone, Debug, PartialEq)]
pub struct HierarchicalReport {
    /// One entry per module, in module order.
    pub level1: Vec<LevelReport>,
    /// The meta-network.
    pub level2: LevelReport,
    /// Composite value `H`.
    pub value: f64,
    /// Mean of the module maxima.
    pub level1_avg_max_phi: f64,
    /// Sum of the module maxima.
    pub level1_total_max_phi: f64,
    /// Meta-network maximum.
    pub level2_max_phi: f64,
    /// Sum of module node counts.
    pub total_nodes: usize,
    /// `1 + 0.1 · ln(1 + total_nodes)`.
    pub scale_factor: f64,
    /// Module nodes plus meta nodes.
    pub effective_nodes: usize,
    /// States a flat search over `effective_nodes` would face (saturating).
    pub flat_state_count: u128,
    /// States actually evaluated across both levels.
    pub states_evaluated: usize,
}

// ─── HierarchicalComposer ────────────────────────────────────────────────────

/// Sweeps each module and the meta-network, then combines the maxima.
pub struct HierarchicalComposer<E: PhiEvaluator> {
    evaluator: E,
}

impl Default for HierarchicalComposer<MipSearch> {
    fn default() -> Self {
        Self::new(MipSearch::default())
    }
}

impl<E: PhiEvaluator> HierarchicalComposer<E> {
    /// Composer over `evaluator`.
    pub fn new(evaluator: E) -> Self {
        Self { evaluator }
    }

    fn level_report(&self, model: &NetworkModel, activation: bool) -> Result<LevelReport> {
        let summary: SweepSummary = sweep(&self.evaluator, model, &StateSelection::Capped)?;

        let mut diagnostics: Vec<String> = summary
            .diagnostics
            .iter()
            .map(|(state, d)| format!("{state}: {d}"))
            .collect();

        // The capped prefix may not reach the all-active state.
        let active = match summary.all_active() {
            Some(r) => r.clone(),
            None => {
                let r = self.evaluator.phi(model, &State::all_active(model.node_count()))?;
                if let Some(d) = r.diagnostic() {
                    diagnostics.push(format!("{}: {d}", r.state));
                }
                r
            }
        };

        Ok(LevelReport {
            name: model.name().to_owned(),
            nodes: model.node_count(),
            labels: model.labels().to_vec(),
            phi_active: active.phi,
            mip_active: active.best_cut,
            phi_max: summary.max,
            phi_min: summary.min,
            phi_mean: summary.mean,
            states_tested: summary.states_tested(),
            faulted: diagnostics.len(),
            diagnostics,
            activation: activation.then(|| phi_to_activation(summary.max, self.evaluator.config())),
        })
    }

    /// Compose the set into one hierarchical value.
    pub fn compose(&self, set: &ModuleSet) -> Result<HierarchicalReport> {
        let meta = set.meta_network()?;

        let level1 = set
            .modules()
            .iter()
            .map(|m| self.level_report(m, true))
            .collect::<Result<Vec<_>>>()?;
        for m in &level1 {
            info!(
                module = %m.name,
                nodes = m.nodes,
                phi_active = m.phi_active,
                phi_max = m.phi_max,
                activation = m.activation,
                "level-1 module swept"
            );
        }

        let level2 = self.level_report(&meta, false)?;

        let level1_total_max_phi: f64 = level1.iter().map(|m| m.phi_max).sum();
        let level1_avg_max_phi = if level1.is_empty() {
            0.0
        } else {
            level1_total_max_phi / level1.len() as f64
        };
        let total_nodes = set.total_nodes();
        let value = hierarchical_value(level1_avg_max_phi, level2.phi_max, total_nodes);
        let effective_nodes = total_nodes + meta.node_count();
        let states_evaluated = level1.iter().map(|m| m.states_tested).sum::<usize>() + level2.states_tested;

        info!(
            value,
            level1_avg = level1_avg_max_phi,
            level2_max = level2.phi_max,
            total_nodes,
            effective_nodes,
            states_evaluated,
            "hierarchical phi composed"
        );

        Ok(HierarchicalReport {
            level2_max_phi: level2.phi_max,
            level1,
            level2,
            value,
            level1_avg_max_phi,
            level1_total_max_phi,
            total_nodes,
            scale_factor: scale_factor(total_nodes),
            effective_nodes,
            flat_state_count: 1u128.checked_shl(effective_nodes as u32).unwrap_or(u128::MAX),
            states_evaluated,
        })
    }
}

/// Compose with the default engine.
pub fn hierarchical_phi(set: &ModuleSet) -> Result<HierarchicalReport> {
    HierarchicalComposer::default().compose(set)
}
