/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! Cause/effect divergence of a whole system from its unconstrained baseline.
//!
//! # Effect side
//!
//! The effect distribution at state `s` is the table row `T[index(s)]`.
//! The unconstrained effect is the column-wise mean of every row, i.e.
//! what each node does on average regardless of the current state.
//!
//! ```text
//! effect_info = Σᵢ | T[s][i] − mean_r T[r][i] |
//! ```
//!
//! # Cause side
//!
//! For each candidate predecessor row `r`:
//!
//! ```text
//! p(r) = Πᵢ ( T[r][i]      if s[i] = 1
//!             1 − T[r][i]  if s[i] = 0 )
//! ```
//!
//! normalised over `r` (left as all zeros if no row can produce `s`).
//! The unconstrained cause is uniform over the `2ⁿ` rows, and
//! `cause_info` is the one-dimensional earth mover's distance between the two.

use crate::error::{PhiError, Result};
use crate::network::{NetworkModel, State};

/// Cause and effect parts of the whole-system distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceBreakdown {
    /// EMD between the cause distribution and the uniform prior.
    pub cause: f64,
    /// L1 distance between the effect row and the mean row.
    pub effect: f64,
}

impl DistanceBreakdown {
    /// `cause + effect`.
    pub fn total(&self) -> f64 {
        self.cause + self.effect
    }
}

/// One-dimensional earth mover's distance.
///
/// Each input is normalised to sum to 1 (when its sum is positive), then
/// the distance is the sum of absolute differences of the running sums.
/// Inputs are compared position by position; the shorter one bounds the walk.
pub fn emd_1d(p: &[f64], q: &[f64]) -> f64 {
    let p_sum: f64 = p.iter().sum();
    let q_sum: f64 = q.iter().sum();
    let p_norm = if p_sum > 0.0 { p_sum } else { 1.0 };
    let q_norm = if q_sum > 0.0 { q_sum } else { 1.0 };

    let mut cp = 0.0;
    let mut cq = 0.0;
    let mut total = 0.0;
    for (&a, &b) in p.iter().zip(q) {
        cp += a / p_norm;
        cq += b / q_norm;
        total += (cp - cq).abs();
    }
    total
}

/// Sum of absolute elementwise differences.
pub fn l1_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}

/// Column-wise mean of every row of the table.
pub fn unconstrained_effect(model: &NetworkModel) -> Vec<f64> {
    let n = model.node_count();
    let mut mean = vec![0.0; n];
    for row in model.rows() {
        for (m, &p) in mean.iter_mut().zip(row) {
            *m += p;
        }
    }
    let rows = model.state_count() as f64;
    for m in &mut mean {
        *m /= rows;
    }
    mean
}

/// Probability that each row produced `state`, normalised over rows.
pub fn cause_distribution(model: &NetworkModel, state: &State) -> Vec<f64> {
    let mut cause: Vec<f64> = model
        .rows()
        .map(|row| {
            row.iter().enumerate().fold(1.0, |prob, (i, &p)| {
                if state.bit(i) { prob * p } else { prob * (1.0 - p) }
            })
        })
        .collect();

    let total: f64 = cause.iter().sum();
    if total > 0.0 {
        for c in &mut cause {
            *c /= total;
        }
    }
    cause
}

/// Cause and effect information of the uncut system at `state`.
pub fn distance_breakdown(model: &NetworkModel, state: &State) -> Result<DistanceBreakdown> {
    model.check_state(state)?;

    let effect_row = model.row(state.index());
    let effect = l1_distance(effect_row, &unconstrained_effect(model));

    let cause_dist = cause_distribution(model, state);
    let uniform = vec![1.0 / model.state_count() as f64; model.state_count()];
    let cause = emd_1d(&cause_dist, &uniform);

    if !cause.is_finite() || !effect.is_finite() {
        return Err(PhiError::ComputationFault(format!(
            "non-finite distance for '{}' at {state}: cause={cause}, effect={effect}",
            model.name()
        )));
    }
    Ok(DistanceBreakdown { cause, effect })
}

/// The system's integration signal at `state`: cause info + effect info.
pub fn whole_system_distance(model: &NetworkModel, state: &State) -> Result<f64> {
    distance_breakdown(model, state).map(|d| d.total())
}
