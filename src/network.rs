/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! Network definitions: the immutable system under analysis.
//!
//! A [`NetworkModel`] is a small discrete dynamical system of `n` binary
//! nodes:
//!
//! - a transition table with `2ⁿ` rows of `n` per-node activation
//!   probabilities (the one-step update law, indexed by current state);
//! - an `n × n` connectivity matrix, `connectivity[i][j] = 1` meaning
//!   node `i` causally influences node `j` (not required to be symmetric);
//! - `n` display labels.
//!
//! States use LOLI ordering: bit `i` of a row index is node `i`, so
//! `index = Σ bit[i]·2^i`.
//!
//! # Invariants
//! - Table has exactly `2ⁿ` rows of length `n`; every entry is a finite
//!   probability in `[0, 1]` (checked at construction).
//! - A model is never mutated after construction.  Cut tables are new
//!   models built by [`crate::partition::cut_model`].

use core::fmt;

use hashbrown::HashMap;

use crate::error::{PhiError, Result};
use crate::mip::{MipSearch, PhiEvaluator, PhiResult};
use crate::sweep::{sweep, StateSelection, SweepSummary};

/// Largest network the exhaustive bipartition search accepts.
///
/// Cost grows as O(n · 2^(2n−1)); eight nodes is already far beyond the
/// hand-authored networks this proxy is meant for.
pub const MAX_NODES: usize = 8;

// ─── State ───────────────────────────────────────────────────────────────────

/// A length-`n` bit vector: one activation bit per node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct State {
    bits: Vec<bool>,
}

impl State {
    /// Wrap an explicit bit vector.
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Build from 0/1 values; any non-zero value counts as active.
    ///
    /// Use [`State::try_from_bits`] for untrusted input.
    pub fn from_bits(bits: &[u8]) -> Self {
        Self { bits: bits.iter().map(|&b| b != 0).collect() }
    }

    /// Build from 0/1 values, rejecting anything else.
    pub fn try_from_bits(bits: &[u8]) -> Result<Self> {
        bits.iter()
            .enumerate()
            .map(|(node, &value)| match value {
                0 => Ok(false),
                1 => Ok(true),
                _ => Err(PhiError::InvalidBit { node, value }),
            })
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    /// Decode a row index into an `n`-bit state (bit `i` → node `i`).
    pub fn from_index(index: usize, n: usize) -> Self {
        Self { bits: (0..n).map(|i| (index >> i) & 1 == 1).collect() }
    }

    /// The all-ones state, used when no state is given.
    pub fn all_active(n: usize) -> Self {
        Self { bits: vec![true; n] }
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True for the zero-length state.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Activation of node `i`.
    pub fn bit(&self, i: usize) -> bool {
        self.bits[i]
    }

    /// Row index `Σ bit[i]·2^i`.
    pub fn index(&self) -> usize {
        self.bits
            .iter()
            .enumerate()
            .fold(0, |acc, (i, &b)| acc | (usize::from(b) << i))
    }

    /// True when every node is active.
    pub fn is_all_active(&self) -> bool {
        self.bits.iter().all(|&b| b)
    }

    /// Bits as 0/1 bytes, in node order.
    pub fn to_bits(&self) -> Vec<u8> {
        self.bits.iter().map(|&b| u8::from(b)).collect()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, &b) in self.bits.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", u8::from(b))?;
        }
        f.write_str(")")
    }
}

// ─── NetworkModel ────────────────────────────────────────────────────────────

/// Immutable container for one system definition.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkModel {
    name: String,
    node_count: usize,
    /// Row-major `2ⁿ × n`, row stride = `node_count`.
    table: Vec<f64>,
    /// Row-major `n × n`; `connectivity[i * n + j]` = node i feeds node j.
    connectivity: Vec<bool>,
    labels: Vec<String>,
}

impl NetworkModel {
    /// Validate and build a network.
    ///
    /// - `transition_table`: `2ⁿ` rows, each `n` probabilities.
    /// - `connectivity`: `n × n`; any non-zero entry is an edge.
    /// - `labels`: `n` display names.
    ///
    /// The node count is taken from `labels`.
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        transition_table: Vec<Vec<f64>>,
        connectivity: Vec<Vec<u8>>,
        labels: Vec<S>,
    ) -> Result<Self> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let n = labels.len();
        if n > MAX_NODES {
            return Err(PhiError::TooManyNodes { nodes: n, max: MAX_NODES });
        }

        let rows = 1usize << n;
        if transition_table.len() != rows {
            return Err(PhiError::ShapeMismatch {
                what: "transition table rows",
                expected: rows,
                actual: transition_table.len(),
            });
        }
        let mut table = Vec::with_capacity(rows * n);
        for (r, row) in transition_table.iter().enumerate() {
            if row.len() != n {
                return Err(PhiError::ShapeMismatch {
                    what: "transition table row length",
                    expected: n,
                    actual: row.len(),
                });
            }
            for (node, &p) in row.iter().enumerate() {
                if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                    return Err(PhiError::InvalidProbability { row: r, node, value: p });
                }
                table.push(p);
            }
        }

        if connectivity.len() != n {
            return Err(PhiError::ShapeMismatch {
                what: "connectivity rows",
                expected: n,
                actual: connectivity.len(),
            });
        }
        let mut cm = Vec::with_capacity(n * n);
        for row in &connectivity {
            if row.len() != n {
                return Err(PhiError::ShapeMismatch {
                    what: "connectivity row length",
                    expected: n,
                    actual: row.len(),
                });
            }
            cm.extend(row.iter().map(|&c| c != 0));
        }

        Ok(Self {
            name: name.into(),
            node_count: n,
            table,
            connectivity: cm,
            labels,
        })
    }

    /// Build a deterministic network from a hand-specified update rule.
    ///
    /// `rule` is evaluated once per state in index order and must return
    /// the next activation of every node.
    pub fn from_rule<S, F>(
        name: impl Into<String>,
        rule: F,
        connectivity: Vec<Vec<u8>>,
        labels: Vec<S>,
    ) -> Result<Self>
    where
        S: Into<String>,
        F: Fn(&State) -> Vec<bool>,
    {
        let n = labels.len();
        if n > MAX_NODES {
            return Err(PhiError::TooManyNodes { nodes: n, max: MAX_NODES });
        }
        let mut table = Vec::with_capacity(1 << n);
        for index in 0..(1usize << n) {
            let next = rule(&State::from_index(index, n));
            if next.len() != n {
                return Err(PhiError::ShapeMismatch {
                    what: "rule output",
                    expected: n,
                    actual: next.len(),
                });
            }
            table.push(next.into_iter().map(|b| if b { 1.0 } else { 0.0 }).collect());
        }
        Self::new(name, table, connectivity, labels)
    }

    /// Internal constructor for derived tables of an already-valid model.
    pub(crate) fn with_table(&self, table: Vec<f64>) -> Self {
        debug_assert_eq!(table.len(), self.table.len());
        Self {
            name: self.name.clone(),
            node_count: self.node_count,
            table,
            connectivity: self.connectivity.clone(),
            labels: self.labels.clone(),
        }
    }

    /// Network identity.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of nodes `n`.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of table rows, `2ⁿ`.
    pub fn state_count(&self) -> usize {
        1 << self.node_count
    }

    /// Per-node activation probabilities at row `index`.
    pub fn row(&self, index: usize) -> &[f64] {
        let n = self.node_count;
        &self.table[index * n..(index + 1) * n]
    }

    /// Iterate rows in index order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact(0) panics; an n = 0 network has one empty row.
        let stride = self.node_count.max(1);
        let empty: &[f64] = &[];
        let zero_node = (self.node_count == 0).then_some(empty);
        self.table.chunks_exact(stride).chain(zero_node)
    }

    /// Flat row-major table.
    pub fn table(&self) -> &[f64] {
        &self.table
    }

    /// True if node `from` causally influences node `to`.
    pub fn influences(&self, from: usize, to: usize) -> bool {
        self.connectivity[from * self.node_count + to]
    }

    /// Bitmask of the causal predecessors of `target` (column `target`).
    pub fn predecessor_mask(&self, target: usize) -> u32 {
        (0..self.node_count)
            .filter(|&s| self.influences(s, target))
            .fold(0, |m, s| m | (1 << s))
    }

    /// Display labels, one per node.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Reject states whose length differs from the node count.
    pub fn check_state(&self, state: &State) -> Result<()> {
        if state.len() != self.node_count {
            return Err(PhiError::InvalidState {
                expected: self.node_count,
                actual: state.len(),
            });
        }
        Ok(())
    }
}

// ─── NetworkTable ────────────────────────────────────────────────────────────

/// Explicit keyed collection of networks, passed to whoever needs lookups.
///
/// Keys are exact network names.  There is no fallback matching: a derived
/// key such as `"recurrence_s101"` is simply unknown.
#[derive(Clone, Debug, Default)]
pub struct NetworkTable {
    networks: HashMap<String, NetworkModel>,
}

impl NetworkTable {
    /// Empty table.
    pub fn new() -> Self {
        Self { networks: HashMap::new() }
    }

    /// Register a model under its own name, returning any model it replaced.
    pub fn insert(&mut self, model: NetworkModel) -> Option<NetworkModel> {
        self.networks.insert(model.name().to_owned(), model)
    }

    /// Look up a network, failing fast on unknown names.
    pub fn get(&self, name: &str) -> Result<&NetworkModel> {
        self.networks
            .get(name)
            .ok_or_else(|| PhiError::UnknownNetwork(name.to_owned()))
    }

    /// True if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.networks.contains_key(name)
    }

    /// Number of registered networks.
    pub fn len(&self) -> usize {
        self.networks.len()
    }

    /// True when no networks are registered.
    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.networks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Phi of a named network; `None` means the all-active state.
    pub fn phi(&self, name: &str, state: Option<State>) -> Result<PhiResult> {
        let model = self.get(name)?;
        let state = state.unwrap_or_else(|| State::all_active(model.node_count()));
        MipSearch::default().phi(model, &state)
    }

    /// Sweep a named network with the default search.
    pub fn sweep(&self, name: &str, selection: &StateSelection) -> Result<SweepSummary> {
        let model = self.get(name)?;
        sweep(&MipSearch::default(), model, selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xor() -> NetworkModel {
        NetworkModel::new(
            "xor_2",
            vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![1.0, 1.0], vec![0.0, 0.0]],
            vec![vec![1, 1], vec![1, 1]],
            vec!["A", "B"],
        )
        .unwrap()
    }

    #[test]
    fn state_index_is_loli() {
        assert_eq!(State::from_bits(&[1, 0, 0]).index(), 1);
        assert_eq!(State::from_bits(&[0, 0, 1]).index(), 4);
        assert_eq!(State::from_bits(&[1, 1]).index(), 3);
        for i in 0..16 {
            assert_eq!(State::from_index(i, 4).index(), i);
        }
    }

    #[test]
    fn strict_bits_reject_other_values() {
        assert_eq!(State::try_from_bits(&[1, 0, 1]).unwrap(), State::from_bits(&[1, 0, 1]));
        assert_eq!(
            State::try_from_bits(&[1, 2]).unwrap_err(),
            PhiError::InvalidBit { node: 1, value: 2 }
        );
    }

    #[test]
    fn state_display() {
        assert_eq!(State::from_bits(&[1, 0, 1]).to_string(), "(1, 0, 1)");
    }

    #[test]
    fn rejects_wrong_row_count() {
        let err = NetworkModel::new(
            "bad",
            vec![vec![0.0, 0.0]; 3],
            vec![vec![1, 1], vec![1, 1]],
            vec!["A", "B"],
        )
        .unwrap_err();
        assert!(matches!(err, PhiError::ShapeMismatch { expected: 4, actual: 3, .. }));
    }

    #[test]
    fn rejects_wrong_row_length() {
        let err = NetworkModel::new(
            "bad",
            vec![vec![0.0, 0.0], vec![0.0], vec![0.0, 0.0], vec![0.0, 0.0]],
            vec![vec![1, 1], vec![1, 1]],
            vec!["A", "B"],
        )
        .unwrap_err();
        assert!(matches!(err, PhiError::ShapeMismatch { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn rejects_non_probability() {
        let err = NetworkModel::new(
            "bad",
            vec![vec![0.0], vec![1.5]],
            vec![vec![1]],
            vec!["A"],
        )
        .unwrap_err();
        assert!(matches!(err, PhiError::InvalidProbability { row: 1, node: 0, .. }));
    }

    #[test]
    fn rejects_oversized_network() {
        let labels: Vec<String> = (0..=MAX_NODES).map(|i| format!("n{i}")).collect();
        let err = NetworkModel::new("big", vec![], vec![], labels).unwrap_err();
        assert!(matches!(err, PhiError::TooManyNodes { .. }));
    }

    #[test]
    fn from_rule_matches_literal_table() {
        let rule = NetworkModel::from_rule(
            "xor_2",
            |s| {
                let x = s.bit(0) ^ s.bit(1);
                vec![x, x]
            },
            vec![vec![1, 1], vec![1, 1]],
            vec!["A", "B"],
        )
        .unwrap();
        assert_eq!(rule, xor());
    }

    #[test]
    fn predecessors_read_columns() {
        let m = NetworkModel::new(
            "chain",
            vec![vec![0.0; 3]; 8],
            vec![vec![1, 1, 0], vec![0, 0, 1], vec![0, 0, 0]],
            vec!["A", "B", "C"],
        )
        .unwrap();
        assert_eq!(m.predecessor_mask(0), 0b001);
        assert_eq!(m.predecessor_mask(1), 0b001);
        assert_eq!(m.predecessor_mask(2), 0b010);
        assert!(m.influences(1, 2));
        assert!(!m.influences(2, 1));
    }

    #[test]
    fn check_state_length() {
        let m = xor();
        assert!(m.check_state(&State::from_bits(&[1, 1])).is_ok());
        assert_eq!(
            m.check_state(&State::from_bits(&[1, 1, 1])),
            Err(PhiError::InvalidState { expected: 2, actual: 3 })
        );
    }

    #[test]
    fn table_lookup_is_exact() {
        let mut t = NetworkTable::new();
        t.insert(xor());
        assert!(t.get("xor_2").is_ok());
        assert_eq!(
            t.get("xor_2_s11").unwrap_err(),
            PhiError::UnknownNetwork("xor_2_s11".into())
        );
        assert_eq!(t.names(), vec!["xor_2"]);
    }

    #[test]
    fn table_phi_defaults_to_all_active() {
        let mut t = NetworkTable::new();
        t.insert(xor());
        let r = t.phi("xor_2", None).unwrap();
        assert_eq!(r.state, State::from_bits(&[1, 1]));
        assert!(t.phi("missing", None).is_err());
    }
}
