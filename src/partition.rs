/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! Bipartitions and the counterfactual "cut" transition law.
//!
//! # Enumeration order
//!
//! Side A runs over combinations of `r` nodes for `r = 1 … n−1`, each size
//! in lexicographic order of increasing node indices.  Since a split and
//! its mirror image score identically, only the first-found representative
//! of each unordered split is yielded: `A` is kept iff `|A| < |B|`, or
//! `|A| = |B|` and node 0 ∈ A.  That is exactly `2^(n−1) − 1` splits, and
//! the first minimum found in this order is the same one a walk over every
//! ordered split would find.
//!
//! # Severing
//!
//! For each row and target node `t`, predecessors of `t` (column `t` of the
//! connectivity matrix) split into same-side and cross-side sets:
//!
//! | cross | same | new entry |
//! |-------|------|-----------|
//! | none  | any  | unchanged |
//! | some  | some | mean of `T[·][t]` over every assignment of the cross bits |
//! | some  | none | `0.5` |
//!
//! Cross-side influence is replaced by its expectation under a uniform
//! prior, never by zero.

use core::fmt;

use crate::network::NetworkModel;

// ─── Bipartition ─────────────────────────────────────────────────────────────

/// An ordered pair of disjoint, non-empty node sets covering `{0 … n−1}`.
///
/// Stored as bitmasks (bit `i` = node `i`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Bipartition {
    part_a: u32,
    part_b: u32,
}

impl Bipartition {
    /// Build from the side-A mask of an `n`-node system.
    ///
    /// Returns `None` if either side would be empty or `mask_a` names nodes
    /// outside the system.
    pub fn from_mask(mask_a: u32, n: usize) -> Option<Self> {
        let all = full_mask(n);
        if mask_a == 0 || mask_a & !all != 0 || mask_a == all {
            return None;
        }
        Some(Self { part_a: mask_a, part_b: all & !mask_a })
    }

    /// Build from an explicit list of side-A nodes.
    pub fn from_nodes(part_a: &[usize], n: usize) -> Option<Self> {
        let mut mask = 0u32;
        for &i in part_a {
            if i >= n {
                return None;
            }
            mask |= 1 << i;
        }
        Self::from_mask(mask, n)
    }

    /// Side-A mask.
    pub fn mask_a(&self) -> u32 {
        self.part_a
    }

    /// Side-B mask.
    pub fn mask_b(&self) -> u32 {
        self.part_b
    }

    /// Side-A nodes in increasing order.
    pub fn part_a(&self) -> Vec<usize> {
        mask_nodes(self.part_a)
    }

    /// Side-B nodes in increasing order.
    pub fn part_b(&self) -> Vec<usize> {
        mask_nodes(self.part_b)
    }

    /// Mask of the side holding `node`.
    pub fn side_of(&self, node: usize) -> u32 {
        if self.part_a & (1 << node) != 0 {
            self.part_a
        } else {
            self.part_b
        }
    }

    /// True if some connectivity edge crosses the split in either direction.
    pub fn is_crossed_by(&self, model: &NetworkModel) -> bool {
        (0..model.node_count()).any(|t| model.predecessor_mask(t) & !self.side_of(t) != 0)
    }
}

impl fmt::Display for Bipartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} | {:?}", self.part_a(), self.part_b())
    }
}

fn full_mask(n: usize) -> u32 {
    if n >= 32 { u32::MAX } else { (1u32 << n) - 1 }
}

fn mask_nodes(mask: u32) -> Vec<usize> {
    (0..32).filter(|&i| mask & (1 << i) != 0).collect()
}

// ─── Enumeration ─────────────────────────────────────────────────────────────

/// Lexicographic `r`-combinations of `0 … n−1`.
///
/// Yields `[0, 1, …, r−1]` first and `[n−r, …, n−1]` last.
#[derive(Clone, Debug)]
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    first: bool,
}

impl Combinations {
    /// All `r`-subsets of `n` items.  Empty if `r > n` or `r == 0`.
    pub fn new(n: usize, r: usize) -> Self {
        Self { n, indices: (0..r).collect(), first: r > 0 && r <= n }
    }

    fn advance(&mut self) -> bool {
        let r = self.indices.len();
        // Rightmost index that can still move right.
        let Some(i) = (0..r).rev().find(|&i| self.indices[i] < self.n - r + i) else {
            return false;
        };
        self.indices[i] += 1;
        for j in i + 1..r {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        true
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.first {
            self.first = false;
            return Some(self.indices.clone());
        }
        if self.indices.is_empty() || self.indices.len() > self.n || !self.advance() {
            self.indices.clear();
            return None;
        }
        Some(self.indices.clone())
    }
}

/// Every unordered non-trivial bipartition of `n` nodes, in canonical order.
#[derive(Clone, Debug)]
pub struct Bipartitions {
    n: usize,
    r: usize,
    combos: Combinations,
}

impl Iterator for Bipartitions {
    type Item = Bipartition;

    fn next(&mut self) -> Option<Bipartition> {
        // Sizes above n/2 only repeat mirrors of earlier splits.
        while 2 * self.r <= self.n {
            for combo in self.combos.by_ref() {
                let balanced = 2 * self.r == self.n;
                if balanced && combo[0] != 0 {
                    continue;
                }
                let mask = combo.iter().fold(0u32, |m, &i| m | (1 << i));
                if let Some(split) = Bipartition::from_mask(mask, self.n) {
                    return Some(split);
                }
            }
            self.r += 1;
            self.combos = Combinations::new(self.n, self.r);
        }
        None
    }
}

/// Canonical bipartition enumeration.  Yields `2^(n−1) − 1` items; none for `n ≤ 1`.
pub fn bipartitions(n: usize) -> Bipartitions {
    Bipartitions { n, r: 1, combos: Combinations::new(n, 1) }
}

// ─── PartitionCutter ─────────────────────────────────────────────────────────

/// Transition table (row-major, stride `n`) with `split`'s cross links severed.
pub fn cut_transition_table(model: &NetworkModel, split: &Bipartition) -> Vec<f64> {
    let n = model.node_count();
    let mut cut = model.table().to_vec();

    let predecessors: Vec<u32> = (0..n).map(|t| model.predecessor_mask(t)).collect();

    for row in 0..model.state_count() {
        for (t, &preds) in predecessors.iter().enumerate() {
            let same_side = split.side_of(t);
            let cross = preds & !same_side;
            if cross == 0 {
                continue;
            }
            let same = preds & same_side;

            cut[row * n + t] = if same != 0 {
                marginalise(model, row, t, cross)
            } else {
                0.5
            };
        }
    }
    cut
}

/// Mean of `T[·][t]` over every assignment of the `cross` bits of `row`.
///
/// The `ci`-th cross source (in node order) takes bit `ci` of the
/// assignment counter.
fn marginalise(model: &NetworkModel, row: usize, t: usize, cross: u32) -> f64 {
    let sources = mask_nodes(cross);
    let combos = 1usize << sources.len();
    let base = row & !(cross as usize);

    let mut sum = 0.0;
    for k in 0..combos {
        let test_row = sources
            .iter()
            .enumerate()
            .fold(base, |r, (ci, &s)| r | (((k >> ci) & 1) << s));
        sum += model.row(test_row)[t];
    }
    sum / combos as f64
}

/// The counterfactual network: same connectivity and labels, cut table.
pub fn cut_model(model: &NetworkModel, split: &Bipartition) -> NetworkModel {
    model.with_table(cut_transition_table(model, split))
}
