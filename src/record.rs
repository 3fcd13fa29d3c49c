//! Ledger records: flat, serialisable snapshots of computation results.
//!
//! Records are what an append-only, hash-chained ledger stores.  The ledger
//! hashes the serialised bytes, so two serialisations of the same result
//! must be byte-identical:
//!
//! - every record is a plain struct, and serde emits struct fields in
//!   declaration order;
//! - no `HashMap`s, only `Vec`s in a fixed order;
//! - durations are integer microseconds, bipartitions are sorted node lists,
//!   states are 0/1 byte lists.
//!
//! Records are one-way snapshots built with `From`; they are not turned
//! back into live results.
//!
//! # Example
//!
//! ```rust,ignore
//! use phi_core::record::PhiRecord;
//!
//! let r = phi_core::phi(&model, &state)?;
//! let json = serde_json::to_string(&PhiRecord::from(&r))?;
//! ```
//!
//! Requires the `serde` feature.

use serde::{Deserialize, Serialize};

use crate::canonical::{NetworkReport, Validation, ValidationReport};
use crate::mip::{PhiResult, METHOD};
use crate::partition::Bipartition;
use crate::sweep::SweepSummary;

/// Current record format version.
pub const RECORD_VERSION: u16 = 1;

/// A bipartition as two sorted node lists.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CutRecord {
    /// Side A node indices, ascending.
    pub part_a: Vec<usize>,
    /// Side B node indices, ascending.
    pub part_b: Vec<usize>,
}

impl From<&Bipartition> for CutRecord {
    fn from(b: &Bipartition) -> Self {
        Self { part_a: b.part_a(), part_b: b.part_b() }
    }
}

/// One per-state Phi result.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PhiRecord {
    /// Always [`RECORD_VERSION`] for newly created records.
    pub version: u16,
    /// What the value measures.
    pub method: String,
    /// Network identity.
    pub network: String,
    /// State as 0/1 per node.
    pub state: Vec<u8>,
    /// Rounded Phi-proxy.
    pub phi: f64,
    /// Minimum information partition, if any.
    pub best_cut: Option<CutRecord>,
    /// Bipartitions scored.
    pub partitions_evaluated: usize,
    /// Wall-clock search time in microseconds.
    pub compute_time_us: u64,
    /// `true` if the state faulted.
    pub faulted: bool,
    /// Fault description, if any.
    pub diagnostic: Option<String>,
}

impl From<&PhiResult> for PhiRecord {
    fn from(r: &PhiResult) -> Self {
        Self {
            version: RECORD_VERSION,
            method: METHOD.to_owned(),
            network: r.network.clone(),
            state: r.state.to_bits(),
            phi: r.phi,
            best_cut: r.best_cut.as_ref().map(CutRecord::from),
            partitions_evaluated: r.partitions_evaluated,
            compute_time_us: u64::try_from(r.compute_time.as_micros()).unwrap_or(u64::MAX),
            faulted: r.is_faulted(),
            diagnostic: r.diagnostic().map(str::to_owned),
        }
    }
}

/// Sweep statistics plus every per-state record.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SweepRecord {
    /// Always [`RECORD_VERSION`] for newly created records.
    pub version: u16,
    /// What the values measure.
    pub method: String,
    /// Network identity.
    pub network: String,
    /// Phi at the all-active state, if it was visited and computed.
    pub phi_all_active: Option<f64>,
    /// Largest computed Phi.
    pub phi_max: f64,
    /// Smallest computed Phi.
    pub phi_min: f64,
    /// Mean computed Phi.
    pub phi_mean: f64,
    /// States visited.
    pub states_tested: usize,
    /// States that produced a value.
    pub computed: usize,
    /// States that faulted.
    pub faulted: usize,
    /// Per-state records in visit order.
    pub results: Vec<PhiRecord>,
}

impl From<&SweepSummary> for SweepRecord {
    fn from(s: &SweepSummary) -> Self {
        Self {
            version: RECORD_VERSION,
            method: METHOD.to_owned(),
            network: s.network.clone(),
            phi_all_active: s.all_active().filter(|r| !r.is_faulted()).map(|r| r.phi),
            phi_max: s.max,
            phi_min: s.min,
            phi_mean: s.mean,
            states_tested: s.states_tested(),
            computed: s.count,
            faulted: s.faulted,
            results: s.results.iter().map(PhiRecord::from).collect(),
        }
    }
}

/// One canonical battery network.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NetworkRecord {
    /// Human-readable name.
    pub display_name: String,
    /// Expected qualitative behaviour.
    pub expectation: String,
    /// Node count.
    pub nodes: usize,
    /// MIP at the all-active state.
    pub mip_active: Option<CutRecord>,
    /// Full sweep.
    pub sweep: SweepRecord,
}

impl From<&NetworkReport> for NetworkRecord {
    fn from(n: &NetworkReport) -> Self {
        Self {
            display_name: n.display_name.to_owned(),
            expectation: n.expectation.to_owned(),
            nodes: n.nodes,
            mip_active: n.mip_active().as_ref().map(CutRecord::from),
            sweep: SweepRecord::from(&n.sweep),
        }
    }
}

/// One ordering assertion.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ValidationEntry {
    /// What is asserted.
    pub name: String,
    /// Outcome.
    pub passed: bool,
    /// Compared values.
    pub values: String,
}

impl From<&Validation> for ValidationEntry {
    fn from(v: &Validation) -> Self {
        Self { name: v.name.to_owned(), passed: v.passed, values: v.values.clone() }
    }
}

/// Full canonical validation run.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ValidationRecord {
    /// Always [`RECORD_VERSION`] for newly created records.
    pub version: u16,
    /// What the values measure.
    pub method: String,
    /// Battery networks in battery order.
    pub networks: Vec<NetworkRecord>,
    /// Assertions in a fixed order.
    pub validations: Vec<ValidationEntry>,
    /// Assertions that held.
    pub passed: usize,
    /// Assertions evaluated.
    pub total: usize,
    /// Pass percentage, one decimal.
    pub pass_rate: f64,
}

impl From<&ValidationReport> for ValidationRecord {
    fn from(r: &ValidationReport) -> Self {
        Self {
            version: RECORD_VERSION,
            method: METHOD.to_owned(),
            networks: r.networks.iter().map(NetworkRecord::from).collect(),
            validations: r.validations.iter().map(ValidationEntry::from).collect(),
            passed: r.passed(),
            total: r.total(),
            pass_rate: r.pass_rate(),
        }
    }
}

#[cfg(feature = "hierarchical")]
pub use self::hierarchical_records::{HierarchicalRecord, LevelRecord};

#[cfg(feature = "hierarchical")]
mod hierarchical_records {
    use serde::{Deserialize, Serialize};

    use super::{CutRecord, RECORD_VERSION};
    use crate::hierarchical::{HierarchicalReport, LevelReport};
    use crate::mip::METHOD;

    /// One network of a hierarchy.
    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    pub struct LevelRecord {
        /// Network identity.
        pub name: String,
        /// Node count.
        pub nodes: usize,
        /// Node labels.
        pub labels: Vec<String>,
        /// Phi at the all-active state.
        pub phi_active: f64,
        /// MIP at the all-active state.
        pub mip_active: Option<CutRecord>,
        /// Largest sampled Phi.
        pub phi_max: f64,
        /// Smallest sampled Phi.
        pub phi_min: f64,
        /// Mean sampled Phi.
        pub phi_mean: f64,
        /// States sampled.
        pub states_tested: usize,
        /// Sampled states that faulted.
        pub faulted: usize,
        /// Fault diagnostics.
        pub diagnostics: Vec<String>,
        /// Mapped activation (modules only).
        pub activation: Option<f64>,
    }

    impl From<&LevelReport> for LevelRecord {
        fn from(l: &LevelReport) -> Self {
            Self {
                name: l.name.clone(),
                nodes: l.nodes,
                labels: l.labels.clone(),
                phi_active: l.phi_active,
                mip_active: l.mip_active.as_ref().map(CutRecord::from),
                phi_max: l.phi_max,
                phi_min: l.phi_min,
                phi_mean: l.phi_mean,
                states_tested: l.states_tested,
                faulted: l.faulted,
                diagnostics: l.diagnostics.clone(),
                activation: l.activation,
            }
        }
    }

    /// Full hierarchical composition.
    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    pub struct HierarchicalRecord {
        /// Always [`RECORD_VERSION`] for newly created records.
        pub version: u16,
        /// What the values measure.
        pub method: String,
        /// Composite value.
        pub value: f64,
        /// Modules in module order.
        pub level1: Vec<LevelRecord>,
        /// Meta-network.
        pub level2: LevelRecord,
        /// Mean of module maxima.
        pub level1_avg_max_phi: f64,
        /// Sum of module maxima.
        pub level1_total_max_phi: f64,
        /// Meta-network maximum.
        pub level2_max_phi: f64,
        /// Sum of module node counts.
        pub total_nodes: usize,
        /// Logarithmic size factor.
        pub scale_factor: f64,
        /// Module plus meta nodes.
        pub effective_nodes: usize,
        /// Flat state count as a decimal string (exceeds JSON number range).
        pub flat_state_count: String,
        /// States evaluated across both levels.
        pub states_evaluated: usize,
    }

    impl From<&HierarchicalReport> for HierarchicalRecord {
        fn from(h: &HierarchicalReport) -> Self {
            Self {
                version: RECORD_VERSION,
                method: METHOD.to_owned(),
                value: h.value,
                level1: h.level1.iter().map(LevelRecord::from).collect(),
                level2: LevelRecord::from(&h.level2),
                level1_avg_max_phi: h.level1_avg_max_phi,
                level1_total_max_phi: h.level1_total_max_phi,
                level2_max_phi: h.level2_max_phi,
                total_nodes: h.total_nodes,
                scale_factor: h.scale_factor,
                effective_nodes: h.effective_nodes,
                flat_state_count: h.flat_state_count.to_string(),
                states_evaluated: h.states_evaluated,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mip::phi;
    use crate::network::{NetworkModel, State};

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
    fn phi_record_flattens_result() {
        let r = phi(&xor(), &State::from_bits(&[1, 1])).unwrap();
        let rec = PhiRecord::from(&r);
        assert_eq!(rec.version, RECORD_VERSION);
        assert_eq!(rec.method, METHOD);
        assert_eq!(rec.state, vec![1, 1]);
        assert_eq!(rec.best_cut, Some(CutRecord { part_a: vec![0], part_b: vec![1] }));
        assert!(!rec.faulted);
        assert!(rec.diagnostic.is_none());
    }

    #[test]
    fn field_order_follows_declaration() {
        let r = phi(&xor(), &State::from_bits(&[0, 1])).unwrap();
        let mut rec = PhiRecord::from(&r);
        rec.compute_time_us = 0;
        let json = serde_json::to_string(&rec).unwrap();
        let keys = [
            "\"version\"",
            "\"method\"",
            "\"network\"",
            "\"state\"",
            "\"phi\"",
            "\"best_cut\"",
            "\"partitions_evaluated\"",
            "\"compute_time_us\"",
            "\"faulted\"",
            "\"diagnostic\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
    }
}
