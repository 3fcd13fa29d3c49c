//! Ledger record serialisation must be deterministic.
//!
//! Tests are run with `cargo test --features serde`.

#![cfg(feature = "serde")]

use phi_core::record::{PhiRecord, SweepRecord, ValidationRecord, RECORD_VERSION};
use phi_core::{phi, run_canonical_validation, sweep, MipSearch, NetworkModel, State, StateSelection};

fn majority() -> NetworkModel {
    phi_core::canonical::majority_3().unwrap()
}

/// Zero every timing field so two runs can be compared byte for byte.
fn without_timing(mut r: SweepRecord) -> SweepRecord {
    for p in &mut r.results {
        p.compute_time_us = 0;
    }
    r
}

#[test]
fn phi_record_serialises_identically_twice() {
    let r = phi(&majority(), &State::all_active(3)).unwrap();
    let rec = PhiRecord::from(&r);
    let a = serde_json::to_string(&rec).unwrap();
    let b = serde_json::to_string(&rec).unwrap();
    assert_eq!(a, b);
    assert!(a.starts_with(&format!("{{\"version\":{RECORD_VERSION},\"method\":")), "{a}");
}

#[test]
fn independent_runs_produce_identical_bytes() {
    let m = majority();
    let first = sweep(&MipSearch::default(), &m, &StateSelection::All).unwrap();
    let second = sweep(&MipSearch::default(), &m, &StateSelection::All).unwrap();
    let a = serde_json::to_vec(&without_timing(SweepRecord::from(&first))).unwrap();
    let b = serde_json::to_vec(&without_timing(SweepRecord::from(&second))).unwrap();
    assert_eq!(a, b);
}

#[test]
fn sweep_record_carries_statistics() {
    let s = sweep(&MipSearch::default(), &majority(), &StateSelection::All).unwrap();
    let rec = SweepRecord::from(&s);
    assert_eq!(rec.states_tested, 8);
    assert_eq!(rec.computed, 8);
    assert_eq!(rec.faulted, 0);
    assert_eq!(rec.phi_all_active, Some(0.0));
    assert!((rec.phi_max - 3.916_667).abs() < 1e-9);
    assert_eq!(rec.results[7].best_cut.as_ref().unwrap().part_a, vec![2]);
}

#[test]
fn record_round_trips_through_json() {
    let r = phi(&majority(), &State::from_bits(&[1, 0, 0])).unwrap();
    let rec = PhiRecord::from(&r);
    let back: PhiRecord = serde_json::from_str(&serde_json::to_string(&rec).unwrap()).unwrap();
    assert_eq!(back, rec);
}

#[test]
fn validation_record_summarises_battery() {
    let report = run_canonical_validation().unwrap();
    let rec = ValidationRecord::from(&report);
    assert_eq!((rec.passed, rec.total), (5, 5));
    assert_eq!(rec.networks.len(), 6);
    assert_eq!(rec.networks[0].display_name, "XOR-2");
    assert_eq!(rec.validations[4].name, "Majority-3 has non-zero Phi");
}

#[cfg(feature = "hierarchical")]
#[test]
fn flat_state_count_is_a_string() {
    use phi_core::hierarchical::{hierarchical_phi, MetaNetworkSpec, ModuleSet};
    use phi_core::record::HierarchicalRecord;

    let mut set = ModuleSet::new(MetaNetworkSpec {
        name: "meta".into(),
        rule: Box::new(|s| vec![s.bit(1), s.bit(0)]),
        connectivity: vec![vec![0, 1], vec![1, 0]],
        labels: vec!["left".into(), "right".into()],
    });
    set.push(majority()).unwrap();
    set.push(phi_core::canonical::recurrent_loop_3().unwrap()).unwrap();

    let rec = HierarchicalRecord::from(&hierarchical_phi(&set).unwrap());
    assert_eq!(rec.total_nodes, 6);
    assert_eq!(rec.effective_nodes, 8);
    assert_eq!(rec.flat_state_count, "256");
    assert_eq!(rec.level1.len(), 2);
}
