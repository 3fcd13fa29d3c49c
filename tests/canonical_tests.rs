//! Integration tests for the canonical gate battery.

use phi_core::canonical::{
    and_2, feedforward_chain_3, majority_3, or_2, recurrent_loop_3, xor_2, CanonicalValidator,
};
use phi_core::{run_canonical_validation, sweep, Bipartition, MipSearch, StateSelection};

const TOL: f64 = 1e-9;

fn per_state(model: phi_core::Result<phi_core::NetworkModel>) -> Vec<f64> {
    let m = model.unwrap();
    sweep(&MipSearch::default(), &m, &StateSelection::All)
        .unwrap()
        .results
        .iter()
        .map(|r| r.phi)
        .collect()
}

fn assert_close(got: &[f64], want: &[f64]) {
    assert_eq!(got.len(), want.len());
    for (i, (g, w)) in got.iter().zip(want).enumerate() {
        assert!((g - w).abs() < TOL, "state {i}: got {g}, want {w}");
    }
}

#[test]
fn every_ordering_holds() {
    let report = run_canonical_validation().unwrap();
    assert_eq!(report.total(), 5);
    assert_eq!(report.passed(), 5, "{:#?}", report.validations);
    assert!(report.all_passed());
    assert_eq!(report.pass_rate(), 100.0);
}

#[test]
fn validations_are_reported_in_fixed_order() {
    let report = run_canonical_validation().unwrap();
    let names: Vec<&str> = report.validations.iter().map(|v| v.name).collect();
    assert_eq!(
        names,
        vec![
            "XOR > AND",
            "XOR > OR",
            "Recurrent Loop > Feedforward Chain",
            "Recurrent Loop(active) >= Feedforward Chain(active)",
            "Majority-3 has non-zero Phi",
        ]
    );
    assert_eq!(report.validations[0].values, "XOR_max=3.500000 vs AND_max=2.000000");
}

#[test]
fn gate_phi_per_state() {
    assert_close(&per_state(xor_2()), &[1.5, 3.5, 3.5, 1.5]);
    assert_close(&per_state(and_2()), &[0.0, 2.0, 1.666_667, 1.0]);
    assert_close(&per_state(or_2()), &[1.0, 1.666_667, 2.0, 0.0]);
}

#[test]
fn three_node_phi_per_state() {
    assert_close(
        &per_state(majority_3()),
        &[0.0, 3.0, 3.5, 3.916_667, 3.916_667, 3.5, 3.0, 0.0],
    );
    assert_close(&per_state(feedforward_chain_3()), &[0.5; 8]);
    assert_close(
        &per_state(recurrent_loop_3()),
        &[2.5, 1.0, 1.75, 1.25, 1.25, 1.75, 1.0, 2.5],
    );
}

#[test]
fn report_exposes_all_active_values() {
    let report = run_canonical_validation().unwrap();

    let ring = report.network("recurrent_loop").unwrap();
    assert!((ring.phi_all_active() - 2.5).abs() < TOL);
    assert_eq!(ring.mip_active(), Bipartition::from_nodes(&[1], 3));
    assert_eq!(ring.nodes, 3);

    let chain = report.network("feedforward_chain").unwrap();
    assert!((chain.phi_all_active() - 0.5).abs() < TOL);
    assert_eq!(chain.mip_active(), Bipartition::from_nodes(&[0], 3));

    let majority = report.network("majority_3").unwrap();
    assert_eq!(majority.mip_active(), Bipartition::from_nodes(&[2], 3));

    assert_eq!(report.networks.len(), 6);
    assert!(report.networks.iter().all(|n| n.sweep.faulted == 0));
}

#[test]
fn validator_accepts_custom_engine() {
    let report = CanonicalValidator::new(MipSearch::default()).run().unwrap();
    let xor = report.network("xor_2").unwrap();
    assert_eq!(xor.sweep.states_tested(), 4);
    assert_eq!(xor.display_name, "XOR-2");
}
