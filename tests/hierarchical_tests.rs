//! Integration tests for hierarchical composition.
//!
//! Tests are run with `cargo test --features hierarchical` (on by default).

#![cfg(feature = "hierarchical")]

use phi_core::hierarchical::workspace::{self, workspace_set};
use phi_core::hierarchical::{
    hierarchical_phi, hierarchical_value, scale_factor, HierarchicalComposer, MetaNetworkSpec,
    ModuleSet, MAX_MODULES,
};
use phi_core::mip::MipOutcome;
use phi_core::{Bipartition, MipSearch, NetworkModel, PhiConfig, PhiError, PhiEvaluator, State};

const TOL: f64 = 1e-6;

fn assert_near(got: f64, want: f64, what: &str) {
    assert!((got - want).abs() < TOL, "{what}: got {got}, want {want}");
}

/// Faults only on the all-active state of networks with five or more nodes.
struct FaultAllActive(MipSearch);

impl PhiEvaluator for FaultAllActive {
    fn config(&self) -> &PhiConfig {
        self.0.config()
    }

    fn search(&self, model: &NetworkModel, state: &State) -> phi_core::Result<MipOutcome> {
        if state.is_all_active() && model.node_count() >= 5 {
            return Err(PhiError::ComputationFault("degenerate normalisation".into()));
        }
        self.0.search(model, state)
    }
}

// ─── formula ─────────────────────────────────────────────────────────────────

#[test]
fn formula_matches_direct_substitution() {
    let want = (0.5 * 0.6 + 0.3 * 0.4) * (1.0 + 0.1 * 23f64.ln());
    assert!((hierarchical_value(0.5, 0.3, 22) - want).abs() < 1e-12);
}

#[test]
fn formula_is_linear_in_components() {
    let s = scale_factor(10);
    assert!((hierarchical_value(1.0, 0.0, 10) - 0.6 * s).abs() < 1e-12);
    assert!((hierarchical_value(0.0, 1.0, 10) - 0.4 * s).abs() < 1e-12);
}

// ─── module set ──────────────────────────────────────────────────────────────

#[test]
fn workspace_modules_have_expected_sizes() {
    let set = workspace_set().unwrap();
    let sizes: Vec<usize> = set.modules().iter().map(|m| m.node_count()).collect();
    assert_eq!(sizes, vec![6, 5, 5, 6]);
    let names: Vec<&str> = set.modules().iter().map(|m| m.name()).collect();
    assert_eq!(
        names,
        vec!["ext_global_workspace", "ext_recurrence", "ext_higher_order", "ext_attention_schema"]
    );
    assert_eq!(set.total_nodes(), 22);
    assert_eq!(set.meta_network().unwrap().node_count(), 4);
}

#[test]
fn module_set_capacity_is_bounded() {
    let mut set = ModuleSet::new(workspace::meta_spec());
    for _ in 0..MAX_MODULES {
        set.push(workspace::recurrence().unwrap()).unwrap();
    }
    assert!(matches!(
        set.push(workspace::recurrence().unwrap()),
        Err(PhiError::ShapeMismatch { what: "module set capacity", .. })
    ));
}

#[test]
fn meta_network_size_must_match() {
    let mut set = ModuleSet::new(MetaNetworkSpec {
        name: "meta".into(),
        rule: Box::new(|s| vec![s.bit(1), s.bit(0)]),
        connectivity: vec![vec![0, 1], vec![1, 0]],
        labels: vec!["a".into(), "b".into()],
    });
    set.push(workspace::recurrence().unwrap()).unwrap();
    assert!(hierarchical_phi(&set).is_err());
}

// ─── composition ─────────────────────────────────────────────────────────────

#[test]
fn workspace_composition() {
    let set = workspace_set().unwrap();
    let report = hierarchical_phi(&set).unwrap();

    let maxima: Vec<f64> = report.level1.iter().map(|m| m.phi_max).collect();
    for (got, want) in maxima.iter().zip([0.375, 0.9, 0.25, 1.781_25]) {
        assert_near(*got, want, "module max");
    }
    assert_near(report.level1_avg_max_phi, 0.826_562_5, "level-1 average");
    assert_near(report.level1_total_max_phi, 3.306_25, "level-1 total");
    assert_near(report.level2_max_phi, 4.285_714, "level-2 max");

    assert_eq!(report.total_nodes, 22);
    assert_eq!(report.effective_nodes, 26);
    assert_eq!(report.flat_state_count, 1u128 << 26);
    assert_eq!(report.states_evaluated, 16 * 4 + 16);
    assert_near(report.scale_factor, scale_factor(22), "scale factor");
    assert!((report.value - 2.903_237).abs() < 1e-5, "value = {}", report.value);
    assert_near(
        report.value,
        hierarchical_value(report.level1_avg_max_phi, report.level2_max_phi, 22),
        "value recomputed",
    );
}

#[test]
fn all_active_state_is_reported_outside_the_capped_prefix() {
    let set = workspace_set().unwrap();
    let report = hierarchical_phi(&set).unwrap();

    let gw = &report.level1[0];
    assert_eq!(gw.states_tested, 16);
    assert_near(gw.phi_active, 0.25, "gw active");
    assert_eq!(gw.mip_active, Bipartition::from_nodes(&[0], 6));

    let attention = &report.level1[3];
    assert_near(attention.phi_active, 1.05, "attention active");
    assert_eq!(attention.mip_active, Bipartition::from_nodes(&[3], 6));

    assert_near(report.level2.phi_active, 0.266_667, "meta active");
    assert_eq!(report.level2.mip_active, Bipartition::from_nodes(&[0, 2], 4));
}

#[test]
fn activations_are_reported_for_modules_only() {
    let set = workspace_set().unwrap();
    let report = hierarchical_phi(&set).unwrap();

    let activations: Vec<f64> = report.level1.iter().map(|m| m.activation.unwrap()).collect();
    assert_near(activations[0], 0.125, "gw activation");
    assert_near(activations[1], 0.3, "recurrence activation");
    assert_near(activations[2], 0.1, "higher-order activation (floor)");
    assert_near(activations[3], 0.593_75, "attention activation");
    assert!(report.level2.activation.is_none());
}

#[test]
fn composer_respects_sweep_cap() {
    let set = workspace_set().unwrap();
    let engine = MipSearch::new(PhiConfig { max_sweep_states: 4, ..PhiConfig::default() });
    let report = HierarchicalComposer::new(engine).compose(&set).unwrap();
    assert!(report.level1.iter().all(|m| m.states_tested == 4));
    assert_eq!(report.states_evaluated, 4 * 5);
    assert!(report.level1.iter().all(|m| m.faulted == 0));
}

#[test]
fn all_active_fault_outside_prefix_is_counted() {
    let set = workspace_set().unwrap();
    let report = HierarchicalComposer::new(FaultAllActive(MipSearch::default()))
        .compose(&set)
        .unwrap();

    for m in &report.level1 {
        assert_eq!(m.phi_active, 0.0, "{}", m.name);
        assert!(m.mip_active.is_none());
        assert_eq!(m.faulted, 1, "{}", m.name);
        assert_eq!(m.diagnostics.len(), 1);
        assert!(m.diagnostics[0].contains("degenerate normalisation"), "{:?}", m.diagnostics);
        assert_eq!(m.states_tested, 16);
    }
    assert_near(report.level1[0].phi_max, 0.375, "prefix statistics unaffected");

    assert_eq!(report.level2.faulted, 0);
    assert!(report.level2.diagnostics.is_empty());
}
