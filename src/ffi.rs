//! Python FFI bindings via PyO3.
//!
//! Exposes network construction, per-state Phi, sweeps, the canonical
//! battery and the hierarchical formula to Python.  Module composition is
//! Rust-only: its meta-network rule is a closure.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! from phi_core import Network, run_canonical_validation, hierarchical_phi_value
//!
//! xor = Network([[0, 0], [1, 1], [1, 1], [0, 0]], [[1, 1], [1, 1]], ["A", "B"], "xor_2")
//! r = xor.phi()                 # all-active state by default
//! print(r.phi, r.best_cut)      # 1.5 ([0], [1])
//! s = xor.sweep()
//! print(s.max, s.mean, s.faulted)
//!
//! report = run_canonical_validation()
//! print(f"{report.passed}/{report.total}")
//! print(hierarchical_phi_value(0.5, 0.3, 22))
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::canonical::{run_canonical_validation as run_battery, ValidationReport};
use crate::config::PhiConfig;
use crate::error::PhiError;
use crate::hierarchical::hierarchical_value;
use crate::mip::{MipSearch, PhiEvaluator, PhiResult, METHOD};
use crate::network::{NetworkModel, State};
use crate::sweep::{sweep, StateSelection, SweepSummary};

impl From<PhiError> for PyErr {
    fn from(e: PhiError) -> Self {
        PyValueError::new_err(e.to_string())
    }
}

// ── Results ──────────────────────────────────────────────────────────────────

/// Phi-proxy of one state.
#[pyclass(name = "PhiResult", frozen)]
#[derive(Clone)]
pub struct PyPhiResult {
    inner: PhiResult,
}

#[pymethods]
impl PyPhiResult {
    /// Network name.
    #[getter]
    pub fn network(&self) -> &str {
        &self.inner.network
    }
    /// State as a list of 0/1.
    #[getter]
    pub fn state(&self) -> Vec<u8> {
        self.inner.state.to_bits()
    }
    /// Rounded Phi-proxy (0.0 if faulted).
    #[getter]
    pub fn phi(&self) -> f64 {
        self.inner.phi
    }
    /// Minimum information partition as `(part_a, part_b)`, or None.
    #[getter]
    pub fn best_cut(&self) -> Option<(Vec<usize>, Vec<usize>)> {
        self.inner.best_cut.map(|c| (c.part_a(), c.part_b()))
    }
    /// Bipartitions scored.
    #[getter]
    pub fn partitions_evaluated(&self) -> usize {
        self.inner.partitions_evaluated
    }
    /// Search time in seconds.
    #[getter]
    pub fn compute_time(&self) -> f64 {
        self.inner.compute_time.as_secs_f64()
    }
    /// True if the computation faulted.
    #[getter]
    pub fn faulted(&self) -> bool {
        self.inner.is_faulted()
    }
    /// Fault description, or None.
    #[getter]
    pub fn diagnostic(&self) -> Option<String> {
        self.inner.diagnostic().map(str::to_owned)
    }
    /// What the value measures.
    #[getter]
    pub fn method(&self) -> &'static str {
        METHOD
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        format!(
            "PhiResult(network='{}', state={}, phi={:.6})",
            self.inner.network, self.inner.state, self.inner.phi
        )
    }
}

/// Aggregated statistics of a sweep.
#[pyclass(name = "SweepSummary", frozen)]
pub struct PySweepSummary {
    inner: SweepSummary,
}

#[pymethods]
impl PySweepSummary {
    /// Network name.
    #[getter]
    pub fn network(&self) -> &str {
        &self.inner.network
    }
    /// Largest computed Phi.
    #[getter]
    pub fn max(&self) -> f64 {
        self.inner.max
    }
    /// Smallest computed Phi.
    #[getter]
    pub fn min(&self) -> f64 {
        self.inner.min
    }
    /// Mean computed Phi.
    #[getter]
    pub fn mean(&self) -> f64 {
        self.inner.mean
    }
    /// States that produced a value.
    #[getter]
    pub fn count(&self) -> usize {
        self.inner.count
    }
    /// States that faulted.
    #[getter]
    pub fn faulted(&self) -> usize {
        self.inner.faulted
    }
    /// States visited.
    #[getter]
    pub fn states_tested(&self) -> usize {
        self.inner.states_tested()
    }
    /// Phi at the all-active state, if it was visited.
    #[getter]
    pub fn phi_all_active(&self) -> Option<f64> {
        self.inner.all_active().map(|r| r.phi)
    }
    /// Per-state results in visit order.
    #[getter]
    pub fn results(&self) -> Vec<PyPhiResult> {
        self.inner.results.iter().cloned().map(|inner| PyPhiResult { inner }).collect()
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        format!(
            "SweepSummary(network='{}', max={:.6}, min={:.6}, mean={:.6}, states={})",
            self.inner.network,
            self.inner.max,
            self.inner.min,
            self.inner.mean,
            self.inner.states_tested()
        )
    }
}

/// Canonical battery outcome.
#[pyclass(name = "ValidationReport", frozen)]
pub struct PyValidationReport {
    inner: ValidationReport,
}

#[pymethods]
impl PyValidationReport {
    /// Assertions that held.
    #[getter]
    pub fn passed(&self) -> usize {
        self.inner.passed()
    }
    /// Assertions evaluated.
    #[getter]
    pub fn total(&self) -> usize {
        self.inner.total()
    }
    /// Pass percentage, one decimal.
    #[getter]
    pub fn pass_rate(&self) -> f64 {
        self.inner.pass_rate()
    }
    /// `(name, passed, values)` per assertion.
    #[getter]
    pub fn validations(&self) -> Vec<(String, bool, String)> {
        self.inner
            .validations
            .iter()
            .map(|v| (v.name.to_owned(), v.passed, v.values.clone()))
            .collect()
    }
    /// `(display_name, phi_max, phi_all_active)` per battery network.
    #[getter]
    pub fn networks(&self) -> Vec<(String, f64, f64)> {
        self.inner
            .networks
            .iter()
            .map(|n| (n.display_name.to_owned(), n.sweep.max, n.phi_all_active()))
            .collect()
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        format!("ValidationReport(passed={}, total={})", self.inner.passed(), self.inner.total())
    }
}

// ── Network ──────────────────────────────────────────────────────────────────

/// A small Boolean network.
///
/// Args:
///     tpm:    2^n rows of n activation probabilities (row index = Σ bit[i]·2^i)
///     cm:     n×n connectivity, cm[i][j] = 1 if node i influences node j
///     labels: n node labels
///     name:   network identity (default "network")
#[pyclass(name = "Network", frozen)]
pub struct PyNetwork {
    model: NetworkModel,
    engine: MipSearch,
}

#[pymethods]
impl PyNetwork {
    /// Validate and build a network.  Raises ValueError on bad shapes.
    #[new]
    #[pyo3(signature = (tpm, cm, labels, name="network".to_owned()))]
    pub fn new(
        tpm: Vec<Vec<f64>>,
        cm: Vec<Vec<u8>>,
        labels: Vec<String>,
        name: String,
    ) -> PyResult<Self> {
        Ok(Self {
            model: NetworkModel::new(name, tpm, cm, labels)?,
            engine: MipSearch::new(PhiConfig::default()),
        })
    }

    /// Network identity.
    #[getter]
    pub fn name(&self) -> &str {
        self.model.name()
    }
    /// Node count.
    #[getter]
    pub fn node_count(&self) -> usize {
        self.model.node_count()
    }
    /// Node labels.
    #[getter]
    pub fn labels(&self) -> Vec<String> {
        self.model.labels().to_vec()
    }

    /// Phi-proxy at `state` (list of 0/1); all-active if omitted.
    ///
    /// Raises ValueError for entries other than 0 or 1.
    #[pyo3(signature = (state=None))]
    pub fn phi(&self, state: Option<Vec<u8>>) -> PyResult<PyPhiResult> {
        let state = match state {
            Some(bits) => State::try_from_bits(&bits)?,
            None => State::all_active(self.model.node_count()),
        };
        Ok(PyPhiResult { inner: self.engine.phi(&self.model, &state)? })
    }

    /// Sweep the first `max_states` states; all 2^n if omitted.
    #[pyo3(signature = (max_states=None))]
    pub fn sweep(&self, max_states: Option<usize>) -> PyResult<PySweepSummary> {
        let selection = max_states.map_or(StateSelection::All, StateSelection::First);
        Ok(PySweepSummary { inner: sweep(&self.engine, &self.model, &selection)? })
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        format!("Network(name='{}', nodes={})", self.model.name(), self.model.node_count())
    }
}

// ── Functions ────────────────────────────────────────────────────────────────

/// Sweep the canonical gate battery and evaluate every ordering assertion.
#[pyfunction]
pub fn run_canonical_validation() -> PyResult<PyValidationReport> {
    Ok(PyValidationReport { inner: run_battery()? })
}

/// `(l1_avg × 0.6 + l2_max × 0.4) × (1 + 0.1 · ln(1 + total_nodes))`.
#[pyfunction]
pub fn hierarchical_phi_value(l1_avg: f64, l2_max: f64, total_nodes: usize) -> f64 {
    hierarchical_value(l1_avg, l2_max, total_nodes)
}

// ── Module entry point ────────────────────────────────────────────────────────

/// Phi-proxy bindings for small Boolean networks.
#[pymodule]
pub fn phi_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyNetwork>()?;
    m.add_class::<PyPhiResult>()?;
    m.add_class::<PySweepSummary>()?;
    m.add_class::<PyValidationReport>()?;
    m.add_function(wrap_pyfunction!(run_canonical_validation, m)?)?;
    m.add_function(wrap_pyfunction!(hierarchical_phi_value, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("METHOD", METHOD)?;
    m.add("MAX_NODES", crate::network::MAX_NODES)?;
    Ok(())
}
