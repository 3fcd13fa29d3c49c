//! Error kinds for network construction, lookup and Phi computation.
//!
//! Construction and call-site errors fail fast through [`Result`].
//! [`PhiError::ComputationFault`] is the one kind that is caught: the
//! search boundary in [`crate::mip`] turns it into a faulted
//! [`crate::mip::PhiResult`] so a batch of states never aborts.

use thiserror::Error;

/// Root error type for all phi-core failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhiError {
    /// Transition table or connectivity matrix has the wrong shape.
    #[error("shape mismatch in {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Which part of the network definition is malformed.
        what: &'static str,
        /// Required length.
        expected: usize,
        /// Observed length.
        actual: usize,
    },

    /// Network is larger than the exhaustive search can handle.
    #[error("network has {nodes} nodes, at most {max} are supported")]
    TooManyNodes {
        /// Requested node count.
        nodes: usize,
        /// Supported maximum.
        max: usize,
    },

    /// Transition-table entry is not a probability.
    #[error("transition table entry [{row}][{node}] = {value} is not a probability in [0, 1]")]
    InvalidProbability {
        /// Row (state index).
        row: usize,
        /// Target node.
        node: usize,
        /// Offending value.
        value: f64,
    },

    /// Lookup of a network identifier that was never declared.
    #[error("network '{0}' not found")]
    UnknownNetwork(String),

    /// State vector length does not match the network's node count.
    #[error("state has {actual} bits, network has {expected} nodes")]
    InvalidState {
        /// Node count of the network.
        expected: usize,
        /// Length of the supplied state.
        actual: usize,
    },

    /// State entry other than 0 or 1.
    #[error("state entry {node} is {value}, expected 0 or 1")]
    InvalidBit {
        /// Node index.
        node: usize,
        /// Offending value.
        value: u8,
    },

    /// Numerical failure while computing a distance or partition score.
    #[error("computation fault: {0}")]
    ComputationFault(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, PhiError>;
