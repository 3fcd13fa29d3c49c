//! # phi-core
//!
//! Phi-proxy: a partition-based integration heuristic for small Boolean
//! networks.
//!
//! ---
//!
//! ## This is a proxy, not IIT 3.0/4.0.
//!
//! A network of up to eight binary nodes is described by a state-by-node
//! transition table and a directed connectivity matrix.  For one current
//! state the engine asks: *how much does the system's cause/effect profile
//! change when the network is cut in two?*  The smallest such change, over
//! every bipartition, is the Phi-proxy of that state.
//!
//! **Distance** is an effect-side L1 distance plus a cause-side earth
//! mover's distance against a uniform prior.
//!
//! **Cut** replaces every cross-partition influence by its average,
//! leaving same-side influences untouched.
//!
//! **Search** is exhaustive over the `2^(n−1) − 1` unordered bipartitions.
//!
//! ---
//!
//! ## The pipeline
//!
//! ```text
//! NetworkModel ─► MipSearch ─► PhiResult
//!       │             │
//!       │       bipartitions + cut_model + whole_system_distance
//!       ▼
//!  sweep ─► SweepSummary ─► CanonicalValidator / HierarchicalComposer
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`network`] | [`NetworkModel`], [`State`], [`NetworkTable`] | Validated transition tables, state encoding, registry |
//! | [`distance`] | [`DistanceBreakdown`] | Effect L1 + cause EMD of one state |
//! | [`partition`] | [`Bipartition`] | Canonical enumeration and cut tables |
//! | [`mip`] | [`MipSearch`], [`PhiResult`], [`PhiEvaluator`] | Minimum-information-partition search |
//! | [`sweep`] | [`SweepSummary`], [`StateSelection`] | Phi over many states |
//! | [`canonical`] | [`ValidationReport`] | Gate battery with fixed ordering checks |
//! | [`hierarchical`] | [`hierarchical::HierarchicalReport`] | Modules + meta-network composition (requires `hierarchical`) |
//! | [`record`] | [`record::PhiRecord`] | Stable serialisable records (requires `serde`) |
//! | [`config`] | [`PhiConfig`] | Engine tunables |
//! | [`error`] | [`PhiError`] | Error kinds |
//!
//! ## Quick start
//!
//! ```rust
//! use phi_core::{phi, NetworkModel, State};
//!
//! let xor = NetworkModel::new(
//!     "xor_2",
//!     vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![1.0, 1.0], vec![0.0, 0.0]],
//!     vec![vec![1, 1], vec![1, 1]],
//!     vec!["A", "B"],
//! )?;
//! let r = phi(&xor, &State::from_bits(&[1, 1]))?;
//! assert!((r.phi - 1.5).abs() < 1e-9);
//! # Ok::<(), phi_core::PhiError>(())
//! ```
//!
//! ## Logging
//!
//! Every layer emits [`tracing`] events: `debug` per state, `warn` per
//! fault, `info` per sweep and composition.  Install any subscriber to see
//! them; without one they are free.
//!
//! ## License
//!
//! Business Source License 1.1.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod error;
pub mod network;
pub mod distance;
pub mod partition;
pub mod mip;
pub mod sweep;
pub mod canonical;

/// Level-1 modules plus a Level-2 meta-network.
///
/// Enabled by `features = ["hierarchical"]`.
#[cfg(feature = "hierarchical")]
pub mod hierarchical;

#[cfg(feature = "serde")]
pub mod record;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use canonical::{run_canonical_validation, CanonicalValidator, ValidationReport};
pub use config::PhiConfig;
pub use distance::{distance_breakdown, whole_system_distance, DistanceBreakdown};
pub use error::{PhiError, Result};
pub use mip::{phi, MipSearch, PhiEvaluator, PhiResult, PhiStatus};
pub use network::{NetworkModel, NetworkTable, State, MAX_NODES};
pub use partition::{bipartitions, Bipartition};
pub use sweep::{sweep, StateSelection, SweepSummary};
