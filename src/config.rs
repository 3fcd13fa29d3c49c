//! Engine tunables.
//!
//! Everything that shapes *which* states are sampled or *how* results are
//! reported lives here. The hierarchical combination weights are not
//! configuration; they are fixed constants in [`crate::hierarchical`].

/// Configuration parameters for Phi computation, sweeps and composition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhiConfig {
    /// Upper bound on states visited by a capped sweep.
    ///
    /// A capped sweep evaluates the first `min(2ⁿ, max_sweep_states)` states
    /// in state-index order.  Default: 16.
    pub max_sweep_states: usize,

    /// Decimal places kept in the reported Phi.  Default: 6.
    ///
    /// The minimisation runs on unrounded partition scores; only the value
    /// stored in [`crate::mip::PhiResult::phi`] is rounded.
    pub phi_decimals: u32,

    /// Phi value that maps to full module activation.  Default: 3.0.
    pub activation_scale: f64,

    /// Lower clamp of the module activation map.  Default: 0.1.
    pub activation_floor: f64,
}

impl Default for PhiConfig {
    fn default() -> Self {
        Self {
            max_sweep_states: 16,
            phi_decimals: 6,
            activation_scale: 3.0,
            activation_floor: 0.1,
        }
    }
}

/// Precision beyond which `f64` rounding is a no-op.
pub const MAX_PHI_DECIMALS: u32 = 15;

impl PhiConfig {
    /// Round `value` half away from zero to [`Self::phi_decimals`] places.
    ///
    /// Precision saturates at [`MAX_PHI_DECIMALS`]; a value that would
    /// overflow when scaled is returned unchanged.
    pub fn round_phi(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.phi_decimals.min(MAX_PHI_DECIMALS) as i32);
        let scaled = value * scale;
        if !scaled.is_finite() {
            return value;
        }
        scaled.round() / scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_six_places_by_default() {
        let cfg = PhiConfig::default();
        assert_eq!(cfg.round_phi(1.666_666_666), 1.666_667);
        assert_eq!(cfg.round_phi(0.0), 0.0);
    }

    #[test]
    fn custom_precision() {
        let cfg = PhiConfig { phi_decimals: 2, ..PhiConfig::default() };
        assert_eq!(cfg.round_phi(3.916_667), 3.92);
    }

    #[test]
    fn huge_precision_saturates() {
        let cfg = PhiConfig { phi_decimals: u32::MAX, ..PhiConfig::default() };
        assert_eq!(cfg.round_phi(0.0), 0.0);
        assert_eq!(cfg.round_phi(1.5), 1.5);
        assert!(!cfg.round_phi(3.916_667).is_nan());
    }
}
