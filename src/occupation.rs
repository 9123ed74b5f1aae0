//! Occupation components: galaxy counts per halo
//!
//! Each component gives the probability distribution of the number of
//! galaxies of one class hosted by a halo of a given mass. Centrals follow
//! nearest-integer statistics with an erf first moment; satellites follow
//! Poisson statistics with a truncated power-law first moment, as in
//! Zheng et al. (2007).

use std::collections::BTreeMap;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Poisson};

use crate::defaults::{
    published_params, PARAM_ALPHA, PARAM_LOG_M0, PARAM_LOG_M1, PARAM_LOG_MMIN, PARAM_SIGMA_LOGM,
};
use crate::error::HodError;
use crate::options::FeatureOptions;

/// Sub-model for the galaxy count distribution of one population.
pub trait OccupationComponent: Send + Sync {
    /// First moment of the occupation distribution at a halo mass (Msun/h).
    fn mean_occupation(&self, mass: f64) -> f64;

    /// Draw a galaxy count for a halo of the given mass.
    fn mc_occupation(&self, mass: f64, rng: &mut ChaCha8Rng) -> u32;

    /// Luminosity threshold the component was built for.
    fn threshold(&self) -> f64;

    /// Parameter map of the component.
    fn params(&self) -> &BTreeMap<String, f64>;

    /// Whether the composite factory should skip the repeated-parameter
    /// warning for this component's parameter names.
    fn suppress_repeated_param_warning(&self) -> bool;
}

// =============================================================================
// CENTRALS
// =============================================================================

/// Central occupation: nearest-integer statistics, erf first moment.
///
/// `<Ncen> = 0.5 * (1 + erf((log10 M - logMmin) / sigma_logM))`, bounded in
/// [0, 1] by construction, so the realization is a Bernoulli draw.
pub struct CentralOccupation {
    threshold: f64,
    params: BTreeMap<String, f64>,
    suppress_repeated_param_warning: bool,
}

impl CentralOccupation {
    /// Build from the published parameters at `threshold`, with `options`
    /// overrides applied on top.
    pub fn new(threshold: f64, options: &FeatureOptions) -> Result<Self, HodError> {
        let mut params = published_params(threshold)?.param_dict();
        options.apply_overrides(&mut params);
        Ok(Self {
            threshold,
            params,
            suppress_repeated_param_warning: false,
        })
    }

    /// Flip the repeated-parameter warning suppression flag.
    pub fn set_suppress_repeated_param_warning(&mut self, suppress: bool) {
        self.suppress_repeated_param_warning = suppress;
    }
}

impl OccupationComponent for CentralOccupation {
    fn mean_occupation(&self, mass: f64) -> f64 {
        let log_mmin = self.params[PARAM_LOG_MMIN];
        let sigma = self.params[PARAM_SIGMA_LOGM];
        0.5 * (1.0 + libm::erf((mass.log10() - log_mmin) / sigma))
    }

    fn mc_occupation(&self, mass: f64, rng: &mut ChaCha8Rng) -> u32 {
        let mean = self.mean_occupation(mass);
        if rng.gen::<f64>() < mean {
            1
        } else {
            0
        }
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn params(&self) -> &BTreeMap<String, f64> {
        &self.params
    }

    fn suppress_repeated_param_warning(&self) -> bool {
        self.suppress_repeated_param_warning
    }
}

// =============================================================================
// SATELLITES
// =============================================================================

/// Satellite occupation: Poisson statistics, truncated power-law first moment.
///
/// `<Nsat> = ((M - M0) / M1)^alpha` for `M > M0`, zero otherwise. With
/// `modulate_with_cenocc` the first moment is additionally multiplied by the
/// central mean occupation at the same mass.
pub struct SatelliteOccupation {
    threshold: f64,
    params: BTreeMap<String, f64>,
    modulate_with_cenocc: bool,
    suppress_repeated_param_warning: bool,
}

impl SatelliteOccupation {
    /// Build from the published parameters at `threshold`, with `options`
    /// overrides applied on top.
    pub fn new(threshold: f64, options: &FeatureOptions) -> Result<Self, HodError> {
        let mut params = published_params(threshold)?.param_dict();
        options.apply_overrides(&mut params);
        Ok(Self {
            threshold,
            params,
            modulate_with_cenocc: options.modulate_with_cenocc,
            suppress_repeated_param_warning: false,
        })
    }

    /// Flip the repeated-parameter warning suppression flag.
    pub fn set_suppress_repeated_param_warning(&mut self, suppress: bool) {
        self.suppress_repeated_param_warning = suppress;
    }

    fn central_modulation(&self, mass: f64) -> f64 {
        let log_mmin = self.params[PARAM_LOG_MMIN];
        let sigma = self.params[PARAM_SIGMA_LOGM];
        0.5 * (1.0 + libm::erf((mass.log10() - log_mmin) / sigma))
    }
}

impl OccupationComponent for SatelliteOccupation {
    fn mean_occupation(&self, mass: f64) -> f64 {
        let m0 = 10f64.powf(self.params[PARAM_LOG_M0]);
        if mass <= m0 {
            return 0.0;
        }
        let m1 = 10f64.powf(self.params[PARAM_LOG_M1]);
        let alpha = self.params[PARAM_ALPHA];
        let mut mean = ((mass - m0) / m1).powf(alpha);
        if self.modulate_with_cenocc {
            mean *= self.central_modulation(mass);
        }
        mean
    }

    fn mc_occupation(&self, mass: f64, rng: &mut ChaCha8Rng) -> u32 {
        let mean = self.mean_occupation(mass);
        if mean <= 0.0 {
            return 0;
        }
        // Poisson::new only fails for non-positive or non-finite means,
        // which the guard above rules out.
        match Poisson::new(mean) {
            Ok(poisson) => poisson.sample(rng) as u32,
            Err(_) => 0,
        }
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn params(&self) -> &BTreeMap<String, f64> {
        &self.params
    }

    fn suppress_repeated_param_warning(&self) -> bool {
        self.suppress_repeated_param_warning
    }
}
