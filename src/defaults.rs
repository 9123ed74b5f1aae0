//! Model-wide defaults and the published Zheng et al. (2007) HOD parameters
//!
//! The best-fit values come from Table 1 of arXiv:0703457, one row per
//! r-band luminosity threshold of the SDSS sample being modeled.

use std::collections::BTreeMap;

use crate::error::HodError;

/// Default r-band absolute magnitude threshold of the galaxy sample.
pub const DEFAULT_LUMINOSITY_THRESHOLD: f64 = -20.0;

/// Tolerance used when matching a requested threshold against the table.
pub const THRESHOLD_MATCH_TOL: f64 = 0.01;

/// Matter density parameter used for virial radius conversions.
pub const OMEGA_M: f64 = 0.3;

/// Critical density in h^2 Msun / Mpc^3.
pub const RHO_CRIT: f64 = 2.775e11;

/// Halo overdensity definition (times the mean matter density).
pub const HALO_OVERDENSITY: f64 = 200.0;

/// Newton's constant in Mpc (km/s)^2 / Msun.
pub const NEWTON_G: f64 = 4.301e-9;

/// Canonical parameter names of the Zheng07 model.
pub const PARAM_LOG_MMIN: &str = "logMmin";
pub const PARAM_SIGMA_LOGM: &str = "sigma_logM";
pub const PARAM_LOG_M0: &str = "logM0";
pub const PARAM_LOG_M1: &str = "logM1";
pub const PARAM_ALPHA: &str = "alpha";

/// One row of the published best-fit table.
///
/// Masses are log10 of Msun/h. `log_mmin` and `sigma_logm` control the
/// central occupation erf; `log_m0`, `log_m1` and `alpha` control the
/// truncated power law for satellites.
#[derive(Clone, Copy, Debug)]
pub struct PublishedParams {
    pub threshold: f64,
    pub log_mmin: f64,
    pub sigma_logm: f64,
    pub log_m0: f64,
    pub log_m1: f64,
    pub alpha: f64,
}

/// Best-fit parameter sets from Table 1 of Zheng et al. (2007).
const PUBLISHED_TABLE: [PublishedParams; 9] = [
    PublishedParams { threshold: -18.0, log_mmin: 11.35, sigma_logm: 0.25, log_m0: 11.20, log_m1: 12.40, alpha: 0.83 },
    PublishedParams { threshold: -18.5, log_mmin: 11.46, sigma_logm: 0.24, log_m0: 10.59, log_m1: 12.68, alpha: 0.97 },
    PublishedParams { threshold: -19.0, log_mmin: 11.60, sigma_logm: 0.26, log_m0: 11.49, log_m1: 12.83, alpha: 1.02 },
    PublishedParams { threshold: -19.5, log_mmin: 11.75, sigma_logm: 0.28, log_m0: 11.69, log_m1: 13.01, alpha: 1.06 },
    PublishedParams { threshold: -20.0, log_mmin: 12.02, sigma_logm: 0.26, log_m0: 11.38, log_m1: 13.31, alpha: 1.06 },
    PublishedParams { threshold: -20.5, log_mmin: 12.30, sigma_logm: 0.21, log_m0: 11.84, log_m1: 13.58, alpha: 1.12 },
    PublishedParams { threshold: -21.0, log_mmin: 12.79, sigma_logm: 0.39, log_m0: 11.92, log_m1: 13.94, alpha: 1.15 },
    PublishedParams { threshold: -21.5, log_mmin: 13.38, sigma_logm: 0.51, log_m0: 13.94, log_m1: 13.91, alpha: 1.04 },
    PublishedParams { threshold: -22.0, log_mmin: 14.22, sigma_logm: 0.77, log_m0: 14.00, log_m1: 14.69, alpha: 0.87 },
];

/// Look up the published parameter set for a luminosity threshold.
///
/// The match tolerance is [`THRESHOLD_MATCH_TOL`]; a threshold outside the
/// table is an error listing the available values.
pub fn published_params(threshold: f64) -> Result<PublishedParams, HodError> {
    PUBLISHED_TABLE
        .iter()
        .find(|row| (row.threshold - threshold).abs() < THRESHOLD_MATCH_TOL)
        .copied()
        .ok_or_else(|| HodError::UnlistedThreshold {
            threshold,
            available: PUBLISHED_TABLE.iter().map(|row| row.threshold).collect(),
        })
}

impl PublishedParams {
    /// Full five-parameter dictionary for this threshold.
    ///
    /// Both occupation components carry the complete set, matching the
    /// published table row, even though each only reads a subset.
    pub fn param_dict(&self) -> BTreeMap<String, f64> {
        let mut params = BTreeMap::new();
        params.insert(PARAM_LOG_MMIN.to_string(), self.log_mmin);
        params.insert(PARAM_SIGMA_LOGM.to_string(), self.sigma_logm);
        params.insert(PARAM_LOG_M0.to_string(), self.log_m0);
        params.insert(PARAM_LOG_M1.to_string(), self.log_m1);
        params.insert(PARAM_ALPHA.to_string(), self.alpha);
        params
    }
}

/// Virial radius in Mpc/h for a halo mass in Msun/h.
///
/// Uses the overdensity definition M = (4/3) pi Delta rho_m R^3 with
/// Delta = [`HALO_OVERDENSITY`] and rho_m = Omega_m * rho_crit.
pub fn virial_radius(mass: f64) -> f64 {
    let rho_m = OMEGA_M * RHO_CRIT;
    let volume = mass / (HALO_OVERDENSITY * rho_m);
    (3.0 * volume / (4.0 * std::f64::consts::PI)).cbrt()
}

/// Virial velocity dispersion in km/s for a halo mass in Msun/h.
///
/// Isothermal estimate sigma^2 = G M / (2 R_vir).
pub fn virial_dispersion(mass: f64) -> f64 {
    (NEWTON_G * mass / (2.0 * virial_radius(mass))).sqrt()
}

/// Median NFW concentration from a power-law c(M) relation.
///
/// Dutton & Maccio (2014) style fit pivoting at 1e12 Msun/h, used when a
/// halo catalog does not carry its own concentrations.
pub fn median_concentration(mass: f64) -> f64 {
    let log_m12 = (mass / 1.0e12).log10();
    10f64.powf(0.905 - 0.101 * log_m12)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold_is_listed() {
        let params = published_params(DEFAULT_LUMINOSITY_THRESHOLD).unwrap();
        assert_eq!(params.log_mmin, 12.02);
        assert_eq!(params.alpha, 1.06);
    }

    #[test]
    fn test_threshold_matched_within_tolerance() {
        let params = published_params(-20.5005).unwrap();
        assert_eq!(params.log_m1, 13.58);
    }

    #[test]
    fn test_unlisted_threshold_is_error() {
        let err = published_params(-19.75).unwrap_err();
        match err {
            HodError::UnlistedThreshold { threshold, available } => {
                assert_eq!(threshold, -19.75);
                assert_eq!(available.len(), 9);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_param_dict_has_all_five_names() {
        let params = published_params(-21.0).unwrap();
        let dict = params.param_dict();
        assert_eq!(dict.len(), 5);
        assert_eq!(dict[PARAM_ALPHA], 1.15);
        assert_eq!(dict[PARAM_SIGMA_LOGM], 0.39);
    }

    #[test]
    fn test_virial_radius_scales_with_mass() {
        // R ~ M^(1/3), so 1000x the mass gives 10x the radius
        let r1 = virial_radius(1.0e12);
        let r2 = virial_radius(1.0e15);
        assert!((r2 / r1 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_concentration_decreases_with_mass() {
        assert!(median_concentration(1.0e11) > median_concentration(1.0e14));
    }
}
