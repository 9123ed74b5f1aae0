//! HOD-style composite model of Zheng et al. (2007), arXiv:0703457
//!
//! Two populations, centrals and satellites. Central occupation statistics
//! are nearest-integer with an erf first moment and centrals sit at the
//! exact halo center. Satellite occupation statistics are Poisson with a
//! truncated power-law first moment and satellites follow an unbiased NFW
//! profile. The assembled model is produced by the composite-model factory.

use crate::blueprint::{
    Blueprint, Feature, POP_CENTRALS, POP_SATELLITES, ROLE_OCCUPATION, ROLE_PROFILE,
};
use crate::defaults::DEFAULT_LUMINOSITY_THRESHOLD;
use crate::error::HodError;
use crate::factory::{build_model, HodModel};
use crate::occupation::{CentralOccupation, SatelliteOccupation};
use crate::options::FeatureOptions;
use crate::profile::{NfwProfile, TrivialProfile};

/// Build the Zheng07 composite model at the default luminosity threshold.
pub fn zheng07_default() -> Result<HodModel, HodError> {
    zheng07_model(DEFAULT_LUMINOSITY_THRESHOLD, &FeatureOptions::default())
}

/// Build the Zheng07 composite model.
///
/// `threshold` selects the published best-fit parameter set; `options` is
/// forwarded verbatim to all four feature constructors. Failures in feature
/// construction or factory validation propagate unchanged.
pub fn zheng07_model(threshold: f64, options: &FeatureOptions) -> Result<HodModel, HodError> {
    build_model(zheng07_blueprint(threshold, options)?)
}

/// Build the two-population Zheng07 blueprint without assembling it.
pub fn zheng07_blueprint(threshold: f64, options: &FeatureOptions) -> Result<Blueprint, HodError> {
    let mut blueprint = Blueprint::new();

    // Centrals: erf occupation, galaxies pinned to the halo center
    let occupation_centrals = CentralOccupation::new(threshold, options)?;
    blueprint.insert(POP_CENTRALS, ROLE_OCCUPATION, Feature::Occupation(Box::new(occupation_centrals)));
    let profile_centrals = TrivialProfile::new(options);
    blueprint.insert(POP_CENTRALS, ROLE_PROFILE, Feature::Profile(Box::new(profile_centrals)));

    // Satellites: truncated power-law occupation, NFW profile. Both
    // occupation components carry the same published parameter names, so
    // the satellite copy opts out of the factory's repeat warning.
    let mut occupation_satellites = SatelliteOccupation::new(threshold, options)?;
    occupation_satellites.set_suppress_repeated_param_warning(true);
    blueprint.insert(POP_SATELLITES, ROLE_OCCUPATION, Feature::Occupation(Box::new(occupation_satellites)));
    let profile_satellites = NfwProfile::new(options);
    blueprint.insert(POP_SATELLITES, ROLE_PROFILE, Feature::Profile(Box::new(profile_satellites)));

    Ok(blueprint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{published_params, PARAM_ALPHA, PARAM_LOG_MMIN};

    #[test]
    fn test_default_constructor_uses_default_threshold() {
        let model = zheng07_default().unwrap();
        for population in model.populations() {
            assert_eq!(population.occupation.threshold(), DEFAULT_LUMINOSITY_THRESHOLD);
        }
        let expected = published_params(DEFAULT_LUMINOSITY_THRESHOLD).unwrap();
        assert_eq!(model.param_dict()[PARAM_LOG_MMIN], expected.log_mmin);
    }

    #[test]
    fn test_explicit_threshold_reaches_both_occupations() {
        let model = zheng07_model(-21.0, &FeatureOptions::default()).unwrap();
        for population in model.populations() {
            assert_eq!(population.occupation.threshold(), -21.0);
        }
        let expected = published_params(-21.0).unwrap();
        assert_eq!(model.param_dict()[PARAM_ALPHA], expected.alpha);
    }

    #[test]
    fn test_blueprint_has_exactly_two_populations_and_roles() {
        let blueprint = zheng07_blueprint(-20.0, &FeatureOptions::default()).unwrap();
        assert_eq!(blueprint.population_names(), vec![POP_CENTRALS, POP_SATELLITES]);
        for population in [POP_CENTRALS, POP_SATELLITES] {
            assert_eq!(blueprint.roles(population), vec![ROLE_OCCUPATION, ROLE_PROFILE]);
        }
    }

    #[test]
    fn test_extra_params_forwarded_to_all_four_features() {
        let options = FeatureOptions::default().with_param("extra_knob", 2.5);
        let blueprint = zheng07_blueprint(-20.0, &options).unwrap();

        for population in [POP_CENTRALS, POP_SATELLITES] {
            for role in [ROLE_OCCUPATION, ROLE_PROFILE] {
                let params = match blueprint.get(population, role).unwrap() {
                    Feature::Occupation(component) => component.params(),
                    Feature::Profile(component) => component.params(),
                };
                assert_eq!(params["extra_knob"], 2.5, "{}/{}", population, role);
            }
        }
    }

    #[test]
    fn test_only_satellite_occupation_suppresses_repeat_warning() {
        let blueprint = zheng07_blueprint(-20.0, &FeatureOptions::default()).unwrap();

        let centrals = match blueprint.get(POP_CENTRALS, ROLE_OCCUPATION).unwrap() {
            Feature::Occupation(component) => component,
            _ => panic!("centrals occupation role holds a profile"),
        };
        assert!(!centrals.suppress_repeated_param_warning());

        let satellites = match blueprint.get(POP_SATELLITES, ROLE_OCCUPATION).unwrap() {
            Feature::Occupation(component) => component,
            _ => panic!("satellites occupation role holds a profile"),
        };
        assert!(satellites.suppress_repeated_param_warning());
    }

    #[test]
    fn test_construction_failure_propagates() {
        let err = zheng07_model(-25.0, &FeatureOptions::default()).unwrap_err();
        assert!(matches!(err, HodError::UnlistedThreshold { .. }));
    }

    #[test]
    fn test_parameter_override_changes_model() {
        let options = FeatureOptions::default().with_param(PARAM_ALPHA, 1.4);
        let model = zheng07_model(-20.0, &options).unwrap();
        assert_eq!(model.param_dict()[PARAM_ALPHA], 1.4);

        let plain = zheng07_model(-20.0, &FeatureOptions::default()).unwrap();
        let mass = 1.0e14;
        let boosted = model.mean_occupation(POP_SATELLITES, mass).unwrap();
        let baseline = plain.mean_occupation(POP_SATELLITES, mass).unwrap();
        assert!(boosted > baseline);
    }
}
