//! Composite-model factory
//!
//! Takes a blueprint, validates that every population defines both an
//! occupation and a profile feature, merges the component parameter maps,
//! and returns an `HodModel` able to populate mock catalogs from halo
//! catalogs.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::blueprint::{Blueprint, Feature, ROLE_OCCUPATION, ROLE_PROFILE};
use crate::error::HodError;
use crate::halos::HaloCatalog;
use crate::mock::{MockCatalog, MockGalaxy};
use crate::occupation::OccupationComponent;
use crate::profile::ProfileComponent;

/// One population's occupation + profile pair inside a composed model.
pub struct PopulationModel {
    pub name: String,
    pub occupation: Box<dyn OccupationComponent>,
    pub profile: Box<dyn ProfileComponent>,
}

/// A fully composed HOD model.
pub struct HodModel {
    populations: Vec<PopulationModel>,
    param_dict: BTreeMap<String, f64>,
}

impl std::fmt::Debug for HodModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HodModel")
            .field("populations", &self.populations.len())
            .field("param_dict", &self.param_dict)
            .finish()
    }
}

/// Assemble and validate a composite model from a blueprint.
///
/// Every population must hold an occupation component in the "occupation"
/// role and a profile component in the "profile" role. Component parameter
/// maps are merged first-seen-wins; a parameter name appearing in more than
/// one component emits a warning unless the later component suppresses it.
pub fn build_model(blueprint: Blueprint) -> Result<HodModel, HodError> {
    if blueprint.is_empty() {
        return Err(HodError::EmptyBlueprint);
    }

    let mut populations = Vec::new();
    let mut param_dict: BTreeMap<String, f64> = BTreeMap::new();

    for (name, mut subpop) in blueprint.into_populations() {
        let occupation = match subpop.remove(ROLE_OCCUPATION) {
            Some(Feature::Occupation(component)) => component,
            Some(Feature::Profile(_)) => {
                return Err(HodError::WrongFeatureKind {
                    population: name,
                    role: ROLE_OCCUPATION.to_string(),
                })
            }
            None => {
                return Err(HodError::MissingFeature {
                    population: name,
                    role: ROLE_OCCUPATION.to_string(),
                })
            }
        };
        let profile = match subpop.remove(ROLE_PROFILE) {
            Some(Feature::Profile(component)) => component,
            Some(Feature::Occupation(_)) => {
                return Err(HodError::WrongFeatureKind {
                    population: name,
                    role: ROLE_PROFILE.to_string(),
                })
            }
            None => {
                return Err(HodError::MissingFeature {
                    population: name,
                    role: ROLE_PROFILE.to_string(),
                })
            }
        };

        merge_params(
            &mut param_dict,
            occupation.params(),
            occupation.suppress_repeated_param_warning(),
            &name,
        );
        // Profile components never carry the suppression flag
        merge_params(&mut param_dict, profile.params(), false, &name);

        populations.push(PopulationModel { name, occupation, profile });
    }

    Ok(HodModel { populations, param_dict })
}

/// Merge one component's parameters into the composite dictionary.
///
/// First-seen value wins; repeats warn on stderr unless suppressed.
fn merge_params(
    param_dict: &mut BTreeMap<String, f64>,
    params: &BTreeMap<String, f64>,
    suppress_warning: bool,
    population: &str,
) {
    for (name, value) in params {
        if param_dict.contains_key(name) {
            if !suppress_warning {
                eprintln!(
                    "warning: parameter '{}' of population '{}' repeats an earlier component's \
                     parameter; keeping the first value",
                    name, population
                );
            }
        } else {
            param_dict.insert(name.clone(), *value);
        }
    }
}

impl HodModel {
    /// Composite parameter dictionary merged from all components.
    pub fn param_dict(&self) -> &BTreeMap<String, f64> {
        &self.param_dict
    }

    /// The populations of the model, in blueprint order.
    pub fn populations(&self) -> &[PopulationModel] {
        &self.populations
    }

    /// Mean occupation of one population at a halo mass, if the population
    /// exists.
    pub fn mean_occupation(&self, population: &str, mass: f64) -> Option<f64> {
        self.populations
            .iter()
            .find(|p| p.name == population)
            .map(|p| p.occupation.mean_occupation(mass))
    }

    /// Populate a halo catalog with mock galaxies.
    ///
    /// Each halo gets its own RNG stream derived from the master seed and
    /// the halo id, so the parallel loop is deterministic regardless of
    /// scheduling. Positions are wrapped into the periodic box.
    pub fn populate_mock(&self, catalog: &HaloCatalog, seed: u64) -> MockCatalog {
        let galaxies: Vec<MockGalaxy> = catalog
            .halos
            .par_iter()
            .flat_map_iter(|halo| {
                let mut rng = ChaCha8Rng::seed_from_u64(derive_halo_seed(seed, halo.id));
                let mut halo_galaxies = Vec::new();

                for population in &self.populations {
                    let count = population.occupation.mc_occupation(halo.mass, &mut rng);
                    if count == 0 {
                        continue;
                    }
                    for point in population.profile.sample(halo, count, &mut rng) {
                        halo_galaxies.push(MockGalaxy {
                            gal_type: population.name.clone(),
                            halo_id: halo.id,
                            halo_mass: halo.mass,
                            position: wrap_position(point.position, catalog.box_size),
                            velocity: point.velocity,
                        });
                    }
                }
                halo_galaxies
            })
            .collect();

        MockCatalog {
            galaxies,
            box_size: catalog.box_size,
            redshift: catalog.redshift,
            seed,
        }
    }
}

/// Derive a halo-specific RNG seed from the master seed.
fn derive_halo_seed(master: u64, halo_id: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    halo_id.hash(&mut hasher);
    hasher.finish()
}

/// Wrap a position into the periodic box [0, box_size).
fn wrap_position(position: [f64; 3], box_size: f64) -> [f64; 3] {
    [
        position[0].rem_euclid(box_size),
        position[1].rem_euclid(box_size),
        position[2].rem_euclid(box_size),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::{POP_CENTRALS, POP_SATELLITES};
    use crate::halos::{generate_fake_sim, FakeSimConfig};
    use crate::occupation::{CentralOccupation, SatelliteOccupation};
    use crate::options::FeatureOptions;
    use crate::profile::{NfwProfile, TrivialProfile};

    fn full_blueprint() -> Blueprint {
        let options = FeatureOptions::default();
        let mut blueprint = Blueprint::new();
        blueprint.insert(
            POP_CENTRALS,
            ROLE_OCCUPATION,
            Feature::Occupation(Box::new(CentralOccupation::new(-20.0, &options).unwrap())),
        );
        blueprint.insert(
            POP_CENTRALS,
            ROLE_PROFILE,
            Feature::Profile(Box::new(TrivialProfile::new(&options))),
        );
        let mut sats = SatelliteOccupation::new(-20.0, &options).unwrap();
        sats.set_suppress_repeated_param_warning(true);
        blueprint.insert(POP_SATELLITES, ROLE_OCCUPATION, Feature::Occupation(Box::new(sats)));
        blueprint.insert(
            POP_SATELLITES,
            ROLE_PROFILE,
            Feature::Profile(Box::new(NfwProfile::new(&options))),
        );
        blueprint
    }

    #[test]
    fn test_build_model_from_full_blueprint() {
        let model = build_model(full_blueprint()).unwrap();
        assert_eq!(model.populations().len(), 2);
        // 5 published occupation params + velocity_bias from the NFW profile
        assert_eq!(model.param_dict().len(), 6);
    }

    #[test]
    fn test_missing_profile_is_rejected() {
        let options = FeatureOptions::default();
        let mut blueprint = Blueprint::new();
        blueprint.insert(
            POP_CENTRALS,
            ROLE_OCCUPATION,
            Feature::Occupation(Box::new(CentralOccupation::new(-20.0, &options).unwrap())),
        );
        let err = build_model(blueprint).unwrap_err();
        assert_eq!(
            err,
            HodError::MissingFeature {
                population: POP_CENTRALS.to_string(),
                role: ROLE_PROFILE.to_string(),
            }
        );
    }

    #[test]
    fn test_wrong_feature_kind_is_rejected() {
        let options = FeatureOptions::default();
        let mut blueprint = Blueprint::new();
        blueprint.insert(
            POP_CENTRALS,
            ROLE_OCCUPATION,
            Feature::Profile(Box::new(TrivialProfile::new(&options))),
        );
        blueprint.insert(
            POP_CENTRALS,
            ROLE_PROFILE,
            Feature::Profile(Box::new(TrivialProfile::new(&options))),
        );
        let err = build_model(blueprint).unwrap_err();
        assert_eq!(
            err,
            HodError::WrongFeatureKind {
                population: POP_CENTRALS.to_string(),
                role: ROLE_OCCUPATION.to_string(),
            }
        );
    }

    #[test]
    fn test_empty_blueprint_is_rejected() {
        assert_eq!(build_model(Blueprint::new()).unwrap_err(), HodError::EmptyBlueprint);
    }

    #[test]
    fn test_populate_mock_is_deterministic() {
        let model = build_model(full_blueprint()).unwrap();
        let catalog = generate_fake_sim(&FakeSimConfig { num_halos: 300, ..Default::default() }, 5);

        let a = model.populate_mock(&catalog, 77);
        let b = model.populate_mock(&catalog, 77);
        assert_eq!(a.galaxies.len(), b.galaxies.len());
        for (ga, gb) in a.galaxies.iter().zip(&b.galaxies) {
            assert_eq!(ga.halo_id, gb.halo_id);
            assert_eq!(ga.position, gb.position);
            assert_eq!(ga.velocity, gb.velocity);
        }
    }

    #[test]
    fn test_populate_mock_wraps_positions() {
        let model = build_model(full_blueprint()).unwrap();
        let catalog = generate_fake_sim(&FakeSimConfig { num_halos: 500, ..Default::default() }, 8);
        let mock = model.populate_mock(&catalog, 13);
        assert!(!mock.galaxies.is_empty());
        for galaxy in &mock.galaxies {
            for axis in 0..3 {
                assert!(galaxy.position[axis] >= 0.0 && galaxy.position[axis] < catalog.box_size);
            }
        }
    }

    #[test]
    fn test_massive_halos_host_centrals() {
        // Above ~1e13 Msun/h the -20 central mean occupation is ~1, so
        // every massive halo should host exactly one central
        let model = build_model(full_blueprint()).unwrap();
        let catalog = generate_fake_sim(&FakeSimConfig { num_halos: 2000, ..Default::default() }, 3);
        let mock = model.populate_mock(&catalog, 4);

        for halo in catalog.halos.iter().filter(|h| h.mass > 1.0e13) {
            let centrals = mock
                .galaxies
                .iter()
                .filter(|g| g.halo_id == halo.id && g.gal_type == POP_CENTRALS)
                .count();
            assert_eq!(centrals, 1, "halo {} mass {:e}", halo.id, halo.mass);
        }
    }

    #[test]
    fn test_mean_occupation_accessor() {
        let model = build_model(full_blueprint()).unwrap();
        assert!(model.mean_occupation(POP_CENTRALS, 1.0e14).unwrap() > 0.99);
        assert!(model.mean_occupation("unknown", 1.0e14).is_none());
    }
}
