//! Blueprint: which feature models make up a composite model
//!
//! A blueprint is a two-level mapping, population name -> feature role ->
//! component instance. It is built fresh by a composite-model constructor
//! and handed straight to the factory; the factory, not the blueprint,
//! checks that every population defines both roles.

use std::collections::BTreeMap;

use crate::occupation::OccupationComponent;
use crate::profile::ProfileComponent;

/// Population name for central galaxies.
pub const POP_CENTRALS: &str = "centrals";
/// Population name for satellite galaxies.
pub const POP_SATELLITES: &str = "satellites";

/// Feature role giving the galaxy count distribution.
pub const ROLE_OCCUPATION: &str = "occupation";
/// Feature role giving the intra-halo phase-space distribution.
pub const ROLE_PROFILE: &str = "profile";

/// One feature-model instance, owned exclusively by its blueprint slot.
pub enum Feature {
    Occupation(Box<dyn OccupationComponent>),
    Profile(Box<dyn ProfileComponent>),
}

/// Feature models of a single population, keyed by role.
pub type SubpopBlueprint = BTreeMap<String, Feature>;

/// Nested mapping describing a composite model.
#[derive(Default)]
pub struct Blueprint {
    populations: BTreeMap<String, SubpopBlueprint>,
}

impl Blueprint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a feature for one population role, replacing any previous one.
    pub fn insert(&mut self, population: &str, role: &str, feature: Feature) {
        self.populations
            .entry(population.to_string())
            .or_default()
            .insert(role.to_string(), feature);
    }

    /// Attach a whole subpopulation blueprint under a population name.
    pub fn insert_population(&mut self, population: &str, subpop: SubpopBlueprint) {
        self.populations.insert(population.to_string(), subpop);
    }

    pub fn population_names(&self) -> Vec<&str> {
        self.populations.keys().map(|k| k.as_str()).collect()
    }

    pub fn roles(&self, population: &str) -> Vec<&str> {
        self.populations
            .get(population)
            .map(|subpop| subpop.keys().map(|k| k.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn get(&self, population: &str, role: &str) -> Option<&Feature> {
        self.populations.get(population)?.get(role)
    }

    pub fn is_empty(&self) -> bool {
        self.populations.is_empty()
    }

    /// Consume the blueprint, yielding populations in name order.
    pub fn into_populations(self) -> impl Iterator<Item = (String, SubpopBlueprint)> {
        self.populations.into_iter()
    }
}
