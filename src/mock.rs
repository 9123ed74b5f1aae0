//! Mock galaxy catalogs produced by populating a halo catalog

use std::collections::BTreeMap;

use serde::Serialize;

/// One mock galaxy.
#[derive(Clone, Debug, Serialize)]
pub struct MockGalaxy {
    /// Population name ("centrals", "satellites", ...).
    pub gal_type: String,
    /// Id of the host halo.
    pub halo_id: u64,
    /// Host halo mass in Msun/h.
    pub halo_mass: f64,
    /// Comoving position in Mpc/h, wrapped into the periodic box.
    pub position: [f64; 3],
    /// Peculiar velocity in km/s.
    pub velocity: [f64; 3],
}

/// The populated galaxy catalog.
#[derive(Clone, Debug, Serialize)]
pub struct MockCatalog {
    pub galaxies: Vec<MockGalaxy>,
    /// Periodic box side length in Mpc/h.
    pub box_size: f64,
    pub redshift: f64,
    /// Seed the populate step ran with (allows recreation).
    pub seed: u64,
}

/// Headline numbers of a mock catalog.
#[derive(Clone, Debug, Serialize)]
pub struct MockSummary {
    pub total_galaxies: usize,
    /// Galaxy count per population name.
    pub counts: BTreeMap<String, usize>,
    /// Comoving number density in (h/Mpc)^3.
    pub number_density: f64,
    /// Fraction of galaxies that are satellites.
    pub satellite_fraction: f64,
}

impl MockCatalog {
    pub fn summary(&self) -> MockSummary {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for galaxy in &self.galaxies {
            *counts.entry(galaxy.gal_type.clone()).or_insert(0) += 1;
        }

        let total = self.galaxies.len();
        let volume = self.box_size.powi(3);
        let satellites = counts.get("satellites").copied().unwrap_or(0);

        MockSummary {
            total_galaxies: total,
            counts,
            number_density: if volume > 0.0 { total as f64 / volume } else { 0.0 },
            satellite_fraction: if total > 0 { satellites as f64 / total as f64 } else { 0.0 },
        }
    }
}
