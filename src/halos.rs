//! Halo catalogs and the fake simulation generator
//!
//! A `HaloCatalog` is the input a composed model populates. The fake
//! simulation produces a deterministic random catalog for testing and
//! demonstration: power-law masses, uniform positions in a periodic box,
//! concentrations from the fallback c(M) relation with log-normal scatter.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;

use crate::defaults::{median_concentration, virial_dispersion, virial_radius};

/// One dark-matter halo record.
#[derive(Clone, Debug, Serialize)]
pub struct Halo {
    pub id: u64,
    /// Halo mass in Msun/h.
    pub mass: f64,
    /// Virial radius in Mpc/h.
    pub radius: f64,
    /// NFW concentration.
    pub conc_nfw: f64,
    /// Comoving position in Mpc/h, inside the periodic box.
    pub position: [f64; 3],
    /// Peculiar velocity in km/s.
    pub velocity: [f64; 3],
    /// Virial velocity dispersion in km/s.
    pub vel_disp: f64,
}

/// A halo catalog with its periodic box.
#[derive(Clone, Debug, Serialize)]
pub struct HaloCatalog {
    pub halos: Vec<Halo>,
    /// Periodic box side length in Mpc/h.
    pub box_size: f64,
    pub redshift: f64,
}

impl HaloCatalog {
    /// Number of halos above a mass cut.
    pub fn count_above(&self, mass: f64) -> usize {
        self.halos.iter().filter(|h| h.mass >= mass).count()
    }
}

/// Settings for the fake simulation.
#[derive(Clone, Debug)]
pub struct FakeSimConfig {
    pub num_halos: usize,
    /// Periodic box side length in Mpc/h.
    pub box_size: f64,
    pub redshift: f64,
    /// Mass range of the sampled mass function, Msun/h.
    pub mass_min: f64,
    pub mass_max: f64,
    /// Log-normal scatter of the concentrations, in dex.
    pub conc_scatter_dex: f64,
    /// Dispersion of the halo bulk velocities, km/s.
    pub velocity_scale: f64,
}

impl Default for FakeSimConfig {
    fn default() -> Self {
        Self {
            num_halos: 10_000,
            box_size: 250.0,
            redshift: 0.0,
            mass_min: 1.0e10,
            mass_max: 1.0e15,
            conc_scatter_dex: 0.12,
            velocity_scale: 300.0,
        }
    }
}

/// Generate a deterministic fake halo catalog.
///
/// Masses follow dn/dM ~ M^-2 between `mass_min` and `mass_max`, drawn by
/// inverse transform. The same seed always yields the same catalog.
pub fn generate_fake_sim(config: &FakeSimConfig, seed: u64) -> HaloCatalog {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    // Infallible for any positive scatter
    let conc_scatter = Normal::new(0.0, config.conc_scatter_dex)
        .unwrap_or_else(|_| Normal::new(0.0, 0.12).unwrap());
    let vel = Normal::new(0.0, config.velocity_scale)
        .unwrap_or_else(|_| Normal::new(0.0, 300.0).unwrap());

    let mut halos = Vec::with_capacity(config.num_halos);
    for id in 0..config.num_halos as u64 {
        let mass = sample_power_law_mass(config.mass_min, config.mass_max, &mut rng);
        let conc = median_concentration(mass) * 10f64.powf(conc_scatter.sample(&mut rng));

        let position = [
            rng.gen::<f64>() * config.box_size,
            rng.gen::<f64>() * config.box_size,
            rng.gen::<f64>() * config.box_size,
        ];
        let velocity = [vel.sample(&mut rng), vel.sample(&mut rng), vel.sample(&mut rng)];

        halos.push(Halo {
            id,
            mass,
            radius: virial_radius(mass),
            conc_nfw: conc.max(1.0),
            position,
            velocity,
            vel_disp: virial_dispersion(mass),
        });
    }

    HaloCatalog {
        halos,
        box_size: config.box_size,
        redshift: config.redshift,
    }
}

/// Inverse-transform sample of a dn/dM ~ M^-2 mass function.
fn sample_power_law_mass(mass_min: f64, mass_max: f64, rng: &mut ChaCha8Rng) -> f64 {
    let u = rng.gen::<f64>();
    // CDF(M) = (1/Mmin - 1/M) / (1/Mmin - 1/Mmax)
    let inv = 1.0 / mass_min - u * (1.0 / mass_min - 1.0 / mass_max);
    1.0 / inv
}
