//! Profile components: where galaxies sit inside their halos
//!
//! A profile component turns an occupation count into intra-halo positions
//! and peculiar velocities. Centrals use the trivial profile (exact halo
//! center, halo bulk velocity); satellites follow an unbiased NFW profile
//! with radii drawn by inverting the cumulative mass profile.

use std::collections::BTreeMap;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::halos::Halo;
use crate::options::FeatureOptions;

/// Name of the NFW velocity bias parameter.
pub const PARAM_VELOCITY_BIAS: &str = "velocity_bias";

/// One galaxy's phase-space coordinates, in the halo catalog frame.
#[derive(Clone, Copy, Debug)]
pub struct PhaseSpacePoint {
    /// Position in Mpc/h, not yet wrapped into the periodic box.
    pub position: [f64; 3],
    /// Peculiar velocity in km/s.
    pub velocity: [f64; 3],
}

/// Sub-model for the spatial/velocity distribution of one population.
pub trait ProfileComponent: Send + Sync {
    /// Draw `count` galaxies for a halo.
    fn sample(&self, halo: &Halo, count: u32, rng: &mut ChaCha8Rng) -> Vec<PhaseSpacePoint>;

    /// Parameter map of the component.
    fn params(&self) -> &BTreeMap<String, f64>;
}

// =============================================================================
// TRIVIAL PROFILE (CENTRALS)
// =============================================================================

/// Galaxies at the exact halo center, moving with the halo bulk velocity.
pub struct TrivialProfile {
    params: BTreeMap<String, f64>,
}

impl TrivialProfile {
    pub fn new(options: &FeatureOptions) -> Self {
        let mut params = BTreeMap::new();
        options.apply_overrides(&mut params);
        Self { params }
    }
}

impl ProfileComponent for TrivialProfile {
    fn sample(&self, halo: &Halo, count: u32, _rng: &mut ChaCha8Rng) -> Vec<PhaseSpacePoint> {
        (0..count)
            .map(|_| PhaseSpacePoint {
                position: halo.position,
                velocity: halo.velocity,
            })
            .collect()
    }

    fn params(&self) -> &BTreeMap<String, f64> {
        &self.params
    }
}

// =============================================================================
// NFW PROFILE (SATELLITES)
// =============================================================================

/// Unbiased NFW phase space.
///
/// Radial positions invert the cumulative NFW mass profile
/// `P(<r) = g(c r/R_vir) / g(c)` with `g(x) = ln(1+x) - x/(1+x)`; angles are
/// isotropic. Velocities add an isotropic Gaussian with the halo virial
/// dispersion times `velocity_bias` to the halo bulk velocity.
pub struct NfwProfile {
    params: BTreeMap<String, f64>,
}

impl NfwProfile {
    pub fn new(options: &FeatureOptions) -> Self {
        let mut params = BTreeMap::new();
        params.insert(PARAM_VELOCITY_BIAS.to_string(), 1.0);
        options.apply_overrides(&mut params);
        Self { params }
    }

    fn velocity_bias(&self) -> f64 {
        self.params[PARAM_VELOCITY_BIAS]
    }
}

impl ProfileComponent for NfwProfile {
    fn sample(&self, halo: &Halo, count: u32, rng: &mut ChaCha8Rng) -> Vec<PhaseSpacePoint> {
        let sigma = halo.vel_disp * self.velocity_bias();
        // Infallible: vel_disp and velocity_bias are finite and non-negative
        let gauss = Normal::new(0.0, sigma.max(0.0)).unwrap_or_else(|_| Normal::new(0.0, 0.0).unwrap());

        (0..count)
            .map(|_| {
                let u = rng.gen::<f64>();
                let radius = halo.radius * nfw_radial_fraction(halo.conc_nfw, u);
                let direction = isotropic_unit_vector(rng);

                let mut position = halo.position;
                let mut velocity = halo.velocity;
                for axis in 0..3 {
                    position[axis] += radius * direction[axis];
                    velocity[axis] += gauss.sample(rng);
                }
                PhaseSpacePoint { position, velocity }
            })
            .collect()
    }

    fn params(&self) -> &BTreeMap<String, f64> {
        &self.params
    }
}

/// NFW mass-profile shape function g(x) = ln(1+x) - x/(1+x).
pub fn nfw_g(x: f64) -> f64 {
    (1.0 + x).ln() - x / (1.0 + x)
}

/// Analytic enclosed-mass fraction P(<r) at scaled radius s = r/R_vir.
pub fn nfw_enclosed_fraction(conc: f64, s: f64) -> f64 {
    nfw_g(conc * s.clamp(0.0, 1.0)) / nfw_g(conc)
}

/// Invert the NFW cumulative mass profile by bisection.
///
/// Returns the scaled radius s in (0, 1] with P(<s) = u. The shape function
/// is strictly increasing, so bisection converges unconditionally; 64 steps
/// push the bracket below f64 resolution.
pub fn nfw_radial_fraction(conc: f64, u: f64) -> f64 {
    let u = u.clamp(0.0, 1.0);
    if u == 0.0 {
        return 0.0;
    }
    let total = nfw_g(conc);
    let mut lo = 0.0f64;
    let mut hi = 1.0f64;
    for _ in 0..64 {
        let mid = 0.5 * (lo + hi);
        if nfw_g(conc * mid) / total < u {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Uniform random direction on the unit sphere.
fn isotropic_unit_vector(rng: &mut ChaCha8Rng) -> [f64; 3] {
    let cos_theta: f64 = rng.gen_range(-1.0..1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = rng.gen_range(0.0..std::f64::consts::TAU);
    [sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta]
}
