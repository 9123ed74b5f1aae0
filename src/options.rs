//! Shared keyword options forwarded to every feature constructor
//!
//! The composite-model constructor takes one open set of options and hands
//! the same set to all four feature constructors, mirroring how callers
//! tune a whole model with a single bag of parameters.

use std::collections::BTreeMap;

/// Open keyword parameters for feature construction.
///
/// `overrides` entries replace published parameters of the same name and
/// are recorded verbatim in every component's parameter map; names unknown
/// to a component pass through untouched.
#[derive(Clone, Debug)]
pub struct FeatureOptions {
    /// Redshift of the galaxy sample being modeled.
    pub redshift: f64,
    /// Multiply the satellite first moment by the central mean occupation.
    pub modulate_with_cenocc: bool,
    /// Named parameter overrides, applied to all feature constructors.
    pub overrides: BTreeMap<String, f64>,
}

impl Default for FeatureOptions {
    fn default() -> Self {
        Self {
            redshift: 0.0,
            modulate_with_cenocc: false,
            overrides: BTreeMap::new(),
        }
    }
}

impl FeatureOptions {
    /// Add or replace a named parameter override.
    pub fn with_param(mut self, name: &str, value: f64) -> Self {
        self.overrides.insert(name.to_string(), value);
        self
    }

    /// Set the sample redshift.
    pub fn with_redshift(mut self, redshift: f64) -> Self {
        self.redshift = redshift;
        self
    }

    /// Enable satellite modulation by the central mean occupation.
    pub fn with_cenocc_modulation(mut self) -> Self {
        self.modulate_with_cenocc = true;
        self
    }

    /// Apply the overrides on top of a component's parameter map.
    pub fn apply_overrides(&self, params: &mut BTreeMap<String, f64>) {
        for (name, value) in &self.overrides {
            params.insert(name.clone(), *value);
        }
    }
}
