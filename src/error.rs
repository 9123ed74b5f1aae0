//! Error type for model construction and blueprint validation

use std::fmt;

/// Failures raised while building an HOD model.
#[derive(Clone, Debug, PartialEq)]
pub enum HodError {
    /// Requested luminosity threshold has no published parameter set.
    UnlistedThreshold { threshold: f64, available: Vec<f64> },
    /// A population blueprint is missing a required feature role.
    MissingFeature { population: String, role: String },
    /// A feature role holds the wrong kind of component.
    WrongFeatureKind { population: String, role: String },
    /// The blueprint defines no populations at all.
    EmptyBlueprint,
}

impl fmt::Display for HodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HodError::UnlistedThreshold { threshold, available } => {
                let listed: Vec<String> = available.iter().map(|t| format!("{:.1}", t)).collect();
                write!(
                    f,
                    "no published parameters for threshold {:.4}; available thresholds: {}",
                    threshold,
                    listed.join(", ")
                )
            }
            HodError::MissingFeature { population, role } => {
                write!(f, "population '{}' does not define the '{}' feature", population, role)
            }
            HodError::WrongFeatureKind { population, role } => {
                write!(
                    f,
                    "population '{}' holds the wrong component kind in the '{}' role",
                    population, role
                )
            }
            HodError::EmptyBlueprint => write!(f, "blueprint defines no populations"),
        }
    }
}

impl std::error::Error for HodError {}
