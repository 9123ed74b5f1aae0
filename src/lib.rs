//! HOD galaxy population library
//!
//! Composes Halo Occupation Distribution models from occupation and
//! profile components and populates halo catalogs with mock galaxies.

pub mod blueprint;
pub mod defaults;
pub mod error;
pub mod export;
pub mod factory;
pub mod halos;
pub mod mock;
pub mod occupation;
pub mod options;
pub mod profile;
pub mod zheng07;

pub use blueprint::{Blueprint, Feature, POP_CENTRALS, POP_SATELLITES, ROLE_OCCUPATION, ROLE_PROFILE};
pub use error::HodError;
pub use factory::{build_model, HodModel};
pub use options::FeatureOptions;
pub use zheng07::{zheng07_blueprint, zheng07_default, zheng07_model};
