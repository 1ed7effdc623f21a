pub mod catalog;
pub mod config;
pub mod fingerprint;
pub mod random;
pub mod select;
mod stealth;
mod synth;
mod util;

use thiserror::Error;

pub use catalog::{Catalog, Oui, ProfileEntry, VendorEntry};
pub use config::load_catalog;
pub use fingerprint::{detection_probability, EnvironmentFingerprint, UNKNOWN_VENDOR};
pub use random::{EntropyRandom, RandomSource};
pub use select::{select, select_uniform, WeightedSet};
pub use stealth::{realistic_ttl, AntiDetection};
pub use synth::MacSynthesizer;
pub use util::validate_mac;

/// Errors raised while building or loading a catalog. Generation itself
/// never fails.
#[derive(Error, Debug)]
pub enum MacmimicError {
    #[error("OUI must look like XX:XX:XX, got {0:?}")]
    InvalidOui(String),
    #[error("Weights must be positive and finite, got {0}")]
    InvalidWeight(f64),
    #[error("A weighted candidate set cannot be empty")]
    EmptyCandidates,
    #[error("Vendor {0:?} is defined more than once")]
    DuplicateVendor(String),
    #[error("Profile tag {0:?} is defined more than once")]
    DuplicateProfile(String),
    #[error("Profile {profile:?} references unknown vendor {vendor:?}")]
    UnknownVendor { profile: String, vendor: String },
    #[error("Vendor {0:?} has no OUIs")]
    NoOuis(String),
    #[error("Vendor {0:?} has no usable hostname templates")]
    NoHostnames(String),
    #[error("Could not read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse catalog file: {0}")]
    Toml(#[from] toml::de::Error),
}
