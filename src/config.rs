//! Catalog files.
//!
//! ```toml
//! [[vendor]]
//! name = "dell"
//! ouis = ["00:14:22", "F0:4D:A2"]
//! hostnames = ["DESKTOP-"]
//! weight = 22.5
//!
//! [[profile]]
//! tag = "office"
//! aliases = ["work"]
//! candidates = [{ vendor = "dell", weight = 3.0 }]
//! ```
//!
//! Array order is kept, so candidate order in the file is the order the
//! selector walks.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::catalog::{Catalog, Oui, ProfileEntry, VendorEntry};
use crate::select::WeightedSet;
use crate::MacmimicError;

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    #[serde(rename = "vendor", default)]
    pub vendors: Vec<VendorConfig>,
    #[serde(rename = "profile", default)]
    pub profiles: Vec<ProfileConfig>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct VendorConfig {
    pub name: String,
    pub ouis: Vec<String>,
    pub hostnames: Vec<String>,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    pub tag: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub candidates: Vec<CandidateConfig>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct CandidateConfig {
    pub vendor: String,
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl CatalogFile {
    pub fn into_catalog(self) -> Result<Catalog, MacmimicError> {
        let vendors = self
            .vendors
            .into_iter()
            .map(|v| -> Result<VendorEntry, MacmimicError> {
                let ouis = v
                    .ouis
                    .iter()
                    .map(|o| o.parse::<Oui>())
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(VendorEntry {
                    name: v.name,
                    ouis,
                    hostnames: v.hostnames,
                    weight: v.weight,
                })
            })
            .collect::<Result<Vec<_>, MacmimicError>>()?;

        let profiles = self
            .profiles
            .into_iter()
            .map(|p| -> Result<ProfileEntry, MacmimicError> {
                let candidates = p
                    .candidates
                    .into_iter()
                    .map(|c| (c.vendor, c.weight))
                    .collect();
                Ok(ProfileEntry {
                    tag: p.tag.to_lowercase(),
                    aliases: p.aliases.iter().map(|a| a.to_lowercase()).collect(),
                    candidates: WeightedSet::new(candidates)?,
                })
            })
            .collect::<Result<Vec<_>, MacmimicError>>()?;

        Catalog::new(vendors, profiles)
    }
}

pub fn parse_catalog(text: &str) -> Result<Catalog, MacmimicError> {
    let file: CatalogFile = toml::from_str(text)?;
    file.into_catalog()
}

pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, MacmimicError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let catalog = parse_catalog(&text)?;
    info!(path = %path.display(), "loaded catalog file");
    Ok(catalog)
}
