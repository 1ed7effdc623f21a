//! Vendor and profile catalog.
//!
//! A [`Catalog`] is built once, validated, and then only read. Profile
//! candidate order matters for reproducibility and is kept as declared.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::select::WeightedSet;
use crate::util::oui_prefix;
use crate::MacmimicError;

/// Three-byte vendor prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Oui(pub [u8; 3]);

impl Oui {
    pub fn octets(&self) -> [u8; 3] {
        self.0
    }
}

impl fmt::Display for Oui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}:{:02X}:{:02X}", self.0[0], self.0[1], self.0[2])
    }
}

impl FromStr for Oui {
    type Err = MacmimicError;

    /// Exactly `XX:XX:XX`, hex digits in either case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MacmimicError::InvalidOui(s.to_owned());
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(invalid());
        }
        let mut bytes = [0u8; 3];
        for (i, part) in parts.iter().enumerate() {
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            bytes[i] = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        Ok(Oui(bytes))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VendorEntry {
    pub name: String,
    pub ouis: Vec<Oui>,
    pub hostnames: Vec<String>,
    /// Baseline market share.
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileEntry {
    /// Canonical lowercase tag.
    pub tag: String,
    pub aliases: Vec<String>,
    pub candidates: WeightedSet<String>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    vendors: Vec<VendorEntry>,
    vendor_index: HashMap<String, usize>,
    oui_index: HashMap<Oui, usize>,
    profiles: Vec<ProfileEntry>,
    profile_index: HashMap<String, usize>,
}

impl Catalog {
    /// Validates and indexes vendors and profiles.
    ///
    /// Fails on duplicate names or tags, vendors without OUIs or hostname
    /// templates, non-positive weights, and profiles naming unknown vendors.
    pub fn new(
        vendors: Vec<VendorEntry>,
        profiles: Vec<ProfileEntry>,
    ) -> Result<Self, MacmimicError> {
        let mut vendor_index = HashMap::new();
        let mut oui_index = HashMap::new();
        for (i, vendor) in vendors.iter().enumerate() {
            if vendor.ouis.is_empty() {
                return Err(MacmimicError::NoOuis(vendor.name.clone()));
            }
            if vendor.hostnames.is_empty() || vendor.hostnames.iter().any(|h| h.is_empty()) {
                return Err(MacmimicError::NoHostnames(vendor.name.clone()));
            }
            if !vendor.weight.is_finite() || vendor.weight <= 0.0 {
                return Err(MacmimicError::InvalidWeight(vendor.weight));
            }
            if vendor_index.insert(vendor.name.clone(), i).is_some() {
                return Err(MacmimicError::DuplicateVendor(vendor.name.clone()));
            }
            for oui in &vendor.ouis {
                // first vendor listing an OUI owns it for reverse lookups
                oui_index.entry(*oui).or_insert(i);
            }
        }

        let mut profile_index = HashMap::new();
        for (i, profile) in profiles.iter().enumerate() {
            for (vendor, _) in profile.candidates.iter() {
                if !vendor_index.contains_key(vendor) {
                    return Err(MacmimicError::UnknownVendor {
                        profile: profile.tag.clone(),
                        vendor: vendor.clone(),
                    });
                }
            }
            for tag in std::iter::once(&profile.tag).chain(profile.aliases.iter()) {
                if profile_index.insert(tag.to_lowercase(), i).is_some() {
                    return Err(MacmimicError::DuplicateProfile(tag.clone()));
                }
            }
        }

        debug!(
            vendors = vendors.len(),
            profiles = profiles.len(),
            "catalog built"
        );
        Ok(Self {
            vendors,
            vendor_index,
            oui_index,
            profiles,
            profile_index,
        })
    }

    /// Built-in vendor table and the five canonical profiles.
    pub fn builtin() -> Self {
        let vendors = BUILTIN_VENDORS
            .iter()
            .map(|(name, ouis, hostnames, weight)| VendorEntry {
                name: (*name).to_owned(),
                ouis: ouis.iter().map(|o| Oui(*o)).collect(),
                hostnames: hostnames.iter().map(|h| (*h).to_owned()).collect(),
                weight: *weight,
            })
            .collect();
        let profiles = BUILTIN_PROFILES
            .iter()
            .map(|(tag, aliases, candidates)| ProfileEntry {
                tag: (*tag).to_owned(),
                aliases: aliases.iter().map(|a| (*a).to_owned()).collect(),
                candidates: builtin_set(candidates),
            })
            .collect();
        match Self::new(vendors, profiles) {
            Ok(catalog) => catalog,
            Err(e) => unreachable!("built-in catalog is invalid: {e}"),
        }
    }

    /// Case-sensitive exact match.
    pub fn lookup(&self, vendor_name: &str) -> Option<&VendorEntry> {
        self.vendor_index
            .get(vendor_name)
            .map(|&i| &self.vendors[i])
    }

    /// Tag is matched case-insensitively, aliases included. `None` means the
    /// caller should generate a pure random address.
    pub fn profile_candidates(&self, profile_tag: &str) -> Option<&WeightedSet<String>> {
        self.profile(profile_tag).map(|p| &p.candidates)
    }

    pub fn profile(&self, profile_tag: &str) -> Option<&ProfileEntry> {
        self.profile_index
            .get(&profile_tag.to_lowercase())
            .map(|&i| &self.profiles[i])
    }

    /// Canonical tags in declaration order.
    pub fn profile_tags(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.tag.as_str())
    }

    pub fn vendors(&self) -> impl Iterator<Item = &VendorEntry> {
        self.vendors.iter()
    }

    /// Vendor owning the OUI of `mac`, `:` or `-` delimited, any case.
    pub fn identify_vendor(&self, mac: &str) -> Option<&VendorEntry> {
        let oui: Oui = oui_prefix(mac)?.parse().ok()?;
        self.oui_index.get(&oui).map(|&i| &self.vendors[i])
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_set(candidates: &[(&str, f64)]) -> WeightedSet<String> {
    let entries = candidates
        .iter()
        .map(|(vendor, weight)| ((*vendor).to_owned(), *weight))
        .collect();
    match WeightedSet::new(entries) {
        Ok(set) => set,
        Err(e) => unreachable!("built-in profile is invalid: {e}"),
    }
}

type BuiltinVendor = (&'static str, [[u8; 3]; 10], [&'static str; 3], f64);

#[rustfmt::skip]
const BUILTIN_VENDORS: &[BuiltinVendor] = &[
    // enterprise
    ("dell", [
        [0x00, 0x14, 0x22], [0x00, 0x11, 0x43], [0xF0, 0x4D, 0xA2], [0x90, 0xB1, 0x1C], [0xD4, 0xAE, 0x52],
        [0x18, 0x03, 0x73], [0xB8, 0xCA, 0x3A], [0x34, 0x17, 0xEB], [0xB0, 0x83, 0xFE], [0x50, 0x9A, 0x4C],
    ], ["DESKTOP-", "DELL-PC-", "WS-DELL-"], 22.5),
    ("lenovo", [
        [0x00, 0x59, 0x07], [0x80, 0x96, 0xB1], [0xE0, 0x2C, 0xB2], [0x4C, 0x80, 0x93], [0x54, 0xE0, 0x19],
        [0x68, 0xF7, 0x28], [0xC8, 0x1F, 0x66], [0x00, 0x21, 0xCC], [0xB0, 0x7B, 0x25], [0x8C, 0x16, 0x45],
    ], ["LENOVO-", "THINK-", "LAPTOP-"], 18.3),
    ("hp", [
        [0x00, 0x1F, 0x29], [0x38, 0xEA, 0xA7], [0xA4, 0x5D, 0x36], [0x14, 0x58, 0xD0], [0x3C, 0x52, 0x82],
        [0x9C, 0xB6, 0x54], [0x2C, 0x76, 0x8A], [0x00, 0x25, 0xB3], [0x6C, 0xC2, 0x17], [0xFC, 0x15, 0xB4],
    ], ["HP-", "HPPC-", "ELITEBOOK-"], 15.7),
    ("cisco", [
        [0x00, 0x40, 0x96], [0x00, 0x00, 0x0C], [0xE8, 0xBA, 0x70], [0xF8, 0x66, 0xF2], [0x00, 0x1D, 0xA1],
        [0x74, 0xA0, 0x2F], [0x00, 0x07, 0x7D], [0xA0, 0xF8, 0x49], [0x88, 0x43, 0xE1], [0xF0, 0x25, 0x72],
    ], ["CISCO-AP-", "SWITCH-", "VOIP-"], 8.2),
    // consumer
    ("apple", [
        [0xF0, 0x18, 0x98], [0x00, 0x1C, 0xB3], [0x28, 0xE1, 0x4C], [0xA4, 0x5E, 0x60], [0xBC, 0x52, 0xB7],
        [0xF0, 0xDB, 0xE2], [0x3C, 0x06, 0x30], [0x70, 0x56, 0x81], [0x88, 0x66, 0x5A], [0xD0, 0x23, 0xDB],
    ], ["iPhone", "MacBook", "iPad"], 28.4),
    ("samsung", [
        [0x34, 0x14, 0x5F], [0x00, 0x12, 0x47], [0xE8, 0x50, 0x8B], [0x40, 0x4E, 0x36], [0xD0, 0x59, 0xE4],
        [0xAC, 0x36, 0x13], [0x78, 0x1F, 0xDB], [0xC8, 0x98, 0x25], [0x00, 0x1D, 0x25], [0x38, 0xAA, 0x3C],
    ], ["Galaxy-", "Samsung-", "SM-"], 19.6),
    ("xiaomi", [
        [0x34, 0xCE, 0x00], [0x64, 0x09, 0x80], [0x50, 0x8F, 0x4C], [0x74, 0x51, 0xBA], [0x04, 0xCF, 0x4B],
        [0x28, 0x6C, 0x07], [0xF8, 0xA4, 0x5F], [0xAC, 0xC1, 0xEE], [0x78, 0x02, 0xF8], [0x34, 0x80, 0xB3],
    ], ["Redmi-", "MI-", "POCO-"], 11.2),
    ("google", [
        [0xF4, 0xF5, 0xD8], [0x3C, 0x5A, 0xB4], [0x84, 0x73, 0x03], [0xB4, 0xF0, 0xAB], [0x6C, 0xAD, 0xF8],
        [0xAC, 0x37, 0x43], [0x00, 0x1A, 0x11], [0xF8, 0x8F, 0xCA], [0x7C, 0x2F, 0x80], [0x54, 0x60, 0x09],
    ], ["Pixel-", "Nest-", "Google-"], 6.8),
    // iot
    ("espressif", [
        [0x24, 0x0A, 0xC4], [0x30, 0xAE, 0xA4], [0xA4, 0xCF, 0x12], [0x48, 0x3F, 0xDA], [0x84, 0xCC, 0xA8],
        [0xC8, 0x2B, 0x96], [0xDC, 0x4F, 0x22], [0x24, 0x62, 0xAB], [0x3C, 0x71, 0xBF], [0xEC, 0xFA, 0xBC],
    ], ["ESP-", "ESP32-", "IoT-Device-"], 32.1),
    ("amazon", [
        [0x74, 0xC2, 0x46], [0xF0, 0xD2, 0xF1], [0xCC, 0x50, 0xE3], [0x6C, 0x56, 0x97], [0x38, 0xF7, 0x3D],
        [0x4C, 0xEF, 0xC0], [0xB4, 0x7C, 0x9C], [0x00, 0xFC, 0x8B], [0x84, 0xD6, 0xD0], [0x50, 0xDC, 0xE7],
    ], ["Echo-", "Ring-", "Alexa-"], 18.5),
    ("tuya", [
        [0x10, 0x5A, 0x17], [0x68, 0x57, 0x2D], [0x7C, 0x87, 0xCE], [0xD4, 0xA6, 0x51], [0x84, 0xE3, 0x42],
        [0x1C, 0x90, 0xFF], [0x50, 0x02, 0x91], [0xA4, 0xDA, 0x22], [0x24, 0xA1, 0x60], [0xCC, 0x7B, 0x5C],
    ], ["Smart-", "Tuya-", "WiFi-"], 14.3),
    // gaming
    ("sony", [
        [0x00, 0xD9, 0xD1], [0x00, 0x04, 0x1F], [0x7C, 0xBB, 0x8A], [0xFC, 0x0F, 0xE6], [0x00, 0x1F, 0xA7],
        [0x98, 0xE8, 0xFA], [0xB8, 0x8D, 0x12], [0x30, 0x05, 0x5C], [0x00, 0x19, 0xC5], [0x00, 0x24, 0x8D],
    ], ["PlayStation", "PS5-", "PS4-"], 42.7),
    ("nintendo", [
        [0x98, 0xB6, 0xE9], [0x00, 0x09, 0xBF], [0xA4, 0x5C, 0x27], [0x78, 0xA2, 0xA0], [0x58, 0xBD, 0xA3],
        [0x00, 0x19, 0x1D], [0x00, 0x17, 0xAB], [0x00, 0x1F, 0x32], [0x00, 0x1B, 0xEA], [0x00, 0x1E, 0x35],
    ], ["Switch-", "Nintendo-", "NS-"], 31.8),
    ("microsoft", [
        [0x00, 0x50, 0xF2], [0x7C, 0xED, 0x8D], [0x98, 0x5F, 0xD3], [0x28, 0x18, 0x78], [0xD8, 0x9E, 0xF3],
        [0x00, 0x0D, 0x3A], [0xE0, 0x0F, 0xEC], [0x1C, 0x3B, 0xF3], [0xB0, 0xC0, 0x90], [0x68, 0x17, 0x29],
    ], ["Xbox-", "MSFT-", "Surface-"], 19.4),
    // generic nics
    ("intel", [
        [0x00, 0x13, 0x20], [0x00, 0x27, 0x10], [0x00, 0x1B, 0x21], [0xAC, 0xDE, 0x48], [0x00, 0x15, 0x00],
        [0x00, 0x1F, 0x3C], [0xE0, 0xDB, 0x55], [0x94, 0xDE, 0x80], [0xA0, 0x36, 0x9F], [0xB8, 0x6B, 0x23],
    ], ["PC-", "DESKTOP-", "LAPTOP-"], 25.3),
    ("realtek", [
        [0x00, 0xE0, 0x4C], [0x52, 0x54, 0x00], [0x00, 0x0E, 0x2E], [0x70, 0x4D, 0x7B], [0x18, 0xDB, 0xF2],
        [0x98, 0xFC, 0x84], [0x30, 0x5A, 0x3A], [0x08, 0x62, 0x66], [0xC8, 0x5B, 0x76], [0x94, 0xE9, 0x79],
    ], ["RTL-", "Device-", "NIC-"], 31.2),
];

type BuiltinProfile = (&'static str, &'static [&'static str], &'static [(&'static str, f64)]);

const BUILTIN_PROFILES: &[BuiltinProfile] = &[
    (
        "corporate",
        &[],
        &[("dell", 22.5), ("lenovo", 18.3), ("hp", 15.7), ("cisco", 8.2), ("intel", 25.3)],
    ),
    (
        "cafe",
        &["public"],
        &[("apple", 28.4), ("samsung", 19.6), ("xiaomi", 11.2), ("google", 6.8)],
    ),
    (
        "iot",
        &["smarthome"],
        &[("espressif", 32.1), ("amazon", 18.5), ("tuya", 14.3), ("xiaomi", 11.2)],
    ),
    (
        "gamer",
        &["gaming"],
        &[("sony", 42.7), ("nintendo", 31.8), ("microsoft", 19.4)],
    ),
    (
        "stealth",
        &[],
        &[("apple", 28.4), ("samsung", 19.6), ("dell", 22.5), ("lenovo", 18.3), ("intel", 25.3)],
    ),
];
