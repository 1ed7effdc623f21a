use macaddr::MacAddr6;
use tracing::{debug, warn};

use crate::catalog::{Catalog, VendorEntry};
use crate::random::{EntropyRandom, RandomSource};
use crate::select::{select, select_uniform};
use crate::util::{format_mac, local_unicast};

/// Builds MAC address strings from the catalog and a random source.
///
/// Every address comes out as `XX:XX:XX:XX:XX:XX`, uppercase.
#[derive(Debug)]
pub struct MacSynthesizer<'c, R = EntropyRandom> {
    catalog: &'c Catalog,
    rng: R,
}

impl<'c> MacSynthesizer<'c, EntropyRandom> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self::with_rng(catalog, EntropyRandom::new())
    }
}

impl<'c, R: RandomSource> MacSynthesizer<'c, R> {
    pub fn with_rng(catalog: &'c Catalog, rng: R) -> Self {
        Self { catalog, rng }
    }

    pub(crate) fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Vendor picked by profile weight, OUI picked uniformly, random suffix.
    /// Unknown profiles produce a pure random address.
    pub fn generate_profile_mac(&mut self, profile_tag: &str) -> String {
        let catalog = self.catalog;
        let Some(candidates) = catalog.profile_candidates(profile_tag) else {
            debug!(profile = profile_tag, "unknown profile, using pure random");
            return self.generate_pure_random();
        };
        let vendor_name = select(&mut self.rng, candidates);
        match catalog.lookup(vendor_name) {
            Some(vendor) => self.vendor_mac(vendor),
            None => {
                warn!(vendor = %vendor_name, "profile vendor missing from catalog");
                self.generate_pure_random()
            }
        }
    }

    /// Address under one of `vendor_name`'s OUIs, or a pure random one if
    /// the vendor is unknown.
    pub fn generate_vendor_mac(&mut self, vendor_name: &str) -> String {
        let catalog = self.catalog;
        match catalog.lookup(vendor_name) {
            Some(vendor) => self.vendor_mac(vendor),
            None => {
                debug!(vendor = vendor_name, "unknown vendor, using pure random");
                self.generate_pure_random()
            }
        }
    }

    /// Locally administered unicast address with no vendor prefix.
    pub fn generate_pure_random(&mut self) -> String {
        let first = local_unicast(self.rng.random_byte());
        let mac = MacAddr6::new(
            first,
            self.rng.random_byte(),
            self.rng.random_byte(),
            self.rng.random_byte(),
            self.rng.random_byte(),
            self.rng.random_byte(),
        );
        format_mac(&mac)
    }

    /// `base_oui` followed by three random bytes. The prefix is not checked,
    /// whatever the caller passes ends up in the output.
    pub fn generate_sequential_mac(&mut self, base_oui: &str) -> String {
        format!("{}:{}", base_oui, self.random_suffix())
    }

    /// `count` addresses sharing `base_oui`.
    pub fn generate_sequential_batch(&mut self, base_oui: &str, count: usize) -> Vec<String> {
        (0..count)
            .map(|_| self.generate_sequential_mac(base_oui))
            .collect()
    }

    pub(crate) fn vendor_mac(&mut self, vendor: &VendorEntry) -> String {
        let Some(oui) = select_uniform(&mut self.rng, &vendor.ouis) else {
            return self.generate_pure_random();
        };
        let [a, b, c] = oui.octets();
        let mac = MacAddr6::new(
            a,
            b,
            c,
            self.rng.random_byte(),
            self.rng.random_byte(),
            self.rng.random_byte(),
        );
        format_mac(&mac)
    }

    fn random_suffix(&mut self) -> String {
        format!(
            "{}:{}:{}",
            self.rng.random_byte_hex(),
            self.rng.random_byte_hex(),
            self.rng.random_byte_hex()
        )
    }
}
