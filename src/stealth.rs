use tracing::debug;

use crate::catalog::Catalog;
use crate::random::{EntropyRandom, RandomSource};
use crate::select::select_uniform;

pub const STEALTH_DELAY_MS: (i64, i64) = (200, 800);
const HOSTNAME_SUFFIX: (i64, i64) = (1000, 9999);
const FALLBACK_HOSTNAME: &str = "DEVICE-";

/// Hostnames, timing jitter and TTLs that look like ordinary devices.
///
/// Delays are values for the caller to honour; nothing here sleeps.
#[derive(Debug)]
pub struct AntiDetection<'c, R = EntropyRandom> {
    catalog: &'c Catalog,
    rng: R,
}

impl<'c> AntiDetection<'c, EntropyRandom> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self::with_rng(catalog, EntropyRandom::new())
    }
}

impl<'c, R: RandomSource> AntiDetection<'c, R> {
    pub fn with_rng(catalog: &'c Catalog, rng: R) -> Self {
        Self { catalog, rng }
    }

    /// One of the vendor's templates plus four digits, `DEVICE-####` for
    /// vendors the catalog does not know.
    pub fn generate_hostname(&mut self, vendor_name: &str) -> String {
        let catalog = self.catalog;
        let prefix = match catalog.lookup(vendor_name) {
            Some(vendor) => select_uniform(&mut self.rng, &vendor.hostnames)
                .map(String::as_str)
                .unwrap_or(FALLBACK_HOSTNAME),
            None => {
                debug!(vendor = vendor_name, "unknown vendor, generic hostname");
                FALLBACK_HOSTNAME
            }
        };
        let suffix = self.rng.random_int(HOSTNAME_SUFFIX.0, HOSTNAME_SUFFIX.1);
        format!("{prefix}{suffix}")
    }

    /// Milliseconds to wait between operations, `200..=800`.
    pub fn stealth_delay_ms(&mut self) -> u64 {
        self.rng.random_int(STEALTH_DELAY_MS.0, STEALTH_DELAY_MS.1) as u64
    }
}

/// Default IP TTL of the given OS family: 128 for `windows`, 64 for
/// everything else (`linux`, `macos` and unknown tags).
pub fn realistic_ttl(os_tag: &str) -> u8 {
    match os_tag {
        "windows" => 128,
        _ => 64,
    }
}
