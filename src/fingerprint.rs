//! Blending into an observed environment.
//!
//! Given addresses some caller already collected, work out which catalog
//! vendors are present and pick new addresses from the same mix.

use tracing::debug;

use crate::catalog::Catalog;
use crate::random::RandomSource;
use crate::select::{select, WeightedSet};
use crate::synth::MacSynthesizer;

/// Bucket name for addresses no catalog vendor owns.
pub const UNKNOWN_VENDOR: &str = "unknown";

const BASE_DETECTION_RISK: f64 = 0.3;
const OFF_HOURS_RISK: f64 = 0.2;
const UNKNOWN_VENDOR_RISK: f64 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentFingerprint {
    /// Recognised vendors with their counts, in first-seen order.
    pub vendor_counts: Vec<(String, usize)>,
    /// Addresses whose OUI no catalog vendor owns.
    pub unknown: usize,
}

impl EnvironmentFingerprint {
    pub fn observe<'a, I>(catalog: &Catalog, macs: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut vendor_counts: Vec<(String, usize)> = Vec::new();
        let mut unknown = 0;
        for mac in macs {
            match catalog.identify_vendor(mac) {
                Some(vendor) => match vendor_counts.iter_mut().find(|(n, _)| *n == vendor.name) {
                    Some((_, count)) => *count += 1,
                    None => vendor_counts.push((vendor.name.clone(), 1)),
                },
                None => unknown += 1,
            }
        }
        Self {
            vendor_counts,
            unknown,
        }
    }

    pub fn recognised(&self) -> usize {
        self.vendor_counts.iter().map(|(_, c)| c).sum()
    }

    /// Every observed address, recognised or not.
    pub fn total(&self) -> usize {
        self.recognised() + self.unknown
    }

    fn buckets(&self) -> impl Iterator<Item = (&str, usize)> {
        let unknown = (self.unknown > 0).then_some((UNKNOWN_VENDOR, self.unknown));
        self.vendor_counts
            .iter()
            .map(|(n, c)| (n.as_str(), *c))
            .chain(unknown)
    }

    /// Fraction of all observed addresses per vendor. Unrecognised ones form
    /// a trailing [`UNKNOWN_VENDOR`] bucket.
    pub fn distribution(&self) -> Vec<(&str, f64)> {
        let total = self.total() as f64;
        self.buckets().map(|(n, c)| (n, c as f64 / total)).collect()
    }

    /// Shannon entropy of [`distribution`](Self::distribution) divided by its
    /// maximum, so `0.0` is a single bucket and `1.0` an even spread.
    pub fn normalized_entropy(&self) -> f64 {
        let n = self.buckets().count();
        if n < 2 {
            return 0.0;
        }
        let entropy: f64 = self
            .distribution()
            .iter()
            .map(|(_, p)| -p * p.log2())
            .sum();
        entropy / (n as f64).log2()
    }

    /// `1.0 - normalized_entropy`: a homogeneous network makes an odd address
    /// stand out. `0.5` when nothing was observed.
    pub fn risk_score(&self) -> f64 {
        if self.total() == 0 {
            return 0.5;
        }
        1.0 - self.normalized_entropy()
    }

    /// Most frequent bucket, the first seen on ties. `None` for an empty
    /// observation.
    pub fn dominant_vendor(&self) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for (name, count) in self.buckets() {
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((name, count));
            }
        }
        best.map(|(name, _)| name)
    }

    /// Two profile tags suited to this environment, best first.
    ///
    /// Diverse networks get `random`; otherwise the presence of workstation
    /// vendors (dell, lenovo) or consumer phone vendors (apple, samsung)
    /// decides between `corporate` and `cafe`.
    pub fn recommended_profiles(&self) -> [&'static str; 2] {
        let seen = |name: &str| self.vendor_counts.iter().any(|(n, _)| n == name);
        if self.risk_score() < 0.3 {
            ["random", "stealth"]
        } else if seen("dell") || seen("lenovo") {
            ["corporate", "stealth"]
        } else if seen("apple") || seen("samsung") {
            ["cafe", "stealth"]
        } else {
            ["stealth", "iot"]
        }
    }

    /// Observed vendors weighted by count, `None` when nothing was recognised.
    pub fn weights(&self) -> Option<WeightedSet<String>> {
        let entries = self
            .vendor_counts
            .iter()
            .map(|(n, c)| (n.clone(), *c as f64))
            .collect();
        WeightedSet::new(entries).ok()
    }

    /// Address from a vendor drawn with the observed frequencies. Falls back
    /// to a pure random address when no vendor was recognised.
    pub fn blend_mac<R: RandomSource>(&self, synth: &mut MacSynthesizer<'_, R>) -> String {
        let Some(weights) = self.weights() else {
            debug!("no recognised vendors, using pure random");
            return synth.generate_pure_random();
        };
        let vendor = select(synth.rng_mut(), &weights);
        synth.generate_vendor_mac(vendor)
    }
}

/// Heuristic chance that `mac` draws attention in `environment` at local
/// `hour` (0..=23), capped at `1.0`.
///
/// Starts at 0.3, adds 0.2 for a `corporate` network outside 07:00..=19:59
/// and 0.3 when no catalog vendor owns the OUI.
pub fn detection_probability(catalog: &Catalog, mac: &str, environment: &str, hour: u32) -> f64 {
    let mut risk = BASE_DETECTION_RISK;
    if environment == "corporate" && !(7..=19).contains(&hour) {
        risk += OFF_HOURS_RISK;
    }
    if catalog.identify_vendor(mac).is_none() {
        risk += UNKNOWN_VENDOR_RISK;
    }
    risk.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::EntropyRandom;
    use crate::util::validate_mac;

    const SEEN: [&str; 6] = [
        "00:14:22:01:02:03",
        "00:11:43:AA:BB:CC",
        "f0-18-98-00-00-01",
        "00:14:22:09:09:09",
        "02:00:00:00:00:01",
        "garbage",
    ];

    #[test]
    fn counts_vendors_in_first_seen_order() {
        let catalog = Catalog::builtin();
        let fp = EnvironmentFingerprint::observe(&catalog, SEEN);
        assert_eq!(
            fp.vendor_counts,
            vec![("dell".to_owned(), 3), ("apple".to_owned(), 1)]
        );
        assert_eq!(fp.unknown, 2);
        assert_eq!(fp.recognised(), 4);
        assert_eq!(fp.total(), 6);
        assert_eq!(
            fp.distribution(),
            vec![("dell", 3.0 / 6.0), ("apple", 1.0 / 6.0), ("unknown", 2.0 / 6.0)]
        );
    }

    #[test]
    fn unknown_addresses_count_toward_entropy() {
        let catalog = Catalog::builtin();
        let fp = EnvironmentFingerprint::observe(&catalog, ["00:14:22:00:00:01", "02:00:00:00:00:01"]);
        assert_eq!(fp.distribution(), vec![("dell", 0.5), ("unknown", 0.5)]);
        assert!((fp.normalized_entropy() - 1.0).abs() < 1e-12);

        let only_unknown = EnvironmentFingerprint::observe(&catalog, ["garbage", "02:00:00:00:00:01"]);
        assert_eq!(only_unknown.distribution(), vec![("unknown", 1.0)]);
        assert_eq!(only_unknown.normalized_entropy(), 0.0);
    }

    #[test]
    fn entropy_bounds() {
        let catalog = Catalog::builtin();
        let single = EnvironmentFingerprint::observe(&catalog, ["00:14:22:00:00:01"]);
        assert_eq!(single.normalized_entropy(), 0.0);

        let even = EnvironmentFingerprint::observe(
            &catalog,
            ["00:14:22:00:00:01", "F0:18:98:00:00:01"],
        );
        assert!((even.normalized_entropy() - 1.0).abs() < 1e-12);

        let skewed = EnvironmentFingerprint::observe(&catalog, SEEN);
        let h = skewed.normalized_entropy();
        assert!(h > 0.0 && h < 1.0);
    }

    #[test]
    fn risk_is_complement_of_entropy() {
        let catalog = Catalog::builtin();
        let empty = EnvironmentFingerprint::observe(&catalog, Vec::<&str>::new());
        assert_eq!(empty.risk_score(), 0.5);

        let single = EnvironmentFingerprint::observe(&catalog, ["00:14:22:00:00:01"]);
        assert_eq!(single.risk_score(), 1.0);

        let skewed = EnvironmentFingerprint::observe(&catalog, SEEN);
        assert!((skewed.risk_score() - (1.0 - skewed.normalized_entropy())).abs() < 1e-12);
        assert!(skewed.risk_score() > 0.0 && skewed.risk_score() < 1.0);
    }

    #[test]
    fn dominant_vendor_prefers_first_seen_on_ties() {
        let catalog = Catalog::builtin();
        let fp = EnvironmentFingerprint::observe(&catalog, SEEN);
        assert_eq!(fp.dominant_vendor(), Some("dell"));

        let tied = EnvironmentFingerprint::observe(
            &catalog,
            ["F0:18:98:00:00:01", "00:14:22:00:00:01"],
        );
        assert_eq!(tied.dominant_vendor(), Some("apple"));

        let unknowns = EnvironmentFingerprint::observe(&catalog, ["garbage", "garbage", "00:14:22:00:00:01"]);
        assert_eq!(unknowns.dominant_vendor(), Some(UNKNOWN_VENDOR));

        assert_eq!(EnvironmentFingerprint::observe(&catalog, Vec::<&str>::new()).dominant_vendor(), None);
    }

    #[test]
    fn recommendations_follow_environment() {
        let catalog = Catalog::builtin();
        let recommend = |macs: &[&str]| {
            EnvironmentFingerprint::observe(&catalog, macs.iter().copied()).recommended_profiles()
        };
        // dell + apple evenly: entropy 1, risk 0
        assert_eq!(
            recommend(&["00:14:22:00:00:01", "F0:18:98:00:00:01"]),
            ["random", "stealth"]
        );
        assert_eq!(recommend(&["00:14:22:00:00:01"]), ["corporate", "stealth"]);
        assert_eq!(recommend(&["00:21:CC:00:00:01"]), ["corporate", "stealth"]);
        assert_eq!(recommend(&["F0:18:98:00:00:01"]), ["cafe", "stealth"]);
        assert_eq!(recommend(&["00:19:C5:00:00:01"]), ["stealth", "iot"]);
        assert_eq!(recommend(&["garbage"]), ["stealth", "iot"]);
        assert_eq!(recommend(&[]), ["stealth", "iot"]);
    }

    #[test]
    fn detection_probability_adds_hour_and_vendor_risk() {
        let catalog = Catalog::builtin();
        let dell = "00:14:22:00:00:01";
        let stranger = "02:00:00:00:00:01";
        let close = |a: f64, b: f64| (a - b).abs() < 1e-9;

        assert!(close(detection_probability(&catalog, dell, "corporate", 12), 0.3));
        assert!(close(detection_probability(&catalog, dell, "corporate", 7), 0.3));
        assert!(close(detection_probability(&catalog, dell, "corporate", 19), 0.3));
        assert!(close(detection_probability(&catalog, dell, "corporate", 6), 0.5));
        assert!(close(detection_probability(&catalog, dell, "corporate", 20), 0.5));
        assert!(close(detection_probability(&catalog, dell, "cafe", 3), 0.3));
        assert!(close(detection_probability(&catalog, stranger, "cafe", 12), 0.6));
        assert!(close(detection_probability(&catalog, stranger, "corporate", 23), 0.8));
    }

    #[test]
    fn blend_stays_within_observed_vendors() {
        let catalog = Catalog::builtin();
        let fp = EnvironmentFingerprint::observe(&catalog, SEEN);
        let mut synth = MacSynthesizer::with_rng(&catalog, EntropyRandom::from_seed(4));
        for _ in 0..300 {
            let mac = fp.blend_mac(&mut synth);
            let vendor = catalog.identify_vendor(&mac).unwrap();
            assert!(vendor.name == "dell" || vendor.name == "apple", "{mac}");
        }
    }

    #[test]
    fn blend_without_matches_is_pure_random() {
        let catalog = Catalog::builtin();
        let fp = EnvironmentFingerprint::observe(&catalog, ["02:00:00:00:00:01"]);
        assert!(fp.weights().is_none());
        let mut synth = MacSynthesizer::with_rng(&catalog, EntropyRandom::from_seed(4));
        let mac = fp.blend_mac(&mut synth);
        assert!(validate_mac(&mac));
        let first = u8::from_str_radix(&mac[..2], 16).unwrap();
        assert_eq!(first & 0x03, 0x02);
    }
}
