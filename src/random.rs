use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::{OsRng, StdRng};
use rand::{Rng, RngCore, SeedableRng};

/// Source of randomness consumed by every generator in the crate.
///
/// Implementations own their state exclusively. Share one between threads
/// only behind a lock; the usual setup is one source per thread.
pub trait RandomSource {
    /// A byte uniform over `0..=255`.
    fn random_byte(&mut self) -> u8;

    /// Uniform over the inclusive range `min..=max`. Returns `min` when the
    /// range is empty or a single point.
    fn random_int(&mut self, min: i64, max: i64) -> i64;

    /// Uniform over the half-open range `min..max`. Returns `min` when the
    /// range is empty, has a NaN or infinite end.
    fn random_double(&mut self, min: f64, max: f64) -> f64;

    /// Two uppercase hex digits for a uniform byte.
    fn random_byte_hex(&mut self) -> String {
        format!("{:02X}", self.random_byte())
    }
}

/// `StdRng` seeded from OS entropy mixed with the clock.
#[derive(Debug, Clone)]
pub struct EntropyRandom {
    rng: StdRng,
}

impl EntropyRandom {
    pub fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        let seed = OsRng.next_u64() ^ nanos;
        tracing::trace!("seeded entropy source");
        Self::from_seed(seed)
    }

    /// Deterministic stream, same seed gives the same outputs.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for EntropyRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for EntropyRandom {
    fn random_byte(&mut self) -> u8 {
        self.rng.gen()
    }

    fn random_int(&mut self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    fn random_double(&mut self, min: f64, max: f64) -> f64 {
        if min.is_nan() || max.is_nan() || min >= max || min.is_infinite() || max.is_infinite() {
            return min;
        }
        if !(max - min).is_finite() {
            // width overflows f64, interpolate so neither term leaves range
            let u: f64 = self.rng.gen();
            let v = min * (1.0 - u) + max * u;
            return if v < max { v } else { min };
        }
        self.rng.gen_range(min..max)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = EntropyRandom::from_seed(42);
        let mut b = EntropyRandom::from_seed(42);
        for _ in 0..64 {
            assert_eq!(a.random_byte(), b.random_byte());
            assert_eq!(a.random_int(0, 1000), b.random_int(0, 1000));
        }
    }

    #[test]
    fn random_int_is_inclusive() {
        let mut rng = EntropyRandom::from_seed(7);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..2_000 {
            let v = rng.random_int(1, 4);
            assert!((1..=4).contains(&v));
            seen_min |= v == 1;
            seen_max |= v == 4;
        }
        assert!(seen_min && seen_max);
    }

    #[test]
    fn degenerate_ranges_return_min() {
        let mut rng = EntropyRandom::from_seed(1);
        assert_eq!(rng.random_int(5, 5), 5);
        assert_eq!(rng.random_int(9, 3), 9);
        assert_eq!(rng.random_double(2.0, 2.0), 2.0);
    }

    #[test]
    fn random_double_stays_half_open() {
        let mut rng = EntropyRandom::from_seed(3);
        for _ in 0..10_000 {
            let v = rng.random_double(0.0, 1.5);
            assert!((0.0..1.5).contains(&v));
        }
    }

    #[test]
    fn overflowing_double_ranges_do_not_panic() {
        let mut rng = EntropyRandom::from_seed(1);
        for _ in 0..1_000 {
            let v = rng.random_double(f64::MIN, f64::MAX);
            assert!(v.is_finite() && v < f64::MAX, "{v}");
            let v = rng.random_double(-1.0e308, 1.0e308);
            assert!((-1.0e308..1.0e308).contains(&v), "{v}");
        }
        assert_eq!(rng.random_double(0.0, f64::INFINITY), 0.0);
        assert_eq!(rng.random_double(f64::NEG_INFINITY, 0.0), f64::NEG_INFINITY);
        assert_eq!(rng.random_double(1.0, f64::NAN), 1.0);
    }

    #[test]
    fn byte_hex_is_two_uppercase_digits() {
        let mut rng = EntropyRandom::new();
        for _ in 0..500 {
            let hex = rng.random_byte_hex();
            assert_eq!(hex.len(), 2);
            assert!(hex
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
        }
    }
}
