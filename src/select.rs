use crate::random::RandomSource;
use crate::MacmimicError;

/// Non-empty list of candidates with positive finite weights.
///
/// Order is significant: with a fixed random stream the same index is picked
/// every time, so reordering candidates changes the outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedSet<T> {
    entries: Vec<(T, f64)>,
    total: f64,
}

impl<T> WeightedSet<T> {
    pub fn new(entries: Vec<(T, f64)>) -> Result<Self, MacmimicError> {
        if entries.is_empty() {
            return Err(MacmimicError::EmptyCandidates);
        }
        if let Some((_, w)) = entries.iter().find(|(_, w)| !w.is_finite() || *w <= 0.0) {
            return Err(MacmimicError::InvalidWeight(*w));
        }
        let total: f64 = entries.iter().map(|(_, w)| w).sum();
        if !total.is_finite() {
            return Err(MacmimicError::InvalidWeight(total));
        }
        Ok(Self { entries, total })
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&T, f64)> {
        self.entries.iter().map(|(c, w)| (c, *w))
    }

    /// Share of the total carried by the candidate at `index`.
    pub fn share(&self, index: usize) -> Option<f64> {
        self.entries.get(index).map(|(_, w)| w / self.total)
    }
}

/// Inverse-CDF draw: `r` in `[0, total)`, first candidate whose running sum
/// exceeds `r` wins.
pub fn select<'a, T, R>(rng: &mut R, set: &'a WeightedSet<T>) -> &'a T
where
    R: RandomSource + ?Sized,
{
    let r = rng.random_double(0.0, set.total);
    let mut acc = 0.0;
    for (candidate, weight) in &set.entries {
        acc += weight;
        if r < acc {
            return candidate;
        }
    }
    // rounding can leave r == acc on the last step
    &set.entries[set.entries.len() - 1].0
}

/// Equal-weight pick, `None` only for an empty slice.
pub fn select_uniform<'a, T, R>(rng: &mut R, items: &'a [T]) -> Option<&'a T>
where
    R: RandomSource + ?Sized,
{
    if items.is_empty() {
        return None;
    }
    let idx = rng.random_int(0, items.len() as i64 - 1);
    items.get(idx as usize)
}
