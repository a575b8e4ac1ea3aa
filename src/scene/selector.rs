use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Tracks which palette indices have been handed out.
#[derive(Clone, Debug, Default)]
pub struct UsedIndexSet {
    used: Vec<bool>,
    count: usize,
}

impl UsedIndexSet {
    pub fn new(len: usize) -> Self {
        Self {
            used: vec![false; len],
            count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.used.len()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_exhausted(&self) -> bool {
        self.count >= self.used.len()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.used.get(index).copied().unwrap_or(false)
    }

    /// Returns `true` if `index` was not yet marked.
    pub fn insert(&mut self, index: usize) -> bool {
        match self.used.get_mut(index) {
            Some(slot) if !*slot => {
                *slot = true;
                self.count += 1;
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.used.iter_mut().for_each(|u| *u = false);
        self.count = 0;
    }
}

/// Seedable source of the engine's random choices.
///
/// All draws go through one `Pcg32`, so a fixed seed reproduces a whole population.
#[derive(Clone, Debug)]
pub struct RandomSelector {
    rng: Pcg32,
    max_retries: u32,
    warned_exhausted: bool,
}

impl RandomSelector {
    pub fn new(seed: Option<u64>, max_retries: u32) -> Self {
        let rng = match seed {
            Some(s) => Pcg32::seed_from_u64(s),
            None => Pcg32::from_rng(&mut rand::rng()),
        };
        Self {
            rng,
            max_retries: max_retries.max(1),
            warned_exhausted: false,
        }
    }

    /// Uniform in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Uniform in `[0, max)`; `0.0` when `max <= 0`.
    pub fn uniform(&mut self, max: f64) -> f64 {
        if max > 0.0 { self.unit() * max } else { 0.0 }
    }

    /// Uniform in `(-1, 1)`, never exactly zero.
    ///
    /// Draws are retried a bounded number of times; the last resort is the smallest
    /// positive value with a random sign.
    pub fn non_zero_signed(&mut self) -> f64 {
        for _ in 0..self.max_retries {
            let v = self.unit() * 2.0 - 1.0;
            if v != 0.0 {
                return v;
            }
        }
        if self.rng.random::<bool>() {
            f64::MIN_POSITIVE
        } else {
            -f64::MIN_POSITIVE
        }
    }

    /// Pick a palette index not yet in `used` and mark it.
    ///
    /// Random draws come first. After `max_retries` misses the remaining unused indices
    /// are scanned from a random start. Once every index is taken, repeats are allowed.
    /// Returns `None` only for an empty palette.
    pub fn pick_unused_index(&mut self, used: &mut UsedIndexSet) -> Option<usize> {
        let len = used.capacity();
        if len == 0 {
            return None;
        }
        // A fresh set starts a new pass, which gets its own exhaustion warning.
        if used.is_empty() {
            self.warned_exhausted = false;
        }
        if used.is_exhausted() {
            if !self.warned_exhausted {
                tracing::warn!(palette = len, "palette exhausted, allowing repeated sprites");
                self.warned_exhausted = true;
            }
            return Some(self.rng.random_range(0..len));
        }

        for _ in 0..self.max_retries {
            let idx = self.rng.random_range(0..len);
            if used.insert(idx) {
                return Some(idx);
            }
        }

        let start = self.rng.random_range(0..len);
        let idx = (0..len)
            .map(|k| (start + k) % len)
            .find(|&i| !used.contains(i))?;
        used.insert(idx);
        Some(idx)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/selector.rs"]
mod tests;
