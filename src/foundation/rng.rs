use rand::{Rng as _, SeedableRng as _};
use rand_chacha::ChaCha8Rng;

/// Seeded random source for all style/geometry/color draws.
///
/// One `Sampler` per job keeps draw order a reproducibility contract: for a
/// fixed seed, the sequence of values (and therefore the sampled style and
/// every output path) is identical across runs.
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: ChaCha8Rng,
    // Box-Muller produces deviates in pairs; the spare is cached so gauss()
    // consumes uniform draws at a stable rate.
    next_gaussian: Option<f64>,
}

impl Sampler {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_gaussian: None,
        }
    }

    /// Uniform draw in `[0, 1)`.
    pub fn rnd(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Uniform draw in `[min, max)`.
    pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.rnd()
    }

    /// Uniform integer in `[lo, hi]`, both ends inclusive.
    pub fn range_i32(&mut self, lo: i32, hi: i32) -> i32 {
        debug_assert!(lo <= hi);
        self.rng.random_range(lo..=hi)
    }

    /// Uniform integer in `[lo, hi]`, both ends inclusive.
    pub fn range_u32(&mut self, lo: u32, hi: u32) -> u32 {
        debug_assert!(lo <= hi);
        self.rng.random_range(lo..=hi)
    }

    /// `true` with probability `p`.
    pub fn odds(&mut self, p: f64) -> bool {
        self.rnd() < p
    }

    /// Normal deviate via polar Box-Muller, spare deviate cached.
    pub fn gauss(&mut self, mean: f64, stdev: f64) -> f64 {
        if let Some(z) = self.next_gaussian.take() {
            return mean + stdev * z;
        }
        let (v1, v2, s) = loop {
            let v1 = self.rnd() * 2.0 - 1.0;
            let v2 = self.rnd() * 2.0 - 1.0;
            let s = v1 * v1 + v2 * v2;
            if s < 1.0 && s != 0.0 {
                break (v1, v2, s);
            }
        };
        let multiplier = (-2.0 * f64::ln(s) / s).sqrt();
        self.next_gaussian = Some(v2 * multiplier);
        mean + stdev * (v1 * multiplier)
    }

    /// Uniform choice from a non-empty slice.
    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        assert!(!items.is_empty(), "choice on empty slice");
        let idx = self.rng.random_range(0..items.len());
        &items[idx]
    }

    pub fn index(&mut self, len: usize) -> usize {
        assert!(len > 0, "index on empty range");
        self.rng.random_range(0..len)
    }

    /// A uniform RGB triple.
    pub fn rgb(&mut self) -> [u8; 3] {
        [
            self.range_u32(0, 255) as u8,
            self.range_u32(0, 255) as u8,
            self.range_u32(0, 255) as u8,
        ]
    }

    /// 128 random bits, hex-encoded. Used as a style's output namespace; the
    /// collision probability across a batch is negligible.
    pub fn hex_name(&mut self) -> String {
        let mut out = String::with_capacity(32);
        for _ in 0..2 {
            let v: u64 = self.rng.random();
            out.push_str(&format!("{v:016x}"));
        }
        out
    }
}
