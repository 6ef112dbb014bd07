//! Deterministic value generators
//!
//! Tests never touch a real RNG; every trace is seeded so failures
//! reproduce exactly.

/// Xorshift generator for test data
pub struct TestRng {
    state: u32,
}

impl TestRng {
    /// Seed the generator; zero is remapped since xorshift sticks there
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0xDEAD_BEEF } else { seed },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    /// Uniform value in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u32() >> 8) as f64 / 16_777_216.0
    }

    /// Uniform value in [min, max)
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }
}

/// Flat trace with bounded jitter around `base`
pub fn noisy_trace(rng: &mut TestRng, base: f64, jitter: f64, len: usize) -> Vec<f64> {
    (0..len)
        .map(|_| base + rng.range(-jitter, jitter))
        .collect()
}

/// Linear ramp from `start` to `end` inclusive
pub fn ramp(start: f64, end: f64, len: usize) -> Vec<f64> {
    if len < 2 {
        return vec![start];
    }
    let step = (end - start) / (len - 1) as f64;
    (0..len).map(|i| start + step * i as f64).collect()
}
