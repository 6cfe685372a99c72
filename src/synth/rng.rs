//! Seeded jitter streams.
//!
//! Generators that must be reproducible draw from a [`SeededStream`];
//! generators that are allowed to vary take a `rand::Rng` instead.

/// Deterministic stream of floats in `[0, 1)` built from a 32-bit seed.
pub trait SeededStream {
    fn from_seed(seed: u32) -> Self;
    fn next_unit(&mut self) -> f64;
}

/// xorshift32 with a 4-decimal output grid.
#[derive(Debug, Clone)]
pub struct XorShift32 {
    state: u32,
}

impl SeededStream for XorShift32 {
    fn from_seed(seed: u32) -> Self {
        Self { state: seed }
    }

    fn next_unit(&mut self) -> f64 {
        let mut s = self.state;
        s ^= s << 13;
        s ^= s >> 17;
        s ^= s << 5;
        self.state = s;
        (s % 10_000) as f64 / 10_000.0
    }
}

/// Sum over characters of each character's leading UTF-16 unit. A character
/// outside the BMP adds only its high surrogate.
pub fn name_seed(s: &str) -> u32 {
    let mut buf = [0u16; 2];
    s.chars().fold(0u32, |acc, c| {
        acc.wrapping_add(u32::from(c.encode_utf16(&mut buf)[0]))
    })
}
