//! Seeded layout randomness
//!
//! 32-bit mulberry32-style mixer: the state advances by a fixed odd constant
//! and the output goes through two xorshift/multiply rounds. Only used for
//! level variety, so it only has to be deterministic per seed.

use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

const STATE_INCREMENT: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Deterministic stream of layout jitter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRng {
    state: u32,
}

impl LayoutRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        let unit = self.next_u32() as f64 / TWO_POW_32;
        // f64 -> f32 can round 0.99999999 up to 1.0
        (unit as f32).min(1.0 - f32::EPSILON)
    }

    /// Uniform value in [lo, hi)
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_f32() * (hi - lo)
    }

    /// Uniform value in [-half_span, half_span)
    pub fn centered(&mut self, half_span: f32) -> f32 {
        (self.next_f32() - 0.5) * 2.0 * half_span
    }
}

impl RngCore for LayoutRng {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(STATE_INCREMENT);
        let s = self.state;
        let mut t = (s ^ (s >> 15)).wrapping_mul(1 | s);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61)) ^ t;
        t ^ (t >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.next_u32() as u64;
        let hi = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for LayoutRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
