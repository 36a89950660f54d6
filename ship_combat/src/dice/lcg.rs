//! SeededRng - Reproducible linear-congruential stream

use rand::{Error, RngCore, SeedableRng};

/// Knuth's MMIX multiplier
const MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const INCREMENT: u64 = 1_442_695_040_888_963_407;

/// 64-bit linear congruential generator.
///
/// Only used where a roll must be re-derivable from its seed (tests and
/// validation of client-reported rolls). It is not suitable for anything that
/// needs unpredictability; unseeded play goes through `rand::thread_rng()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a generator whose stream is fully determined by `seed`
    pub fn new(seed: u64) -> Self {
        SeededRng { state: seed }
    }

    fn step(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT);
        self.state
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        // Low bits of an LCG have short periods; hand out the high half.
        (self.step() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.next_u32());
        let lo = u64::from(self.next_u32());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SeededRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        SeededRng::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        SeededRng::new(state)
    }
}
