//! A simple pseudorandom number generator.
//!
//! Specifically, a translation of the minimal C PCG32 implementation from <https://www.pcg-random.org/>, implemented to satisfy [RngCore].
//!
//! Each instance of a portfolio seeds its own generator with the index of the instance, and so the search of each instance is reproducible, though instances differ from one another.

use rand_core::{impls, RngCore, SeedableRng};

/// State and increment.
#[derive(Default)]
pub struct MinimalPCG32 {
    state: u64,
    inc: u64,
}

impl RngCore for MinimalPCG32 {
    fn next_u32(&mut self) -> u32 {
        let old_state = self.state;

        self.state = old_state
            .wrapping_mul(6364136223846793005_u64)
            .wrapping_add(self.inc);

        let xorshifted = ((old_state >> 18) ^ old_state) >> 27;
        let rot = (old_state >> 59) as u32;
        (xorshifted as u32).rotate_right(rot)
    }

    fn next_u64(&mut self) -> u64 {
        ((self.next_u32() as u64) << 32) | (self.next_u32() as u64)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }
}

impl SeedableRng for MinimalPCG32 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        const INCREMENT: u64 = 3215534235932367345;
        let mut rng = Self {
            state: 0,
            inc: INCREMENT,
        };
        rng.next_u32();
        rng.state = rng.state.wrapping_add(u64::from_le_bytes(seed));
        rng.next_u32();
        rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_are_reproducible() {
        let mut a = MinimalPCG32::seed_from_u64(7);
        let mut b = MinimalPCG32::seed_from_u64(7);
        for _ in 0..16 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn seeds_differ() {
        let mut a = MinimalPCG32::seed_from_u64(0);
        let mut b = MinimalPCG32::seed_from_u64(1);
        let a_draws = (0..8).map(|_| a.next_u32()).collect::<Vec<_>>();
        let b_draws = (0..8).map(|_| b.next_u32()).collect::<Vec<_>>();
        assert_ne!(a_draws, b_draws);
    }
}
