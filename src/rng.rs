//! Seeded linear-congruential generator and the draws built on it.
//!
//! Every value is a pure function of the seed and the sequence of calls, so
//! anyone holding the seed can replay a session draw for draw. This is not a
//! cryptographic RNG.

use rand::RngCore;

use crate::error::{Result, RngError};
use crate::types::Seed;
use crate::weights::WeightTable;

/// LCG modulus, 2^32.
pub const MODULUS: u64 = 1 << 32;
/// LCG multiplier.
pub const MULTIPLIER: u64 = 1_664_525;
/// LCG increment.
pub const INCREMENT: u64 = 1_013_904_223;
/// Iterations discarded at construction.
pub const PRIMING_ROUNDS: usize = 3;

/// One LCG iteration: `(MULTIPLIER * state + INCREMENT) mod MODULUS`.
#[inline(always)]
pub fn lcg_step(state: u32) -> u32 {
    ((MULTIPLIER * state as u64 + INCREMENT) % MODULUS) as u32
}

/// Deterministic generator owning its state exclusively.
///
/// Not `Clone`. Share behind a lock if several tasks draw from one stream.
#[derive(Debug)]
pub struct SeededGenerator {
    state: u32,
}

impl SeededGenerator {
    /// Take ownership of `seed` and run the priming rounds.
    ///
    /// Only the seed modulo 2^32 affects the first iteration, so the
    /// arbitrary-precision seed is reduced before stepping.
    pub fn new(seed: Seed) -> Self {
        let mut gen = Self { state: seed.low_u32() };
        for _ in 0..PRIMING_ROUNDS {
            gen.advance();
        }
        tracing::trace!(seed = %seed, state = gen.state, "generator primed");
        gen
    }

    /// Current state, i.e. the last value returned by `advance()`.
    #[inline(always)]
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Step the LCG once and return the new state.
    #[inline(always)]
    pub fn advance(&mut self) -> u32 {
        self.state = lcg_step(self.state);
        self.state
    }

    /// Integer in `[min, max]`, as `min + advance() mod (max - min + 1)`.
    ///
    /// Modulo bias is part of the published behavior and is not corrected.
    pub fn range(&mut self, min: i64, max: i64) -> Result<i64> {
        if max < min {
            return Err(RngError::InvalidRange { min, max });
        }
        let span = (max as i128 - min as i128 + 1) as u128;
        let offset = self.advance() as u128 % span;
        Ok((min as i128 + offset as i128) as i64)
    }

    /// Pick one of `options` with probability proportional to `weights`.
    pub fn pick<'a, T>(&mut self, options: &'a [T], weights: &[u64]) -> Result<&'a T> {
        if options.is_empty() {
            return Err(RngError::invalid_weights("no options to pick from"));
        }
        if options.len() != weights.len() {
            return Err(RngError::invalid_weights(format!(
                "{} options but {} weights",
                options.len(),
                weights.len()
            )));
        }
        let index = self.pick_index(weights)?;
        Ok(&options[index])
    }

    /// Index of the weighted slot selected by one draw.
    ///
    /// Weights are validated before the generator advances.
    pub fn pick_index(&mut self, weights: &[u64]) -> Result<usize> {
        let table = WeightTable::new(weights)?;
        let p = self.advance() as u64 % table.total();
        table.select(p).ok_or(RngError::PickExhausted {
            draw: p,
            slots: weights.len(),
        })
    }

    /// True when the next state is even.
    #[inline(always)]
    pub fn bool(&mut self) -> bool {
        self.advance() % 2 == 0
    }
}

impl RngCore for SeededGenerator {
    fn next_u32(&mut self) -> u32 {
        self.advance()
    }

    /// Two draws, low word first.
    fn next_u64(&mut self) -> u64 {
        let lo = self.advance() as u64;
        let hi = self.advance() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let word = self.advance().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }
}
