//! Seeded RNG for the price split seam (no OS entropy).
//!
//! Integer-only: unbiased ranges via rejection sampling. The mapping from the
//! `u64` seed to the ChaCha20 32-byte seed is explicit (`seed.to_le_bytes()` in
//! the first 8 bytes, the rest zero) so streams are stable across platforms.
//! `for_key` additionally selects the ChaCha stream from an FNV-1a hash of a
//! key, giving every offer its own independent, restartable stream.

use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

#[derive(Debug, Clone)]
pub struct SplitRng {
    rng: ChaCha20Rng,
    words_consumed: u128,
}

impl SplitRng {
    #[inline]
    pub fn from_seed_u64(seed: u64) -> Self {
        let mut seed32 = [0u8; 32];
        seed32[..8].copy_from_slice(&seed.to_le_bytes());
        Self {
            rng: ChaCha20Rng::from_seed(seed32),
            words_consumed: 0,
        }
    }

    /// Fresh stream for `key` under `seed`. Same `(seed, key)`, same stream;
    /// nothing is shared between keys.
    pub fn for_key(seed: u64, key: &[u8]) -> Self {
        let mut r = Self::from_seed_u64(seed);
        r.rng.set_stream(fnv1a64(key));
        r
    }

    /// Number of 64-bit words drawn so far (including rejected draws).
    #[inline]
    pub fn words_consumed(&self) -> u128 {
        self.words_consumed
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.words_consumed = self.words_consumed.saturating_add(1);
        self.rng.next_u64()
    }

    /// Unbiased integer in `[0, n)`; `None` if `n == 0`.
    ///
    /// `threshold = 2^64 mod n`; accept `x >= threshold`, then `x % n` is uniform.
    pub fn gen_range(&mut self, n: u64) -> Option<u64> {
        if n == 0 {
            return None;
        }
        let threshold = n.wrapping_neg() % n;
        loop {
            let x = self.next_u64();
            if x >= threshold {
                return Some(x % n);
            }
        }
    }

    /// Unbiased integer in `[lo, hi]` (inclusive); `None` if `lo > hi`.
    pub fn gen_inclusive(&mut self, lo: u64, hi: u64) -> Option<u64> {
        if lo > hi {
            return None;
        }
        let span = hi - lo;
        if span == u64::MAX {
            return Some(self.next_u64());
        }
        self.gen_range(span + 1).map(|v| lo + v)
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a64(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(FNV_OFFSET, |h, b| (h ^ u64::from(*b)).wrapping_mul(FNV_PRIME))
}
