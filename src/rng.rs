//! Deterministic per-VM randomness.
//!
//! Every draw is a pure function of `(seed, cursor)`: the cursor selects a
//! fresh short-lived generator, so no RNG state survives between calls and
//! re-requesting a historical value reproduces it bit for bit.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Stable seed for a VM identity. FNV-1a over the identity bytes, so the
/// same identity maps to the same seed across processes and platforms.
pub fn seed_for(identity: &str) -> u64 {
    let mut hash = FNV_OFFSET;
    for byte in identity.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

// splitmix64 finalizer; decorrelates adjacent cursors.
fn mix(seed: u64, cursor: u64) -> u64 {
    let mut z = seed ^ cursor.wrapping_mul(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Generator positioned at `(seed, cursor)`.
pub fn stream(seed: u64, cursor: u64) -> StdRng {
    StdRng::seed_from_u64(mix(seed, cursor))
}

/// Uniform draw in `[lo, hi)`.
pub fn uniform(seed: u64, cursor: u64, lo: f64, hi: f64) -> f64 {
    stream(seed, cursor).gen_range(lo..hi)
}

/// Normal draw. `std_dev` must be finite and non-negative.
pub fn normal(seed: u64, cursor: u64, mean: f64, std_dev: f64) -> f64 {
    let dist = Normal::new(mean, std_dev).expect("std_dev must be finite and non-negative");
    dist.sample(&mut stream(seed, cursor))
}
