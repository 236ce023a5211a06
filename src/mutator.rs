// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use rand::Rng;
use rand_chacha::ChaCha12Rng;
use rand_core::SeedableRng;

use crate::constants::MUTATION_RATE_PERCENT;

/// Get the number of bit flips applied to a buffer of `len` bytes.
///
/// This is `floor(0.01 * 8 * len)`, so it is zero for buffers shorter than 13 bytes.
pub fn flip_count(len: usize) -> usize {
    len.saturating_mul(8).saturating_mul(MUTATION_RATE_PERCENT) / 100
}

/// Flip a bounded, pseudo-random subset of bits of `data` in place.
///
/// The generator is seeded only from `seed`, so the same buffer and seed always produce the same result.
/// Each of the [`flip_count`] flips picks a byte index and a bit position uniformly and XORs that bit; flips are
/// independent, so two of them may land on the same bit and cancel out.
/// An empty buffer is left alone.
pub fn mutate(data: &mut [u8], seed: u64) {
    if data.is_empty() {
        return;
    }

    let mut rng = ChaCha12Rng::seed_from_u64(seed);
    for _ in 0..flip_count(data.len()) {
        let index = rng.gen_range(0..data.len());
        let bit = rng.gen_range(0..8u32);
        data[index] ^= 1 << bit;
    }
}
