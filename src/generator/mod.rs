// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Structured input derivation.
//!
//! A [`Generator`] turns an opaque fuzzer input into cryptographic values that are deliberately skewed toward
//! boundary and near-valid cases. Every top-level generation call draws one seed from the input and uses the
//! configured [`ModePolicy`](`crate::config::ModePolicy`) to choose a [`GenerationMode`]; nested draws (such as the
//! elements of a blob) share that mode.
//!
//! Apart from the group element generators, which ask a reference [`KzgBackend`](`crate::backend::KzgBackend`) to
//! compute valid commitments and proofs, generation is a pure function of the input.

use rand_chacha::ChaCha12Rng;
use rand_core::{RngCore, SeedableRng};
use snafu::prelude::*;
use tracing::trace;

use crate::{
    backend::BackendError,
    config::HarnessConfig,
    cursor::{ByteCursor, CursorError},
};

/// Blob generation.
mod blob;
/// Compressed group element generation.
mod group;
pub use group::Opening;
/// Scalar field element generation.
mod scalar;

/// The kind of value a generator produces.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GenerationMode {
    /// Raw input bytes, with no validity guarantees.
    Random,
    /// Canonical field elements, or commitments and proofs computed by the reference backend.
    Valid,
    /// A valid value with a small fraction of its bits flipped.
    Mutated,
}

/// Errors that can arise while deriving values.
///
/// Both variants mean the current fuzz case should be skipped; neither indicates a bug.
#[derive(Debug, Snafu)]
pub enum GenerationError {
    /// The input ran out before every value was derived.
    #[snafu(context(false), display("Input was exhausted: {source}"))]
    Exhausted { source: CursorError },
    /// The reference backend failed while computing a valid value.
    #[snafu(display("{backend} failed while deriving input: {source}"))]
    GenerationFailed {
        backend: &'static str,
        source: BackendError,
    },
}

/// Derives typed values from a fuzzer input.
pub struct Generator<'a> {
    cursor: ByteCursor<'a>,
    config: HarnessConfig,
    fallback: ChaCha12Rng,
}

impl<'a> Generator<'a> {
    /// Set up a generator over `data`.
    ///
    /// Mutation seeds are drawn from the input while it lasts; after that, they come from a fallback generator seeded
    /// with the BLAKE3 digest of `data`, so derivation stays deterministic.
    pub fn new(data: &'a [u8], config: &HarnessConfig) -> Self {
        Self {
            cursor: ByteCursor::new(data),
            config: *config,
            fallback: ChaCha12Rng::from_seed(*blake3::hash(data).as_bytes()),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Get the underlying cursor, for drawing values outside the typed generators.
    pub fn cursor(&mut self) -> &mut ByteCursor<'a> {
        &mut self.cursor
    }

    /// Draw a seed and select a generation mode from it using the configured policy.
    pub fn select_mode(&mut self) -> Result<GenerationMode, GenerationError> {
        let seed = self.cursor.take_u64()?;
        let mode = self.config.mode_policy().select(seed);
        trace!(seed, ?mode, "selected generation mode");

        Ok(mode)
    }

    /// Draw the number of entries in a batch, in `1..=max_batch_size`.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn batch_len(&mut self) -> Result<usize, GenerationError> {
        // The configuration guarantees a nonzero bound
        Ok(1 + usize::from(self.cursor.take_u8()?) % self.config.max_batch_size())
    }

    /// Get a seed for a mutation, which never fails.
    pub(crate) fn mutation_seed(&mut self) -> u64 {
        match self.cursor.take_u64() {
            Ok(seed) => seed,
            Err(_) => self.fallback.next_u64(),
        }
    }
}

#[cfg(test)]
mod test {
    use alloc::vec;

    use super::*;
    use crate::config::{BlobLayout, ModePolicy, MutationGranularity};

    #[test]
    fn test_select_mode() {
        let mut data = vec![];
        data.extend_from_slice(&3u64.to_le_bytes());
        data.extend_from_slice(&4u64.to_le_bytes());
        data.extend_from_slice(&5u64.to_le_bytes());

        let mut generator = Generator::new(&data, &HarnessConfig::default());
        assert_eq!(generator.select_mode().unwrap(), GenerationMode::Random);
        assert_eq!(generator.select_mode().unwrap(), GenerationMode::Valid);
        assert_eq!(generator.select_mode().unwrap(), GenerationMode::Mutated);
        assert!(matches!(generator.select_mode(), Err(GenerationError::Exhausted { .. })));
    }

    #[test]
    fn test_batch_len() {
        let config = HarnessConfig::new(
            ModePolicy::TwoWay,
            MutationGranularity::PerElement,
            BlobLayout::Tiled,
            5,
        )
        .unwrap();
        let data = [0u8, 4, 5, 255];

        let mut generator = Generator::new(&data, &config);
        assert_eq!(generator.batch_len().unwrap(), 1);
        assert_eq!(generator.batch_len().unwrap(), 5);
        assert_eq!(generator.batch_len().unwrap(), 1);
        assert_eq!(generator.batch_len().unwrap(), 1);
        assert!(generator.batch_len().is_err());
    }

    #[test]
    fn test_mutation_seed_fallback() {
        let data = 99u64.to_le_bytes();

        let mut generator = Generator::new(&data, &HarnessConfig::default());
        assert_eq!(generator.mutation_seed(), 99);

        // Once the input is spent, seeds come from the digest-seeded fallback
        let mut other = Generator::new(&data, &HarnessConfig::default());
        other.cursor().take_u64().unwrap();
        assert_eq!(generator.mutation_seed(), other.mutation_seed());
        assert_eq!(generator.cursor().remaining(), 0);
    }
}
