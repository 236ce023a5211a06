// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use tracing::trace;

use crate::{
    blob::Blob,
    config::{BlobLayout, MutationGranularity},
    constants::FIELD_ELEMENTS_PER_BLOB,
    generator::{GenerationError, GenerationMode, Generator},
    mutator::mutate,
};

impl Generator<'_> {
    /// Generate a blob, selecting a fresh mode.
    pub fn blob(&mut self) -> Result<Blob, GenerationError> {
        let mode = self.select_mode()?;
        self.blob_with_mode(mode)
    }

    /// Generate a blob in the given mode.
    ///
    /// Every element shares `mode`. Slots are filled according to the configured [`BlobLayout`]:
    /// - `Independent` draws every slot, and fails if the input runs out.
    /// - `Tiled` draws a single element and repeats it.
    /// - `LowEntropy` draws slots until the input runs out and leaves the rest zero.
    ///
    /// In mutated mode, the configured [`MutationGranularity`] decides whether each element is mutated before it is
    /// placed, or the assembled blob of canonical elements is mutated once.
    pub fn blob_with_mode(&mut self, mode: GenerationMode) -> Result<Blob, GenerationError> {
        let whole_blob_mutation =
            mode == GenerationMode::Mutated && self.config.mutation_granularity() == MutationGranularity::WholeBlob;
        let element_mode = if whole_blob_mutation {
            GenerationMode::Valid
        } else {
            mode
        };

        let mut blob = match self.config.blob_layout() {
            BlobLayout::Independent => {
                let mut blob = Blob::zero();
                for index in 0..FIELD_ELEMENTS_PER_BLOB {
                    let element = self.field_element_with_mode(element_mode)?;
                    blob.set_element(index, &element);
                }
                blob
            },
            BlobLayout::Tiled => Blob::tiled(&self.field_element_with_mode(element_mode)?),
            BlobLayout::LowEntropy => {
                let mut blob = Blob::zero();
                let mut filled = 0;
                while filled < FIELD_ELEMENTS_PER_BLOB {
                    match self.field_element_with_mode(element_mode) {
                        Ok(element) => blob.set_element(filled, &element),
                        Err(GenerationError::Exhausted { .. }) => break,
                        Err(err) => return Err(err),
                    }
                    filled += 1;
                }
                trace!(filled, "filled low-entropy blob");
                blob
            },
        };

        if whole_blob_mutation {
            let seed = self.mutation_seed();
            mutate(blob.as_bytes_mut(), seed);
        }

        Ok(blob)
    }
}

#[cfg(test)]
mod test {
    use alloc::{vec, vec::Vec};

    use rand_chacha::ChaCha12Rng;
    use rand_core::{RngCore, SeedableRng};

    use crate::{
        blob::Blob,
        config::{BlobLayout, HarnessConfig, ModePolicy, MutationGranularity},
        constants::{BYTES_PER_BLOB, BYTES_PER_FIELD_ELEMENT, FIELD_ELEMENTS_PER_BLOB},
        field::FieldElement,
        generator::{GenerationError, GenerationMode, Generator},
        mutator::mutate,
    };

    fn config(granularity: MutationGranularity, layout: BlobLayout) -> HarnessConfig {
        HarnessConfig::new(ModePolicy::ThreeWay, granularity, layout, 5).unwrap()
    }

    fn random_bytes(len: usize) -> Vec<u8> {
        let mut rng = ChaCha12Rng::seed_from_u64(8675309);
        let mut data = vec![0u8; len];
        rng.fill_bytes(&mut data);
        data
    }

    #[test]
    fn test_independent_valid() {
        let data = random_bytes(BYTES_PER_BLOB);
        let mut generator = Generator::new(&data, &HarnessConfig::default());

        let blob = generator.blob_with_mode(GenerationMode::Valid).unwrap();
        assert!(blob.is_canonical());
        assert!(!blob.is_constant());

        // Each slot is the reduction of its own input element
        for (index, chunk) in data.chunks_exact(BYTES_PER_FIELD_ELEMENT).enumerate() {
            let mut bytes = [0u8; BYTES_PER_FIELD_ELEMENT];
            bytes.copy_from_slice(chunk);
            assert_eq!(blob.element(index).unwrap(), FieldElement::reduce(bytes));
        }
    }

    #[test]
    fn test_independent_random() {
        let data = random_bytes(BYTES_PER_BLOB);
        let mut generator = Generator::new(&data, &HarnessConfig::default());

        let blob = generator.blob_with_mode(GenerationMode::Random).unwrap();
        assert_eq!(blob.as_bytes(), data.as_slice());
    }

    #[test]
    fn test_independent_exhausted() {
        let data = random_bytes(BYTES_PER_BLOB - 1);
        let mut generator = Generator::new(&data, &HarnessConfig::default());

        assert!(matches!(
            generator.blob_with_mode(GenerationMode::Valid),
            Err(GenerationError::Exhausted { .. })
        ));
    }

    #[test]
    fn test_all_zero_input() {
        // Zero elements are canonical, so a zero input yields the all-zero blob
        let mut data = vec![0u8; 8];
        data[0] = 1;
        data.extend_from_slice(&vec![0u8; BYTES_PER_BLOB]);

        let mut generator = Generator::new(&data, &HarnessConfig::default());
        let blob = generator.blob().unwrap();
        assert!(blob.is_zero());
        assert_eq!(blob, Blob::zero());
    }

    #[test]
    fn test_tiled() {
        let data = [0xffu8; 32];
        let mut generator = Generator::new(&data, &HarnessConfig::tiled());

        let blob = generator.blob_with_mode(GenerationMode::Valid).unwrap();
        assert!(blob.is_constant());
        assert_eq!(blob.element(0).unwrap(), FieldElement::reduce([0xffu8; 32]));
        assert_eq!(generator.cursor().remaining(), 0);
    }

    #[test]
    fn test_low_entropy() {
        let data = random_bytes(3 * BYTES_PER_FIELD_ELEMENT + 5);
        let mut generator = Generator::new(&data, &HarnessConfig::low_entropy());

        let blob = generator.blob_with_mode(GenerationMode::Random).unwrap();
        assert_eq!(&blob.as_bytes()[..3 * BYTES_PER_FIELD_ELEMENT], &data[..3 * BYTES_PER_FIELD_ELEMENT]);
        assert!(blob.as_bytes()[3 * BYTES_PER_FIELD_ELEMENT..].iter().all(|b| *b == 0));

        // The partial trailing element is left unread
        assert_eq!(generator.cursor().remaining(), 5);

        // An empty input still produces a blob
        let mut generator = Generator::new(&[], &HarnessConfig::low_entropy());
        assert!(generator.blob_with_mode(GenerationMode::Valid).unwrap().is_zero());
    }

    #[test]
    fn test_whole_blob_mutation() {
        let data = [0x11u8; 32];
        let config = config(MutationGranularity::WholeBlob, BlobLayout::Tiled);
        let mut generator = Generator::new(&data, &config);

        let blob = generator.blob_with_mode(GenerationMode::Mutated).unwrap();

        // The seed comes from the digest-seeded fallback, so replay it
        let mut replay = Generator::new(&data, &config);
        replay.cursor().take_bytes(32).unwrap();
        let mut expected = Blob::tiled(&FieldElement::reduce(data));
        mutate(expected.as_bytes_mut(), replay.mutation_seed());

        assert_eq!(blob, expected);
        assert_ne!(blob, Blob::tiled(&FieldElement::reduce(data)));
    }

    #[test]
    fn test_per_element_mutation() {
        let mut data = vec![0x22u8; 32];
        data.extend_from_slice(&77u64.to_le_bytes());
        let config = config(MutationGranularity::PerElement, BlobLayout::Tiled);
        let mut generator = Generator::new(&data, &config);

        let blob = generator.blob_with_mode(GenerationMode::Mutated).unwrap();

        // The element is mutated before it is tiled
        let mut element = FieldElement::reduce([0x22u8; 32]);
        mutate(element.as_bytes_mut(), 77);
        assert_eq!(blob, Blob::tiled(&element));
        assert_eq!(blob.elements().count(), FIELD_ELEMENTS_PER_BLOB);
    }
}
