// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use crate::{
    constants::BYTES_PER_FIELD_ELEMENT,
    field::FieldElement,
    generator::{GenerationError, GenerationMode, Generator},
    mutator::mutate,
};

impl Generator<'_> {
    /// Generate a field element, selecting a fresh mode.
    pub fn field_element(&mut self) -> Result<FieldElement, GenerationError> {
        let mode = self.select_mode()?;
        self.field_element_with_mode(mode)
    }

    /// Generate a field element in the given mode.
    ///
    /// This always draws 32 bytes. Random elements are those bytes unchanged; valid elements are their reduction
    /// modulo the field modulus; mutated elements are valid elements with bits flipped, so they may not be canonical.
    pub fn field_element_with_mode(&mut self, mode: GenerationMode) -> Result<FieldElement, GenerationError> {
        let bytes = self.cursor.take_array::<BYTES_PER_FIELD_ELEMENT>()?;

        Ok(match mode {
            GenerationMode::Random => FieldElement::from_bytes(bytes),
            GenerationMode::Valid => FieldElement::reduce(bytes),
            GenerationMode::Mutated => {
                let mut element = FieldElement::reduce(bytes);
                mutate(element.as_bytes_mut(), self.mutation_seed());
                element
            },
        })
    }
}
