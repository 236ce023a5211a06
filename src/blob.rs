// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use alloc::{vec, vec::Vec};
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use serde_bytes::ByteBuf;
use snafu::prelude::*;

use crate::{
    constants::{BYTES_PER_BLOB, BYTES_PER_FIELD_ELEMENT, FIELD_ELEMENTS_PER_BLOB},
    field::FieldElement,
};

/// A blob: a polynomial in evaluation form, encoded as a fixed number of field elements.
///
/// A blob always holds exactly [`BYTES_PER_BLOB`] bytes. Its elements need not be canonical; a blob built from
/// mutated elements is a deliberate test case.
///
/// With the `serde` feature, a blob serializes as a byte string and deserialization checks its length.
#[derive(Clone, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(try_from = "ByteBuf", into = "ByteBuf")
)]
pub struct Blob {
    bytes: Vec<u8>,
}

/// Errors that can arise relating to [`Blob`].
#[derive(Debug, Snafu)]
pub enum BlobError {
    /// The provided bytes were not the size of a blob.
    #[snafu(display("Expected {BYTES_PER_BLOB} bytes but got {len}"))]
    InvalidLength { len: usize },
}

impl Blob {
    /// Get the all-zero blob.
    pub fn zero() -> Self {
        Self {
            bytes: vec![0u8; BYTES_PER_BLOB],
        }
    }

    /// Build a blob from raw bytes, which must be exactly [`BYTES_PER_BLOB`] long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BlobError> {
        ensure!(bytes.len() == BYTES_PER_BLOB, InvalidLengthSnafu { len: bytes.len() });

        Ok(Self { bytes: bytes.to_vec() })
    }

    /// Build a blob by repeating one element across every slot.
    pub fn tiled(element: &FieldElement) -> Self {
        let mut blob = Self::zero();
        for chunk in blob.bytes.chunks_exact_mut(BYTES_PER_FIELD_ELEMENT) {
            chunk.copy_from_slice(element.as_bytes());
        }

        blob
    }

    /// Get the element at `index`, or `None` if out of range.
    pub fn element(&self, index: usize) -> Option<FieldElement> {
        if index >= FIELD_ELEMENTS_PER_BLOB {
            return None;
        }

        let mut bytes = [0u8; BYTES_PER_FIELD_ELEMENT];
        bytes.copy_from_slice(&self.bytes[index * BYTES_PER_FIELD_ELEMENT..(index + 1) * BYTES_PER_FIELD_ELEMENT]);

        Some(FieldElement::from_bytes(bytes))
    }

    /// Overwrite the element at `index`; out-of-range indexes are ignored.
    pub(crate) fn set_element(&mut self, index: usize, element: &FieldElement) {
        if let Some(slot) = self
            .bytes
            .chunks_exact_mut(BYTES_PER_FIELD_ELEMENT)
            .nth(index)
        {
            slot.copy_from_slice(element.as_bytes());
        }
    }

    /// Iterate over the elements in slot order.
    pub fn elements(&self) -> impl Iterator<Item = FieldElement> + '_ {
        self.bytes.chunks_exact(BYTES_PER_FIELD_ELEMENT).map(|chunk| {
            let mut bytes = [0u8; BYTES_PER_FIELD_ELEMENT];
            bytes.copy_from_slice(chunk);
            FieldElement::from_bytes(bytes)
        })
    }

    /// Check whether every element is canonical.
    pub fn is_canonical(&self) -> bool {
        self.elements().all(|element| element.is_canonical())
    }

    /// Check whether every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|b| *b == 0)
    }

    /// Check whether every element is identical.
    ///
    /// A constant blob encodes a constant polynomial, whose opening proofs are the identity point.
    pub fn is_constant(&self) -> bool {
        let first = &self.bytes[..BYTES_PER_FIELD_ELEMENT];
        self.bytes
            .chunks_exact(BYTES_PER_FIELD_ELEMENT)
            .all(|chunk| chunk == first)
    }

    /// Get the encoding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Get a mutable view of the encoding.
    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

#[cfg(feature = "serde")]
impl TryFrom<ByteBuf> for Blob {
    type Error = BlobError;

    fn try_from(bytes: ByteBuf) -> Result<Self, Self::Error> {
        let bytes = bytes.into_vec();
        ensure!(bytes.len() == BYTES_PER_BLOB, InvalidLengthSnafu { len: bytes.len() });

        Ok(Self { bytes })
    }
}

#[cfg(feature = "serde")]
impl From<Blob> for ByteBuf {
    fn from(blob: Blob) -> Self {
        ByteBuf::from(blob.bytes)
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // A full blob is far too large to print
        write!(
            f,
            "Blob({}, blake3: {})",
            hex::encode(&self.bytes[..BYTES_PER_FIELD_ELEMENT]),
            blake3::hash(&self.bytes).to_hex()
        )
    }
}
