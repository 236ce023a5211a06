// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use core::fmt;

use crypto_bigint::{Encoding, U256};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{BLS_MODULUS, BYTES_PER_FIELD_ELEMENT};

/// A 32-byte big-endian scalar field element encoding.
///
/// Any 32 bytes are a valid `FieldElement`; whether the encoding is canonical (numerically less than the BLS12-381
/// scalar field modulus) is a property, checked with [`FieldElement::is_canonical`].
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct FieldElement(#[cfg_attr(feature = "serde", serde(with = "serde_bytes"))] [u8; BYTES_PER_FIELD_ELEMENT]);

impl FieldElement {
    /// The zero element.
    pub const ZERO: Self = Self([0u8; BYTES_PER_FIELD_ELEMENT]);

    /// Wrap raw bytes without any reduction.
    pub fn from_bytes(bytes: [u8; BYTES_PER_FIELD_ELEMENT]) -> Self {
        Self(bytes)
    }

    /// Interpret `bytes` as a big-endian integer and reduce it modulo the field modulus.
    pub fn reduce(bytes: [u8; BYTES_PER_FIELD_ELEMENT]) -> Self {
        let mut value = U256::from_be_bytes(bytes);

        // The modulus exceeds `2**256 / 3`, so this subtracts at most twice
        while value >= BLS_MODULUS {
            value = value.wrapping_sub(&BLS_MODULUS);
        }

        Self(value.to_be_bytes())
    }

    /// Get the canonical form of this element.
    ///
    /// This is idempotent: a canonical element is returned unchanged.
    pub fn canonicalize(&self) -> Self {
        Self::reduce(self.0)
    }

    /// Check whether this encoding is strictly less than the field modulus.
    pub fn is_canonical(&self) -> bool {
        U256::from_be_bytes(self.0) < BLS_MODULUS
    }

    /// Get the encoding.
    pub fn as_bytes(&self) -> &[u8; BYTES_PER_FIELD_ELEMENT] {
        &self.0
    }

    /// Get a mutable view of the encoding.
    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8; BYTES_PER_FIELD_ELEMENT] {
        &mut self.0
    }
}

impl From<[u8; BYTES_PER_FIELD_ELEMENT]> for FieldElement {
    fn from(bytes: [u8; BYTES_PER_FIELD_ELEMENT]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", hex::encode(self.0))
    }
}
