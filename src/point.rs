// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{BYTES_PER_G1, G1_IDENTITY};

/// A 48-byte compressed G1 point encoding.
///
/// No curve or subgroup membership is implied: a `G1Point` may be random bytes or a mutated encoding.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct G1Point(#[cfg_attr(feature = "serde", serde(with = "serde_bytes"))] [u8; BYTES_PER_G1]);

/// A KZG commitment encoding.
pub type Commitment = G1Point;

/// A KZG proof encoding.
pub type Proof = G1Point;

impl G1Point {
    /// The compressed encoding of the point at infinity.
    pub const IDENTITY: Self = Self(G1_IDENTITY);

    /// Wrap raw bytes.
    pub fn from_bytes(bytes: [u8; BYTES_PER_G1]) -> Self {
        Self(bytes)
    }

    /// Check whether this is the compressed identity encoding.
    pub fn is_identity(&self) -> bool {
        self.0 == G1_IDENTITY
    }

    /// Get the encoding.
    pub fn as_bytes(&self) -> &[u8; BYTES_PER_G1] {
        &self.0
    }

    /// Get a mutable view of the encoding.
    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8; BYTES_PER_G1] {
        &mut self.0
    }
}

impl From<[u8; BYTES_PER_G1]> for G1Point {
    fn from(bytes: [u8; BYTES_PER_G1]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl fmt::Debug for G1Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G1Point({})", hex::encode(self.0))
    }
}
