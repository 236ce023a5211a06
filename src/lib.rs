// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! A differential fuzzing harness for KZG polynomial commitment libraries.
//!
//! # Overview
//!
//! [EIP-4844](https://eips.ethereum.org/EIPS/eip-4844) blob transactions rely on KZG commitments over BLS12-381.
//! Several independent libraries implement the same operations, and consensus depends on them agreeing exactly.
//! This library turns an arbitrary fuzzer-supplied byte buffer into structured inputs, runs the same operation against
//! two implementations, and reports any observable difference in behavior.
//!
//! Six operations are compared:
//! - committing to a blob,
//! - computing a single-point opening proof,
//! - computing a blob proof,
//! - verifying a single-point opening proof,
//! - verifying a blob proof, and
//! - verifying a batch of blob proofs.
//!
//! Inputs are derived in one of three modes. Random inputs are raw bytes, and exercise rejection paths. Valid inputs
//! are canonical field elements, and commitments or proofs computed by a reference implementation, which exercise
//! success paths. Mutated inputs are valid inputs with a small fraction of bits flipped, which land near the boundary
//! between the two.
//!
//! Two implementations agree on an operation if both fail, or both succeed with byte-for-byte equal outputs.
//! Failure messages are never compared. Anything else is an [`Inequivalence`].
//!
//! # Implementation notes
//!
//! Derivation is deterministic in the input buffer. When an input runs out, the case is skipped rather than padded,
//! with one exception: mutation seeds fall back to a generator seeded by the
//! [BLAKE3](https://github.com/BLAKE3-team/BLAKE3) digest of the input.
//!
//! The core is `no_std` friendly. Implementation adapters need `std`, and are gated behind features.
//!
//! | Feature | Default? | Description |
//! | :--- | :---: | :--- |
//! | `blst` | | Adds G1 round-trip and scalar decoding checks via [`blst`](https://crates.io/crates/blst) |
//! | `c-kzg` | | Adds an adapter for [`c-kzg`](https://crates.io/crates/c-kzg) |
//! | `rust-eth-kzg` | | Adds an adapter for [`rust_eth_kzg`](https://crates.io/crates/rust_eth_kzg) |
//! | `serde` | | Adds serialization of values and configuration via [`serde`](https://crates.io/crates/serde) |
//! | `std` | ✓ | Adds corresponding dependency features, and environment configuration |
//!
//! The fuzz targets live in a separate crate and can be run using a nightly compiler, for example:
//! `cargo +nightly fuzz run verify_blob_proof`.
//! The `c-kzg` adapter needs an Ethereum trusted setup file, whose path is read from `KZG_TRUSTED_SETUP`.
//!
//! # Example
//!
//! Any [`KzgBackend`] can be compared. Here a backend is compared against itself, which always agrees.
//!
//! ```
//! # #[cfg(feature = "c-kzg")]
//! # {
//! use kzg_differential::{backend::CKzg, targets, DifferentialContext, HarnessConfig};
//!
//! # let path = std::env::var("KZG_TRUSTED_SETUP").unwrap_or_default();
//! # if let (Ok(a), Ok(b)) = (CKzg::load_trusted_setup(&path, 0), CKzg::load_trusted_setup(&path, 0)) {
//! let context = DifferentialContext::new(a, b, HarnessConfig::tiled());
//!
//! // A short input selects valid mode and a single tiled element
//! let mut data = 1u64.to_le_bytes().to_vec();
//! data.extend_from_slice(&[0x11u8; 32]);
//!
//! let verdict = targets::blob_to_commitment(&context, &data).unwrap();
//! assert!(verdict.output().is_some());
//! # }
//! # }
//! ```

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

/// Implementations under test.
pub mod backend;
pub use backend::{BackendError, KzgBackend, SetupError};
/// Fixed-size blobs of field elements.
pub mod blob;
pub use blob::{Blob, BlobError};
/// Harness configuration.
pub mod config;
pub use config::{BlobLayout, ConfigError, HarnessConfig, ModePolicy, MutationGranularity};
/// Process-wide harness state.
pub mod context;
pub use context::DifferentialContext;
/// Sequential reads from a fuzzer input.
pub mod cursor;
pub use cursor::{ByteCursor, CursorError};
/// Scalar field elements.
pub mod field;
pub use field::FieldElement;
/// Compressed G1 round-trip checking.
#[cfg(feature = "blst")]
pub mod g1;
/// Structured input generation.
pub mod generator;
pub use generator::{GenerationError, GenerationMode, Generator, Opening};
/// Deterministic bit flipping.
pub mod mutator;
/// Implementation comparison.
pub mod oracle;
pub use oracle::{Divergence, Inequivalence, Oracle, Outcome, Verdict};
/// Compressed G1 encodings.
pub mod point;
pub use point::{Commitment, G1Point, Proof};
/// Scalar decoding checked against `blst`.
#[cfg(feature = "blst")]
pub mod scalar;
/// One fuzz target per operation.
pub mod targets;
pub use targets::HarnessError;

#[cfg(test)]
mod mock;

/// Sizes and values fixed by the blob format
pub mod constants {
    use crypto_bigint::U256;

    /// Bytes in an encoded field element.
    pub const BYTES_PER_FIELD_ELEMENT: usize = 32;

    /// Field elements in a blob.
    pub const FIELD_ELEMENTS_PER_BLOB: usize = 4096;

    /// Bytes in an encoded blob.
    pub const BYTES_PER_BLOB: usize = BYTES_PER_FIELD_ELEMENT * FIELD_ELEMENTS_PER_BLOB;

    /// Bytes in a compressed G1 point.
    pub const BYTES_PER_G1: usize = 48;

    /// The BLS12-381 scalar field modulus.
    pub const BLS_MODULUS: U256 =
        U256::from_be_hex("73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001");

    /// The compressed encoding of the G1 identity.
    pub const G1_IDENTITY: [u8; BYTES_PER_G1] = {
        let mut bytes = [0u8; BYTES_PER_G1];
        bytes[0] = 0xc0;
        bytes
    };

    // Percentage of bits flipped by mutation
    pub const MUTATION_RATE_PERCENT: usize = 1;
}
