// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Implementations under test.
//!
//! Each wrapped library is adapted to [`KzgBackend`], which speaks only the byte-level types of this crate.
//! Conversion to a library's native representation happens inside the adapter and is lossless.

use alloc::string::String;

use snafu::prelude::*;

use crate::{
    blob::Blob,
    field::FieldElement,
    point::{Commitment, Proof},
};

/// The [`c-kzg`](https://crates.io/crates/c-kzg) backend.
#[cfg(feature = "c-kzg")]
pub mod ckzg;
#[cfg(feature = "c-kzg")]
pub use ckzg::CKzg;

/// The [`rust_eth_kzg`](https://crates.io/crates/rust_eth_kzg) backend.
#[cfg(feature = "rust-eth-kzg")]
pub mod eth_kzg;
#[cfg(feature = "rust-eth-kzg")]
pub use eth_kzg::EthKzg;

/// A typed failure reported by an implementation under test.
///
/// Libraries report failures differently, so only the fact of failure is compared; the message is diagnostic.
#[derive(Clone, Debug, Eq, PartialEq, Snafu)]
#[snafu(display("{message}"))]
pub struct BackendError {
    message: String,
}

impl BackendError {
    /// Wrap a library failure message.
    pub fn new<M: Into<String>>(message: M) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Get the failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors that can arise while loading a backend's trusted setup.
#[derive(Debug, Snafu)]
pub enum SetupError {
    /// The trusted setup could not be found.
    #[snafu(display("Trusted setup `{path}` does not exist"))]
    NotFound { path: String },
    /// The library rejected the trusted setup.
    #[snafu(display("{backend} failed to load the trusted setup: {message}"))]
    Rejected { backend: &'static str, message: String },
}

/// The operations a KZG implementation must expose to be compared.
///
/// Verification operations return `Ok(false)` for a well-formed input that fails to verify; libraries that signal
/// this as an error are normalized by their adapter. Any other failure is a [`BackendError`].
pub trait KzgBackend {
    /// A short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Commit to a blob.
    fn blob_to_commitment(&self, blob: &Blob) -> Result<Commitment, BackendError>;

    /// Open the blob polynomial at `z`, returning the proof and the evaluation `y`.
    fn compute_proof(&self, blob: &Blob, z: &FieldElement) -> Result<(Proof, FieldElement), BackendError>;

    /// Compute the proof used to verify a blob against its commitment.
    fn compute_blob_proof(&self, blob: &Blob, commitment: &Commitment) -> Result<Proof, BackendError>;

    /// Verify that the committed polynomial evaluates to `y` at `z`.
    fn verify_proof(
        &self,
        commitment: &Commitment,
        z: &FieldElement,
        y: &FieldElement,
        proof: &Proof,
    ) -> Result<bool, BackendError>;

    /// Verify a blob against a commitment and blob proof.
    fn verify_blob_proof(&self, blob: &Blob, commitment: &Commitment, proof: &Proof) -> Result<bool, BackendError>;

    /// Verify a batch of blobs against commitments and blob proofs.
    ///
    /// The slices are parallel and must have equal lengths.
    fn verify_blob_proof_batch(
        &self,
        blobs: &[Blob],
        commitments: &[Commitment],
        proofs: &[Proof],
    ) -> Result<bool, BackendError>;
}
