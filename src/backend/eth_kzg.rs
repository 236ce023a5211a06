// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use alloc::{format, vec::Vec};

use rust_eth_kzg::DASContext;
use tracing::info;

use crate::{
    backend::{BackendError, KzgBackend},
    blob::Blob,
    constants::BYTES_PER_BLOB,
    field::FieldElement,
    point::{Commitment, G1Point, Proof},
};

/// A backend wrapping the pure-Rust implementation.
///
/// The context embeds the Ethereum ceremony trusted setup, so it must be compared against a backend loaded with the
/// same setup.
pub struct EthKzg {
    context: DASContext,
}

impl EthKzg {
    /// Build a context from the embedded trusted setup.
    pub fn new() -> Self {
        let context = DASContext::default();
        info!("rust-eth-kzg context initialized");

        Self { context }
    }
}

impl Default for EthKzg {
    fn default() -> Self {
        Self::new()
    }
}

fn as_blob_ref(blob: &Blob) -> Result<&[u8; BYTES_PER_BLOB], BackendError> {
    blob.as_bytes()
        .try_into()
        .map_err(|_| BackendError::new("blob has the wrong length"))
}

fn library_error(err: rust_eth_kzg::Error) -> BackendError {
    BackendError::new(format!("{err:?}"))
}

// Failed verification is an error in this library, but a `false` result in the common interface
fn verification(result: Result<(), rust_eth_kzg::Error>) -> Result<bool, BackendError> {
    match result {
        Ok(()) => Ok(true),
        Err(err) if err.is_proof_invalid() => Ok(false),
        Err(err) => Err(library_error(err)),
    }
}

impl KzgBackend for EthKzg {
    fn name(&self) -> &'static str {
        "rust-eth-kzg"
    }

    fn blob_to_commitment(&self, blob: &Blob) -> Result<Commitment, BackendError> {
        let commitment = self
            .context
            .blob_to_kzg_commitment(as_blob_ref(blob)?)
            .map_err(library_error)?;

        Ok(G1Point::from_bytes(commitment))
    }

    fn compute_proof(&self, blob: &Blob, z: &FieldElement) -> Result<(Proof, FieldElement), BackendError> {
        let (proof, y) = self
            .context
            .compute_kzg_proof(as_blob_ref(blob)?, *z.as_bytes())
            .map_err(library_error)?;

        Ok((G1Point::from_bytes(proof), FieldElement::from_bytes(y)))
    }

    fn compute_blob_proof(&self, blob: &Blob, commitment: &Commitment) -> Result<Proof, BackendError> {
        let proof = self
            .context
            .compute_blob_kzg_proof(as_blob_ref(blob)?, commitment.as_bytes())
            .map_err(library_error)?;

        Ok(G1Point::from_bytes(proof))
    }

    fn verify_proof(
        &self,
        commitment: &Commitment,
        z: &FieldElement,
        y: &FieldElement,
        proof: &Proof,
    ) -> Result<bool, BackendError> {
        verification(self.context.verify_kzg_proof(
            commitment.as_bytes(),
            *z.as_bytes(),
            *y.as_bytes(),
            proof.as_bytes(),
        ))
    }

    fn verify_blob_proof(&self, blob: &Blob, commitment: &Commitment, proof: &Proof) -> Result<bool, BackendError> {
        verification(
            self.context
                .verify_blob_kzg_proof(as_blob_ref(blob)?, commitment.as_bytes(), proof.as_bytes()),
        )
    }

    fn verify_blob_proof_batch(
        &self,
        blobs: &[Blob],
        commitments: &[Commitment],
        proofs: &[Proof],
    ) -> Result<bool, BackendError> {
        let blobs = blobs.iter().map(as_blob_ref).collect::<Result<Vec<_>, _>>()?;
        let commitments = commitments.iter().map(G1Point::as_bytes).collect::<Vec<_>>();
        let proofs = proofs.iter().map(G1Point::as_bytes).collect::<Vec<_>>();

        verification(self.context.verify_blob_kzg_proof_batch(blobs, commitments, proofs))
    }
}
