// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use alloc::{format, string::ToString, vec::Vec};
use std::path::Path;

use c_kzg::{Bytes32, Bytes48, KzgSettings};
use tracing::info;

use crate::{
    backend::{BackendError, KzgBackend, SetupError},
    blob::Blob,
    constants::{BYTES_PER_FIELD_ELEMENT, BYTES_PER_G1},
    field::FieldElement,
    point::{Commitment, G1Point, Proof},
};

/// A backend wrapping the C reference implementation.
///
/// The trusted setup is owned by this value and released when it is dropped.
pub struct CKzg {
    settings: KzgSettings,
}

impl CKzg {
    /// Load a trusted setup file.
    ///
    /// `precompute` is passed through to the library and only affects performance.
    pub fn load_trusted_setup<P: AsRef<Path>>(path: P, precompute: u64) -> Result<Self, SetupError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SetupError::NotFound {
                path: path.display().to_string(),
            });
        }

        let settings =
            KzgSettings::load_trusted_setup_file(path, precompute).map_err(|err| SetupError::Rejected {
                backend: "c-kzg",
                message: format!("{err:?}"),
            })?;
        info!(path = %path.display(), "c-kzg trusted setup loaded");

        Ok(Self { settings })
    }
}

fn to_blob(blob: &Blob) -> Result<c_kzg::Blob, BackendError> {
    c_kzg::Blob::from_bytes(blob.as_bytes()).map_err(library_error)
}

fn to_bytes32(element: &FieldElement) -> Bytes32 {
    Bytes32::from(*element.as_bytes())
}

fn to_bytes48(point: &G1Point) -> Bytes48 {
    Bytes48::from(*point.as_bytes())
}

fn to_point(bytes: &[u8]) -> G1Point {
    let mut point = [0u8; BYTES_PER_G1];
    point.copy_from_slice(bytes);
    G1Point::from_bytes(point)
}

fn library_error(err: c_kzg::Error) -> BackendError {
    BackendError::new(format!("{err:?}"))
}

impl KzgBackend for CKzg {
    fn name(&self) -> &'static str {
        "c-kzg"
    }

    fn blob_to_commitment(&self, blob: &Blob) -> Result<Commitment, BackendError> {
        let commitment = self
            .settings
            .blob_to_kzg_commitment(&to_blob(blob)?)
            .map_err(library_error)?;

        Ok(to_point(commitment.as_slice()))
    }

    fn compute_proof(&self, blob: &Blob, z: &FieldElement) -> Result<(Proof, FieldElement), BackendError> {
        let (proof, y) = self
            .settings
            .compute_kzg_proof(&to_blob(blob)?, &to_bytes32(z))
            .map_err(library_error)?;

        let y_slice: &[u8] = y.as_ref();
        let mut y_bytes = [0u8; BYTES_PER_FIELD_ELEMENT];
        y_bytes.copy_from_slice(y_slice);

        Ok((to_point(proof.as_slice()), FieldElement::from_bytes(y_bytes)))
    }

    fn compute_blob_proof(&self, blob: &Blob, commitment: &Commitment) -> Result<Proof, BackendError> {
        let proof = self
            .settings
            .compute_blob_kzg_proof(&to_blob(blob)?, &to_bytes48(commitment))
            .map_err(library_error)?;

        Ok(to_point(proof.as_slice()))
    }

    fn verify_proof(
        &self,
        commitment: &Commitment,
        z: &FieldElement,
        y: &FieldElement,
        proof: &Proof,
    ) -> Result<bool, BackendError> {
        self.settings
            .verify_kzg_proof(
                &to_bytes48(commitment),
                &to_bytes32(z),
                &to_bytes32(y),
                &to_bytes48(proof),
            )
            .map_err(library_error)
    }

    fn verify_blob_proof(&self, blob: &Blob, commitment: &Commitment, proof: &Proof) -> Result<bool, BackendError> {
        self.settings
            .verify_blob_kzg_proof(&to_blob(blob)?, &to_bytes48(commitment), &to_bytes48(proof))
            .map_err(library_error)
    }

    fn verify_blob_proof_batch(
        &self,
        blobs: &[Blob],
        commitments: &[Commitment],
        proofs: &[Proof],
    ) -> Result<bool, BackendError> {
        let blobs = blobs.iter().map(to_blob).collect::<Result<Vec<_>, _>>()?;
        let commitments = commitments.iter().map(to_bytes48).collect::<Vec<_>>();
        let proofs = proofs.iter().map(to_bytes48).collect::<Vec<_>>();

        self.settings
            .verify_blob_kzg_proof_batch(&blobs, &commitments, &proofs)
            .map_err(library_error)
    }
}
