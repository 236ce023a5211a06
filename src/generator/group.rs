// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use snafu::prelude::*;

use crate::{
    backend::KzgBackend,
    blob::Blob,
    constants::BYTES_PER_G1,
    field::FieldElement,
    generator::{GenerationError, GenerationFailedSnafu, GenerationMode, Generator},
    mutator::mutate,
    point::{Commitment, G1Point, Proof},
};

/// The inputs to a single-point opening verification.
///
/// In valid mode these are consistent: `proof` opens `commitment` to `y` at `z`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Opening {
    /// The commitment to the polynomial.
    pub commitment: Commitment,
    /// The evaluation point.
    pub z: FieldElement,
    /// The claimed evaluation.
    pub y: FieldElement,
    /// The opening proof.
    pub proof: Proof,
}

impl Generator<'_> {
    /// Generate a commitment, selecting a fresh mode.
    ///
    /// Random commitments are 48 raw bytes with no curve membership check. Valid commitments are computed by
    /// `backend` from a freshly generated valid blob. Mutated commitments are valid commitments with bits flipped,
    /// which will usually move them off the curve or out of the subgroup.
    pub fn commitment<B: KzgBackend>(&mut self, backend: &B) -> Result<Commitment, GenerationError> {
        let mode = self.select_mode()?;
        self.commitment_with_mode(mode, backend)
    }

    /// Generate a commitment in the given mode.
    pub fn commitment_with_mode<B: KzgBackend>(
        &mut self,
        mode: GenerationMode,
        backend: &B,
    ) -> Result<Commitment, GenerationError> {
        match mode {
            GenerationMode::Random => self.random_g1(),
            GenerationMode::Valid => self.valid_commitment(backend),
            GenerationMode::Mutated => {
                let commitment = self.valid_commitment(backend)?;
                Ok(self.mutated_g1(commitment))
            },
        }
    }

    /// Generate a proof, selecting a fresh mode.
    ///
    /// Valid proofs are blob proofs computed by `backend` for a freshly generated valid blob and its commitment.
    /// Random and mutated proofs follow [`Generator::commitment`].
    pub fn proof<B: KzgBackend>(&mut self, backend: &B) -> Result<Proof, GenerationError> {
        let mode = self.select_mode()?;
        self.proof_with_mode(mode, backend)
    }

    /// Generate a proof in the given mode.
    pub fn proof_with_mode<B: KzgBackend>(
        &mut self,
        mode: GenerationMode,
        backend: &B,
    ) -> Result<Proof, GenerationError> {
        match mode {
            GenerationMode::Random => self.random_g1(),
            GenerationMode::Valid => self.valid_proof(backend),
            GenerationMode::Mutated => {
                let proof = self.valid_proof(backend)?;
                Ok(self.mutated_g1(proof))
            },
        }
    }

    /// Generate a commitment for an existing blob, selecting a fresh mode.
    ///
    /// Unlike [`Generator::commitment`], valid and mutated modes commit to `blob` rather than a fresh blob.
    pub fn commitment_for_blob<B: KzgBackend>(
        &mut self,
        blob: &Blob,
        backend: &B,
    ) -> Result<Commitment, GenerationError> {
        match self.select_mode()? {
            GenerationMode::Random => self.random_g1(),
            GenerationMode::Valid => commit(backend, blob),
            GenerationMode::Mutated => {
                let commitment = commit(backend, blob)?;
                Ok(self.mutated_g1(commitment))
            },
        }
    }

    /// Generate a commitment and blob proof for an existing blob, selecting a fresh mode for each.
    ///
    /// Valid and mutated proofs are always computed against the valid commitment to `blob`, even when the returned
    /// commitment is random or mutated. This keeps the case of a valid proof against a corrupted commitment
    /// reachable with a reference implementation that rejects malformed commitments.
    pub fn commitment_and_proof_for_blob<B: KzgBackend>(
        &mut self,
        blob: &Blob,
        backend: &B,
    ) -> Result<(Commitment, Proof), GenerationError> {
        let mut reference = None;
        let commitment = match self.select_mode()? {
            GenerationMode::Random => self.random_g1()?,
            GenerationMode::Valid => *reference.insert(commit(backend, blob)?),
            GenerationMode::Mutated => {
                let commitment = *reference.insert(commit(backend, blob)?);
                self.mutated_g1(commitment)
            },
        };

        let mode = self.select_mode()?;
        if mode == GenerationMode::Random {
            return Ok((commitment, self.random_g1()?));
        }

        let reference = match reference {
            Some(reference) => reference,
            None => commit(backend, blob)?,
        };
        let proof = blob_proof(backend, blob, &reference)?;
        if mode == GenerationMode::Mutated {
            return Ok((commitment, self.mutated_g1(proof)));
        }

        Ok((commitment, proof))
    }

    /// Generate the inputs to an opening verification, selecting a fresh mode.
    ///
    /// Random openings are raw bytes throughout. Valid openings are computed by `backend` from a valid blob and
    /// evaluation point. Mutated openings are valid openings with bits flipped in every component.
    pub fn opening<B: KzgBackend>(&mut self, backend: &B) -> Result<Opening, GenerationError> {
        let mode = self.select_mode()?;
        if mode == GenerationMode::Random {
            return Ok(Opening {
                commitment: self.random_g1()?,
                z: self.field_element_with_mode(GenerationMode::Random)?,
                y: self.field_element_with_mode(GenerationMode::Random)?,
                proof: self.random_g1()?,
            });
        }

        let blob = self.blob_with_mode(GenerationMode::Valid)?;
        let z = self.field_element_with_mode(GenerationMode::Valid)?;
        let commitment = commit(backend, &blob)?;
        let (proof, y) = backend
            .compute_proof(&blob, &z)
            .context(GenerationFailedSnafu { backend: backend.name() })?;

        let mut opening = Opening { commitment, z, y, proof };
        if mode == GenerationMode::Mutated {
            mutate(opening.commitment.as_bytes_mut(), self.mutation_seed());
            mutate(opening.z.as_bytes_mut(), self.mutation_seed());
            mutate(opening.y.as_bytes_mut(), self.mutation_seed());
            mutate(opening.proof.as_bytes_mut(), self.mutation_seed());
        }

        Ok(opening)
    }

    /// Generate one entry of a blob verification batch, selecting a fresh mode.
    ///
    /// Random entries are a random blob with random commitment and proof bytes. Valid entries are a valid blob with
    /// its commitment and blob proof. Mutated entries are valid entries whose commitment and proof have bits flipped.
    pub fn blob_triple<B: KzgBackend>(&mut self, backend: &B) -> Result<(Blob, Commitment, Proof), GenerationError> {
        let mode = self.select_mode()?;
        if mode == GenerationMode::Random {
            let blob = self.blob_with_mode(GenerationMode::Random)?;
            return Ok((blob, self.random_g1()?, self.random_g1()?));
        }

        let blob = self.blob_with_mode(GenerationMode::Valid)?;
        let mut commitment = commit(backend, &blob)?;
        let mut proof = blob_proof(backend, &blob, &commitment)?;
        if mode == GenerationMode::Mutated {
            commitment = self.mutated_g1(commitment);
            proof = self.mutated_g1(proof);
        }

        Ok((blob, commitment, proof))
    }

    fn random_g1(&mut self) -> Result<G1Point, GenerationError> {
        Ok(G1Point::from_bytes(self.cursor.take_array::<BYTES_PER_G1>()?))
    }

    fn mutated_g1(&mut self, mut point: G1Point) -> G1Point {
        mutate(point.as_bytes_mut(), self.mutation_seed());
        point
    }

    fn valid_commitment<B: KzgBackend>(&mut self, backend: &B) -> Result<Commitment, GenerationError> {
        let blob = self.blob_with_mode(GenerationMode::Valid)?;
        commit(backend, &blob)
    }

    // Proofs are always derived through a commitment to the same blob
    fn valid_proof<B: KzgBackend>(&mut self, backend: &B) -> Result<Proof, GenerationError> {
        let blob = self.blob_with_mode(GenerationMode::Valid)?;
        let commitment = commit(backend, &blob)?;
        blob_proof(backend, &blob, &commitment)
    }
}

fn commit<B: KzgBackend>(backend: &B, blob: &Blob) -> Result<Commitment, GenerationError> {
    backend
        .blob_to_commitment(blob)
        .context(GenerationFailedSnafu { backend: backend.name() })
}

fn blob_proof<B: KzgBackend>(backend: &B, blob: &Blob, commitment: &Commitment) -> Result<Proof, GenerationError> {
    backend
        .compute_blob_proof(blob, commitment)
        .context(GenerationFailedSnafu { backend: backend.name() })
}
