// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Differential fuzz targets, one per operation.
//!
//! Each target derives inputs from the fuzzer buffer with the context's reference implementation, runs the oracle,
//! and returns the agreed [`Verdict`]. Skippable cases (the input ran out, or the reference failed during
//! derivation) are reported as [`HarnessError`] variants for which [`HarnessError::is_skip`] holds; an
//! [`Inequivalence`] must be surfaced as a failure.

use alloc::vec::Vec;

use itertools::Itertools;
use snafu::prelude::*;

use crate::{
    backend::KzgBackend,
    blob::Blob,
    context::DifferentialContext,
    cursor::CursorError,
    field::FieldElement,
    generator::{GenerationError, GenerationMode},
    oracle::{Inequivalence, Verdict},
    point::{Commitment, Proof},
};

/// Errors that end a fuzz case without a verdict.
#[derive(Debug, Snafu)]
pub enum HarnessError {
    /// The input ran out before every value was derived.
    #[snafu(display("Input was exhausted: {source}"))]
    Exhausted { source: CursorError },
    /// The reference implementation failed while deriving inputs.
    #[snafu(display("Input derivation failed: {source}"))]
    GenerationFailed { source: GenerationError },
    /// The implementations disagreed.
    #[snafu(context(false), display("Inequivalence found: {source}"))]
    Inequivalence { source: Inequivalence },
}

impl HarnessError {
    /// Check whether the case should be skipped rather than reported.
    pub fn is_skip(&self) -> bool {
        !matches!(self, Self::Inequivalence { .. })
    }
}

impl From<GenerationError> for HarnessError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Exhausted { source } => Self::Exhausted { source },
            err @ GenerationError::GenerationFailed { .. } => Self::GenerationFailed { source: err },
        }
    }
}

impl From<CursorError> for HarnessError {
    fn from(source: CursorError) -> Self {
        Self::Exhausted { source }
    }
}

/// Compare commitments to a derived blob.
///
/// A blob that is not all zero must not commit to the identity.
pub fn blob_to_commitment<A: KzgBackend, B: KzgBackend>(
    context: &DifferentialContext<A, B>,
    data: &[u8],
) -> Result<Verdict<Commitment>, HarnessError> {
    let blob = context.generator(data).blob()?;
    compare_commitments(context, data, &blob)
}

/// Compare openings of a derived blob at a derived point.
///
/// A non-constant blob must not produce an identity proof.
pub fn compute_proof<A: KzgBackend, B: KzgBackend>(
    context: &DifferentialContext<A, B>,
    data: &[u8],
) -> Result<Verdict<(Proof, FieldElement)>, HarnessError> {
    const OPERATION: &str = "compute_proof";

    let mut generator = context.generator(data);
    let blob = generator.blob()?;
    let z = generator.field_element()?;

    let oracle = context.oracle(data);
    let derived = (&blob, &z);
    let verdict = oracle.compare(OPERATION, &derived, |backend| backend.compute_proof(&blob, &z))?;
    if blob.is_constant() {
        return Ok(verdict);
    }

    Ok(oracle.ensure_not_identity(verdict, &derived)?)
}

/// Compare blob proofs for a derived blob and commitment.
///
/// A non-constant blob must not produce an identity proof.
pub fn compute_blob_proof<A: KzgBackend, B: KzgBackend>(
    context: &DifferentialContext<A, B>,
    data: &[u8],
) -> Result<Verdict<Proof>, HarnessError> {
    const OPERATION: &str = "compute_blob_proof";

    let mut generator = context.generator(data);
    let blob = generator.blob()?;
    let commitment = generator.commitment_for_blob(&blob, context.reference())?;

    let oracle = context.oracle(data);
    let derived = (&blob, &commitment);
    let verdict = oracle.compare(OPERATION, &derived, |backend| {
        backend.compute_blob_proof(&blob, &commitment)
    })?;
    if blob.is_constant() {
        return Ok(verdict);
    }

    Ok(oracle.ensure_not_identity(verdict, &derived)?)
}

/// Compare verification of a derived opening.
pub fn verify_proof<A: KzgBackend, B: KzgBackend>(
    context: &DifferentialContext<A, B>,
    data: &[u8],
) -> Result<Verdict<bool>, HarnessError> {
    const OPERATION: &str = "verify_proof";

    let mut generator = context.generator(data);
    let opening = generator.opening(context.reference())?;

    let oracle = context.oracle(data);
    Ok(oracle.compare(OPERATION, &opening, |backend| {
        backend.verify_proof(&opening.commitment, &opening.z, &opening.y, &opening.proof)
    })?)
}

/// Compare verification of a derived blob, commitment, and proof.
pub fn verify_blob_proof<A: KzgBackend, B: KzgBackend>(
    context: &DifferentialContext<A, B>,
    data: &[u8],
) -> Result<Verdict<bool>, HarnessError> {
    const OPERATION: &str = "verify_blob_proof";

    let mut generator = context.generator(data);
    let blob = generator.blob()?;
    let (commitment, proof) = generator.commitment_and_proof_for_blob(&blob, context.reference())?;

    let oracle = context.oracle(data);
    Ok(oracle.compare(OPERATION, &(&blob, &commitment, &proof), |backend| {
        backend.verify_blob_proof(&blob, &commitment, &proof)
    })?)
}

/// Compare batch verification of between one and the configured maximum number of derived entries.
///
/// Each entry independently selects its own mode. The batch result is compared as a whole.
pub fn verify_blob_proof_batch<A: KzgBackend, B: KzgBackend>(
    context: &DifferentialContext<A, B>,
    data: &[u8],
) -> Result<Verdict<bool>, HarnessError> {
    const OPERATION: &str = "verify_blob_proof_batch";

    let mut generator = context.generator(data);
    let count = generator.batch_len()?;

    let (blobs, commitments, proofs): (Vec<_>, Vec<_>, Vec<_>) = (0..count)
        .map(|_| generator.blob_triple(context.reference()))
        .process_results(|triples| triples.multiunzip())?;

    let oracle = context.oracle(data);
    Ok(oracle.compare(OPERATION, &(&blobs, &commitments, &proofs), |backend| {
        backend.verify_blob_proof_batch(&blobs, &commitments, &proofs)
    })?)
}

/// Compare commitments to a blob whose mode is forced rather than drawn.
///
/// This is the entry point for fixed scenarios, such as committing to the all-zero blob.
pub fn blob_to_commitment_with_mode<A: KzgBackend, B: KzgBackend>(
    context: &DifferentialContext<A, B>,
    data: &[u8],
    mode: GenerationMode,
) -> Result<Verdict<Commitment>, HarnessError> {
    let blob = context.generator(data).blob_with_mode(mode)?;
    compare_commitments(context, data, &blob)
}

fn compare_commitments<A: KzgBackend, B: KzgBackend>(
    context: &DifferentialContext<A, B>,
    data: &[u8],
    blob: &Blob,
) -> Result<Verdict<Commitment>, HarnessError> {
    let oracle = context.oracle(data);
    let verdict = oracle.compare("blob_to_commitment", blob, |backend| backend.blob_to_commitment(blob))?;
    if blob.is_zero() {
        return Ok(verdict);
    }

    Ok(oracle.ensure_not_identity(verdict, blob)?)
}
