// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Toy backends for testing the generators and oracle without a trusted setup.
//!
//! [`ToyKzg`] is not a commitment scheme. It mimics the observable behavior of one: it rejects non-canonical field
//! elements and malformed point encodings, commits to the all-zero blob with the identity, produces identity proofs
//! for constant blobs, and accepts exactly the proofs it computes. Points are derived by hashing with BLAKE3.

use alloc::vec::Vec;

use blake3::Hasher;
use itertools::izip;

use crate::{
    backend::{BackendError, KzgBackend},
    blob::Blob,
    constants::BYTES_PER_G1,
    field::FieldElement,
    point::{Commitment, G1Point, Proof},
};

/// A deterministic stand-in for a KZG implementation.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ToyKzg;

/// A backend that fails every operation.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FailingBackend;

/// A deviation from [`ToyKzg`] behavior, used to provoke inequivalence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Quirk {
    /// Reduce non-canonical field elements instead of rejecting them.
    LenientFieldElements,
    /// Return the identity for every proof.
    IdentityProofs,
    /// Flip a bit of every commitment.
    CorruptCommitments,
    /// Accept every well-formed verification.
    AcceptAll,
    /// Commit to every blob with the identity.
    IdentityCommitments,
    /// Refuse to prove against any commitment but its own, as a subgroup check would.
    StrictCommitments,
}

/// [`ToyKzg`] with a single deviation.
#[derive(Clone, Copy, Debug)]
pub(crate) struct QuirkyKzg(pub(crate) Quirk);

// Hash a domain and inputs to a compressed, non-identity point encoding
fn hash_to_point(domain: &str, parts: &[&[u8]]) -> G1Point {
    let mut hasher = Hasher::new();
    hasher.update(domain.as_bytes());
    for part in parts {
        hasher.update(part);
    }

    let mut bytes = [0u8; BYTES_PER_G1];
    hasher.finalize_xof().fill(&mut bytes);

    // Set the compression flag and clear the infinity flag
    bytes[0] = (bytes[0] & 0x3f) | 0x80;
    G1Point::from_bytes(bytes)
}

fn check_blob(blob: &Blob) -> Result<(), BackendError> {
    if blob.is_canonical() {
        Ok(())
    } else {
        Err(BackendError::new("non-canonical field element in blob"))
    }
}

fn check_field_element(element: &FieldElement) -> Result<(), BackendError> {
    if element.is_canonical() {
        Ok(())
    } else {
        Err(BackendError::new("non-canonical field element"))
    }
}

fn check_point(point: &G1Point) -> Result<(), BackendError> {
    let flags = point.as_bytes()[0];
    if flags & 0x80 == 0 {
        return Err(BackendError::new("point is not compressed"));
    }
    if flags & 0x40 != 0 && !point.is_identity() {
        return Err(BackendError::new("malformed point at infinity"));
    }

    Ok(())
}

impl ToyKzg {
    fn commit(blob: &Blob) -> Commitment {
        if blob.is_zero() {
            return G1Point::IDENTITY;
        }
        hash_to_point("commitment", &[blob.as_bytes()])
    }

    fn blob_proof(blob: &Blob, commitment: &Commitment) -> Proof {
        if blob.is_constant() {
            return G1Point::IDENTITY;
        }
        hash_to_point("blob proof", &[blob.as_bytes(), commitment.as_bytes()])
    }

    fn opening_proof(commitment: &Commitment, z: &FieldElement, y: &FieldElement) -> Proof {
        hash_to_point("opening proof", &[commitment.as_bytes(), z.as_bytes(), y.as_bytes()])
    }
}

impl KzgBackend for ToyKzg {
    fn name(&self) -> &'static str {
        "toy"
    }

    fn blob_to_commitment(&self, blob: &Blob) -> Result<Commitment, BackendError> {
        check_blob(blob)?;
        Ok(Self::commit(blob))
    }

    fn compute_proof(&self, blob: &Blob, z: &FieldElement) -> Result<(Proof, FieldElement), BackendError> {
        check_blob(blob)?;
        check_field_element(z)?;

        // A constant polynomial evaluates to its constant with a zero quotient
        if blob.is_constant() {
            let y = blob.element(0).unwrap_or_default();
            return Ok((G1Point::IDENTITY, y));
        }

        let mut y_bytes = [0u8; 32];
        let mut hasher = Hasher::new();
        hasher.update(b"evaluation");
        hasher.update(blob.as_bytes());
        hasher.update(z.as_bytes());
        hasher.finalize_xof().fill(&mut y_bytes);
        let y = FieldElement::reduce(y_bytes);

        Ok((Self::opening_proof(&Self::commit(blob), z, &y), y))
    }

    fn compute_blob_proof(&self, blob: &Blob, commitment: &Commitment) -> Result<Proof, BackendError> {
        check_blob(blob)?;
        check_point(commitment)?;
        Ok(Self::blob_proof(blob, commitment))
    }

    fn verify_proof(
        &self,
        commitment: &Commitment,
        z: &FieldElement,
        y: &FieldElement,
        proof: &Proof,
    ) -> Result<bool, BackendError> {
        check_point(commitment)?;
        check_field_element(z)?;
        check_field_element(y)?;
        check_point(proof)?;

        if proof.is_identity() {
            return Ok(*commitment == Self::commit(&Blob::tiled(y)));
        }
        Ok(*proof == Self::opening_proof(commitment, z, y))
    }

    fn verify_blob_proof(&self, blob: &Blob, commitment: &Commitment, proof: &Proof) -> Result<bool, BackendError> {
        check_blob(blob)?;
        check_point(commitment)?;
        check_point(proof)?;

        Ok(*commitment == Self::commit(blob) && *proof == Self::blob_proof(blob, commitment))
    }

    fn verify_blob_proof_batch(
        &self,
        blobs: &[Blob],
        commitments: &[Commitment],
        proofs: &[Proof],
    ) -> Result<bool, BackendError> {
        if blobs.len() != commitments.len() || blobs.len() != proofs.len() {
            return Err(BackendError::new("batch lengths differ"));
        }

        let mut valid = true;
        for (blob, commitment, proof) in izip!(blobs, commitments, proofs) {
            valid &= self.verify_blob_proof(blob, commitment, proof)?;
        }

        Ok(valid)
    }
}

impl KzgBackend for FailingBackend {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn blob_to_commitment(&self, _blob: &Blob) -> Result<Commitment, BackendError> {
        Err(BackendError::new("unavailable"))
    }

    fn compute_proof(&self, _blob: &Blob, _z: &FieldElement) -> Result<(Proof, FieldElement), BackendError> {
        Err(BackendError::new("unavailable"))
    }

    fn compute_blob_proof(&self, _blob: &Blob, _commitment: &Commitment) -> Result<Proof, BackendError> {
        Err(BackendError::new("unavailable"))
    }

    fn verify_proof(
        &self,
        _commitment: &Commitment,
        _z: &FieldElement,
        _y: &FieldElement,
        _proof: &Proof,
    ) -> Result<bool, BackendError> {
        Err(BackendError::new("unavailable"))
    }

    fn verify_blob_proof(&self, _blob: &Blob, _commitment: &Commitment, _proof: &Proof) -> Result<bool, BackendError> {
        Err(BackendError::new("unavailable"))
    }

    fn verify_blob_proof_batch(
        &self,
        _blobs: &[Blob],
        _commitments: &[Commitment],
        _proofs: &[Proof],
    ) -> Result<bool, BackendError> {
        Err(BackendError::new("unavailable"))
    }
}

impl QuirkyKzg {
    fn lenient_blob(&self, blob: &Blob) -> Blob {
        if self.0 != Quirk::LenientFieldElements {
            return blob.clone();
        }

        let mut reduced = blob.clone();
        for (index, element) in blob.elements().enumerate() {
            reduced.set_element(index, &element.canonicalize());
        }
        reduced
    }

    fn lenient_element(&self, element: &FieldElement) -> FieldElement {
        if self.0 == Quirk::LenientFieldElements {
            element.canonicalize()
        } else {
            *element
        }
    }

    fn proof(&self, proof: Proof) -> Proof {
        if self.0 == Quirk::IdentityProofs {
            G1Point::IDENTITY
        } else {
            proof
        }
    }

    fn verification(&self, result: Result<bool, BackendError>) -> Result<bool, BackendError> {
        if self.0 == Quirk::AcceptAll {
            result.map(|_| true)
        } else {
            result
        }
    }
}

impl KzgBackend for QuirkyKzg {
    fn name(&self) -> &'static str {
        "quirky"
    }

    fn blob_to_commitment(&self, blob: &Blob) -> Result<Commitment, BackendError> {
        let mut commitment = ToyKzg.blob_to_commitment(&self.lenient_blob(blob))?;
        match self.0 {
            Quirk::CorruptCommitments => commitment.as_bytes_mut()[BYTES_PER_G1 - 1] ^= 1,
            Quirk::IdentityCommitments => commitment = G1Point::IDENTITY,
            _ => {},
        }
        Ok(commitment)
    }

    fn compute_proof(&self, blob: &Blob, z: &FieldElement) -> Result<(Proof, FieldElement), BackendError> {
        let (proof, y) = ToyKzg.compute_proof(&self.lenient_blob(blob), &self.lenient_element(z))?;
        Ok((self.proof(proof), y))
    }

    fn compute_blob_proof(&self, blob: &Blob, commitment: &Commitment) -> Result<Proof, BackendError> {
        if self.0 == Quirk::StrictCommitments && *commitment != ToyKzg.blob_to_commitment(blob)? {
            return Err(BackendError::new("commitment is not in the subgroup"));
        }
        let proof = ToyKzg.compute_blob_proof(&self.lenient_blob(blob), commitment)?;
        Ok(self.proof(proof))
    }

    fn verify_proof(
        &self,
        commitment: &Commitment,
        z: &FieldElement,
        y: &FieldElement,
        proof: &Proof,
    ) -> Result<bool, BackendError> {
        self.verification(ToyKzg.verify_proof(
            commitment,
            &self.lenient_element(z),
            &self.lenient_element(y),
            proof,
        ))
    }

    fn verify_blob_proof(&self, blob: &Blob, commitment: &Commitment, proof: &Proof) -> Result<bool, BackendError> {
        self.verification(ToyKzg.verify_blob_proof(&self.lenient_blob(blob), commitment, proof))
    }

    fn verify_blob_proof_batch(
        &self,
        blobs: &[Blob],
        commitments: &[Commitment],
        proofs: &[Proof],
    ) -> Result<bool, BackendError> {
        let blobs = blobs.iter().map(|blob| self.lenient_blob(blob)).collect::<Vec<_>>();
        self.verification(ToyKzg.verify_blob_proof_batch(&blobs, commitments, proofs))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_toy_round_trip() {
        let mut blob = Blob::zero();
        blob.set_element(3, &FieldElement::reduce([9u8; 32]));

        let commitment = ToyKzg.blob_to_commitment(&blob).unwrap();
        assert!(!commitment.is_identity());
        let proof = ToyKzg.compute_blob_proof(&blob, &commitment).unwrap();
        assert!(ToyKzg.verify_blob_proof(&blob, &commitment, &proof).unwrap());

        let z = FieldElement::reduce([1u8; 32]);
        let (proof, y) = ToyKzg.compute_proof(&blob, &z).unwrap();
        assert!(ToyKzg.verify_proof(&commitment, &z, &y, &proof).unwrap());
    }

    #[test]
    fn test_toy_constant_blob() {
        let element = FieldElement::reduce([5u8; 32]);
        let blob = Blob::tiled(&element);
        let commitment = ToyKzg.blob_to_commitment(&blob).unwrap();

        let z = FieldElement::reduce([1u8; 32]);
        let (proof, y) = ToyKzg.compute_proof(&blob, &z).unwrap();
        assert!(proof.is_identity());
        assert_eq!(y, element);
        assert!(ToyKzg.verify_proof(&commitment, &z, &y, &proof).unwrap());

        // The all-zero blob commits to the identity
        assert!(ToyKzg.blob_to_commitment(&Blob::zero()).unwrap().is_identity());
    }

    #[test]
    fn test_toy_rejects_malformed() {
        let blob = Blob::tiled(&FieldElement::from_bytes([0xffu8; 32]));
        assert!(ToyKzg.blob_to_commitment(&blob).is_err());

        let uncompressed = G1Point::from_bytes([0u8; BYTES_PER_G1]);
        assert!(ToyKzg.compute_blob_proof(&Blob::zero(), &uncompressed).is_err());
    }

    #[test]
    fn test_quirks() {
        let mut blob = Blob::zero();
        blob.set_element(7, &FieldElement::reduce([2u8; 32]));
        let commitment = ToyKzg.blob_to_commitment(&blob).unwrap();

        let identity = QuirkyKzg(Quirk::IdentityCommitments);
        assert!(identity.blob_to_commitment(&blob).unwrap().is_identity());

        let strict = QuirkyKzg(Quirk::StrictCommitments);
        assert_eq!(
            strict.compute_blob_proof(&blob, &commitment).unwrap(),
            ToyKzg.compute_blob_proof(&blob, &commitment).unwrap()
        );
        let mut other = commitment;
        other.as_bytes_mut()[BYTES_PER_G1 - 1] ^= 1;
        assert!(strict.compute_blob_proof(&blob, &other).is_err());
    }
}
