// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use blst::{
    blst_bendian_from_scalar,
    blst_fr,
    blst_fr_from_scalar,
    blst_scalar,
    blst_scalar_fr_check,
    blst_scalar_from_bendian,
    blst_scalar_from_fr,
};
use snafu::prelude::*;

use crate::{constants::BYTES_PER_FIELD_ELEMENT, field::FieldElement};

/// Disagreements between [`FieldElement`] and `blst` scalar decoding.
#[derive(Debug, Snafu)]
pub enum ScalarError {
    /// The two decoders disagree on whether an encoding is canonical.
    #[snafu(display("{element:?} is canonical to blst: {blst}, but not to the harness"))]
    CanonicalMismatch { element: FieldElement, blst: bool },
    /// The two decoders reduce an encoding to different elements.
    #[snafu(display("{element:?} reduces to {blst:?} in blst but {harness:?} in the harness"))]
    ReductionMismatch {
        element: FieldElement,
        blst: FieldElement,
        harness: FieldElement,
    },
}

fn to_scalar(bytes: &[u8; BYTES_PER_FIELD_ELEMENT]) -> blst_scalar {
    let mut scalar = blst_scalar::default();
    // SAFETY: the source holds exactly one 32-byte scalar.
    unsafe { blst_scalar_from_bendian(&mut scalar, bytes.as_ptr()) };

    scalar
}

/// Check whether `blst` accepts `element` as a canonical scalar.
pub fn is_canonical(element: &FieldElement) -> bool {
    let scalar = to_scalar(element.as_bytes());
    // SAFETY: the scalar was initialized above.
    unsafe { blst_scalar_fr_check(&scalar) }
}

/// Reduce `bytes` modulo the scalar field modulus using `blst`.
pub fn reduce(bytes: [u8; BYTES_PER_FIELD_ELEMENT]) -> FieldElement {
    let scalar = to_scalar(&bytes);
    let mut fr = blst_fr::default();
    let mut reduced = blst_scalar::default();
    let mut out = [0u8; BYTES_PER_FIELD_ELEMENT];

    // SAFETY: every pointer refers to an initialized value or a buffer of the right size.
    unsafe {
        blst_fr_from_scalar(&mut fr, &scalar);
        blst_scalar_from_fr(&mut reduced, &fr);
        blst_bendian_from_scalar(out.as_mut_ptr(), &reduced);
    }

    FieldElement::from_bytes(out)
}

/// Require that [`FieldElement`] decodes `bytes` exactly as `blst` does.
///
/// Both the canonical check and the reduction must agree.
pub fn check(bytes: [u8; BYTES_PER_FIELD_ELEMENT]) -> Result<(), ScalarError> {
    let element = FieldElement::from_bytes(bytes);

    let blst = is_canonical(&element);
    ensure!(blst == element.is_canonical(), CanonicalMismatchSnafu { element, blst });

    let blst = reduce(bytes);
    let harness = FieldElement::reduce(bytes);
    ensure!(blst == harness, ReductionMismatchSnafu { element, blst, harness });

    Ok(())
}
