// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use blst::{blst_p1_affine, blst_p1_affine_compress, blst_p1_affine_in_g1, blst_p1_uncompress, BLST_ERROR};
use snafu::prelude::*;

use crate::{constants::BYTES_PER_G1, point::G1Point};

/// Errors that can arise when decoding a compressed G1 encoding.
#[derive(Debug, Snafu)]
pub enum G1Error {
    /// The encoding was rejected by the decoder.
    #[snafu(display("Invalid G1 encoding: {reason:?}"))]
    InvalidEncoding { reason: BLST_ERROR },
    /// The point is on the curve but outside the prime-order subgroup.
    #[snafu(display("G1 point is outside the subgroup"))]
    OutsideSubgroup,
}

/// Decompress `point` and compress it again.
///
/// Every encoding accepted here must come back byte-for-byte unchanged; anything else is a codec bug.
pub fn round_trip(point: &G1Point) -> Result<G1Point, G1Error> {
    let mut affine = blst_p1_affine::default();

    // SAFETY: the source is a valid 48-byte buffer and the target is a valid affine point.
    let result = unsafe { blst_p1_uncompress(&mut affine, point.as_bytes().as_ptr()) };
    ensure!(result == BLST_ERROR::BLST_SUCCESS, InvalidEncodingSnafu { reason: result });

    // SAFETY: the affine point was initialized by a successful decode.
    let in_group = unsafe { blst_p1_affine_in_g1(&affine) };
    ensure!(in_group, OutsideSubgroupSnafu);

    let mut bytes = [0u8; BYTES_PER_G1];
    // SAFETY: the output buffer holds exactly one compressed point.
    unsafe { blst_p1_affine_compress(bytes.as_mut_ptr(), &affine) };

    Ok(G1Point::from_bytes(bytes))
}
