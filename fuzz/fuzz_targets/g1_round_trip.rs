// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

#![no_main]

use kzg_differential::{constants::BYTES_PER_G1, g1::round_trip, G1Point};
use libfuzzer_sys::fuzz_target;

// Any accepted compressed encoding must be canonical
fuzz_target!(|data: &[u8]| {
    if let Ok(bytes) = <[u8; BYTES_PER_G1]>::try_from(data) {
        let point = G1Point::from_bytes(bytes);
        if let Ok(decoded) = round_trip(&point) {
            assert_eq!(decoded, point);
        }
    }
});
