// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

#![no_main]

use kzg_differential::{constants::BYTES_PER_FIELD_ELEMENT, scalar, ByteCursor};
use libfuzzer_sys::fuzz_target;

// Field element decoding must match blst, which checks the modulus
fuzz_target!(|data: &[u8]| {
    if let Ok(bytes) = ByteCursor::new(data).take_array::<BYTES_PER_FIELD_ELEMENT>() {
        if let Err(err) = scalar::check(bytes) {
            panic!("{err}");
        }
    }
});
