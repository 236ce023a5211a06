// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

#![no_main]

mod common;

use common::{check, CONTEXT};
use kzg_differential::targets;
use libfuzzer_sys::fuzz_target;

// Commitments to the same blob must match
fuzz_target!(|data: &[u8]| {
    check(targets::blob_to_commitment(&*CONTEXT, data));
});
