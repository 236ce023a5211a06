// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

#![no_main]

mod common;

use common::{check, CONTEXT};
use kzg_differential::targets;
use libfuzzer_sys::fuzz_target;

// Opening proofs and evaluations must match
fuzz_target!(|data: &[u8]| {
    check(targets::compute_proof(&*CONTEXT, data));
});
