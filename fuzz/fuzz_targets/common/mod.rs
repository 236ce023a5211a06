// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::{env, path::PathBuf};

use kzg_differential::{
    backend::{CKzg, EthKzg},
    DifferentialContext,
    HarnessConfig,
    HarnessError,
    Verdict,
};
use lazy_static::lazy_static;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// Used when `KZG_TRUSTED_SETUP` is unset
const DEFAULT_TRUSTED_SETUP: &str = "trusted_setup.txt";

lazy_static! {
    /// Both implementations and the configuration, shared by every case in the process.
    pub static ref CONTEXT: DifferentialContext<CKzg, EthKzg> = {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();

        let path = env::var_os("KZG_TRUSTED_SETUP")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_TRUSTED_SETUP));
        let reference = match CKzg::load_trusted_setup(&path, 0) {
            Ok(reference) => reference,
            Err(err) => panic!("cannot start fuzzing: {err}"),
        };
        let config = match HarnessConfig::from_env() {
            Ok(config) => config,
            Err(err) => panic!("cannot start fuzzing: {err}"),
        };

        DifferentialContext::new(reference, EthKzg::new(), config)
    };
}

/// Skip exhausted or underivable cases, and fail on any inequivalence.
pub fn check<T>(result: Result<Verdict<T>, HarnessError>) {
    match result {
        Ok(_) => {},
        Err(err) if err.is_skip() => debug!(%err, "skipping case"),
        Err(err) => panic!("{err}"),
    }
}
