// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use crate::{backend::KzgBackend, config::HarnessConfig, generator::Generator, oracle::Oracle};

/// Process-wide state shared by every fuzz case.
///
/// The context owns both implementations under test, including any trusted setup they loaded, and the harness
/// configuration. Create it once before any case runs and pass it by shared reference; nothing in it is mutated by
/// a case. Dropping it releases both trusted setups.
///
/// The first implementation `A` is the reference used to derive valid commitments and proofs.
pub struct DifferentialContext<A: KzgBackend, B: KzgBackend> {
    a: A,
    b: B,
    config: HarnessConfig,
}

impl<A: KzgBackend, B: KzgBackend> DifferentialContext<A, B> {
    /// Build a context from two initialized implementations.
    pub fn new(a: A, b: B, config: HarnessConfig) -> Self {
        Self { a, b, config }
    }

    /// Get the reference implementation.
    pub fn reference(&self) -> &A {
        &self.a
    }

    /// Get the second implementation.
    pub fn other(&self) -> &B {
        &self.b
    }

    /// Get the configuration.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Set up a generator for one fuzz input.
    pub fn generator<'a>(&self, data: &'a [u8]) -> Generator<'a> {
        Generator::new(data, &self.config)
    }

    /// Set up an oracle for one fuzz input.
    pub fn oracle<'a>(&'a self, data: &'a [u8]) -> Oracle<'a> {
        Oracle::new(&self.a, &self.b, data)
    }

    /// Release both implementations.
    pub fn into_inner(self) -> (A, B) {
        (self.a, self.b)
    }
}
