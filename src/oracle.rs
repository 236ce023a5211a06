// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! The differential equivalence oracle.
//!
//! The oracle runs one logical operation against two implementations and requires that:
//! - both succeed or both fail, and
//! - when both succeed, their outputs are byte-for-byte equal.
//!
//! Failure messages are never compared, since libraries describe the same rejection differently.
//! Operations that produce a group element can additionally be checked against the identity, which catches
//! implementations that silently return the identity on internal failure.

use alloc::{
    format,
    string::{String, ToString},
};
use core::fmt::Debug;

use snafu::prelude::*;
use tracing::{debug, error};

use crate::{
    backend::{BackendError, KzgBackend},
    field::FieldElement,
    point::G1Point,
};

/// The observable result of one implementation call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome<T> {
    /// The call succeeded with this output.
    Success(T),
    /// The call reported a typed failure.
    Failure(BackendError),
}

impl<T> Outcome<T> {
    /// Check whether the call succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Get the output, if the call succeeded.
    pub fn output(&self) -> Option<&T> {
        match self {
            Self::Success(output) => Some(output),
            Self::Failure(_) => None,
        }
    }
}

impl<T> From<Result<T, BackendError>> for Outcome<T> {
    fn from(result: Result<T, BackendError>) -> Self {
        match result {
            Ok(output) => Self::Success(output),
            Err(err) => Self::Failure(err),
        }
    }
}

/// The outcomes of a comparison in which both implementations agreed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Verdict<T> {
    operation: &'static str,
    outcome_a: Outcome<T>,
    outcome_b: Outcome<T>,
}

impl<T> Verdict<T> {
    /// Get the name of the compared operation.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Get the outcome of the first implementation.
    pub fn outcome_a(&self) -> &Outcome<T> {
        &self.outcome_a
    }

    /// Get the outcome of the second implementation.
    pub fn outcome_b(&self) -> &Outcome<T> {
        &self.outcome_b
    }

    /// Get the agreed output, if both implementations succeeded.
    pub fn output(&self) -> Option<&T> {
        self.outcome_a.output()
    }
}

/// The way in which two implementations disagreed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Divergence {
    /// One implementation succeeded and the other failed.
    SuccessMismatch,
    /// Both succeeded with different outputs.
    OutputMismatch,
    /// Both succeeded, but returned the identity for an input that cannot produce it.
    IdentityOutput,
}

/// A discovered behavioral difference between two implementations.
///
/// This carries enough context to reproduce the case: the operation, the derived values passed to both
/// implementations, both outcomes, and the length and BLAKE3 digest of the fuzzer input that produced it.
#[derive(Debug, Snafu)]
#[snafu(display(
    "{operation}: {divergence:?} between {implementation_a} ({outcome_a}) and {implementation_b} ({outcome_b}) on \
     {derived_input} from {input_len}-byte input with BLAKE3 digest {input_digest}"
))]
pub struct Inequivalence {
    operation: &'static str,
    divergence: Divergence,
    implementation_a: &'static str,
    implementation_b: &'static str,
    outcome_a: String,
    outcome_b: String,
    derived_input: String,
    input_len: usize,
    input_digest: String,
}

impl Inequivalence {
    /// Get the name of the compared operation.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Get the way the implementations disagreed.
    pub fn divergence(&self) -> Divergence {
        self.divergence
    }

    /// Get the formatted values that were passed to both implementations.
    pub fn derived_input(&self) -> &str {
        &self.derived_input
    }
}

/// An operation output that is a group element, for identity checks.
pub trait PointOutput {
    /// Get the group element.
    fn point(&self) -> &G1Point;
}

impl PointOutput for G1Point {
    fn point(&self) -> &G1Point {
        self
    }
}

impl PointOutput for (G1Point, FieldElement) {
    fn point(&self) -> &G1Point {
        &self.0
    }
}

/// Compares implementations on behalf of a single fuzz case.
pub struct Oracle<'a> {
    a: &'a dyn KzgBackend,
    b: &'a dyn KzgBackend,
    input: &'a [u8],
}

impl<'a> Oracle<'a> {
    /// Set up an oracle for the implementations `a` and `b`, recording the fuzzer `input` for diagnostics.
    pub fn new(a: &'a dyn KzgBackend, b: &'a dyn KzgBackend, input: &'a [u8]) -> Self {
        Self { a, b, input }
    }

    /// Run `call` against both implementations and compare the outcomes.
    ///
    /// The same derived inputs are captured by `call`, so both implementations see identical logical inputs.
    /// `derived` describes those inputs, and is only formatted if the implementations disagree.
    pub fn compare<T, F>(
        &self,
        operation: &'static str,
        derived: &dyn Debug,
        call: F,
    ) -> Result<Verdict<T>, Inequivalence>
    where
        T: Debug + PartialEq,
        F: Fn(&dyn KzgBackend) -> Result<T, BackendError>,
    {
        let outcome_a = Outcome::from(call(self.a));
        let outcome_b = Outcome::from(call(self.b));

        let divergence = match (&outcome_a, &outcome_b) {
            (Outcome::Success(a), Outcome::Success(b)) if a != b => Some(Divergence::OutputMismatch),
            (Outcome::Success(_), Outcome::Failure(_)) | (Outcome::Failure(_), Outcome::Success(_)) => {
                Some(Divergence::SuccessMismatch)
            },
            _ => None,
        };

        if let Some(divergence) = divergence {
            return Err(self.inequivalence(operation, divergence, derived, &outcome_a, &outcome_b));
        }

        debug!(
            operation,
            success = outcome_a.is_success(),
            "implementations agree"
        );

        Ok(Verdict {
            operation,
            outcome_a,
            outcome_b,
        })
    }

    /// Require that an agreed group element output is not the identity.
    ///
    /// Only call this when the derived input provably cannot produce the identity; failed outcomes pass unchanged.
    pub fn ensure_not_identity<T>(
        &self,
        verdict: Verdict<T>,
        derived: &dyn Debug,
    ) -> Result<Verdict<T>, Inequivalence>
    where
        T: Debug + PointOutput,
    {
        match verdict.output() {
            Some(output) if output.point().is_identity() => Err(self.inequivalence(
                verdict.operation,
                Divergence::IdentityOutput,
                derived,
                &verdict.outcome_a,
                &verdict.outcome_b,
            )),
            _ => Ok(verdict),
        }
    }

    fn inequivalence<T: Debug>(
        &self,
        operation: &'static str,
        divergence: Divergence,
        derived: &dyn Debug,
        outcome_a: &Outcome<T>,
        outcome_b: &Outcome<T>,
    ) -> Inequivalence {
        let input_digest = blake3::hash(self.input).to_hex().to_string();
        let derived_input = format!("{derived:?}");
        let outcome_a = format!("{outcome_a:?}");
        let outcome_b = format!("{outcome_b:?}");

        error!(
            operation,
            ?divergence,
            implementation_a = self.a.name(),
            implementation_b = self.b.name(),
            outcome_a = %outcome_a,
            outcome_b = %outcome_b,
            derived_input = %derived_input,
            input_len = self.input.len(),
            input_digest = %input_digest,
            "implementations diverged"
        );

        Inequivalence {
            operation,
            divergence,
            implementation_a: self.a.name(),
            implementation_b: self.b.name(),
            outcome_a,
            outcome_b,
            derived_input,
            input_len: self.input.len(),
            input_digest,
        }
    }
}
