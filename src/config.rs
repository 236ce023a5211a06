// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use alloc::string::{String, ToString};
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::generator::GenerationMode;

/// How the generation mode is selected from a seed.
///
/// The two policies are not equivalent; neither is more correct than the other.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum ModePolicy {
    /// `seed % 2` selects random or valid values.
    TwoWay,
    /// `seed % 3` selects random, valid, or mutated values.
    #[default]
    ThreeWay,
}

impl ModePolicy {
    /// Select a generation mode from `seed`.
    pub fn select(&self, seed: u64) -> GenerationMode {
        match self {
            Self::TwoWay => match seed % 2 {
                0 => GenerationMode::Random,
                _ => GenerationMode::Valid,
            },
            Self::ThreeWay => match seed % 3 {
                0 => GenerationMode::Random,
                1 => GenerationMode::Valid,
                _ => GenerationMode::Mutated,
            },
        }
    }
}

/// Where bit mutation is applied when generating a mutated blob.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum MutationGranularity {
    /// Each canonical element is mutated with its own seed before it is placed.
    #[default]
    PerElement,
    /// The assembled canonical blob is mutated once as a whole.
    WholeBlob,
}

/// How blob slots are filled from the input.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum BlobLayout {
    /// Every slot is drawn independently; running out of input fails the blob.
    #[default]
    Independent,
    /// A single element is drawn and repeated across every slot.
    Tiled,
    /// Slots are drawn until the input runs out, and the rest are left zero.
    LowEntropy,
}

/// Errors that can arise relating to [`HarnessConfig`].
#[derive(Debug, Snafu)]
pub enum ConfigError {
    /// An invalid parameter was provided.
    #[snafu(display("An invalid parameter was provided"))]
    InvalidParameter,
    /// A configuration value could not be parsed.
    #[snafu(display("Unrecognized value `{value}` for {name}"))]
    UnrecognizedValue { name: &'static str, value: String },
}

/// Configuration shared by every generator and oracle call.
///
/// The near-duplicate fuzzing variants (2-way versus 3-way mode splits, per-element versus whole-blob mutation,
/// independent versus tiled blobs) are all expressed as values of this type.
///
/// With the `serde` feature, deserialization applies the same checks as [`HarnessConfig::new`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(try_from = "UncheckedHarnessConfig")
)]
pub struct HarnessConfig {
    mode_policy: ModePolicy,
    mutation_granularity: MutationGranularity,
    blob_layout: BlobLayout,
    max_batch_size: usize,
}

impl HarnessConfig {
    /// The largest allowed batch size.
    pub const MAX_BATCH_SIZE: usize = 64;

    /// Generate a new configuration.
    ///
    /// The batch size bound must satisfy `1 <= max_batch_size <= 64`; otherwise, returns a [`ConfigError`].
    pub fn new(
        mode_policy: ModePolicy,
        mutation_granularity: MutationGranularity,
        blob_layout: BlobLayout,
        max_batch_size: usize,
    ) -> Result<Self, ConfigError> {
        if max_batch_size == 0 || max_batch_size > Self::MAX_BATCH_SIZE {
            return Err(ConfigError::InvalidParameter);
        }

        Ok(Self {
            mode_policy,
            mutation_granularity,
            blob_layout,
            max_batch_size,
        })
    }

    /// A configuration that tiles one element across each blob.
    pub fn tiled() -> Self {
        Self {
            blob_layout: BlobLayout::Tiled,
            ..Self::default()
        }
    }

    /// A configuration that fills blobs only as far as the input allows.
    pub fn low_entropy() -> Self {
        Self {
            blob_layout: BlobLayout::LowEntropy,
            ..Self::default()
        }
    }

    /// Build a configuration from `KZG_DIFF_*` environment variables.
    ///
    /// Recognized variables are `KZG_DIFF_MODE_POLICY`, `KZG_DIFF_MUTATION`, `KZG_DIFF_BLOB_LAYOUT`, and
    /// `KZG_DIFF_MAX_BATCH`. Unset variables keep their defaults.
    #[cfg(feature = "std")]
    pub fn from_env() -> Result<Self, ConfigError> {
        fn var(name: &str) -> Option<String> {
            std::env::var(name).ok().filter(|value| !value.is_empty())
        }

        let defaults = Self::default();
        let mode_policy = match var("KZG_DIFF_MODE_POLICY") {
            Some(value) => value.parse()?,
            None => defaults.mode_policy,
        };
        let mutation_granularity = match var("KZG_DIFF_MUTATION") {
            Some(value) => value.parse()?,
            None => defaults.mutation_granularity,
        };
        let blob_layout = match var("KZG_DIFF_BLOB_LAYOUT") {
            Some(value) => value.parse()?,
            None => defaults.blob_layout,
        };
        let max_batch_size = match var("KZG_DIFF_MAX_BATCH") {
            Some(value) => value.parse().map_err(|_| ConfigError::UnrecognizedValue {
                name: "max batch size",
                value,
            })?,
            None => defaults.max_batch_size,
        };

        Self::new(mode_policy, mutation_granularity, blob_layout, max_batch_size)
    }

    /// Get the mode selection policy.
    pub fn mode_policy(&self) -> ModePolicy {
        self.mode_policy
    }

    /// Get the mutation granularity for blobs.
    pub fn mutation_granularity(&self) -> MutationGranularity {
        self.mutation_granularity
    }

    /// Get the blob layout.
    pub fn blob_layout(&self) -> BlobLayout {
        self.blob_layout
    }

    /// Get the largest batch size drawn for batch operations.
    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            mode_policy: ModePolicy::default(),
            mutation_granularity: MutationGranularity::default(),
            blob_layout: BlobLayout::default(),
            max_batch_size: 5,
        }
    }
}

// The deserialized form, before validation
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct UncheckedHarnessConfig {
    mode_policy: ModePolicy,
    mutation_granularity: MutationGranularity,
    blob_layout: BlobLayout,
    max_batch_size: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<UncheckedHarnessConfig> for HarnessConfig {
    type Error = ConfigError;

    fn try_from(config: UncheckedHarnessConfig) -> Result<Self, Self::Error> {
        Self::new(
            config.mode_policy,
            config.mutation_granularity,
            config.blob_layout,
            config.max_batch_size,
        )
    }
}

impl FromStr for ModePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "two-way" | "2" => Ok(Self::TwoWay),
            "three-way" | "3" => Ok(Self::ThreeWay),
            _ => UnrecognizedValueSnafu {
                name: "mode policy",
                value: s.to_string(),
            }
            .fail(),
        }
    }
}

impl FromStr for MutationGranularity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per-element" => Ok(Self::PerElement),
            "whole-blob" => Ok(Self::WholeBlob),
            _ => UnrecognizedValueSnafu {
                name: "mutation granularity",
                value: s.to_string(),
            }
            .fail(),
        }
    }
}

impl FromStr for BlobLayout {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "independent" => Ok(Self::Independent),
            "tiled" => Ok(Self::Tiled),
            "low-entropy" => Ok(Self::LowEntropy),
            _ => UnrecognizedValueSnafu {
                name: "blob layout",
                value: s.to_string(),
            }
            .fail(),
        }
    }
}
