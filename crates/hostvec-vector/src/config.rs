//! Vector layer configuration.

use std::error::Error;
use std::fmt;

/// Tuning parameters shared by every vector created from one
/// [`Runtime`](crate::Runtime).
///
/// Validated when the runtime is built; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VectorConfig {
    /// Elements fetched per region call when iterating an opaque array.
    ///
    /// Default: 64. Must be in `1..=MAX_BLOCK_LEN`.
    pub block_len: usize,

    /// Capacity of the first allocation made by `push` on an empty vector.
    ///
    /// Default: 1.
    pub min_capacity: usize,

    /// Multiplier applied to capacity when `push` runs out of room.
    ///
    /// Default: 2. Must be at least 2 for amortized O(1) appends.
    pub growth_factor: usize,
}

impl VectorConfig {
    /// Default iteration block length.
    pub const DEFAULT_BLOCK_LEN: usize = 64;

    /// Upper bound on `block_len`.
    pub const MAX_BLOCK_LEN: usize = 4096;

    /// Default first capacity.
    pub const DEFAULT_MIN_CAPACITY: usize = 1;

    /// Default growth multiplier.
    pub const DEFAULT_GROWTH_FACTOR: usize = 2;

    /// Check every field against its documented range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_len == 0 || self.block_len > Self::MAX_BLOCK_LEN {
            return Err(ConfigError::BlockLen {
                value: self.block_len,
            });
        }
        if self.min_capacity == 0 {
            return Err(ConfigError::MinCapacityZero);
        }
        if self.growth_factor < 2 {
            return Err(ConfigError::GrowthFactor {
                value: self.growth_factor,
            });
        }
        Ok(())
    }
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            block_len: Self::DEFAULT_BLOCK_LEN,
            min_capacity: Self::DEFAULT_MIN_CAPACITY,
            growth_factor: Self::DEFAULT_GROWTH_FACTOR,
        }
    }
}

/// Errors detected by [`VectorConfig::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `block_len` is zero or above [`VectorConfig::MAX_BLOCK_LEN`].
    BlockLen {
        /// The rejected value.
        value: usize,
    },
    /// `min_capacity` is zero, so the first push could never make room.
    MinCapacityZero,
    /// `growth_factor` is below 2.
    GrowthFactor {
        /// The rejected value.
        value: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlockLen { value } => write!(
                f,
                "block_len {value} outside 1..={}",
                VectorConfig::MAX_BLOCK_LEN
            ),
            Self::MinCapacityZero => write!(f, "min_capacity must be at least 1"),
            Self::GrowthFactor { value } => {
                write!(f, "growth_factor {value} must be at least 2")
            }
        }
    }
}

impl Error for ConfigError {}
