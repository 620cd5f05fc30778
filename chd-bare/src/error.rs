//! Construction failures.

#![cfg(feature = "build")]

use super::sizing::Mode;
use displaydoc::Display;
use thiserror::Error;

/// Why a [`Phf`](crate::Phf) could not be built.
///
/// All of these are detected before a function is returned. Evaluation itself never fails.
#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum BuildError {
    /// {table} of {requested} does not fit in a 32-bit table
    CapacityOverflow {
        /// Which quantity overflowed.
        table: Table,
        /// The size that was asked for.
        requested: u64,
    },

    /// {mode} mode is not supported by this build
    UnsupportedConfiguration {
        /// The requested mode.
        mode: Mode,
    },

    /// keys #{first} and #{second} are equal
    DuplicateKey {
        /// Position of the first occurrence in the input.
        first: usize,
        /// Position of the repeated occurrence in the input.
        second: usize,
    },

    /// no displacement up to {limit} places the keys of bucket {bucket}
    DisplacementLimitExceeded {
        /// The bucket whose keys could not be placed.
        bucket: u32,
        /// The configured displacement limit.
        limit: u32,
    },
}

/// A sized quantity, for [`BuildError::CapacityOverflow`].
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[non_exhaustive]
pub enum Table {
    /// key count
    Keys,
    /// bucket count
    Buckets,
    /// output size
    Output,
}
