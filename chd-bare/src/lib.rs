//! This crate provides types for [`chd`](https://docs.rs/chd). Use that crate instead.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub(crate) mod bitmap;
pub(crate) mod buckets;
pub mod codegen;
pub(crate) mod displace;
mod displacements;
mod error;
pub mod hash;
mod phf;
mod settings;
pub mod sizing;

#[cfg(feature = "build")]
pub use error::{BuildError, Table};
pub use hash::KeyUnits;
#[cfg(feature = "serde")]
pub use phf::ValidationError;
pub use phf::Phf;
pub use settings::Settings;
pub use sizing::Mode;

/// Public (but hidden) reexports for codegen to access.
#[doc(hidden)]
pub mod low_level {
    pub use super::displacements::Displacements;
}

#[cfg(test)]
mod tests;
