//! Near-minimal perfect hash functions for static sets of strings.
//!
//! This crate builds [perfect hash functions][phf] with the CHD ("compress, hash, displace")
//! algorithm. A [`Phf`] maps every key of a fixed set to a distinct index in `[0, m)`, where `m`
//! is close to the number of keys. Lookups cost two hashes of the key and one array read: no keys
//! are stored, and nothing is probed.
//!
//! [phf]: https://en.wikipedia.org/wiki/Perfect_hash_function
//!
//!
//! # Usage
//!
//! A [`Phf`] can be obtained in several ways:
//!
//! 1. Built in runtime with [`Phf::try_from_keys`], configured by [`Settings`].
//! 2. Built in compile time with [`phf!`]. Zero-cost in runtime.
//! 3. Built in `build.rs`, translated to code with [`codegen`] and then `include!`d. Zero-cost in
//!    runtime and supports programmatic generation.
//! 4. Built once, saved with `serde`, and loaded back. Loading validates the tables.
//!
//! ```rust
//! let keys = ["alpha", "beta", "gamma", "delta"];
//! let phf = chd::Phf::try_from_keys(&keys, &chd::Settings::new())?;
//!
//! // A dense table indexed by the function
//! let mut table = vec![None; phf.output_size() as usize];
//! for (i, key) in keys.iter().enumerate() {
//!     table[phf.evaluate(key) as usize] = Some(i);
//! }
//! assert_eq!(table[phf.evaluate("gamma") as usize], Some(2));
//! # Ok::<(), chd::BuildError>(())
//! ```
//!
//! Keys outside the original set still map into `[0, m)`, but to arbitrary indices. Store the
//! keys next to the table if lookups of unknown keys must be detected.
//!
//!
//! # Features
//!
//! - `std` (default): implies `alloc`.
//! - `build` (default): runtime construction. Needs `alloc`.
//! - `division` (default): prime-sized tables with modulo reduction, selected with
//!   [`Settings::with_division_mode`].
//! - `codegen`: the [`codegen`] module.
//! - `serde`: `Serialize` and `Deserialize` for [`Phf`] and [`Settings`].

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

#[cfg(feature = "std")]
extern crate std;

pub mod macros;

#[cfg(feature = "codegen")]
pub use chd_bare::codegen;
pub use chd_bare::{hash, sizing, KeyUnits, Mode, Phf, Settings};
#[cfg(feature = "build")]
pub use chd_bare::{BuildError, Table};
#[cfg(feature = "serde")]
pub use chd_bare::ValidationError;

#[doc(hidden)]
pub use chd_bare::low_level;
