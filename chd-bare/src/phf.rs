//! The perfect hash function value.

use super::{
    displacements::Displacements,
    hash::{bucket_hash, slot_hash, KeyUnits},
    sizing::Mode,
};
#[cfg(feature = "build")]
use super::{
    buckets::Buckets,
    displace::Displacer,
    error::{BuildError, Table},
    settings::Settings,
};

#[cfg(feature = "serde")]
pub use serde_support::ValidationError;

/// A perfect hash function over a fixed set of string keys.
///
/// Maps every key of the training set to a distinct index in `[0, output_size)`. Evaluation costs
/// two hashes of the key and one read from the displacement map. Keys outside the training set
/// are mapped to arbitrary indices in the same range.
///
/// A built function is immutable and can be shared freely between threads.
///
/// ```rust
/// # extern crate chd_bare as chd;
/// let keys = ["alpha", "beta", "gamma"];
/// let phf = chd::Phf::try_from_keys(&keys, &chd::Settings::new())?;
///
/// let mut seen: Vec<u32> = keys.iter().map(|key| phf.evaluate(key)).collect();
/// assert!(seen.iter().all(|&index| index < phf.output_size()));
/// seen.sort_unstable();
/// seen.dedup();
/// assert_eq!(seen.len(), 3);
/// # Ok::<(), chd::BuildError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(into = "RawPhf"))]
#[cfg_attr(all(feature = "alloc", feature = "serde"), derive(serde::Deserialize))]
#[cfg_attr(all(feature = "alloc", feature = "serde"), serde(try_from = "RawPhf"))]
pub struct Phf {
    /// Seed of both hash stages.
    seed: u32,

    /// How both tables are sized and indexed.
    mode: Mode,

    /// Length of the displacement map, `r`.
    bucket_count: u32,

    /// Size of the output range, `m`.
    output_size: u32,

    /// Displacement per bucket, 0 for empty buckets.
    displacements: Displacements,

    /// The largest value in `displacements`.
    max_displacement: u32,
}

#[cfg(feature = "build")]
impl Phf {
    /// Build a perfect hash function for `keys`.
    ///
    /// Construction is deterministic: the same keys (in any order producing the same buckets) and
    /// settings always yield the same function.
    ///
    /// # Errors
    ///
    /// - [`BuildError::UnsupportedConfiguration`] if division mode is requested but the `division`
    ///   feature is disabled.
    /// - [`BuildError::CapacityOverflow`] if a table would not fit in 32 bits.
    /// - [`BuildError::DuplicateKey`] if two keys are equal.
    /// - [`BuildError::DisplacementLimitExceeded`] if some bucket cannot be placed within
    ///   [`Settings::displacement_limit`].
    #[inline]
    pub fn try_from_keys<K: KeyUnits>(keys: &[K], settings: &Settings) -> Result<Self, BuildError> {
        let settings = settings.normalized();
        let mode = settings.mode();
        if mode.is_division() && !cfg!(feature = "division") {
            return Err(BuildError::UnsupportedConfiguration { mode });
        }

        let (bucket_count, output_size) = table_sizes(keys.len(), &settings)?;
        let seed = settings.seed();

        let mut buckets = Buckets::assign(keys, seed, mode.reduction(bucket_count), bucket_count);
        log::debug!(
            "building a {mode} function for {} keys: {bucket_count} buckets, {output_size} slots, \
             largest bucket holds {} keys",
            keys.len(),
            buckets.largest(),
        );
        buckets.check_duplicates(keys)?;

        let mut displacer = Displacer::new(
            keys,
            seed,
            mode.reduction(output_size),
            output_size,
            settings.displacement_limit(),
        );
        let mut displacements = alloc::vec![0; bucket_count as usize];
        let mut max_displacement = 0;
        for group in buckets.groups() {
            let displacement = displacer.place(group)?;
            displacements[group[0].bucket as usize] = displacement;
            max_displacement = max_displacement.max(displacement);
        }
        log::debug!("maximum displacement is {max_displacement}");

        Ok(Self {
            seed,
            mode,
            bucket_count,
            output_size,
            displacements: displacements.into(),
            max_displacement,
        })
    }

    /// Build a perfect hash function for `keys`.
    ///
    /// # Panics
    ///
    /// Panics if [`try_from_keys`](Self::try_from_keys) fails, e.g. on duplicate keys.
    #[inline]
    #[must_use]
    pub fn from_keys<K: KeyUnits>(keys: &[K], settings: &Settings) -> Self {
        match Self::try_from_keys(keys, settings) {
            Ok(phf) => phf,
            Err(error) => panic!("failed to build a perfect hash function: {error}"),
        }
    }
}

/// Bucket count and output size for `key_count` keys.
///
/// The bucket count truncates `n / items_per_bucket` before sizing up in both modes. Some CHD
/// builders round that quotient up for prime-modulo tables, so their tables differ from these.
#[cfg(feature = "build")]
#[allow(
    clippy::arithmetic_side_effects,
    reason = "alpha and items_per_bucket are normalized to be non-zero"
)]
fn table_sizes(key_count: usize, settings: &Settings) -> Result<(u32, u32), BuildError> {
    let mode = settings.mode();
    let n = u32::try_from(key_count.max(1)).map_err(|_| BuildError::CapacityOverflow {
        table: Table::Keys,
        requested: key_count as u64,
    })?;

    let buckets_wanted = n / settings.items_per_bucket().min(n);
    let bucket_count = mode
        .size_up(buckets_wanted)
        .ok_or(BuildError::CapacityOverflow {
            table: Table::Buckets,
            requested: u64::from(buckets_wanted),
        })?;

    let output_wanted = u64::from(n) * 100 / u64::from(settings.alpha());
    let output_size = u32::try_from(output_wanted)
        .ok()
        .and_then(|wanted| mode.size_up(wanted))
        .ok_or(BuildError::CapacityOverflow {
            table: Table::Output,
            requested: output_wanted,
        })?;

    Ok((bucket_count, output_size))
}

impl Phf {
    /// Initialize from saved data.
    ///
    /// Meant for codegen, not for public use.
    #[doc(hidden)]
    #[inline]
    #[must_use]
    pub const fn __from_raw_parts(
        seed: u32,
        division_mode: bool,
        bucket_count: u32,
        output_size: u32,
        displacements: Displacements,
        max_displacement: u32,
    ) -> Self {
        Self {
            seed,
            mode: Mode::from_division(division_mode),
            bucket_count,
            output_size,
            displacements,
            max_displacement,
        }
    }

    /// Map a key to its index.
    ///
    /// Distinct keys of the training set get distinct indices. The result is always less than
    /// [`output_size`](Self::output_size), even for keys outside the training set.
    #[inline]
    pub fn evaluate<K: ?Sized + KeyUnits>(&self, key: &K) -> u32 {
        let bucket = self
            .mode
            .reduction(self.bucket_count)
            .reduce(bucket_hash(key, self.seed));
        let displacement = self.displacements[bucket as usize];
        self.mode
            .reduction(self.output_size)
            .reduce(slot_hash(displacement, key, self.seed))
    }

    /// Seed of both hash stages.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> u32 {
        self.seed
    }

    /// Number of buckets, i.e. the length of the displacement map.
    #[inline]
    #[must_use]
    pub const fn bucket_count(&self) -> u32 {
        self.bucket_count
    }

    /// The exclusive upper bound of [`evaluate`](Self::evaluate).
    #[inline]
    #[must_use]
    pub const fn output_size(&self) -> u32 {
        self.output_size
    }

    /// Displacement per bucket. Empty buckets hold 0.
    #[inline]
    #[must_use]
    pub fn displacement_map(&self) -> &[u32] {
        &self.displacements
    }

    /// The largest displacement in the map. At least 1 unless the function was built from no keys.
    #[inline]
    #[must_use]
    pub const fn max_displacement(&self) -> u32 {
        self.max_displacement
    }

    /// Whether tables are prime-sized and indexed with a modulo.
    #[inline]
    #[must_use]
    pub const fn division_mode(&self) -> bool {
        self.mode.is_division()
    }

    /// How tables are sized and indexed.
    #[inline]
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }
}

#[cfg(feature = "codegen")]
impl super::codegen::Codegen for Phf {
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        let phf = gen.path("chd::Phf");
        let seed = gen.piece(&self.seed);
        let division_mode = gen.piece(&self.mode.is_division());
        let bucket_count = gen.piece(&self.bucket_count);
        let output_size = gen.piece(&self.output_size);
        let displacements = gen.piece(&self.displacements);
        let max_displacement = gen.piece(&self.max_displacement);
        quote::quote!(#phf::__from_raw_parts(
            #seed,
            #division_mode,
            #bucket_count,
            #output_size,
            #displacements,
            #max_displacement,
        ))
    }
}

/// The persisted form of a [`Phf`].
///
/// This needs to be a separate type so that `serde` can convert from this type to [`Phf`] with
/// [`TryFrom`] during deserialization, so that we can validate the tables.
#[cfg(feature = "serde")]
#[derive(Clone, Debug, serde::Serialize)]
#[cfg_attr(feature = "alloc", derive(serde::Deserialize))]
struct RawPhf {
    /// See [`Phf::seed`].
    seed: u32,
    /// See [`Phf::division_mode`].
    division_mode: bool,
    /// See [`Phf::bucket_count`].
    bucket_count: u32,
    /// See [`Phf::output_size`].
    output_size: u32,
    /// See [`Phf::displacement_map`].
    displacements: Displacements,
    /// See [`Phf::max_displacement`].
    max_displacement: u32,
}

/// Scope for `serde`-related code.
#[cfg(feature = "serde")]
mod serde_support {
    use super::{Mode, Phf, RawPhf};
    use displaydoc::Display;
    use thiserror::Error;

    /// Why deserialized data does not describe a valid [`Phf`].
    #[derive(Clone, Copy, Debug, Display, Error, PartialEq, Eq)]
    #[non_exhaustive]
    pub enum ValidationError {
        /// a table has zero size
        ZeroSize,

        /// table size {0} is not a power of two
        NotPowerOfTwo(u32),

        /// table size {0} is not prime
        NotPrime(u32),

        /// {actual} displacements stored for {expected} buckets
        WrongDisplacementCount {
            /// The bucket count.
            expected: u32,
            /// The stored map length.
            actual: usize,
        },

        /// stored maximum displacement {stored} differs from the map maximum {actual}
        WrongMaxDisplacement {
            /// The stored `max_displacement` field.
            stored: u32,
            /// The largest value in the map.
            actual: u32,
        },

        /// prime-modulo mode is not supported by this build
        UnsupportedMode,
    }

    impl From<Phf> for RawPhf {
        #[inline]
        fn from(phf: Phf) -> Self {
            Self {
                seed: phf.seed,
                division_mode: phf.mode.is_division(),
                bucket_count: phf.bucket_count,
                output_size: phf.output_size,
                displacements: phf.displacements,
                max_displacement: phf.max_displacement,
            }
        }
    }

    impl TryFrom<RawPhf> for Phf {
        type Error = ValidationError;

        #[inline]
        fn try_from(raw: RawPhf) -> Result<Self, ValidationError> {
            let mode = Mode::from_division(raw.division_mode);
            if mode.is_division() && !cfg!(feature = "division") {
                return Err(ValidationError::UnsupportedMode);
            }

            for size in [raw.bucket_count, raw.output_size] {
                if size == 0 {
                    return Err(ValidationError::ZeroSize);
                }
                if !mode.is_valid_size(size) {
                    return Err(match mode {
                        Mode::Bitmask => ValidationError::NotPowerOfTwo(size),
                        Mode::Modulo => ValidationError::NotPrime(size),
                    });
                }
            }

            if raw.displacements.len() != raw.bucket_count as usize {
                return Err(ValidationError::WrongDisplacementCount {
                    expected: raw.bucket_count,
                    actual: raw.displacements.len(),
                });
            }

            let actual = raw.displacements.max();
            if actual != raw.max_displacement {
                return Err(ValidationError::WrongMaxDisplacement {
                    stored: raw.max_displacement,
                    actual,
                });
            }

            Ok(Self {
                seed: raw.seed,
                mode,
                bucket_count: raw.bucket_count,
                output_size: raw.output_size,
                displacements: raw.displacements,
                max_displacement: raw.max_displacement,
            })
        }
    }
}
