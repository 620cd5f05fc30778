//! Construction parameters.

use super::sizing::Mode;

/// Parameters controlling how a [`Phf`](crate::Phf) is built.
///
/// The defaults (4 keys per bucket, 80% load factor, seed 31337, power-of-two sizing) are a good
/// fit for most key sets.
///
/// ```rust
/// # extern crate chd_bare as chd;
/// let settings = chd::Settings::new().with_alpha(90).with_seed(7);
/// assert_eq!(settings.alpha(), 90);
/// assert_eq!(settings.items_per_bucket(), 4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    /// Target average bucket occupancy.
    items_per_bucket: u32,

    /// Target load factor of the output range, in percent.
    alpha: u32,

    /// Seed of both hash stages.
    seed: u32,

    /// Prime sizing with modulo reduction instead of power-of-two sizing with a bitmask.
    division_mode: bool,

    /// The largest displacement tried for a single bucket before giving up.
    displacement_limit: u32,
}

impl Settings {
    /// Default settings.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items_per_bucket: 4,
            alpha: 80,
            seed: 31337,
            division_mode: false,
            displacement_limit: u32::MAX,
        }
    }

    /// Set the target average number of keys per bucket.
    ///
    /// Lower values make the displacement search cheaper at the cost of a larger displacement map.
    /// `0` is treated as `1`.
    #[inline]
    #[must_use]
    pub const fn with_items_per_bucket(mut self, items_per_bucket: u32) -> Self {
        self.items_per_bucket = items_per_bucket;
        self
    }

    /// Set the target load factor of the output range, in percent.
    ///
    /// Lower values leave more free slots, speeding up construction. Values are clamped to
    /// `1..=100`.
    #[inline]
    #[must_use]
    pub const fn with_alpha(mut self, alpha: u32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the seed of both hash stages.
    #[inline]
    #[must_use]
    pub const fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Choose prime sizing with modulo reduction (`true`) or power-of-two sizing with bitmask
    /// reduction (`false`).
    #[inline]
    #[must_use]
    pub const fn with_division_mode(mut self, division_mode: bool) -> Self {
        self.division_mode = division_mode;
        self
    }

    /// Bound the displacement search.
    ///
    /// Each bucket tries displacements `1..=limit`. If none fits, construction fails. `0` is
    /// treated as `1`.
    #[inline]
    #[must_use]
    pub const fn with_displacement_limit(mut self, limit: u32) -> Self {
        self.displacement_limit = limit;
        self
    }

    /// Target average number of keys per bucket.
    #[inline]
    #[must_use]
    pub const fn items_per_bucket(&self) -> u32 {
        self.items_per_bucket
    }

    /// Target load factor, in percent.
    #[inline]
    #[must_use]
    pub const fn alpha(&self) -> u32 {
        self.alpha
    }

    /// Seed of both hash stages.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> u32 {
        self.seed
    }

    /// Whether prime sizing with modulo reduction is requested.
    #[inline]
    #[must_use]
    pub const fn division_mode(&self) -> bool {
        self.division_mode
    }

    /// The largest displacement tried per bucket.
    #[inline]
    #[must_use]
    pub const fn displacement_limit(&self) -> u32 {
        self.displacement_limit
    }

    /// The sizing and reduction mode these settings select.
    #[inline]
    #[must_use]
    pub const fn mode(&self) -> Mode {
        Mode::from_division(self.division_mode)
    }

    /// Clamp out-of-range values into their valid ranges.
    ///
    /// Logs a warning for every value that had to change.
    #[cfg(feature = "build")]
    #[must_use]
    pub(crate) fn normalized(self) -> Self {
        let items_per_bucket = self.items_per_bucket.max(1);
        let alpha = self.alpha.clamp(1, 100);
        let displacement_limit = self.displacement_limit.max(1);
        if items_per_bucket != self.items_per_bucket {
            log::warn!(
                "items_per_bucket = {} is out of range, using {items_per_bucket}",
                self.items_per_bucket,
            );
        }
        if alpha != self.alpha {
            log::warn!("alpha = {} is out of range, using {alpha}", self.alpha);
        }
        if displacement_limit != self.displacement_limit {
            log::warn!("displacement_limit = 0 is out of range, using 1");
        }
        Self {
            items_per_bucket,
            alpha,
            displacement_limit,
            ..self
        }
    }
}

impl Default for Settings {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
