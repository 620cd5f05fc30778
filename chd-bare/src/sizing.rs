//! Table sizing and range reduction.
//!
//! Both tables of a [`Phf`](crate::Phf) (the displacement map and the output range) are sized and
//! indexed under one [`Mode`], chosen once per build:
//!
//! - [`Mode::Bitmask`]: sizes are powers of two, hashes are reduced with `hash & (n - 1)`.
//! - [`Mode::Modulo`]: sizes are primes, hashes are reduced with `hash % n`.

/// The largest prime representable in 32 bits.
pub const LARGEST_U32_PRIME: u32 = 4_294_967_291;

/// How table sizes are chosen and hashes are reduced into them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "build", derive(displaydoc::Display))]
#[non_exhaustive]
pub enum Mode {
    /// power-of-two
    Bitmask,
    /// prime-modulo
    Modulo,
}

impl Mode {
    /// Pick the mode from the "division" flag of the settings.
    #[inline]
    #[must_use]
    pub const fn from_division(division: bool) -> Self {
        if division {
            Self::Modulo
        } else {
            Self::Bitmask
        }
    }

    /// Whether this mode reduces with a division.
    #[inline]
    #[must_use]
    pub const fn is_division(self) -> bool {
        matches!(self, Self::Modulo)
    }

    /// Round a requested table size up to a size valid under this mode.
    ///
    /// Returns `None` if the result does not fit in `u32`.
    #[cfg(feature = "division")]
    #[inline]
    #[must_use]
    pub const fn size_up(self, value: u32) -> Option<u32> {
        match self {
            Self::Bitmask => value.checked_next_power_of_two(),
            Self::Modulo => next_prime(value),
        }
    }

    /// Round a requested table size up to a size valid under this mode.
    ///
    /// Returns `None` if the result does not fit in `u32` or if the mode is compiled out.
    #[cfg(not(feature = "division"))]
    #[inline]
    #[must_use]
    pub const fn size_up(self, value: u32) -> Option<u32> {
        match self {
            Self::Bitmask => value.checked_next_power_of_two(),
            Self::Modulo => None,
        }
    }

    /// Check whether `size` is a table size this mode could have produced.
    ///
    /// Always `false` for [`Mode::Modulo`] if the `division` feature is disabled.
    #[inline]
    #[must_use]
    pub const fn is_valid_size(self, size: u32) -> bool {
        match self {
            Self::Bitmask => size.is_power_of_two(),
            #[cfg(feature = "division")]
            Self::Modulo => is_prime(size),
            #[cfg(not(feature = "division"))]
            Self::Modulo => false,
        }
    }

    /// Reduction into `[0, size)` under this mode.
    ///
    /// `size` is expected to satisfy [`is_valid_size`](Self::is_valid_size).
    #[inline(always)]
    #[must_use]
    pub const fn reduction(self, size: u32) -> Reduction {
        match self {
            Self::Bitmask => Reduction::Bitmask {
                mask: size.wrapping_sub(1),
            },
            Self::Modulo => Reduction::Modulo { modulus: size },
        }
    }
}

/// A hash-to-index reduction into a fixed range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Reduction {
    /// `hash & mask`, where `mask + 1` is a power of two.
    Bitmask {
        /// The range size minus one.
        mask: u32,
    },
    /// `hash % modulus`, where `modulus` is prime.
    Modulo {
        /// The range size.
        modulus: u32,
    },
}

impl Reduction {
    /// Reduce a hash into the range.
    #[inline(always)]
    #[must_use]
    #[allow(
        clippy::arithmetic_side_effects,
        reason = "the modulus is a prime, never zero"
    )]
    pub const fn reduce(self, hash: u32) -> u32 {
        match self {
            Self::Bitmask { mask } => hash & mask,
            Self::Modulo { modulus } => hash % modulus,
        }
    }
}

/// Smallest prime `>= value`.
///
/// Returns `None` if `value` exceeds [`LARGEST_U32_PRIME`].
#[cfg(feature = "division")]
#[inline]
#[must_use]
#[allow(clippy::arithmetic_side_effects, reason = "bounded by LARGEST_U32_PRIME")]
pub const fn next_prime(mut value: u32) -> Option<u32> {
    if value > LARGEST_U32_PRIME {
        return None;
    }
    while !is_prime(value) {
        value += 1;
    }
    Some(value)
}

/// Deterministic primality test for 32-bit values.
///
/// Trial division by 2, 3, 5, and 7, followed by Miller-Rabin. Witness 2 alone is deterministic
/// below 2047; witnesses 2, 7, and 61 are deterministic for all 32-bit values.
#[cfg(feature = "division")]
#[inline]
#[must_use]
#[allow(clippy::arithmetic_side_effects, reason = "value >= 8 past the first check")]
pub const fn is_prime(value: u32) -> bool {
    if value < 8 {
        return matches!(value, 2 | 3 | 5 | 7);
    }
    if value.is_multiple_of(2)
        || value.is_multiple_of(3)
        || value.is_multiple_of(5)
        || value.is_multiple_of(7)
    {
        return false;
    }

    let n = value as u64;
    // n - 1 = 2^t * s with s odd
    let t = (n - 1).trailing_zeros();
    let s = (n - 1) >> t;

    if n < 2047 {
        return is_strong_probable_prime(n, 2, s, t);
    }
    is_strong_probable_prime(n, 2, s, t)
        && is_strong_probable_prime(n, 7, s, t)
        && is_strong_probable_prime(n, 61, s, t)
}

/// One Miller-Rabin round: is `n` a strong probable prime to base `witness`?
///
/// `n - 1 = 2^t * s` with `s` odd, `n < 2^32`, so all products fit in `u64`.
#[cfg(feature = "division")]
#[allow(clippy::arithmetic_side_effects, reason = "operands are below 2^32")]
const fn is_strong_probable_prime(n: u64, witness: u64, s: u64, t: u32) -> bool {
    let mut v = pow_mod(witness, s, n);
    if v == 1 || v == n - 1 {
        return true;
    }
    let mut i = 1;
    while i < t {
        v = v * v % n;
        if v == n - 1 {
            return true;
        }
        i += 1;
    }
    false
}

/// `base^exponent mod modulus`, for `modulus < 2^32`.
#[cfg(feature = "division")]
#[allow(clippy::arithmetic_side_effects, reason = "operands are below 2^32")]
const fn pow_mod(mut base: u64, mut exponent: u64, modulus: u64) -> u64 {
    let mut result = 1;
    base %= modulus;
    while exponent > 0 {
        if exponent % 2 == 1 {
            result = result * base % modulus;
        }
        base = base * base % modulus;
        exponent /= 2;
    }
    result
}
