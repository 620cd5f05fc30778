//! The mixing hash.
//!
//! Both stages of a [`Phf`](crate::Phf) use the same seeded 32-bit hash, a MurmurHash3-style
//! construction over 16-bit code units:
//!
//! - `g(key)` folds the key alone and picks the bucket,
//! - `f(displacement, key)` folds the displacement first, then the key, and picks the slot.
//!
//! The output must stay bit-exact across versions and platforms: persisted and code-generated
//! displacement maps are only valid for the exact arithmetic below.

/// Multiplier applied to a block before rotation.
const C1: u32 = 0xcc9e_2d51;

/// Multiplier applied to a block after rotation.
const C2: u32 = 0x1b87_3593;

/// Additive constant of the running-state update.
const N: u32 = 0xe654_6b64;

/// A key that can be fed to the mixing hash.
///
/// Keys are hashed as sequences of 16-bit code units. For [`str`], these are the UTF-16 code
/// units, so a function built from `String`s can be evaluated on `&str`s and on raw `[u16]`
/// buffers holding the same text.
///
/// Implementations for borrowed and owned forms of the same text must produce identical unit
/// sequences.
pub trait KeyUnits {
    /// Iterate over the code units of the key.
    fn units(&self) -> impl Iterator<Item = u16> + '_;
}

impl KeyUnits for str {
    #[inline]
    fn units(&self) -> impl Iterator<Item = u16> + '_ {
        self.encode_utf16()
    }
}

impl KeyUnits for [u16] {
    #[inline]
    fn units(&self) -> impl Iterator<Item = u16> + '_ {
        self.iter().copied()
    }
}

#[cfg(feature = "alloc")]
impl KeyUnits for alloc::string::String {
    #[inline]
    fn units(&self) -> impl Iterator<Item = u16> + '_ {
        self.encode_utf16()
    }
}

#[cfg(feature = "alloc")]
impl KeyUnits for alloc::vec::Vec<u16> {
    #[inline]
    fn units(&self) -> impl Iterator<Item = u16> + '_ {
        self.iter().copied()
    }
}

impl<T: ?Sized + KeyUnits> KeyUnits for &T {
    #[inline]
    fn units(&self) -> impl Iterator<Item = u16> + '_ {
        (**self).units()
    }
}

/// Fold one 32-bit block into the running state.
#[inline(always)]
#[must_use]
pub const fn round(block: u32, state: u32) -> u32 {
    let block = block.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);
    (state ^ block)
        .rotate_left(13)
        .wrapping_mul(5)
        .wrapping_add(N)
}

/// Fold a sequence of code units into the running state.
///
/// Units are paired into blocks high-first. An unpaired trailing unit lands in the high half of
/// a block whose low half is zero.
#[inline]
#[must_use]
pub fn round_units(units: impl Iterator<Item = u16>, mut state: u32) -> u32 {
    let mut pending: Option<u16> = None;
    for unit in units {
        match pending.take() {
            Some(high) => state = round((u32::from(high) << 16) | u32::from(unit), state),
            None => pending = Some(unit),
        }
    }
    if let Some(high) = pending {
        state = round(u32::from(high) << 16, state);
    }
    state
}

/// Final avalanche.
#[inline(always)]
#[must_use]
pub const fn finalize(mut state: u32) -> u32 {
    state ^= state >> 16;
    state = state.wrapping_mul(0x85eb_ca6b);
    state ^= state >> 13;
    state = state.wrapping_mul(0xc2b2_ae35);
    state ^= state >> 16;
    state
}

/// `g(key, seed)`: the bucket-assignment hash.
#[inline]
#[must_use]
pub fn bucket_hash<K: ?Sized + KeyUnits>(key: &K, seed: u32) -> u32 {
    finalize(round_units(key.units(), seed))
}

/// `f(displacement, key, seed)`: the slot-assignment hash.
#[inline]
#[must_use]
pub fn slot_hash<K: ?Sized + KeyUnits>(displacement: u32, key: &K, seed: u32) -> u32 {
    finalize(round_units(key.units(), round(displacement, seed)))
}
