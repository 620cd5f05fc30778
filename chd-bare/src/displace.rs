//! Displacement search.

#![cfg(feature = "build")]
#![allow(clippy::arithmetic_side_effects, reason = "displacement stays below the limit")]

use super::{
    bitmap::BitMap,
    buckets::Record,
    error::BuildError,
    hash::{slot_hash, KeyUnits},
    sizing::Reduction,
};
use alloc::vec::Vec;

/// Searches longer than this are traced.
const LONG_SEARCH: u32 = 1024;

/// Places buckets into the output range one at a time.
pub struct Displacer<'keys, K> {
    /// The input keys, indexed by [`Record::index`].
    keys: &'keys [K],

    /// Seed of the slot hash.
    seed: u32,

    /// Reduction of the slot hash into the output range.
    slots: Reduction,

    /// Slots claimed by committed buckets. Bits are only ever set here.
    committed: BitMap,

    /// Slots claimed by the current attempt. All zeros between attempts.
    scratch: BitMap,

    /// Slots set in `scratch` during the current attempt, so they can be reset cheaply.
    claimed: Vec<u32>,

    /// The largest displacement to try.
    limit: u32,
}

impl<'keys, K: KeyUnits> Displacer<'keys, K> {
    /// Start with an empty output range of `output_size` slots.
    pub fn new(
        keys: &'keys [K],
        seed: u32,
        slots: Reduction,
        output_size: u32,
        limit: u32,
    ) -> Self {
        Self {
            keys,
            seed,
            slots,
            committed: BitMap::new_zeros(output_size),
            scratch: BitMap::new_zeros(output_size),
            claimed: Vec::new(),
            limit,
        }
    }

    /// Find the smallest displacement that moves every key of `group` into a free slot, and
    /// commit those slots.
    ///
    /// `group` must be non-empty and hold all keys of a single bucket.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DisplacementLimitExceeded`] if no displacement in `1..=limit` works.
    /// Nothing is committed in this case.
    pub fn place(&mut self, group: &[Record]) -> Result<u32, BuildError> {
        let bucket = group[0].bucket;
        let mut displacement = 1;
        while !self.attempt(group, displacement) {
            if displacement >= self.limit {
                return Err(BuildError::DisplacementLimitExceeded {
                    bucket,
                    limit: self.limit,
                });
            }
            displacement += 1;
        }

        for &slot in &self.claimed {
            self.scratch.clear(slot);
            let was_set = self.committed.set(slot);
            debug_assert!(!was_set, "slot {slot} committed twice");
        }

        if displacement > LONG_SEARCH {
            log::trace!(
                "bucket {bucket} ({} keys) needed displacement {displacement}",
                group.len(),
            );
        }
        Ok(displacement)
    }

    /// Try one displacement. On success, the claimed slots are left in `scratch` and `claimed`.
    fn attempt(&mut self, group: &[Record], displacement: u32) -> bool {
        self.claimed.clear();
        for record in group {
            let slot = self.slots.reduce(slot_hash(
                displacement,
                &self.keys[record.index],
                self.seed,
            ));
            if self.committed.get(slot) || self.scratch.get(slot) {
                for &claimed in &self.claimed {
                    self.scratch.clear(claimed);
                }
                return false;
            }
            self.scratch.set(slot);
            self.claimed.push(slot);
        }
        true
    }

    /// Number of committed slots.
    #[cfg(test)]
    pub fn occupied(&self) -> u64 {
        self.committed.count_ones()
    }

    /// Whether a slot is committed.
    #[cfg(test)]
    pub fn is_occupied(&self, slot: u32) -> bool {
        self.committed.get(slot)
    }
}
