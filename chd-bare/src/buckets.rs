//! Keys, split into buckets.

#![cfg(feature = "build")]
#![allow(clippy::arithmetic_side_effects, reason = "counts are bounded by the key count")]

use super::{
    error::BuildError,
    hash::{bucket_hash, KeyUnits},
    sizing::Reduction,
};
use alloc::{vec, vec::Vec};

/// A key paired with its bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Record {
    /// Position of the key in the input slice.
    pub index: usize,

    /// `g(key)`, reduced into the bucket range.
    pub bucket: u32,
}

/// Keys, grouped by bucket.
pub struct Buckets {
    /// Records, ordered such that all buckets are consecutive, largest buckets first and ties
    /// broken by descending bucket ID.
    records: Vec<Record>,

    /// Number of keys per bucket, indexed by bucket ID.
    sizes: Vec<u32>,
}

impl Buckets {
    /// Assign every key to a bucket and order the keys for the displacement search.
    ///
    /// Large buckets are the hardest to place, so they go first, while the output is still
    /// sparse.
    ///
    /// # Panics
    ///
    /// Panics if `keys` has more than `u32::MAX` elements or `reduction` maps outside
    /// `[0, bucket_count)`.
    pub fn assign<K: KeyUnits>(
        keys: &[K],
        seed: u32,
        reduction: Reduction,
        bucket_count: u32,
    ) -> Self {
        let mut sizes = vec![0_u32; bucket_count as usize];
        let mut records: Vec<Record> = keys
            .iter()
            .enumerate()
            .map(|(index, key)| {
                let bucket = reduction.reduce(bucket_hash(key, seed));
                sizes[bucket as usize] += 1;
                Record { index, bucket }
            })
            .collect();

        // Inverted so that an ascending sort yields (size, bucket) in descending order
        radsort::sort_by_key(&mut records, |record| {
            let size = sizes[record.bucket as usize];
            !((u64::from(size) << 32) | u64::from(record.bucket))
        });

        Self { records, sizes }
    }

    /// Reject inputs with repeated keys.
    ///
    /// Equal keys always share a bucket and collide under every displacement, so they would make
    /// the search spin until its limit. Each bucket is sorted by key and scanned for neighbours.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DuplicateKey`] with the input positions of the first repeated pair
    /// found.
    pub fn check_duplicates<K: KeyUnits>(&mut self, keys: &[K]) -> Result<(), BuildError> {
        for group in self
            .records
            .chunk_by_mut(|a, b| a.bucket == b.bucket)
            .filter(|group| group.len() > 1)
        {
            group.sort_unstable_by(|a, b| keys[a.index].units().cmp(keys[b.index].units()));
            if let Some(pair) = group
                .windows(2)
                .find(|pair| keys[pair[0].index].units().eq(keys[pair[1].index].units()))
            {
                return Err(BuildError::DuplicateKey {
                    first: pair[0].index.min(pair[1].index),
                    second: pair[0].index.max(pair[1].index),
                });
            }
        }
        Ok(())
    }

    /// Iterate over buckets in search order.
    ///
    /// Every yielded group is non-empty and holds all keys of one bucket. Empty buckets are
    /// skipped.
    pub fn groups(&self) -> impl Iterator<Item = &[Record]> {
        self.records.chunk_by(|a, b| a.bucket == b.bucket)
    }

    /// Number of keys in the largest bucket.
    pub fn largest(&self) -> u32 {
        self.sizes.iter().copied().max().unwrap_or(0)
    }

    /// Number of keys in a bucket.
    #[cfg(test)]
    pub fn size(&self, bucket: u32) -> u32 {
        self.sizes[bucket as usize]
    }
}
