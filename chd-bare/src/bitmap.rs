//! Bitmap API.

#![cfg(feature = "build")]

use alloc::{vec, vec::Vec};

/// Bit-compressed [`Vec<bool>`], initially all zeros.
pub struct BitMap {
    /// Underlying container.
    ///
    /// Bit `index` is stored in word `index / 64` at bit `index % 64`, counting from LSB.
    words: Vec<u64>,
}

impl BitMap {
    /// Create a bitmap of a given length, filled with zero bits.
    pub fn new_zeros(len: u32) -> Self {
        Self {
            words: vec![0; len.div_ceil(64) as usize],
        }
    }

    /// Split an index into a word index and a single-bit mask.
    const fn locate(index: u32) -> (usize, u64) {
        ((index / 64) as usize, 1 << (index % 64))
    }

    /// Check the bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn get(&self, index: u32) -> bool {
        let (word, mask) = Self::locate(index);
        self.words[word] & mask != 0
    }

    /// Set the bit at `index` to one, returning its previous value.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set(&mut self, index: u32) -> bool {
        let (word, mask) = Self::locate(index);
        let was_set = self.words[word] & mask != 0;
        self.words[word] |= mask;
        was_set
    }

    /// Set the bit at `index` to zero.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn clear(&mut self, index: u32) {
        let (word, mask) = Self::locate(index);
        self.words[word] &= !mask;
    }

    /// Count the one bits.
    #[cfg(test)]
    pub fn count_ones(&self) -> u64 {
        self.words.iter().map(|word| u64::from(word.count_ones())).sum()
    }
}
