//! Word-packed bit vector backing each filter partition.
//!
//! A plain (non-atomic) bit vector: the crate's write operations take
//! `&mut self`, so there is no interior mutability here. Bits are packed
//! 64 to a `u64` word; the final word's unused high bits stay zero.

#![allow(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use crate::error::{BloomScaleError, Result};

/// Number of bits per storage word.
const BITS_PER_WORD: usize = 64;

/// Fixed-length packed bit vector.
///
/// # Examples
///
/// ```
/// use bloomscale::core::BitVec;
///
/// let mut bits = BitVec::new(100).unwrap();
/// bits.set(42);
/// assert!(bits.get(42));
/// assert!(!bits.get(43));
///
/// bits.clear_bit(42);
/// assert!(!bits.get(42));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitVec {
    words: Vec<u64>,
    num_bits: usize,
}

impl BitVec {
    /// Create a zero-initialized bit vector of `num_bits` bits.
    ///
    /// # Errors
    ///
    /// Returns [`BloomScaleError::InvalidFilterSize`] if `num_bits == 0`.
    pub fn new(num_bits: usize) -> Result<Self> {
        if num_bits == 0 {
            return Err(BloomScaleError::invalid_filter_size(num_bits));
        }

        let num_words = (num_bits + BITS_PER_WORD - 1) / BITS_PER_WORD;
        Ok(Self {
            words: vec![0; num_words],
            num_bits,
        })
    }

    /// Number of bits in the vector.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.num_bits
    }

    /// `true` if no bit is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Set the bit at `index` to 1.
    ///
    /// # Panics
    ///
    /// Debug-asserts that `index < len()`. Callers derive indices by
    /// reducing a hash modulo `len()`, so out-of-range indices indicate a
    /// bug in the caller.
    #[inline]
    pub fn set(&mut self, index: usize) {
        debug_assert!(index < self.num_bits, "bit index {} out of range", index);
        self.words[index / BITS_PER_WORD] |= 1u64 << (index % BITS_PER_WORD);
    }

    /// Clear the bit at `index` to 0.
    #[inline]
    pub fn clear_bit(&mut self, index: usize) {
        debug_assert!(index < self.num_bits, "bit index {} out of range", index);
        self.words[index / BITS_PER_WORD] &= !(1u64 << (index % BITS_PER_WORD));
    }

    /// Read the bit at `index`.
    #[must_use]
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        debug_assert!(index < self.num_bits, "bit index {} out of range", index);
        self.words[index / BITS_PER_WORD] & (1u64 << (index % BITS_PER_WORD)) != 0
    }

    /// Clear every bit.
    pub fn clear(&mut self) {
        for word in &mut self.words {
            *word = 0;
        }
    }

    /// Count of set bits.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Number of backing `u64` words.
    #[must_use]
    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    /// Approximate heap memory used, in bytes.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.words.len() * std::mem::size_of::<u64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_zeroed() {
        let bits = BitVec::new(128).unwrap();
        assert_eq!(bits.len(), 128);
        assert_eq!(bits.count_ones(), 0);
        assert!(bits.is_empty());
    }

    #[test]
    fn test_new_zero_bits_error() {
        assert!(matches!(
            BitVec::new(0).unwrap_err(),
            BloomScaleError::InvalidFilterSize { size: 0 }
        ));
    }

    #[test]
    fn test_non_word_aligned_length() {
        let bits = BitVec::new(100).unwrap();
        assert_eq!(bits.len(), 100);
        assert_eq!(bits.num_words(), 2);
    }

    #[test]
    fn test_set_get_clear() {
        let mut bits = BitVec::new(100).unwrap();

        bits.set(0);
        bits.set(63);
        bits.set(64);
        bits.set(99);

        assert!(bits.get(0));
        assert!(bits.get(63));
        assert!(bits.get(64));
        assert!(bits.get(99));
        assert!(!bits.get(1));
        assert_eq!(bits.count_ones(), 4);

        bits.clear_bit(63);
        assert!(!bits.get(63));
        assert_eq!(bits.count_ones(), 3);
    }

    #[test]
    fn test_set_idempotent() {
        let mut bits = BitVec::new(64).unwrap();
        bits.set(10);
        bits.set(10);
        assert_eq!(bits.count_ones(), 1);
    }

    #[test]
    fn test_clear_all() {
        let mut bits = BitVec::new(200).unwrap();
        for i in (0..200).step_by(7) {
            bits.set(i);
        }
        assert!(!bits.is_empty());

        bits.clear();
        assert!(bits.is_empty());
        assert_eq!(bits.count_ones(), 0);
    }

    #[test]
    fn test_memory_usage() {
        let bits = BitVec::new(1024).unwrap();
        assert_eq!(bits.memory_usage(), 16 * 8);
    }
}
