//! Fixed-width bit vectors over `u64` words.
//!
//! A [`Bitset`] is sized once at construction and never grows. Bits at or above
//! [`Bitset::capacity`] are never set, so word-level operations (popcount,
//! subset tests) need no tail masking.

use std::fmt;

const WORD_BITS: usize = 64;

#[inline(always)]
const fn word_of(i: usize) -> usize {
    i / WORD_BITS
}

#[inline(always)]
const fn bit(i: usize) -> u64 {
    1u64 << (i % WORD_BITS)
}

/// Returns a mask with bits `0..=i` (within one word) set.
#[inline(always)]
const fn low_mask_through(i: usize) -> u64 {
    let shift = i % WORD_BITS;
    if shift == WORD_BITS - 1 {
        u64::MAX
    } else {
        (1u64 << (shift + 1)) - 1
    }
}

// ============================================================================
// Bitset
// ============================================================================

/// A fixed-capacity set of small integers backed by `u64` words.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Bitset {
    words: Vec<u64>,
    capacity: usize,
}

impl Bitset {
    /// Creates an empty set able to hold indices `0..capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            words: vec![0u64; capacity.div_ceil(WORD_BITS)],
            capacity,
        }
    }

    /// Creates a set from an iterator of indices.
    ///
    /// # Panics
    /// Panics if any index is `>= capacity`.
    pub fn from_indices<I: IntoIterator<Item = usize>>(capacity: usize, indices: I) -> Self {
        let mut set = Self::new(capacity);
        for i in indices {
            set.insert(i);
        }
        set
    }

    /// Number of addressable bits.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if no bit is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Returns whether `i` is a member.
    #[inline(always)]
    pub fn contains(&self, i: usize) -> bool {
        i < self.capacity && (self.words[word_of(i)] & bit(i)) != 0
    }

    /// Inserts `i`, returning `true` if it was not already present.
    ///
    /// # Panics
    /// Panics if `i >= capacity`.
    #[inline]
    pub fn insert(&mut self, i: usize) -> bool {
        assert!(i < self.capacity, "bit {i} out of range for capacity {}", self.capacity);
        let word = &mut self.words[word_of(i)];
        let fresh = (*word & bit(i)) == 0;
        *word |= bit(i);
        fresh
    }

    /// Removes `i`, returning `true` if it was present.
    #[inline]
    pub fn remove(&mut self, i: usize) -> bool {
        if i >= self.capacity {
            return false;
        }
        let word = &mut self.words[word_of(i)];
        let present = (*word & bit(i)) != 0;
        *word &= !bit(i);
        present
    }

    /// Population count.
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Clears every bit with index `<= i`.
    pub fn clear_through(&mut self, i: usize) {
        if self.capacity == 0 {
            return;
        }
        let last = word_of(i);
        let full = last.min(self.words.len());
        for w in &mut self.words[..full] {
            *w = 0;
        }
        if last < self.words.len() {
            self.words[last] &= !low_mask_through(i);
        }
    }

    /// Returns `true` if every member of `self` is also a member of `other`.
    #[inline]
    pub fn is_subset(&self, other: &Bitset) -> bool {
        debug_assert_eq!(self.capacity, other.capacity);
        self.words
            .iter()
            .zip(&other.words)
            .all(|(&a, &b)| a & !b == 0)
    }

    /// Returns the smallest member `>= from`, if any.
    #[inline]
    pub fn next_set_bit(&self, from: usize) -> Option<usize> {
        if from >= self.capacity {
            return None;
        }
        let mut w = word_of(from);
        let mut word = self.words[w] & (u64::MAX << (from % WORD_BITS));
        loop {
            if word != 0 {
                return Some(w * WORD_BITS + word.trailing_zeros() as usize);
            }
            w += 1;
            if w >= self.words.len() {
                return None;
            }
            word = self.words[w];
        }
    }

    /// Iterates members in ascending order.
    #[inline]
    pub fn iter(&self) -> Ones<'_> {
        Ones {
            words: &self.words,
            index: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    /// Collects members into a sorted vector.
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }
}

impl fmt::Debug for Bitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a Bitset {
    type Item = usize;
    type IntoIter = Ones<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the set bits of a [`Bitset`].
#[derive(Clone, Debug)]
pub struct Ones<'a> {
    words: &'a [u64],
    index: usize,
    current: u64,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        while self.current == 0 {
            self.index += 1;
            if self.index >= self.words.len() {
                return None;
            }
            self.current = self.words[self.index];
        }
        let tz = self.current.trailing_zeros() as usize;
        self.current &= self.current - 1;
        Some(self.index * WORD_BITS + tz)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_has_no_members() {
        let set = Bitset::new(130);
        assert!(set.is_empty());
        assert_eq!(set.count_ones(), 0);
        assert_eq!(set.next_set_bit(0), None);
        assert_eq!(set.iter().count(), 0);
    }

    #[test]
    fn zero_capacity_is_usable() {
        let mut set = Bitset::new(0);
        assert!(set.is_empty());
        assert!(!set.contains(0));
        assert!(!set.remove(0));
        set.clear_through(5);
        assert_eq!(set.next_set_bit(0), None);
        assert_eq!(set.to_vec(), Vec::<usize>::new());
    }

    #[test]
    fn insert_and_remove_report_changes() {
        let mut set = Bitset::new(70);
        assert!(set.insert(3));
        assert!(!set.insert(3));
        assert!(set.insert(69));
        assert!(set.contains(69));
        assert!(set.remove(3));
        assert!(!set.remove(3));
        assert_eq!(set.to_vec(), vec![69]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn insert_beyond_capacity_panics() {
        let mut set = Bitset::new(10);
        set.insert(10);
    }

    #[test]
    fn iteration_crosses_word_boundaries() {
        let members = [0, 1, 63, 64, 65, 127, 128, 199];
        let set = Bitset::from_indices(200, members);
        assert_eq!(set.to_vec(), members.to_vec());
        assert_eq!(set.count_ones(), members.len());
    }

    #[test]
    fn next_set_bit_walks_members() {
        let set = Bitset::from_indices(150, [5, 64, 149]);
        assert_eq!(set.next_set_bit(0), Some(5));
        assert_eq!(set.next_set_bit(5), Some(5));
        assert_eq!(set.next_set_bit(6), Some(64));
        assert_eq!(set.next_set_bit(65), Some(149));
        assert_eq!(set.next_set_bit(150), None);
    }

    #[test]
    fn clear_through_keeps_only_higher_indices() {
        let mut set = Bitset::from_indices(140, [0, 10, 63, 64, 100, 139]);
        set.clear_through(63);
        assert_eq!(set.to_vec(), vec![64, 100, 139]);
        set.clear_through(64);
        assert_eq!(set.to_vec(), vec![100, 139]);
        set.clear_through(500);
        assert!(set.is_empty());
    }

    #[test]
    fn subset_test_is_word_parallel() {
        let small = Bitset::from_indices(100, [1, 70]);
        let big = Bitset::from_indices(100, [1, 2, 70, 99]);
        assert!(small.is_subset(&big));
        assert!(!big.is_subset(&small));
        assert!(Bitset::new(100).is_subset(&small));
    }

    #[test]
    fn debug_prints_members() {
        let set = Bitset::from_indices(8, [1, 4]);
        assert_eq!(format!("{set:?}"), "{1, 4}");
    }
}
