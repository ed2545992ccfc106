//! # BitSet - Occupancy Bitboards for the Packed Board
//!
//! ## Overview
//!
//! A `BitSet` is a single `u64` where each bit is one square of the board. The
//! packed search board keeps one per color so occupancy tests during move
//! generation are a mask-and-compare instead of a table walk.
//!
//! ## Technical Details
//!
//! The board is mapped to bits 0-63 where:
//! - Bit 0 = a1
//! - Bit 7 = h1
//! - Bit 56 = a8
//! - Bit 63 = h8
//!
//! Common operations:
//! - **Insert**: `bitboard |= (1 << square)`
//! - **Remove**: `bitboard &= !(1 << square)`
//! - **Contains**: `(bitboard & (1 << square)) != 0`
//! - **Count**: `bitboard.count_ones()` (hardware POPCNT)
//!
//! ## Further Reading
//!
//! - **Chess Programming Wiki - Bitboards**: https://www.chessprogramming.org/Bitboards

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BitSet(pub u64);

impl BitSet {
    pub fn new() -> Self {
        BitSet(0)
    }

    pub fn insert<T>(&mut self, index: T)
    where
        u64: std::ops::Shl<T, Output = u64>,
    {
        self.0 |= 1 << index;
    }

    pub fn remove<T>(&mut self, index: T)
    where
        u64: std::ops::Shl<T, Output = u64>,
    {
        self.0 &= !(1 << index);
    }

    pub fn contains<T>(&self, index: T) -> bool
    where
        u64: std::ops::Shl<T, Output = u64>,
    {
        (self.0 & (1 << index)) != 0
    }

    #[inline]
    pub fn count_ones(&self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn union(self, other: BitSet) -> BitSet {
        BitSet(self.0 | other.0)
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Iterate set squares from a1 upward.
    pub fn squares(self) -> impl Iterator<Item = i8> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let square = bits.trailing_zeros() as i8;
            bits &= bits - 1;
            Some(square)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_contains_remove() {
        let mut set = BitSet::new();
        set.insert(0u32);
        set.insert(63u32);

        assert!(set.contains(0u32), "a1 should be set");
        assert!(set.contains(63u32), "h8 should be set");
        assert!(!set.contains(28u32), "e4 should be clear");
        assert_eq!(set.count_ones(), 2);

        set.remove(0u32);
        assert!(!set.contains(0u32), "a1 should be cleared");
        assert_eq!(set.count_ones(), 1);
    }

    #[test]
    fn test_squares_iterates_in_order() {
        let mut set = BitSet::new();
        for square in [12u32, 3, 40] {
            set.insert(square);
        }

        let squares: Vec<i8> = set.squares().collect();
        assert_eq!(squares, vec![3, 12, 40]);
    }

    #[test]
    fn test_union_and_clear() {
        let mut white = BitSet::new();
        let mut black = BitSet::new();
        white.insert(8u32);
        black.insert(48u32);

        let mut all = white.union(black);
        assert_eq!(all.count_ones(), 2);

        all.clear();
        assert!(all.is_empty());
    }
}
