//! Board utilities and helper functions
//!
//! Provides fundamental square operations used throughout the search layer:
//! - Square validation and indexing
//! - Edge-aware stepping along direction tables
//! - Color helpers

/// Convert file and rank to a linear square (0-63)
#[inline]
pub fn square_to_pos(file: i8, rank: i8) -> i8 {
    rank * 8 + file
}

/// Convert a square to `(file, rank)`
#[inline]
pub fn pos_to_square(pos: i8) -> (i8, i8) {
    (pos % 8, pos / 8)
}

/// Check if position is within board bounds
#[inline]
pub fn is_valid_pos(pos: i32) -> bool {
    (0..64).contains(&pos)
}

/// Step once from `from` along a `(index_delta, file_delta)` direction.
///
/// Returns `None` when the step leaves the board or wraps around an edge
/// (the file moved by something other than `file_delta`).
#[inline]
pub fn step(from: i8, dir: (i8, i8)) -> Option<i8> {
    let to = from as i32 + dir.0 as i32;
    if !is_valid_pos(to) {
        return None;
    }
    let to = to as i8;
    if (to % 8) - (from % 8) != dir.1 {
        return None;
    }
    Some(to)
}

/// Index into per-color arrays (White = 0, Black = 1)
#[inline]
pub fn color_index(color: i8) -> usize {
    if color > 0 {
        0
    } else {
        1
    }
}

#[inline]
pub fn opposite(color: i8) -> i8 {
    -color
}

/// Rank on which a color's pawns start
#[inline]
pub fn pawn_home_rank(color: i8) -> i8 {
    if color > 0 {
        1
    } else {
        6
    }
}

/// Rank on which a color's pawns promote
#[inline]
pub fn promotion_rank(color: i8) -> i8 {
    if color > 0 {
        7
    } else {
        0
    }
}
