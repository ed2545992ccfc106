//! Material evaluation
//!
//! Counts piece values, each scaled by how much health the piece has left.

use crate::constants::*;
use crate::types::*;

/// Centipawn value of one piece at its current HP
#[inline]
pub fn piece_material(piece: &PackedPiece) -> i32 {
    let value = FIGURE_VALUE.get(piece.kind as usize).copied().unwrap_or(0);
    (value as f32 * piece.hp_fraction()).round() as i32
}

/// Evaluate HP-scaled material balance (positive favors White)
pub fn evaluate_material(board: &PackedBoard) -> i32 {
    board
        .active_pieces()
        .map(|p| piece_material(p) * p.color as i32)
        .sum()
}
