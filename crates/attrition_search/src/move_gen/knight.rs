//! Knight move generation
//!
//! Knights jump, so only the destination square matters. Wrap-around on the
//! board edges is rejected by [`step`] through the file delta carried in
//! [`KNIGHT_DIRS`].

use crate::board::*;
use crate::constants::*;
use crate::types::*;

/// Generate knight moves from a given square
///
/// # Examples
///
/// ```rust,ignore
/// let mut moves = MoveList::new();
/// generate_knight_moves(&board, 1, COLOR_WHITE, &mut moves);
/// // Moves now contains Na3 and Nc3 from the opening position
/// ```
pub fn generate_knight_moves(board: &PackedBoard, from: Square, color: Color, moves: &mut MoveList) {
    for &dir in &KNIGHT_DIRS {
        let Some(to) = step(from, dir) else {
            continue;
        };
        match board.color_at(to) {
            None => moves.push(PackedMove::new(from, to, 0)),
            Some(c) if c != color => moves.push(PackedMove::new(from, to, FLAG_ATTACK)),
            Some(_) => {}
        }
    }
}
