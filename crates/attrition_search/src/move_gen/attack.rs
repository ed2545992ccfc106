//! Attack detection and square checking
//!
//! Provides functions to check if squares are under attack and if kings are in check.
//!
//! ## Algorithm
//!
//! Instead of scanning every enemy piece, attacks are traced backwards from the
//! target square: knight and king offsets are tested directly, sliding rays are
//! walked until the first occupied square, and pawn attacks are checked on the
//! two squares a pawn would have to stand on.

use crate::board::*;
use crate::constants::*;
use crate::types::*;

/// Check if a square is under attack by pieces of the specified color
///
/// # Arguments
///
/// * `board` - The packed position
/// * `square` - Target square index (0-63) to check
/// * `by_color` - Color of pieces that might attack (1 for White, -1 for Black)
///
/// # Returns
///
/// `true` if the square is attacked by any piece of the specified color
///
/// # Examples
///
/// ```rust,ignore
/// // Check if square e4 is attacked by black pieces
/// let attacked = is_square_attacked(&board, 28, COLOR_BLACK);
/// ```
pub fn is_square_attacked(board: &PackedBoard, square: Square, by_color: Color) -> bool {
    let holds = |sq: Square, kinds: &[i8]| {
        board
            .piece_at(sq)
            .is_some_and(|p| p.color == by_color && kinds.contains(&p.kind))
    };

    // A pawn of `by_color` attacks forward, so it sits one rank behind.
    let behind = if by_color > 0 { S } else { N };
    for dir in [(behind + O, 1), (behind + W, -1)] {
        if step(square, dir).is_some_and(|sq| holds(sq, &[PAWN_ID])) {
            return true;
        }
    }

    if KNIGHT_DIRS
        .iter()
        .any(|&dir| step(square, dir).is_some_and(|sq| holds(sq, &[KNIGHT_ID])))
    {
        return true;
    }

    if KING_DIRS
        .iter()
        .any(|&dir| step(square, dir).is_some_and(|sq| holds(sq, &[KING_ID])))
    {
        return true;
    }

    ray_hits(board, square, &ROOK_DIRS, by_color, ROOK_ID)
        || ray_hits(board, square, &BISHOP_DIRS, by_color, BISHOP_ID)
}

/// Walk each ray to its first blocker and test for `slider` or a queen.
fn ray_hits(board: &PackedBoard, square: Square, dirs: &[(i8, i8)], by_color: Color, slider: i8) -> bool {
    for &dir in dirs {
        let mut current = square;
        while let Some(next) = step(current, dir) {
            if let Some(piece) = board.piece_at(next) {
                if piece.color == by_color && (piece.kind == slider || piece.kind == QUEEN_ID) {
                    return true;
                }
                break;
            }
            current = next;
        }
    }
    false
}

/// Check if the king of a color is in check
///
/// A side without a king (fallen in attrition combat) is never in check.
pub fn is_in_check(board: &PackedBoard, color: Color) -> bool {
    board
        .king_square(color)
        .is_some_and(|king| is_square_attacked(board, king, opposite(color)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pawn_attacks_diagonally_forward() {
        let mut board = PackedBoard::empty(25);
        board
            .add_piece(PackedPiece::new(PAWN_ID, COLOR_WHITE, 12))
            .expect("e2");

        assert!(is_square_attacked(&board, 19, COLOR_WHITE), "d3");
        assert!(is_square_attacked(&board, 21, COLOR_WHITE), "f3");
        assert!(!is_square_attacked(&board, 20, COLOR_WHITE), "e3 is a push, not an attack");
        assert!(!is_square_attacked(&board, 3, COLOR_WHITE), "pawns do not attack backwards");
    }

    #[test]
    fn test_blocked_ray_does_not_attack() {
        let mut board = PackedBoard::empty(25);
        board
            .add_piece(PackedPiece::new(QUEEN_ID, COLOR_BLACK, 59))
            .expect("d8");
        board
            .add_piece(PackedPiece::new(PAWN_ID, COLOR_WHITE, 35))
            .expect("d5");

        assert!(is_square_attacked(&board, 35, COLOR_BLACK), "blocker itself is attacked");
        assert!(!is_square_attacked(&board, 27, COLOR_BLACK), "d4 is shielded");
    }

    #[test]
    fn test_missing_king_is_not_in_check() {
        let board = PackedBoard::empty(25);
        assert!(!is_in_check(&board, COLOR_WHITE));
    }

    #[test]
    fn test_opening_position_has_no_check() {
        let board = PackedBoard::standard(25);
        assert!(!is_in_check(&board, COLOR_WHITE));
        assert!(!is_in_check(&board, COLOR_BLACK));
    }
}
