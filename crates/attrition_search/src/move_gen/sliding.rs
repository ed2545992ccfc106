//! Sliding piece move generation
//!
//! Common functionality for sliding pieces (bishops, rooks, queens).
//! These pieces move along a ray until blocked.
//!
//! ## Algorithm
//!
//! For every direction:
//! 1. Step one square at a time with [`step`], which stops at the board edge
//! 2. Emit quiet moves onto empty squares
//! 3. On the first occupied square, emit an attack if it holds an enemy and
//!    stop the ray either way

use crate::board::*;
use crate::constants::*;
use crate::types::*;

/// Generate moves for a sliding piece along the given directions
///
/// # Arguments
///
/// * `board` - The packed position
/// * `from` - Source square index (0-63)
/// * `color` - Color of the moving piece (1 for White, -1 for Black)
/// * `dirs` - `(index_delta, file_delta)` rays to walk
/// * `moves` - Output list to append to
pub fn generate_sliding_moves(
    board: &PackedBoard,
    from: Square,
    color: Color,
    dirs: &[(i8, i8)],
    moves: &mut MoveList,
) {
    for &dir in dirs {
        let mut current = from;
        while let Some(to) = step(current, dir) {
            match board.color_at(to) {
                None => moves.push(PackedMove::new(from, to, 0)),
                Some(c) => {
                    if c != color {
                        moves.push(PackedMove::new(from, to, FLAG_ATTACK));
                    }
                    break;
                }
            }
            current = to;
        }
    }
}

pub fn generate_bishop_moves(board: &PackedBoard, from: Square, color: Color, moves: &mut MoveList) {
    generate_sliding_moves(board, from, color, &BISHOP_DIRS, moves);
}

pub fn generate_rook_moves(board: &PackedBoard, from: Square, color: Color, moves: &mut MoveList) {
    generate_sliding_moves(board, from, color, &ROOK_DIRS, moves);
}

pub fn generate_queen_moves(board: &PackedBoard, from: Square, color: Color, moves: &mut MoveList) {
    generate_sliding_moves(board, from, color, &KING_DIRS, moves);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rook_on_empty_board_has_fourteen_moves() {
        let mut board = PackedBoard::empty(25);
        board
            .add_piece(PackedPiece::new(ROOK_ID, COLOR_WHITE, 27))
            .expect("d4 is free");

        let mut moves = MoveList::new();
        generate_rook_moves(&board, 27, COLOR_WHITE, &mut moves);
        assert_eq!(moves.len(), 14, "Rook on d4 reaches 14 squares");
    }

    #[test]
    fn test_bishop_on_h_file_does_not_wrap() {
        let mut board = PackedBoard::empty(25);
        board
            .add_piece(PackedPiece::new(BISHOP_ID, COLOR_WHITE, 7))
            .expect("h1 is free");

        let mut moves = MoveList::new();
        generate_bishop_moves(&board, 7, COLOR_WHITE, &mut moves);
        assert_eq!(moves.len(), 7, "Bishop on h1 only has the long diagonal");
        assert!(moves.iter().all(|m| (m.to % 8) < 7));
    }

    #[test]
    fn test_slide_stops_at_blocker() {
        let mut board = PackedBoard::empty(25);
        board
            .add_piece(PackedPiece::new(ROOK_ID, COLOR_WHITE, 0))
            .expect("a1 is free");
        board
            .add_piece(PackedPiece::new(PAWN_ID, COLOR_BLACK, 16))
            .expect("a3 is free");
        board
            .add_piece(PackedPiece::new(KNIGHT_ID, COLOR_WHITE, 1))
            .expect("b1 is free");

        let mut moves = MoveList::new();
        generate_rook_moves(&board, 0, COLOR_WHITE, &mut moves);
        assert_eq!(moves.len(), 2, "a2 and the attack on a3");
        assert!(moves.iter().any(|m| m.to == 16 && m.is_attack()));
    }
}
