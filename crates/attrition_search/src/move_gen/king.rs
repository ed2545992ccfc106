//! King move generation
//!
//! Kings move one square in any direction and castle.
//!
//! ## Castling
//!
//! A castle is encoded as the two-square king move with [`FLAG_CASTLE`]. It
//! requires the castling right, an own rook on the corner and empty squares
//! between king and rook. Outside attrition the king must also not be in check
//! and must not pass through or land on an attacked square. Once attrition is
//! active king safety no longer restricts any move, castling included.

use super::attack::is_square_attacked;
use crate::board::*;
use crate::constants::*;
use crate::types::*;

struct CastleSide {
    right: u8,
    king_from: Square,
    king_to: Square,
    rook_from: Square,
    between: &'static [Square],
    transit: &'static [Square],
}

const CASTLES: [CastleSide; 4] = [
    CastleSide {
        right: CASTLE_WHITE_KINGSIDE,
        king_from: 4,
        king_to: 6,
        rook_from: 7,
        between: &[5, 6],
        transit: &[5, 6],
    },
    CastleSide {
        right: CASTLE_WHITE_QUEENSIDE,
        king_from: 4,
        king_to: 2,
        rook_from: 0,
        between: &[1, 2, 3],
        transit: &[3, 2],
    },
    CastleSide {
        right: CASTLE_BLACK_KINGSIDE,
        king_from: 60,
        king_to: 62,
        rook_from: 63,
        between: &[61, 62],
        transit: &[61, 62],
    },
    CastleSide {
        right: CASTLE_BLACK_QUEENSIDE,
        king_from: 60,
        king_to: 58,
        rook_from: 56,
        between: &[57, 58, 59],
        transit: &[59, 58],
    },
];

/// Rook relocation `(from, to)` for a castle landing on `king_to`.
pub fn castle_rook_squares(king_to: Square) -> Option<(Square, Square)> {
    match king_to {
        6 => Some((7, 5)),
        2 => Some((0, 3)),
        62 => Some((63, 61)),
        58 => Some((56, 59)),
        _ => None,
    }
}

/// Generate king moves from a given square
///
/// # Examples
///
/// ```rust,ignore
/// let mut moves = MoveList::new();
/// generate_king_moves(&board, 4, COLOR_WHITE, &mut moves);
/// ```
pub fn generate_king_moves(board: &PackedBoard, from: Square, color: Color, moves: &mut MoveList) {
    for &dir in &KING_DIRS {
        let Some(to) = step(from, dir) else {
            continue;
        };
        match board.color_at(to) {
            None => moves.push(PackedMove::new(from, to, 0)),
            Some(c) if c != color => moves.push(PackedMove::new(from, to, FLAG_ATTACK)),
            Some(_) => {}
        }
    }

    generate_castles(board, from, color, moves);
}

fn generate_castles(board: &PackedBoard, from: Square, color: Color, moves: &mut MoveList) {
    let enforce_safety = !board.is_attrition();
    let enemy = opposite(color);

    for side in CASTLES.iter() {
        if board.castling & side.right == 0 || side.king_from != from {
            continue;
        }
        let rook_ok = board
            .piece_at(side.rook_from)
            .is_some_and(|p| p.kind == ROOK_ID && p.color == color);
        if !rook_ok {
            continue;
        }
        if !side.between.iter().all(|&sq| board.is_empty_square(sq)) {
            continue;
        }
        if enforce_safety {
            if is_square_attacked(board, from, enemy) {
                continue;
            }
            if side
                .transit
                .iter()
                .any(|&sq| is_square_attacked(board, sq, enemy))
            {
                continue;
            }
        }
        moves.push(PackedMove::new(from, side.king_to, FLAG_CASTLE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn castle_board(attrition_start: u32) -> PackedBoard {
        let mut board = PackedBoard::empty(attrition_start);
        board
            .add_piece(PackedPiece::new(KING_ID, COLOR_WHITE, 4))
            .expect("e1");
        board
            .add_piece(PackedPiece::new(ROOK_ID, COLOR_WHITE, 7))
            .expect("h1");
        board
            .add_piece(PackedPiece::new(KING_ID, COLOR_BLACK, 60))
            .expect("e8");
        board.castling = CASTLE_WHITE_KINGSIDE;
        board
    }

    #[test]
    fn test_kingside_castle_generated_on_clear_path() {
        let board = castle_board(25);
        let mut moves = MoveList::new();
        generate_king_moves(&board, 4, COLOR_WHITE, &mut moves);

        assert!(
            moves.iter().any(|m| m.to == 6 && m.is_castle()),
            "O-O should be available"
        );
    }

    #[test]
    fn test_castle_through_attacked_square_rejected() {
        let mut board = castle_board(25);
        board
            .add_piece(PackedPiece::new(ROOK_ID, COLOR_BLACK, 61))
            .expect("f8");

        let mut moves = MoveList::new();
        generate_king_moves(&board, 4, COLOR_WHITE, &mut moves);
        assert!(!moves.iter().any(|m| m.is_castle()), "f1 is attacked");
    }

    #[test]
    fn test_attrition_ignores_attacked_transit() {
        let mut board = castle_board(1);
        board
            .add_piece(PackedPiece::new(ROOK_ID, COLOR_BLACK, 61))
            .expect("f8");

        let mut moves = MoveList::new();
        generate_king_moves(&board, 4, COLOR_WHITE, &mut moves);
        assert!(moves.iter().any(|m| m.is_castle()));
    }
}
