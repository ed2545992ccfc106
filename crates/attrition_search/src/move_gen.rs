//! # Packed Move Generation
//!
//! Generates moves for the side to move into a caller-owned [`MoveList`]. No
//! heap allocation happens here, so the search can call it at every node.
//!
//! ## Pseudo-Legal vs Legal
//!
//! [`generate_pseudo_legal_moves`] follows piece geometry and occupancy only.
//! [`generate_legal_moves`] additionally drops moves that leave the mover's
//! king attacked, but only while attrition is inactive. In attrition mode
//! combat governs the outcome and every pseudo-legal move stands.
//!
//! ## Generation Order
//!
//! Pieces are visited by ascending square (a1 first) and each piece emits its
//! moves in direction-table order. The order is stable, which the search
//! relies on for first-found tie breaking.

mod attack;
mod king;
mod knight;
mod pawn;
mod sliding;

pub use attack::{is_in_check, is_square_attacked};
pub use king::{castle_rook_squares, generate_king_moves};
pub use knight::generate_knight_moves;
pub use pawn::{en_passant_victim_square, generate_pawn_moves};
pub use sliding::{generate_bishop_moves, generate_queen_moves, generate_rook_moves, generate_sliding_moves};

use crate::constants::*;
use crate::types::*;

/// Generate all pseudo-legal moves for the side to move
pub fn generate_pseudo_legal_moves(board: &PackedBoard, moves: &mut MoveList) {
    let color = board.side_to_move;

    for from in board.occupancy(color).squares() {
        let Some(piece) = board.piece_at(from) else {
            continue;
        };

        match piece.kind {
            PAWN_ID => generate_pawn_moves(board, from, color, moves),
            KNIGHT_ID => generate_knight_moves(board, from, color, moves),
            BISHOP_ID => generate_bishop_moves(board, from, color, moves),
            ROOK_ID => generate_rook_moves(board, from, color, moves),
            QUEEN_ID => generate_queen_moves(board, from, color, moves),
            KING_ID => generate_king_moves(board, from, color, moves),
            _ => {}
        }
    }
}

/// Generate all legal moves for the side to move
///
/// King safety is tested by making each candidate on a copy of the board.
pub fn generate_legal_moves(board: &PackedBoard, moves: &mut MoveList) {
    let mut pseudo = MoveList::new();
    generate_pseudo_legal_moves(board, &mut pseudo);

    if board.is_attrition() {
        for mv in pseudo.iter() {
            moves.push(*mv);
        }
        return;
    }

    let color = board.side_to_move;
    for mv in pseudo.iter() {
        let next = board.make_move(*mv);
        if !is_in_check(&next, color) {
            moves.push(*mv);
        }
    }
}

/// Number of legal moves for the side to move
pub fn count_legal_moves(board: &PackedBoard) -> usize {
    let mut moves = MoveList::new();
    generate_legal_moves(board, &mut moves);
    moves.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_position_has_twenty_moves() {
        let board = PackedBoard::standard(25);
        assert_eq!(count_legal_moves(&board), 20, "16 pawn moves + 4 knight moves");
    }

    #[test]
    fn test_pinned_piece_cannot_move_outside_attrition() {
        let mut board = PackedBoard::empty(25);
        board.add_piece(PackedPiece::new(KING_ID, COLOR_WHITE, 4)).expect("e1");
        board.add_piece(PackedPiece::new(BISHOP_ID, COLOR_WHITE, 12)).expect("e2");
        board.add_piece(PackedPiece::new(ROOK_ID, COLOR_BLACK, 60)).expect("e8");
        board.add_piece(PackedPiece::new(KING_ID, COLOR_BLACK, 63)).expect("h8");

        let mut moves = MoveList::new();
        generate_legal_moves(&board, &mut moves);
        assert!(
            moves.iter().all(|m| m.from != 12),
            "Bishop on e2 is pinned against the king"
        );
    }

    #[test]
    fn test_pinned_piece_moves_in_attrition() {
        let mut board = PackedBoard::empty(1);
        board.add_piece(PackedPiece::new(KING_ID, COLOR_WHITE, 4)).expect("e1");
        board.add_piece(PackedPiece::new(BISHOP_ID, COLOR_WHITE, 12)).expect("e2");
        board.add_piece(PackedPiece::new(ROOK_ID, COLOR_BLACK, 60)).expect("e8");
        board.add_piece(PackedPiece::new(KING_ID, COLOR_BLACK, 63)).expect("h8");

        let mut moves = MoveList::new();
        generate_legal_moves(&board, &mut moves);
        assert!(moves.iter().any(|m| m.from == 12), "Attrition skips king safety");
    }

    #[test]
    fn test_en_passant_generated_after_double_push() {
        let mut board = PackedBoard::standard(25);
        // e2-e4, a7-a6, e4-e5, d7-d5
        for (from, to) in [(12, 28), (48, 40), (28, 36), (51, 35)] {
            let mut moves = MoveList::new();
            generate_legal_moves(&board, &mut moves);
            let mv = *moves
                .iter()
                .find(|m| m.from == from && m.to == to)
                .expect("scripted move must be legal");
            board = board.make_move(mv);
        }

        let mut moves = MoveList::new();
        generate_legal_moves(&board, &mut moves);
        let ep = moves
            .iter()
            .find(|m| m.from == 36 && m.to == 43)
            .expect("exd6 e.p. should be generated");
        assert!(ep.is_en_passant());
    }
}
