//! Full position evaluation
//!
//! Material plus the attrition-specific terms: banked AP, loyalty risk and
//! advancement into enemy territory.

use super::material::evaluate_material;
use crate::board::*;
use crate::constants::*;
use crate::types::*;

/// Evaluate full position (positive favors White)
pub fn evaluate_position(board: &PackedBoard) -> i32 {
    let mut score = evaluate_material(board);

    score += (board.action_points[color_index(COLOR_WHITE)] as i32
        - board.action_points[color_index(COLOR_BLACK)] as i32)
        * AP_BONUS;

    for piece in board.active_pieces() {
        let sign = piece.color as i32;

        if piece.loyalty < LOYALTY_RISK_THRESHOLD {
            score -= sign * LOYALTY_RISK_PENALTY;
        }

        if piece.kind != KING_ID {
            let (_, rank) = pos_to_square(piece.square);
            let in_enemy_half = if piece.color > 0 { rank >= 4 } else { rank <= 3 };
            if in_enemy_half {
                score += sign * ADVANCE_BONUS;
            }
        }
    }

    score
}

/// Evaluate from the side to move's point of view (negamax convention)
#[inline]
pub fn evaluate_for_side(board: &PackedBoard) -> i32 {
    evaluate_position(board) * board.side_to_move as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_position_is_level() {
        let board = PackedBoard::standard(25);
        assert_eq!(evaluate_position(&board), 0);
    }

    #[test]
    fn test_action_points_are_worth_something() {
        let mut board = PackedBoard::standard(25);
        board.action_points = [5, 3];
        assert_eq!(evaluate_position(&board), 2 * AP_BONUS);
    }

    #[test]
    fn test_disloyal_piece_is_penalized() {
        let mut board = PackedBoard::standard(25);
        let slot = board.squares[1] as usize;
        board.pieces[slot].loyalty = 10;

        assert_eq!(evaluate_position(&board), -LOYALTY_RISK_PENALTY);
    }

    #[test]
    fn test_advanced_piece_earns_bonus() {
        let mut board = PackedBoard::empty(25);
        board
            .add_piece(PackedPiece::new(KNIGHT_ID, COLOR_BLACK, 27))
            .expect("d4");

        assert_eq!(
            evaluate_position(&board),
            -(KNIGHT_VALUE + ADVANCE_BONUS),
            "Black knight on d4 sits in White's half"
        );
    }

    #[test]
    fn test_side_relative_score_flips() {
        let mut board = PackedBoard::standard(25);
        board.action_points = [4, 0];
        board.side_to_move = COLOR_BLACK;
        assert_eq!(evaluate_for_side(&board), -4 * AP_BONUS);
    }
}
