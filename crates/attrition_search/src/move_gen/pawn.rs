//! Pawn move generation
//!
//! Handles pawn-specific move generation including:
//! - Single and double forward pushes
//! - Diagonal attacks
//! - En passant against the pawn that just double-stepped
//! - Promotion on the far rank
//!
//! ## Promotion in Search
//!
//! The packed generator only emits queen promotions. Under-promotion is legal
//! in the authoritative rules, but it never outscores the queen in this
//! evaluator and would quadruple the branching on the seventh rank.

use crate::board::*;
use crate::constants::*;
use crate::types::*;

#[inline]
fn forward(color: Color) -> i8 {
    if color > 0 {
        N
    } else {
        S
    }
}

fn push_pawn_move(from: Square, to: Square, flags: u8, color: Color, moves: &mut MoveList) {
    let (_, to_rank) = pos_to_square(to);
    if to_rank == promotion_rank(color) {
        let mut mv = PackedMove::new(from, to, flags | FLAG_PROMOTION);
        mv.promotion = QUEEN_ID;
        moves.push(mv);
    } else {
        moves.push(PackedMove::new(from, to, flags));
    }
}

/// Generate pawn moves from a given square
///
/// Forward pushes need empty destinations (and an empty intermediate square
/// for the double push). Diagonals are only emitted as attacks on an enemy
/// piece or on the en-passant target.
///
/// # Arguments
///
/// * `board` - The packed position
/// * `from` - Source square index (0-63)
/// * `color` - Color of the pawn (1 for White, -1 for Black)
/// * `moves` - Output list to append to
///
/// # Examples
///
/// ```rust,ignore
/// let mut moves = MoveList::new();
/// generate_pawn_moves(&board, 12, COLOR_WHITE, &mut moves);
/// // Moves now contains e2-e3, e2-e4, and any diagonal attacks
/// ```
pub fn generate_pawn_moves(board: &PackedBoard, from: Square, color: Color, moves: &mut MoveList) {
    let fwd = forward(color);
    let (_, from_rank) = pos_to_square(from);

    if let Some(one) = step(from, (fwd, 0)) {
        if board.is_empty_square(one) {
            push_pawn_move(from, one, 0, color, moves);

            if from_rank == pawn_home_rank(color) {
                if let Some(two) = step(one, (fwd, 0)) {
                    if board.is_empty_square(two) {
                        moves.push(PackedMove::new(from, two, FLAG_DOUBLE_PUSH));
                    }
                }
            }
        }
    }

    for dir in [(fwd + O, 1), (fwd + W, -1)] {
        let Some(to) = step(from, dir) else {
            continue;
        };
        match board.color_at(to) {
            Some(c) if c != color => push_pawn_move(from, to, FLAG_ATTACK, color, moves),
            Some(_) => {}
            None => {
                if to == board.en_passant && is_en_passant_victim(board, to, color) {
                    moves.push(PackedMove::new(from, to, FLAG_ATTACK | FLAG_EN_PASSANT));
                }
            }
        }
    }
}

/// Square of the pawn captured by an en-passant move landing on `target`.
#[inline]
pub fn en_passant_victim_square(target: Square, color: Color) -> Square {
    target - forward(color)
}

fn is_en_passant_victim(board: &PackedBoard, target: Square, color: Color) -> bool {
    let victim = en_passant_victim_square(target, color);
    is_valid_pos(victim as i32)
        && board
            .piece_at(victim)
            .is_some_and(|p| p.kind == PAWN_ID && p.color != color)
}
