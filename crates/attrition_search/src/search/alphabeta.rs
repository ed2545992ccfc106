//! Negamax alpha-beta search
//!
//! Scores are always from the side to move's perspective. A side whose king
//! has fallen (attrition combat) or that is checkmated scores
//! `-(MATE_SCORE - ply)`, so nearer mates are preferred.

use super::ordering::order_moves;
use crate::constants::*;
use crate::evaluation::evaluate_for_side;
use crate::move_gen::{generate_legal_moves, is_in_check};
use crate::types::*;

/// Search every root move in generation order; first-found wins ties.
pub(crate) fn search_root(board: &PackedBoard, depth: u8, nodes: &mut u64) -> Option<(PackedMove, i32)> {
    *nodes += 1;
    board.king_square(board.side_to_move)?;

    let mut moves = MoveList::new();
    generate_legal_moves(board, &mut moves);

    let mut best: Option<(PackedMove, i32)> = None;
    let mut alpha = -AB_INF;

    for mv in moves.iter() {
        let child = board.make_move(*mv);
        let score = -alphabeta(&child, depth - 1, 1, -AB_INF, -alpha, nodes);

        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((*mv, score));
            alpha = alpha.max(score);
        }
    }

    best
}

/// Negamax with alpha-beta pruning
pub(crate) fn alphabeta(
    board: &PackedBoard,
    depth: u8,
    ply: i32,
    mut alpha: i32,
    beta: i32,
    nodes: &mut u64,
) -> i32 {
    *nodes += 1;

    let color = board.side_to_move;
    if board.king_square(color).is_none() {
        return -(MATE_SCORE - ply);
    }

    if depth == 0 {
        return evaluate_for_side(board);
    }

    let mut moves = MoveList::new();
    generate_legal_moves(board, &mut moves);

    if moves.is_empty() {
        return if is_in_check(board, color) {
            -(MATE_SCORE - ply)
        } else {
            0
        };
    }

    order_moves(board, &mut moves);

    let mut best = -AB_INF;
    for mv in moves.iter() {
        let child = board.make_move(*mv);
        let score = -alphabeta(&child, depth - 1, ply + 1, -beta, -alpha, nodes);

        if score > best {
            best = score;
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            break;
        }
    }

    best
}
