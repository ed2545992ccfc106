//! Move ordering for alpha-beta pruning
//!
//! Tries the most promising moves first (valuable victims, promotions,
//! castling) so that cutoffs come early. The sort is a stable insertion sort
//! over the fixed move buffer: it does not allocate and keeps generation order
//! among equally scored moves.

use crate::constants::*;
use crate::types::*;

/// Heuristic score of a move; higher is searched first
pub(crate) fn move_score(board: &PackedBoard, mv: &PackedMove) -> i32 {
    let mut score = 0;

    if mv.is_attack() {
        let attacker = board
            .piece_at(mv.from)
            .map_or(0, |p| FIGURE_VALUE[p.kind as usize]);
        // Kings carry no material, but hitting one outranks everything.
        let victim = board.piece_at(mv.to).map_or(PAWN_VALUE, |p| {
            if p.kind == KING_ID {
                MATE_SCORE / 10
            } else {
                FIGURE_VALUE[p.kind as usize]
            }
        });
        // MVV-LVA: Most Valuable Victim - Least Valuable Attacker
        score += victim * 10 - attacker;
    }

    if mv.flags & FLAG_PROMOTION != 0 {
        score += QUEEN_VALUE;
    }

    if mv.is_castle() {
        score += 50;
    }

    score
}

/// Order moves for better alpha-beta pruning
pub(crate) fn order_moves(board: &PackedBoard, moves: &mut MoveList) {
    let slice = moves.as_mut_slice();
    for i in 1..slice.len() {
        let current = slice[i];
        let current_score = move_score(board, &current);
        let mut j = i;
        while j > 0 && move_score(board, &slice[j - 1]) < current_score {
            slice[j] = slice[j - 1];
            j -= 1;
        }
        slice[j] = current;
    }
}
