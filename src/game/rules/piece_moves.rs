//! Chess piece movement rules
//!
//! Pseudo-legal move projection per piece type: geometry and occupancy only,
//! no king safety and no castling (castling needs attack information and lives
//! in [`legality`](super::legality)). Pure functions over a [`Board`].

use crate::game::board::Board;
use crate::game::types::{Color, PieceType, Position};

pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

pub(crate) const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
pub(crate) const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Every square the piece could move to, ignoring king safety and castling
///
/// # Arguments
///
/// * `piece_type` - Kind of the moving piece
/// * `color` - Side of the moving piece
/// * `from` - Square the piece stands on
/// * `board` - Board to read occupancy and the en passant target from
///
/// # Returns
///
/// Destinations in generation order; own-occupied squares are never included.
pub fn pseudo_legal_moves(piece_type: PieceType, color: Color, from: Position, board: &Board) -> Vec<Position> {
    let mut moves = Vec::with_capacity(16);
    match piece_type {
        PieceType::Pawn => pawn_moves(color, from, board, &mut moves),
        PieceType::Knight => step_moves(&KNIGHT_OFFSETS, color, from, board, &mut moves),
        PieceType::Bishop => slide_moves(&BISHOP_DIRECTIONS, color, from, board, &mut moves),
        PieceType::Rook => slide_moves(&ROOK_DIRECTIONS, color, from, board, &mut moves),
        PieceType::Queen => {
            slide_moves(&ROOK_DIRECTIONS, color, from, board, &mut moves);
            slide_moves(&BISHOP_DIRECTIONS, color, from, board, &mut moves);
        }
        PieceType::King => step_moves(&KING_OFFSETS, color, from, board, &mut moves),
    }
    moves
}

/// Whether `to` is an en passant capture for a pawn of `color` on `from`
///
/// The target must be the tracked en passant square and the pawn that just
/// double-stepped must still sit beside the capturing pawn.
pub fn is_en_passant_capture(color: Color, from: Position, to: Position, board: &Board) -> bool {
    if board.en_passant() != Some(to) || !board.is_empty(to) {
        return false;
    }
    if to.rank() as i8 - from.rank() as i8 != color.forward()
        || (to.file() as i8 - from.file() as i8).abs() != 1
    {
        return false;
    }
    en_passant_victim(from, to)
        .and_then(|square| board.piece_at(square))
        .is_some_and(|p| p.piece_type() == PieceType::Pawn && p.color() != color)
}

/// Square of the pawn removed by an en passant capture from `from` to `to`
pub fn en_passant_victim(from: Position, to: Position) -> Option<Position> {
    Position::new(to.file(), from.rank()).ok()
}

fn pawn_moves(color: Color, from: Position, board: &Board, moves: &mut Vec<Position>) {
    let forward = color.forward();

    if let Some(one) = from.offset(0, forward) {
        if board.is_empty(one) {
            moves.push(one);
            if from.rank() == color.pawn_rank() {
                if let Some(two) = from.offset(0, 2 * forward) {
                    if board.is_empty(two) {
                        moves.push(two);
                    }
                }
            }
        }
    }

    for file_delta in [-1, 1] {
        let Some(target) = from.offset(file_delta, forward) else {
            continue;
        };
        match board.color_at(target) {
            Some(target_color) if target_color != color => moves.push(target),
            Some(_) => {}
            None => {
                if is_en_passant_capture(color, from, target, board) {
                    moves.push(target);
                }
            }
        }
    }
}

fn step_moves(offsets: &[(i8, i8)], color: Color, from: Position, board: &Board, moves: &mut Vec<Position>) {
    for &(df, dr) in offsets {
        if let Some(target) = from.offset(df, dr) {
            if board.color_at(target) != Some(color) {
                moves.push(target);
            }
        }
    }
}

fn slide_moves(directions: &[(i8, i8)], color: Color, from: Position, board: &Board, moves: &mut Vec<Position>) {
    for &(df, dr) in directions {
        let mut current = from;
        while let Some(next) = current.offset(df, dr) {
            match board.color_at(next) {
                None => moves.push(next),
                Some(c) => {
                    // Stop at the first occupied square, capturing only enemies
                    if c != color {
                        moves.push(next);
                    }
                    break;
                }
            }
            current = next;
        }
    }
}
