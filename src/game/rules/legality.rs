//! Move legality: king safety, castling and terminal-position tests
//!
//! Validation runs in a fixed order so the rejection reason is predictable:
//! empty source, wrong side, castling conditions, geometry, then king safety.
//! King safety is tested by simulating the move in place through
//! [`Board::simulate`]; the board is restored before any function here
//! returns, which is why several of them take `&mut Board` while leaving it
//! logically untouched.
//!
//! # Attrition Mode
//!
//! Under [`RulesMode::Attrition`] nothing is rejected for king safety: not a
//! move into check, not castling out of, through or into check. Combat
//! decides the outcome instead.

use super::piece_moves::{
    en_passant_victim, is_en_passant_capture, pseudo_legal_moves, BISHOP_DIRECTIONS, KING_OFFSETS,
    KNIGHT_OFFSETS, ROOK_DIRECTIONS,
};
use crate::core::error::IllegalMoveReason;
use crate::game::board::Board;
use crate::game::piece::PieceId;
use crate::game::types::{Color, PieceType, Position};

/// Which ruleset governs king safety
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulesMode {
    Standard,
    Attrition,
}

impl RulesMode {
    pub fn for_turn(turn_number: u32, attrition_start_turn: u32) -> Self {
        if turn_number >= attrition_start_turn {
            RulesMode::Attrition
        } else {
            RulesMode::Standard
        }
    }

    pub fn checks_king_safety(self) -> bool {
        self == RulesMode::Standard
    }
}

/// Special-move classification of a validated move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Quiet,
    /// Destination holds an enemy piece
    Capture,
    /// Pawn captured beside the destination
    EnPassant { captured: Position },
    Castle {
        kingside: bool,
        rook_from: Position,
        rook_to: Position,
    },
}

/// A move that passed validation, with everything needed to apply it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedMove {
    pub from: Position,
    pub to: Position,
    pub piece_id: PieceId,
    pub piece_type: PieceType,
    pub color: Color,
    pub kind: MoveKind,
    /// Pawn reaching the far rank
    pub promotes: bool,
}

/// Whether any piece of `by` attacks `square`
///
/// Traced outward from the target: pawn diagonals, knight and king offsets,
/// then rays until the first blocker.
pub fn is_square_attacked(board: &Board, square: Position, by: Color) -> bool {
    let attacker_is = |pos: Position, kinds: &[PieceType]| {
        board
            .piece_at(pos)
            .is_some_and(|p| p.color() == by && kinds.contains(&p.piece_type()))
    };

    // A pawn of `by` attacks diagonally forward, so look one rank behind
    for file_delta in [-1, 1] {
        if let Some(pos) = square.offset(file_delta, -by.forward()) {
            if attacker_is(pos, &[PieceType::Pawn]) {
                return true;
            }
        }
    }

    if KNIGHT_OFFSETS
        .iter()
        .filter_map(|&(df, dr)| square.offset(df, dr))
        .any(|pos| attacker_is(pos, &[PieceType::Knight]))
    {
        return true;
    }

    if KING_OFFSETS
        .iter()
        .filter_map(|&(df, dr)| square.offset(df, dr))
        .any(|pos| attacker_is(pos, &[PieceType::King]))
    {
        return true;
    }

    let ray_hits = |directions: &[(i8, i8)], kinds: &[PieceType]| {
        directions.iter().any(|&(df, dr)| {
            let mut current = square;
            while let Some(next) = current.offset(df, dr) {
                if !board.is_empty(next) {
                    return attacker_is(next, kinds);
                }
                current = next;
            }
            false
        })
    };

    ray_hits(&ROOK_DIRECTIONS, &[PieceType::Rook, PieceType::Queen])
        || ray_hits(&BISHOP_DIRECTIONS, &[PieceType::Bishop, PieceType::Queen])
}

/// Whether `color`'s king is attacked; a side with no king is never in check
pub fn is_king_in_check(board: &Board, color: Color) -> bool {
    board
        .king_position(color)
        .is_some_and(|king| is_square_attacked(board, king, color.opposite()))
}

struct CastlePath {
    king_to: Position,
    rook_from: Position,
    rook_to: Position,
    transit: Position,
}

fn castle_path(color: Color, kingside: bool) -> Option<CastlePath> {
    let rank = color.back_rank();
    let (king_to, rook_from, rook_to) = if kingside { (6, 7, 5) } else { (2, 0, 3) };
    Some(CastlePath {
        king_to: Position::new(king_to, rank).ok()?,
        rook_from: Position::new(rook_from, rank).ok()?,
        rook_to: Position::new(rook_to, rank).ok()?,
        transit: Position::new(rook_to, rank).ok()?,
    })
}

/// Check every castling condition for the king on `from`
fn castle_move(board: &Board, from: Position, color: Color, kingside: bool, mode: RulesMode) -> Option<MoveKind> {
    let king = board.piece_at(from)?;
    let home = Position::new(4, color.back_rank()).ok()?;
    if king.piece_type() != PieceType::King || king.has_moved() || from != home {
        return None;
    }
    if !board.castling().has(color, kingside) {
        return None;
    }

    let path = castle_path(color, kingside)?;
    let rook = board.piece_at(path.rook_from)?;
    if rook.piece_type() != PieceType::Rook || rook.color() != color || rook.has_moved() {
        return None;
    }

    // Every square strictly between king and rook must be empty
    let (low, high) = if kingside {
        (from.file() + 1, path.rook_from.file())
    } else {
        (path.rook_from.file() + 1, from.file())
    };
    let blocked = (low..high).any(|file| {
        Position::new(file, color.back_rank())
            .map(|pos| !board.is_empty(pos))
            .unwrap_or(true)
    });
    if blocked {
        return None;
    }

    if mode.checks_king_safety() {
        let enemy = color.opposite();
        if is_square_attacked(board, from, enemy)
            || is_square_attacked(board, path.transit, enemy)
            || is_square_attacked(board, path.king_to, enemy)
        {
            return None;
        }
    }

    Some(MoveKind::Castle {
        kingside,
        rook_from: path.rook_from,
        rook_to: path.rook_to,
    })
}

/// Validate a move for the side `turn`
///
/// # Returns
///
/// The classified move, or the first reason it fails. The board is left as it
/// was in both cases.
///
/// # Examples
///
/// ```rust,ignore
/// let mv = validate_move(&mut board, e2, e4, Color::White, RulesMode::Standard)?;
/// assert_eq!(mv.kind, MoveKind::Quiet);
/// ```
pub fn validate_move(
    board: &mut Board,
    from: Position,
    to: Position,
    turn: Color,
    mode: RulesMode,
) -> Result<ValidatedMove, IllegalMoveReason> {
    let piece = board.piece_at(from).ok_or(IllegalMoveReason::NoPieceAtSource)?;
    let (piece_id, piece_type, color) = (piece.id(), piece.piece_type(), piece.color());
    if color != turn {
        return Err(IllegalMoveReason::WrongTurn);
    }

    let file_delta = to.file() as i8 - from.file() as i8;
    if piece_type == PieceType::King && to.rank() == from.rank() && file_delta.abs() == 2 {
        let kind = castle_move(board, from, color, file_delta > 0, mode)
            .ok_or(IllegalMoveReason::CastlingNotAllowed)?;
        return Ok(ValidatedMove {
            from,
            to,
            piece_id,
            piece_type,
            color,
            kind,
            promotes: false,
        });
    }

    if !pseudo_legal_moves(piece_type, color, from, board).contains(&to) {
        return Err(IllegalMoveReason::IllegalGeometry);
    }

    let kind = if piece_type == PieceType::Pawn && is_en_passant_capture(color, from, to, board) {
        let captured = en_passant_victim(from, to).ok_or(IllegalMoveReason::IllegalGeometry)?;
        MoveKind::EnPassant { captured }
    } else if board.color_at(to).is_some() {
        MoveKind::Capture
    } else {
        MoveKind::Quiet
    };

    if mode.checks_king_safety() {
        let captured_square = match kind {
            MoveKind::EnPassant { captured } => Some(captured),
            MoveKind::Capture => Some(to),
            _ => None,
        };
        let leaves_check = {
            let sim = board.simulate(from, to, captured_square);
            is_king_in_check(sim.board(), color)
        };
        if leaves_check {
            return Err(IllegalMoveReason::LeavesKingInCheck);
        }
    }

    Ok(ValidatedMove {
        from,
        to,
        piece_id,
        piece_type,
        color,
        kind,
        promotes: piece_type == PieceType::Pawn && to.rank() == color.promotion_rank(),
    })
}

pub fn is_move_legal(board: &mut Board, from: Position, to: Position, turn: Color, mode: RulesMode) -> bool {
    validate_move(board, from, to, turn, mode).is_ok()
}

/// Legal destinations of the piece on `from`, ordered a1..h8
///
/// Empty if the square is empty. The piece's own side is treated as the side
/// to move.
pub fn legal_destinations(board: &mut Board, from: Position, mode: RulesMode) -> Vec<Position> {
    let Some(piece) = board.piece_at(from) else {
        return Vec::new();
    };
    let (piece_type, color) = (piece.piece_type(), piece.color());

    let mut candidates = pseudo_legal_moves(piece_type, color, from, board);
    if piece_type == PieceType::King {
        candidates.extend([-2i8, 2].iter().filter_map(|&df| from.offset(df, 0)));
    }

    let mut legal: Vec<Position> = candidates
        .into_iter()
        .filter(|&to| validate_move(board, from, to, color, mode).is_ok())
        .collect();
    legal.sort_by_key(|p| p.index());
    legal.dedup();
    legal
}

/// All legal `(from, to)` pairs for `color`, by piece id then destination
pub fn all_legal_moves(board: &mut Board, color: Color, mode: RulesMode) -> Vec<(Position, Position)> {
    let origins: Vec<Position> = board.active_pieces_of(color).filter_map(|p| p.position()).collect();
    origins
        .into_iter()
        .flat_map(|from| {
            legal_destinations(board, from, mode)
                .into_iter()
                .map(move |to| (from, to))
                .collect::<Vec<_>>()
        })
        .collect()
}

pub fn has_any_legal_move(board: &mut Board, color: Color, mode: RulesMode) -> bool {
    let origins: Vec<Position> = board.active_pieces_of(color).filter_map(|p| p.position()).collect();
    origins
        .into_iter()
        .any(|from| !legal_destinations(board, from, mode).is_empty())
}

/// King attacked and no legal move anywhere
pub fn is_checkmate(board: &mut Board, color: Color, mode: RulesMode) -> bool {
    is_king_in_check(board, color) && !has_any_legal_move(board, color, mode)
}

/// King safe but no legal move anywhere
pub fn is_stalemate(board: &mut Board, color: Color, mode: RulesMode) -> bool {
    !is_king_in_check(board, color) && !has_any_legal_move(board, color, mode)
}
