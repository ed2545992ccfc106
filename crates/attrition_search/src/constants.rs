//! # Search Constants - Piece Codes, Direction Tables & Evaluation Weights
//!
//! ## Overview
//!
//! Centralizes the numeric vocabulary of the packed search layer: piece codes,
//! color codes, direction offsets for move generation, combat estimation
//! parameters and evaluation weights.
//!
//! ## Square Layout
//!
//! Squares are indexed `rank * 8 + file`:
//! - Square 0 = a1 (White's queenside corner)
//! - Square 7 = h1
//! - Square 56 = a8
//! - Square 63 = h8
//!
//! White pawns move toward higher indices (north, `+8`), Black pawns toward
//! lower indices (south, `-8`).
//!
//! ## Direction Tables
//!
//! Every direction is stored as a pair `(index_delta, file_delta)`. The index
//! delta moves the square, the file delta is what the file coordinate must
//! change by for the step to be genuine. A step that lands on a square whose
//! file moved by anything else wrapped around the board edge and is discarded.
//! This keeps sliding and knight generation edge-aware without 0x88 padding.
//!
//! ## Centipawn Valuation
//!
//! Evaluation works in centipawns (pawn = 100). Material is scaled by each
//! piece's remaining HP fraction, so a queen at half health counts as 450.

pub const VOID_ID: i8 = 0;
pub const PAWN_ID: i8 = 1;
pub const KNIGHT_ID: i8 = 2;
pub const BISHOP_ID: i8 = 3;
pub const ROOK_ID: i8 = 4;
pub const QUEEN_ID: i8 = 5;
pub const KING_ID: i8 = 6;

pub const COLOR_WHITE: i8 = 1;
pub const COLOR_BLACK: i8 = -1;

/// Marker for an empty square or a captured piece's square.
pub const NO_SQUARE: i8 = -1;
/// Marker in the square table for "no piece slot".
pub const EMPTY: i8 = -1;

/// Capacity of the piece arena in a packed board (a full standard set).
pub const MAX_PIECES: usize = 32;
/// Capacity of a move list; no legal chess position exceeds 218 moves.
pub const MAX_MOVES: usize = 256;

pub const N: i8 = 8;
pub const S: i8 = -8;
pub const O: i8 = 1;
pub const W: i8 = -1;
pub const NO: i8 = N + O;
pub const NW: i8 = N + W;
pub const SO: i8 = S + O;
pub const SW: i8 = S + W;

pub const ROOK_DIRS: [(i8, i8); 4] = [(N, 0), (O, 1), (S, 0), (W, -1)];
pub const BISHOP_DIRS: [(i8, i8); 4] = [(NO, 1), (NW, -1), (SO, 1), (SW, -1)];
pub const KING_DIRS: [(i8, i8); 8] = [
    (N, 0), (O, 1), (S, 0), (W, -1),
    (NO, 1), (NW, -1), (SO, 1), (SW, -1),
];
pub const KNIGHT_DIRS: [(i8, i8); 8] = [
    (N + N + O, 1), (N + N + W, -1), (S + S + O, 1), (S + S + W, -1),
    (O + O + N, 2), (O + O + S, 2), (W + W + N, -2), (W + W + S, -2),
];

pub const FLAG_ATTACK: u8 = 1;
pub const FLAG_EN_PASSANT: u8 = 2;
pub const FLAG_PROMOTION: u8 = 4;
pub const FLAG_CASTLE: u8 = 8;
pub const FLAG_DOUBLE_PUSH: u8 = 16;

pub const CASTLE_WHITE_KINGSIDE: u8 = 1;
pub const CASTLE_WHITE_QUEENSIDE: u8 = 2;
pub const CASTLE_BLACK_KINGSIDE: u8 = 4;
pub const CASTLE_BLACK_QUEENSIDE: u8 = 8;

pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 300;
pub const BISHOP_VALUE: i32 = 300;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;

/// Centipawn value per piece code. Kings carry no material; losing one is
/// scored as mate by the search instead.
pub const FIGURE_VALUE: [i32; KING_ID as usize + 1] = [
    0,
    PAWN_VALUE,
    KNIGHT_VALUE,
    BISHOP_VALUE,
    ROOK_VALUE,
    QUEEN_VALUE,
    0,
];

/// Piece values used by the combat damage formula (king fights as a 4).
pub const COMBAT_VALUE: [i16; KING_ID as usize + 1] = [0, 1, 3, 3, 5, 9, 4];

pub const AP_BONUS: i32 = 10;
pub const LOYALTY_RISK_THRESHOLD: u8 = 30;
pub const LOYALTY_RISK_PENALTY: i32 = 50;
pub const ADVANCE_BONUS: i32 = 10;

pub const MATE_SCORE: i32 = 100_000;
pub const AB_INF: i32 = 1_000_000;

pub const DEFAULT_DEPTH: u8 = 2;
pub const MAX_SEARCH_DEPTH: u8 = 4;

/// Standard opening layout, rank 1 first. White codes positive, Black negative.
pub const SETUP: [i8; 64] = [
    ROOK_ID, KNIGHT_ID, BISHOP_ID, QUEEN_ID, KING_ID, BISHOP_ID, KNIGHT_ID, ROOK_ID,
    PAWN_ID, PAWN_ID, PAWN_ID, PAWN_ID, PAWN_ID, PAWN_ID, PAWN_ID, PAWN_ID,
    0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0,
    -PAWN_ID, -PAWN_ID, -PAWN_ID, -PAWN_ID, -PAWN_ID, -PAWN_ID, -PAWN_ID, -PAWN_ID,
    -ROOK_ID, -KNIGHT_ID, -BISHOP_ID, -QUEEN_ID, -KING_ID, -BISHOP_ID, -KNIGHT_ID, -ROOK_ID,
];

/// Default `(max_hp, armor)` per piece code for the standard layout.
pub const BASE_STATS: [(i16, i16); KING_ID as usize + 1] = [
    (0, 0),
    (30, 2),
    (50, 4),
    (50, 3),
    (70, 6),
    (90, 5),
    (120, 8),
];

