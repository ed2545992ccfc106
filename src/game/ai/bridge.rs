//! Packing the authoritative game into the search representation
//!
//! The search crate works on a fixed-size [`PackedBoard`] copy, built once
//! per search. Armor is packed as effective armor so active boosts count in
//! lookahead. Moves come back as square indices and are turned into
//! [`ChosenMove`]s that go through the normal move path.

use crate::game::aggregate::Game;
use crate::game::types::{Color, PieceType, Position};
use attrition_search::constants::{
    BISHOP_ID, CASTLE_BLACK_KINGSIDE, CASTLE_BLACK_QUEENSIDE, CASTLE_WHITE_KINGSIDE, CASTLE_WHITE_QUEENSIDE,
    COLOR_BLACK, COLOR_WHITE, KING_ID, KNIGHT_ID, NO_SQUARE, PAWN_ID, QUEEN_ID, ROOK_ID,
};
use crate::core::config::{CombatConfig, RulesConfig};
use attrition_search::{CombatModel, PackedBoard, PackedMove, PackedPiece, SearchResult};
use serde::{Deserialize, Serialize};

/// A move picked by a bot, ready for [`Game::execute_move`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChosenMove {
    pub from: Position,
    pub to: Position,
    pub promotion: Option<PieceType>,
}

pub fn kind_code(piece_type: PieceType) -> i8 {
    match piece_type {
        PieceType::Pawn => PAWN_ID,
        PieceType::Knight => KNIGHT_ID,
        PieceType::Bishop => BISHOP_ID,
        PieceType::Rook => ROOK_ID,
        PieceType::Queen => QUEEN_ID,
        PieceType::King => KING_ID,
    }
}

pub fn kind_from_code(code: i8) -> Option<PieceType> {
    match code {
        PAWN_ID => Some(PieceType::Pawn),
        KNIGHT_ID => Some(PieceType::Knight),
        BISHOP_ID => Some(PieceType::Bishop),
        ROOK_ID => Some(PieceType::Rook),
        QUEEN_ID => Some(PieceType::Queen),
        KING_ID => Some(PieceType::King),
        _ => None,
    }
}

fn color_code(color: Color) -> i8 {
    match color {
        Color::White => COLOR_WHITE,
        Color::Black => COLOR_BLACK,
    }
}

/// Lookahead parameters derived from the engine config
///
/// Rolls are replaced by the midpoint of their configured range.
pub fn combat_model(combat: &CombatConfig, rules: &RulesConfig) -> CombatModel {
    CombatModel {
        damage_per_value: combat.damage_per_value as f32,
        fatigue_per_turn: combat.fatigue_per_turn as f32,
        expected_rng_mult: ((combat.rng_min + combat.rng_max) / 2.0) as f32,
        expected_armor_roll: ((combat.armor_roll_min + combat.armor_roll_max) / 2.0) as f32,
        crit_chance: combat.crit_base_chance as f32,
        devoted_crit_chance: (combat.crit_base_chance + combat.devoted_crit_bonus) as f32,
        crit_multiplier: combat.crit_multiplier as f32,
        execute_hp_fraction: combat.execute_hp_fraction as f32,
        execute_overkill: clamp_i16(combat.execute_overkill),
        ap_per_turn: rules.ap_per_turn.min(u8::MAX as u32) as u8,
        max_ap: rules.max_ap.min(u8::MAX as u32) as u8,
    }
}

fn clamp_i16(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

/// Snapshot the game into a packed board
///
/// # Errors
///
/// Fails only if the game holds more active pieces than the packed arena.
pub fn pack_game(game: &Game) -> SearchResult<PackedBoard> {
    let board = game.board();
    let config = game.config();
    let mut packed = PackedBoard::empty(config.rules.attrition_start_turn);
    packed.combat = combat_model(&config.combat, &config.rules);

    for piece in board.active_pieces() {
        let Some(position) = piece.position() else {
            continue;
        };
        packed.add_piece(PackedPiece {
            kind: kind_code(piece.piece_type()),
            color: color_code(piece.color()),
            square: position.index() as i8,
            hp: clamp_i16(piece.current_hp()),
            max_hp: clamp_i16(piece.max_hp()),
            armor: clamp_i16(piece.effective_armor()),
            loyalty: piece.loyalty().clamp(0, 100) as u8,
            level: piece.level().min(u8::MAX as u32) as u8,
        })?;
    }

    let rights = board.castling();
    packed.castling = [
        (rights.white_kingside, CASTLE_WHITE_KINGSIDE),
        (rights.white_queenside, CASTLE_WHITE_QUEENSIDE),
        (rights.black_kingside, CASTLE_BLACK_KINGSIDE),
        (rights.black_queenside, CASTLE_BLACK_QUEENSIDE),
    ]
    .iter()
    .filter(|(held, _)| *held)
    .fold(0, |bits, (_, bit)| bits | bit);

    packed.side_to_move = color_code(game.current_turn());
    packed.en_passant = board.en_passant().map(|p| p.index() as i8).unwrap_or(NO_SQUARE);
    packed.turn_number = game.turn_number();
    for color in [Color::White, Color::Black] {
        packed.action_points[color.index()] = game.action_points(color).min(u8::MAX as u32) as u8;
    }
    Ok(packed)
}

/// Convert a packed move back to board squares
pub fn unpack_move(mv: PackedMove) -> Option<ChosenMove> {
    let from = Position::from_index(usize::try_from(mv.from).ok()?)?;
    let to = Position::from_index(usize::try_from(mv.to).ok()?)?;
    Some(ChosenMove {
        from,
        to,
        promotion: kind_from_code(mv.promotion),
    })
}
