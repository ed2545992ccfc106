//! Read-only match snapshots for clients
//!
//! A [`GameSnapshot`] is what glue layers send over the wire after every
//! command. It is built from the aggregate on demand and never fed back in.

use super::aggregate::Game;
use super::piece::{ActiveEffect, LoyaltyBand, Piece, PieceId};
use super::status::GameStatus;
use super::types::{Color, PieceType, Position};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityView {
    pub id: String,
    pub cooldown_remaining: u32,
    /// Full cooldown from the catalog; 0 if the id is not in the catalog
    pub cooldown: u32,
    pub ready: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceView {
    pub id: PieceId,
    pub piece_type: PieceType,
    pub color: Color,
    pub square: Position,
    pub current_hp: i32,
    pub max_hp: i32,
    pub armor: i32,
    pub effective_armor: i32,
    pub loyalty: i32,
    pub loyalty_band: LoyaltyBand,
    pub defection_risk: f64,
    pub level: u32,
    pub xp: u32,
    pub total_xp: u32,
    pub abilities: Vec<AbilityView>,
    pub effects: Vec<ActiveEffect>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMoveView {
    pub from: Position,
    pub to: Position,
    pub notation: String,
    pub is_attack_bounce: bool,
    pub damage_dealt: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPoints {
    pub white: u32,
    pub black: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub status: GameStatus,
    pub current_turn: Color,
    pub turn_number: u32,
    pub is_attrition_mode: bool,
    pub action_points: ActionPoints,
    /// Active pieces only, in id order
    pub pieces: Vec<PieceView>,
    pub last_move: Option<LastMoveView>,
    pub move_history: Vec<String>,
    /// Whether the side to move is in check
    pub in_check: bool,
    pub checked_king: Option<Position>,
    pub draw_offered_by: Option<Color>,
}

impl GameSnapshot {
    pub fn from_game(game: &Game) -> Self {
        let pieces = game
            .board()
            .active_pieces()
            .filter_map(|piece| piece_view(game, piece))
            .collect();

        let side = game.current_turn();
        let in_check = game.is_in_check(side);

        Self {
            status: game.status(),
            current_turn: side,
            turn_number: game.turn_number(),
            is_attrition_mode: game.is_attrition_mode(),
            action_points: ActionPoints {
                white: game.action_points(Color::White),
                black: game.action_points(Color::Black),
            },
            pieces,
            last_move: game.last_move().map(|m| LastMoveView {
                from: m.from,
                to: m.to,
                notation: m.notation.clone(),
                is_attack_bounce: m.is_attack_bounce,
                damage_dealt: m.damage_dealt,
            }),
            move_history: game.played_moves().iter().map(|m| m.notation.clone()).collect(),
            in_check,
            checked_king: if in_check { game.board().king_position(side) } else { None },
            draw_offered_by: game.draw_offered_by(),
        }
    }

    pub fn piece_on(&self, square: Position) -> Option<&PieceView> {
        self.pieces.iter().find(|p| p.square == square)
    }
}

fn piece_view(game: &Game, piece: &Piece) -> Option<PieceView> {
    let abilities = piece
        .abilities()
        .iter()
        .map(|a| AbilityView {
            id: a.ability_id.clone(),
            cooldown_remaining: a.cooldown_remaining,
            cooldown: game.config().ability(&a.ability_id).map(|d| d.cooldown).unwrap_or(0),
            ready: a.is_ready(),
        })
        .collect();

    Some(PieceView {
        id: piece.id(),
        piece_type: piece.piece_type(),
        color: piece.color(),
        square: piece.position()?,
        current_hp: piece.current_hp(),
        max_hp: piece.max_hp(),
        armor: piece.armor(),
        effective_armor: piece.effective_armor(),
        loyalty: piece.loyalty(),
        loyalty_band: piece.loyalty_band(),
        defection_risk: piece.defection_risk(),
        level: piece.level(),
        xp: piece.xp(),
        total_xp: piece.total_xp(),
        abilities,
        effects: piece.effects().to_vec(),
    })
}
