//! Ability catalog, ability use and the per-turn cooldown/effect tick
//!
//! The catalog is plain data inside [`EngineConfig`](crate::core::EngineConfig);
//! pieces only hold `(ability_id, cooldown)` pairs pointing into it.
//!
//! # Tick Order
//!
//! Once per turn, for every piece of the side that just moved:
//!
//! 1. Effects already at zero turns are purged
//! 2. Ability cooldowns drop by one, never below zero
//! 3. Remaining effects apply their per-tick action and lose a turn
//!
//! An effect that reaches zero therefore stays visible, inert, for exactly one
//! tick before it is removed.

use crate::game::board::Board;
use crate::game::piece::{ActiveEffect, EffectType, Piece, PieceAbility, PieceId, MAX_ABILITIES};
use crate::game::types::{Color, PieceType, Position};
use serde::{Deserialize, Serialize};

/// What an ability does when used
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityEffect {
    /// Timed effect on the user
    ApplyEffect {
        effect_type: EffectType,
        magnitude: i32,
        duration: u32,
    },
    /// Heal the user and every adjacent ally
    HealArea { amount: i32 },
    /// Raise the loyalty of every adjacent ally
    RallyLoyalty { amount: i32 },
}

/// Static catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityDefinition {
    pub id: String,
    pub name: String,
    /// Piece types granted this ability at setup
    pub piece_types: Vec<PieceType>,
    pub cooldown: u32,
    pub ap_cost: u32,
    pub effect: AbilityEffect,
}

impl AbilityDefinition {
    pub fn available_to(&self, piece_type: PieceType) -> bool {
        self.piece_types.contains(&piece_type)
    }
}

/// Built-in abilities
pub fn default_catalog() -> Vec<AbilityDefinition> {
    vec![
        AbilityDefinition {
            id: "fortify".to_string(),
            name: "Fortify".to_string(),
            piece_types: vec![PieceType::Rook, PieceType::Pawn],
            cooldown: 4,
            ap_cost: 2,
            effect: AbilityEffect::ApplyEffect {
                effect_type: EffectType::ArmorBoost,
                magnitude: 3,
                duration: 3,
            },
        },
        AbilityDefinition {
            id: "mend".to_string(),
            name: "Mend".to_string(),
            piece_types: vec![PieceType::Bishop],
            cooldown: 3,
            ap_cost: 3,
            effect: AbilityEffect::HealArea { amount: 15 },
        },
        AbilityDefinition {
            id: "bloodlust".to_string(),
            name: "Bloodlust".to_string(),
            piece_types: vec![PieceType::Queen, PieceType::Knight],
            cooldown: 5,
            ap_cost: 3,
            effect: AbilityEffect::ApplyEffect {
                effect_type: EffectType::DamageBoost,
                magnitude: 25,
                duration: 2,
            },
        },
        AbilityDefinition {
            id: "rally".to_string(),
            name: "Rally".to_string(),
            piece_types: vec![PieceType::King],
            cooldown: 6,
            ap_cost: 4,
            effect: AbilityEffect::RallyLoyalty { amount: 10 },
        },
    ]
}

/// Give a piece every catalog ability for its type, up to the cap
pub fn grant_abilities(piece: &mut Piece, catalog: &[AbilityDefinition]) {
    let piece_type = piece.piece_type();
    for definition in catalog.iter().filter(|d| d.available_to(piece_type)) {
        if piece.abilities.len() >= MAX_ABILITIES {
            break;
        }
        if piece.ability(&definition.id).is_none() {
            piece.abilities.push(PieceAbility::new(definition.id.clone()));
        }
    }
}

/// Per-piece change made by an ability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbilityImpact {
    pub piece_id: PieceId,
    /// HP healed, loyalty gained or effect magnitude
    pub amount: i32,
}

/// Apply an ability's effect for `user`; cooldown and AP are the caller's job
pub fn apply_effect(board: &mut Board, user: PieceId, definition: &AbilityDefinition) -> Vec<AbilityImpact> {
    let Some((color, origin)) = board.piece(user).and_then(|p| Some((p.color(), p.position()?))) else {
        return Vec::new();
    };

    match definition.effect {
        AbilityEffect::ApplyEffect {
            effect_type,
            magnitude,
            duration,
        } => {
            let Some(piece) = board.piece_mut(user) else {
                return Vec::new();
            };
            piece.effects.push(ActiveEffect {
                effect_type,
                magnitude,
                remaining_turns: duration,
            });
            vec![AbilityImpact {
                piece_id: user,
                amount: magnitude,
            }]
        }
        AbilityEffect::HealArea { amount } => {
            let mut targets = adjacent_allies(board, origin, color);
            targets.insert(0, user);
            targets
                .into_iter()
                .filter_map(|id| {
                    let healed = board.piece_mut(id)?.heal(amount);
                    Some(AbilityImpact {
                        piece_id: id,
                        amount: healed,
                    })
                })
                .collect()
        }
        // Loyalty goes through the loyalty manager so it is audited
        AbilityEffect::RallyLoyalty { amount } => adjacent_allies(board, origin, color)
            .into_iter()
            .map(|id| AbilityImpact { piece_id: id, amount })
            .collect(),
    }
}

fn adjacent_allies(board: &Board, origin: Position, color: Color) -> Vec<PieceId> {
    board
        .active_pieces_of(color)
        .filter(|p| p.position().is_some_and(|pos| pos.is_adjacent(origin)))
        .map(|p| p.id())
        .collect()
}

/// Run one tick on a single piece; returns HP regenerated
pub fn tick_piece(piece: &mut Piece) -> i32 {
    piece.effects.retain(|e| e.remaining_turns > 0);

    for ability in piece.abilities.iter_mut() {
        ability.cooldown_remaining = ability.cooldown_remaining.saturating_sub(1);
    }

    let regeneration: i32 = piece
        .effects
        .iter()
        .filter(|e| e.effect_type == EffectType::Regeneration)
        .map(|e| e.magnitude)
        .sum();
    for effect in piece.effects.iter_mut() {
        effect.remaining_turns -= 1;
    }

    if regeneration > 0 {
        piece.heal(regeneration)
    } else {
        0
    }
}

/// Tick every active piece of one side
pub fn tick_side(board: &mut Board, color: Color) {
    for piece in board.pieces_mut().filter(|p| p.color() == color && !p.is_captured()) {
        tick_piece(piece);
    }
}
