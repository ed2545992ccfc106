//! Pieces and their persistent state
//!
//! A [`Piece`] carries everything that survives from turn to turn: health,
//! armor, loyalty, level and XP, abilities and active effects. Its position is
//! `None` once captured; there is no separate captured flag.
//!
//! # Invariants
//!
//! - `current_hp` stays in `[0, max_hp]`
//! - `loyalty` stays in `[0, 100]`
//! - `total_xp` never decreases, and `level` is derived from it, not from `xp`
//!
//! Mutators on this type enforce the clamps. Positions are only changed by
//! [`Board`](super::board::Board), which owns the square index.

use super::types::{Color, PieceType, Position};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Stable arena index of a piece
pub type PieceId = u32;

/// Maximum number of abilities a piece can hold
pub const MAX_ABILITIES: usize = 4;

pub const MAX_LOYALTY: i32 = 100;
pub const STARTING_LOYALTY: i32 = 75;

/// Ordered loyalty bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LoyaltyBand {
    /// Below 30
    Defecting,
    /// 30..50
    Disloyal,
    /// 50..70
    Wavering,
    /// 70..90
    Loyal,
    /// 90 and above
    Devoted,
}

impl LoyaltyBand {
    pub fn from_loyalty(loyalty: i32) -> Self {
        match loyalty {
            l if l < 30 => LoyaltyBand::Defecting,
            l if l < 50 => LoyaltyBand::Disloyal,
            l if l < 70 => LoyaltyBand::Wavering,
            l if l < 90 => LoyaltyBand::Loyal,
            _ => LoyaltyBand::Devoted,
        }
    }
}

/// Kind of timed effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectType {
    /// Adds `magnitude` to armor
    ArmorBoost,
    /// Multiplies outgoing damage by `1 + magnitude / 100`
    DamageBoost,
    /// Heals `magnitude` HP on each tick
    Regeneration,
}

/// A timed effect on a piece
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub effect_type: EffectType,
    pub magnitude: i32,
    pub remaining_turns: u32,
}

impl ActiveEffect {
    /// Effects only apply while turns remain; at zero they wait to be purged
    pub fn is_active(&self) -> bool {
        self.remaining_turns > 0
    }
}

/// An ability a piece holds, with its cooldown counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceAbility {
    pub ability_id: String,
    pub cooldown_remaining: u32,
}

impl PieceAbility {
    pub fn new(ability_id: impl Into<String>) -> Self {
        Self {
            ability_id: ability_id.into(),
            cooldown_remaining: 0,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining == 0
    }
}

/// A piece and its persistent state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub(crate) id: PieceId,
    pub(crate) piece_type: PieceType,
    pub(crate) color: Color,
    pub(crate) position: Option<Position>,
    pub(crate) current_hp: i32,
    pub(crate) max_hp: i32,
    pub(crate) armor: i32,
    pub(crate) loyalty: i32,
    pub(crate) level: u32,
    pub(crate) xp: u32,
    pub(crate) total_xp: u32,
    pub(crate) has_moved: bool,
    pub(crate) abilities: SmallVec<[PieceAbility; MAX_ABILITIES]>,
    pub(crate) effects: Vec<ActiveEffect>,
}

impl Piece {
    /// A fresh piece with the base stats of its type
    pub fn new(id: PieceId, piece_type: PieceType, color: Color, position: Position) -> Self {
        let (max_hp, armor) = piece_type.base_stats();
        Self {
            id,
            piece_type,
            color,
            position: Some(position),
            current_hp: max_hp,
            max_hp,
            armor,
            loyalty: if piece_type == PieceType::King {
                MAX_LOYALTY
            } else {
                STARTING_LOYALTY
            },
            level: 1,
            xp: 0,
            total_xp: 0,
            has_moved: false,
            abilities: SmallVec::new(),
            effects: Vec::new(),
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn piece_type(&self) -> PieceType {
        self.piece_type
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn is_captured(&self) -> bool {
        self.position.is_none()
    }

    pub fn current_hp(&self) -> i32 {
        self.current_hp
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    /// Base armor, without effects
    pub fn armor(&self) -> i32 {
        self.armor
    }

    pub fn loyalty(&self) -> i32 {
        self.loyalty
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Spendable XP
    pub fn xp(&self) -> u32 {
        self.xp
    }

    /// Lifetime XP; drives leveling
    pub fn total_xp(&self) -> u32 {
        self.total_xp
    }

    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    pub fn abilities(&self) -> &[PieceAbility] {
        &self.abilities
    }

    pub fn effects(&self) -> &[ActiveEffect] {
        &self.effects
    }

    /// Current HP over max HP; a zero max HP reads as full health
    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp <= 0 {
            1.0
        } else {
            self.current_hp as f64 / self.max_hp as f64
        }
    }

    /// Armor including active boosts
    pub fn effective_armor(&self) -> i32 {
        self.armor
            + self
                .effects
                .iter()
                .filter(|e| e.is_active() && e.effect_type == EffectType::ArmorBoost)
                .map(|e| e.magnitude)
                .sum::<i32>()
    }

    /// Outgoing damage multiplier from active boosts
    pub fn damage_multiplier(&self) -> f64 {
        1.0 + self
            .effects
            .iter()
            .filter(|e| e.is_active() && e.effect_type == EffectType::DamageBoost)
            .map(|e| e.magnitude as f64 / 100.0)
            .sum::<f64>()
    }

    pub fn loyalty_band(&self) -> LoyaltyBand {
        LoyaltyBand::from_loyalty(self.loyalty)
    }

    /// Chance in `[0, 0.3]` that the piece would defect; zero above the
    /// defecting band
    pub fn defection_risk(&self) -> f64 {
        if self.loyalty_band() == LoyaltyBand::Defecting {
            (30 - self.loyalty).max(0) as f64 / 100.0
        } else {
            0.0
        }
    }

    /// Reduce HP, never below zero. Returns the HP left.
    pub(crate) fn take_damage(&mut self, amount: i32) -> i32 {
        self.current_hp = (self.current_hp - amount.max(0)).clamp(0, self.max_hp.max(0));
        self.current_hp
    }

    /// Restore HP, never above max. Returns the HP actually restored.
    pub(crate) fn heal(&mut self, amount: i32) -> i32 {
        let before = self.current_hp;
        self.current_hp = (self.current_hp + amount.max(0)).min(self.max_hp);
        self.current_hp - before
    }

    /// Shift loyalty and clamp to `[0, 100]`. Returns the applied delta.
    pub(crate) fn adjust_loyalty(&mut self, delta: i32) -> i32 {
        let before = self.loyalty;
        self.loyalty = (self.loyalty + delta).clamp(0, MAX_LOYALTY);
        self.loyalty - before
    }

    pub(crate) fn ability_mut(&mut self, ability_id: &str) -> Option<&mut PieceAbility> {
        self.abilities.iter_mut().find(|a| a.ability_id == ability_id)
    }

    pub fn ability(&self, ability_id: &str) -> Option<&PieceAbility> {
        self.abilities.iter().find(|a| a.ability_id == ability_id)
    }
}
