//! Expected-value combat for lookahead
//!
//! The authoritative resolver rolls damage from a seed. Inside the tree the
//! search has no business consuming randomness, so it plays every attack out
//! at the mean of each roll instead. The formula follows the same order as
//! the authoritative one: base, level, fatigue, rng, crit, armor, execute,
//! floor.
//!
//! The parameters travel on the board as a [`CombatModel`], filled in by
//! whoever packs the position, so lookahead and the real resolver agree on
//! the numbers.

use crate::constants::*;
use crate::types::PackedPiece;

/// Loyalty from which an attacker gets the devoted crit chance
pub const DEVOTED_LOYALTY: u8 = 90;

/// Combat and action-point parameters the lookahead plays by
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CombatModel {
    pub damage_per_value: f32,
    pub fatigue_per_turn: f32,
    /// Mean of the damage roll
    pub expected_rng_mult: f32,
    /// Mean of the armor roll
    pub expected_armor_roll: f32,
    pub crit_chance: f32,
    pub devoted_crit_chance: f32,
    pub crit_multiplier: f32,
    pub execute_hp_fraction: f32,
    pub execute_overkill: i16,
    pub ap_per_turn: u8,
    pub max_ap: u8,
}

impl Default for CombatModel {
    fn default() -> Self {
        Self {
            damage_per_value: 4.0,
            fatigue_per_turn: 0.01,
            expected_rng_mult: 0.9,
            expected_armor_roll: 0.75,
            crit_chance: 0.15,
            devoted_crit_chance: 0.20,
            crit_multiplier: 1.5,
            execute_hp_fraction: 0.2,
            execute_overkill: 100,
            ap_per_turn: 1,
            max_ap: 10,
        }
    }
}

/// Expected damage of `attacker` hitting `defender` on `turn_number`.
///
/// Always at least 1. When the execute rule applies the result is large
/// enough to kill outright.
pub fn expected_damage(attacker: &PackedPiece, defender: &PackedPiece, turn_number: u32, model: &CombatModel) -> i16 {
    let value = COMBAT_VALUE
        .get(attacker.kind as usize)
        .copied()
        .unwrap_or(0) as f32;
    let base = value * model.damage_per_value;
    let level_mult = attacker.level as f32 / 5.0 + 1.0;
    let fatigue_mult = 1.0 + turn_number as f32 * model.fatigue_per_turn;

    let crit_chance = if attacker.loyalty >= DEVOTED_LOYALTY {
        model.devoted_crit_chance
    } else {
        model.crit_chance
    };
    let crit_mult = 1.0 + crit_chance * (model.crit_multiplier - 1.0);

    let raw = base * level_mult * fatigue_mult * model.expected_rng_mult * crit_mult;
    let armor_reduction = defender.armor.max(0) as f32 * model.expected_armor_roll;

    if defender.hp_fraction() < model.execute_hp_fraction && raw > armor_reduction {
        return defender
            .hp
            .saturating_add(defender.armor)
            .saturating_add(model.execute_overkill);
    }

    ((raw - armor_reduction).round().min(i16::MAX as f32) as i16).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_damage_floors_at_one() {
        let pawn = PackedPiece::new(PAWN_ID, COLOR_WHITE, 8);
        let mut wall = PackedPiece::new(ROOK_ID, COLOR_BLACK, 16);
        wall.armor = 50;

        assert_eq!(expected_damage(&pawn, &wall, 1, &CombatModel::default()), 1);
    }

    #[test]
    fn test_execute_kills_low_hp_defender() {
        let queen = PackedPiece::new(QUEEN_ID, COLOR_WHITE, 3);
        let mut rook = PackedPiece::new(ROOK_ID, COLOR_BLACK, 59);
        rook.hp = 5;

        let damage = expected_damage(&queen, &rook, 30, &CombatModel::default());
        assert!(damage >= rook.hp, "Execute must be lethal, got {}", damage);
    }

    #[test]
    fn test_damage_grows_with_turn_number() {
        let knight = PackedPiece::new(KNIGHT_ID, COLOR_WHITE, 1);
        let pawn = PackedPiece::new(PAWN_ID, COLOR_BLACK, 48);
        let model = CombatModel::default();

        assert!(expected_damage(&knight, &pawn, 90, &model) > expected_damage(&knight, &pawn, 1, &model));
    }

    #[test]
    fn test_damage_follows_the_model() {
        let knight = PackedPiece::new(KNIGHT_ID, COLOR_WHITE, 1);
        let rook = PackedPiece::new(ROOK_ID, COLOR_BLACK, 56);
        let heavy = CombatModel {
            damage_per_value: 40.0,
            ..CombatModel::default()
        };

        assert!(expected_damage(&knight, &rook, 30, &CombatModel::default()) < rook.hp);
        assert!(
            expected_damage(&knight, &rook, 30, &heavy) >= rook.hp,
            "Ten times the damage per value kills a fresh rook"
        );
    }
}
