//! Attrition combat resolver
//!
//! Once attrition mode is active an attack deals damage instead of capturing
//! outright. The result is a pure function of the match's combat seed, the
//! turn number and the two piece ids: replaying the same attack always yields
//! the same damage.
//!
//! # Damage Formula
//!
//! ```text
//! raw     = value * damage_per_value * (level / 5 + 1) * (1 + turn * fatigue)
//!           * rng_mult * effect_mult          (* crit_multiplier on a crit)
//! reduced = raw - effective_armor * armor_roll
//! damage  = max(floor(reduced), 1)
//! ```
//!
//! A defender below the execute threshold that would still take damage past
//! its armor is killed outright instead.

use super::piece::Piece;
use crate::core::config::CombatConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Outcome of a single attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatResult {
    pub damage_dealt: i32,
    /// Critical hit, or an execute shown as one
    pub is_critical: bool,
    pub is_execute: bool,
}

/// Seed for one attack: all inputs combined with wrapping addition
pub fn attack_seed(combat_seed: u64, turn_number: u32, attacker_id: u32, defender_id: u32) -> u64 {
    combat_seed
        .wrapping_add(turn_number as u64)
        .wrapping_add(attacker_id as u64)
        .wrapping_add(defender_id as u64)
}

/// Resolve an attack without mutating either piece
///
/// # Arguments
///
/// * `attacker` / `defender` - The two pieces; positions are not consulted
/// * `turn_number` - Current full-move number, drives fatigue and the seed
/// * `combat_seed` - Per-match seed fixed at creation
/// * `config` - Formula parameters
///
/// # Examples
///
/// ```rust,ignore
/// let result = resolve(&queen, &rook, 30, game.combat_seed(), &config.combat);
/// if result.damage_dealt >= rook.current_hp() {
///     // lethal: capture and move in
/// }
/// ```
pub fn resolve(
    attacker: &Piece,
    defender: &Piece,
    turn_number: u32,
    combat_seed: u64,
    config: &CombatConfig,
) -> CombatResult {
    let mut rng = StdRng::seed_from_u64(attack_seed(combat_seed, turn_number, attacker.id(), defender.id()));

    // Draw order is fixed: damage spread, crit roll, armor roll
    let rng_mult = rng.random_range(config.rng_min..=config.rng_max);
    let crit_roll: f64 = rng.random();
    let armor_roll = rng.random_range(config.armor_roll_min..=config.armor_roll_max);

    let base = attacker.piece_type().value() as f64 * config.damage_per_value;
    let level_mult = attacker.level() as f64 / 5.0 + 1.0;
    let fatigue_mult = 1.0 + turn_number as f64 * config.fatigue_per_turn;
    let mut raw = base * level_mult * fatigue_mult * rng_mult * attacker.damage_multiplier();

    let crit_chance = if attacker.loyalty() >= 90 {
        config.crit_base_chance + config.devoted_crit_bonus
    } else {
        config.crit_base_chance
    };
    let is_critical = crit_roll < crit_chance;
    if is_critical {
        raw *= config.crit_multiplier;
    }

    let armor = defender.effective_armor().max(0);
    let armor_reduction = armor as f64 * armor_roll;

    if defender.hp_fraction() < config.execute_hp_fraction && raw > armor_reduction {
        let damage = defender.current_hp() + armor + config.execute_overkill;
        tracing::debug!(
            "[COMBAT] Execute: piece {} on piece {} for {}",
            attacker.id(),
            defender.id(),
            damage
        );
        return CombatResult {
            damage_dealt: damage,
            is_critical: true,
            is_execute: true,
        };
    }

    let damage = ((raw - armor_reduction).floor() as i32).max(1);
    tracing::debug!(
        "[COMBAT] piece {} hits piece {} for {} (raw {:.2}, armor {:.2}, crit {})",
        attacker.id(),
        defender.id(),
        damage,
        raw,
        armor_reduction,
        is_critical
    );

    CombatResult {
        damage_dealt: damage,
        is_critical,
        is_execute: false,
    }
}
