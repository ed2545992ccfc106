//! XP awards, leveling and upgrades
//!
//! `xp` is spendable currency; `total_xp` is lifetime income and the only
//! input to leveling. Spending never touches `total_xp` or `level`, so a piece
//! that spends down its currency still levels when lifetime XP crosses the
//! next threshold.

use crate::core::config::ProgressionConfig;
use crate::core::error::{EngineError, GameResult};
use crate::game::piece::Piece;
use crate::game::types::PieceType;
use serde::{Deserialize, Serialize};

/// Where an XP award came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum XpSource {
    Capture { victim: PieceType },
    CheckDelivered,
    AbilityUse,
    Survival,
    /// Damage dealt by an attack that bounced
    CombatDamage { damage: i32 },
}

impl XpSource {
    /// Award before the loyalty bonus
    pub fn base_amount(self, config: &ProgressionConfig) -> u32 {
        match self {
            XpSource::Capture { victim } => victim.value() * config.xp_per_capture_value,
            XpSource::CheckDelivered => config.xp_check,
            XpSource::AbilityUse => config.xp_ability_use,
            XpSource::Survival => config.xp_survival,
            XpSource::CombatDamage { damage } => (damage / 2).max(1) as u32,
        }
    }
}

/// Result of a single award
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct XpAward {
    pub granted: u32,
    pub levels_gained: u32,
}

/// Award XP from a source
pub fn award(piece: &mut Piece, source: XpSource, config: &ProgressionConfig) -> XpAward {
    award_xp(piece, source.base_amount(config), config)
}

/// Award a raw XP amount and re-check leveling
///
/// Devoted pieces (loyalty 90 and above) get the configured bonus on top.
/// Both `xp` and `total_xp` grow by the granted amount.
pub fn award_xp(piece: &mut Piece, amount: u32, config: &ProgressionConfig) -> XpAward {
    let bonus = if piece.loyalty() >= 90 {
        (amount as f64 * config.devoted_xp_bonus).floor() as u32
    } else {
        0
    };
    let granted = amount.saturating_add(bonus);
    piece.xp = piece.xp.saturating_add(granted);
    piece.total_xp = piece.total_xp.saturating_add(granted);

    let levels_gained = check_level_up(piece, config);
    tracing::trace!(
        "[XP] piece {} +{} (total {}, level {})",
        piece.id(),
        granted,
        piece.total_xp(),
        piece.level()
    );
    XpAward { granted, levels_gained }
}

/// Level up while lifetime XP covers `level * level_threshold`
fn check_level_up(piece: &mut Piece, config: &ProgressionConfig) -> u32 {
    let threshold = config.level_threshold.max(1);
    let mut gained = 0;
    while let Some(required) = piece.level.checked_mul(threshold) {
        if piece.total_xp < required {
            break;
        }
        piece.level += 1;
        piece.max_hp += config.hp_per_level;
        piece.current_hp = piece.max_hp;
        gained += 1;
    }
    if gained > 0 {
        tracing::debug!("[XP] piece {} reached level {}", piece.id(), piece.level());
    }
    gained
}

/// Spend currency XP; `total_xp` and `level` are untouched
///
/// # Errors
///
/// [`EngineError::InvalidState`] if the piece has less than `amount`.
pub fn spend_xp(piece: &mut Piece, amount: u32) -> GameResult<()> {
    if piece.xp < amount {
        return Err(EngineError::invalid_state(format!(
            "piece {} has {} XP, needs {}",
            piece.id(),
            piece.xp,
            amount
        )));
    }
    piece.xp -= amount;
    Ok(())
}

/// Stat upgrades bought with XP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Upgrade {
    Armor,
    Vitality,
}

impl Upgrade {
    pub fn cost(self, config: &ProgressionConfig) -> u32 {
        match self {
            Upgrade::Armor => config.armor_upgrade_cost,
            Upgrade::Vitality => config.vitality_upgrade_cost,
        }
    }
}

/// Spend XP on an upgrade; nothing changes if the piece cannot afford it
pub fn purchase_upgrade(piece: &mut Piece, upgrade: Upgrade, config: &ProgressionConfig) -> GameResult<()> {
    spend_xp(piece, upgrade.cost(config))?;
    match upgrade {
        Upgrade::Armor => piece.armor += config.armor_upgrade_amount,
        Upgrade::Vitality => {
            piece.max_hp += config.vitality_upgrade_hp;
            piece.heal(config.vitality_upgrade_hp);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::{Color, Position};

    fn knight() -> Piece {
        Piece::new(1, PieceType::Knight, Color::White, Position::new(1, 0).expect("b1"))
    }

    #[test]
    fn test_level_up_fires_from_total_xp_after_spending() {
        let config = ProgressionConfig::default();
        let mut piece = knight();
        award_xp(&mut piece, 90, &config);
        assert_eq!(piece.level(), 1);

        spend_xp(&mut piece, 30).expect("90 XP covers 30");
        assert_eq!((piece.xp(), piece.total_xp(), piece.level()), (60, 90, 1));

        let result = award_xp(&mut piece, 15, &config);
        assert_eq!(result.levels_gained, 1);
        assert_eq!(piece.xp(), 75);
        assert_eq!(piece.total_xp(), 105);
        assert_eq!(piece.level(), 2, "Leveling follows lifetime XP, not currency");
    }

    #[test]
    fn test_level_up_raises_max_hp_and_heals() {
        let config = ProgressionConfig::default();
        let mut piece = knight();
        piece.take_damage(20);

        award_xp(&mut piece, 100, &config);
        assert_eq!(piece.max_hp(), 55);
        assert_eq!(piece.current_hp(), 55, "Level up fully heals");
    }

    #[test]
    fn test_large_award_gains_several_levels() {
        let config = ProgressionConfig::default();
        let mut piece = knight();
        let result = award_xp(&mut piece, 300, &config);
        // thresholds 100 (level 1), 200 (level 2), 300 (level 3)
        assert_eq!(result.levels_gained, 3);
        assert_eq!(piece.level(), 4);
    }

    #[test]
    fn test_level_up_stops_when_threshold_overflows() {
        let config = ProgressionConfig {
            level_threshold: u32::MAX / 2,
            ..ProgressionConfig::default()
        };
        let mut piece = knight();
        award_xp(&mut piece, u32::MAX, &config);
        award_xp(&mut piece, u32::MAX, &config);

        assert_eq!(piece.total_xp(), u32::MAX, "Lifetime XP saturates");
        assert_eq!(piece.level(), 3, "No level whose requirement overflows u32");
    }

    #[test]
    fn test_devoted_bonus() {
        let config = ProgressionConfig::default();
        let mut piece = knight();
        piece.adjust_loyalty(20);
        assert_eq!(piece.loyalty(), 95);

        let result = award_xp(&mut piece, 50, &config);
        assert_eq!(result.granted, 55);
    }

    #[test]
    fn test_spend_rejects_overdraft_without_change() {
        let mut piece = knight();
        piece.xp = 10;
        assert!(spend_xp(&mut piece, 11).is_err());
        assert_eq!(piece.xp(), 10);
    }

    #[test]
    fn test_upgrades_spend_currency_only() {
        let config = ProgressionConfig::default();
        let mut piece = knight();
        award_xp(&mut piece, 95, &config);

        purchase_upgrade(&mut piece, Upgrade::Armor, &config).expect("50 of 95");
        assert_eq!(piece.armor(), 5);
        assert!(purchase_upgrade(&mut piece, Upgrade::Vitality, &config).is_ok());
        assert_eq!(piece.max_hp(), 60);
        assert_eq!(piece.xp(), 5);
        assert_eq!(piece.total_xp(), 95);
        assert_eq!(piece.level(), 1);
        assert!(purchase_upgrade(&mut piece, Upgrade::Armor, &config).is_err());
    }

    #[test]
    fn test_source_amounts() {
        let config = ProgressionConfig::default();
        assert_eq!(XpSource::Capture { victim: PieceType::Rook }.base_amount(&config), 100);
        assert_eq!(XpSource::CombatDamage { damage: 1 }.base_amount(&config), 1);
        assert_eq!(XpSource::CombatDamage { damage: 31 }.base_amount(&config), 15);
    }
}
