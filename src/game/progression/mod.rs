//! Progression managers
//!
//! Everything that changes piece state outside of movement and combat.
//!
//! # Module Structure
//!
//! - `xp` - XP awards, leveling from lifetime XP, XP spending and upgrades
//! - `loyalty` - Vassal/lord relationships, adjacency gain, lord-lost penalty
//! - `abilities` - Ability catalog, ability effects, cooldown and effect tick

pub mod abilities;
pub mod loyalty;
pub mod xp;

// Re-export commonly used items
pub use abilities::{default_catalog, AbilityDefinition, AbilityEffect};
pub use loyalty::{LoyaltyManager, LoyaltyReason, LoyaltyRelationship};
pub use xp::{Upgrade, XpSource};
