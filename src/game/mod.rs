//! Game logic module - the attrition chess domain
//!
//! # Module Organization
//!
//! - `types` - Positions, sides and piece kinds
//! - `piece` - Persistent piece state (HP, armor, loyalty, XP, abilities, effects)
//! - `board` - Piece arena, square index, castling rights, en passant, clock
//! - `rules` - Move legality (pure functions plus in-place simulation)
//! - `combat` - Seeded attrition combat resolver
//! - `progression` - XP and leveling, loyalty, ability cooldowns and effects
//! - `moves` - Played-move records and notation
//! - `status` - Match status state machine
//! - `aggregate` - [`Game`], the turn state machine tying it all together
//! - `snapshot` - Read-only client view of a game
//! - `ai` - Packed-board bridge and bots
//!
//! # Dependency Order
//!
//! `types -> piece -> board -> rules -> combat / progression -> aggregate`.
//! The search crate sits beside this module and is only reached through `ai`.

pub mod aggregate;
pub mod ai;
pub mod board;
pub mod combat;
pub mod moves;
pub mod piece;
pub mod progression;
pub mod rules;
pub mod snapshot;
pub mod status;
pub mod types;

// Re-export the main entry points
pub use aggregate::{Game, PersistedGame};
pub use board::{Board, CastlingRights};
pub use moves::Move;
pub use piece::{Piece, PieceId};
pub use snapshot::GameSnapshot;
pub use status::GameStatus;
pub use types::{Color, PieceType, Position};
