//! Attrition chess engine
//!
//! Standard chess rules for the opening turns, then attrition: attacks deal
//! damage instead of capturing outright, pieces carry HP, armor, loyalty and
//! experience across the match, and kings can actually die.
//!
//! # Module Structure
//!
//! - `core` - errors, configuration, logging setup
//! - `game` - board, rules, combat, progression and the [`Game`] aggregate
//! - `service` - [`MatchRegistry`] for concurrent matches and AI requests

pub mod core;
pub mod game;
pub mod service;

// Re-export commonly used items
pub use crate::core::{EngineConfig, EngineError, ErrorKind, GameResult, IllegalMoveReason};
pub use crate::game::{Color, Game, GameSnapshot, GameStatus, Move, PieceType, Position};
pub use crate::service::{MatchId, MatchRegistry, MoveRequest};
