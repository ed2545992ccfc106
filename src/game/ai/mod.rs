//! AI opponents
//!
//! # Architecture
//!
//! The [`Game`](crate::game::aggregate::Game) is the source of truth. Before a
//! search:
//! 1. Pack the game into a [`PackedBoard`](attrition_search::PackedBoard)
//! 2. Search the packed copy (possibly on a worker, without the match lock)
//! 3. Convert the result to a [`ChosenMove`]
//! 4. Apply it through [`Game::execute_move`](crate::game::aggregate::Game::execute_move)
//!
//! This ensures AI moves follow the same validation rules as human moves.

pub mod bots;
pub mod bridge;

// Re-export for convenience
pub use bots::{BotKind, GreedyBot, MinimaxBot, MoveChooser, RandomBot};
pub use bridge::{pack_game, unpack_move, ChosenMove};
