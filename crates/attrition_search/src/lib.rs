//! # Attrition Search
//!
//! Packed board representation, non-allocating move generation, static
//! evaluation and fixed-depth minimax for the attrition chess engine.
//!
//! The crate knows nothing about the authoritative game aggregate. Callers
//! pack a position into a [`PackedBoard`] (one copy per search), ask
//! [`find_best_move`] for a move and apply the result through their own
//! rules engine.
//!
//! ## Module Organization
//!
//! - `constants` - Piece codes, direction tables, weights
//! - `bitset` / `board` - Occupancy bitsets and square helpers
//! - `types` - Packed board, pieces, moves and move lists
//! - `combat` - Expected-value combat used during lookahead
//! - `make_move` - Copy-make move application
//! - `move_gen` - Pseudo-legal and legal move generation, attack detection
//! - `evaluation` - Static evaluation
//! - `search` - Negamax alpha-beta with first-found tie breaking

pub mod bitset;
pub mod board;
pub mod combat;
pub mod constants;
pub mod error;
mod make_move;
pub mod move_gen;
pub mod evaluation;
pub mod search;
pub mod types;

pub use combat::CombatModel;
pub use error::{SearchError, SearchResult};
pub use evaluation::{evaluate_for_side, evaluate_position};
pub use move_gen::{generate_legal_moves, generate_pseudo_legal_moves, is_in_check, is_square_attacked};
pub use search::{find_best_move, SearchConfig, SearchOutcome};
pub use types::{Color, MoveList, PackedBoard, PackedMove, PackedPiece, Square};
