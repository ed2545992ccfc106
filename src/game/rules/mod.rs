//! Chess rules module - pure move legality over the authoritative [`Board`]
//!
//! # Architecture
//!
//! - **Pure functions** keyed on [`PieceType`]; there is no per-piece trait object
//! - **In-place simulation** for king safety, restored by a drop guard
//! - **One oracle**: the game aggregate, the bots and the registry all validate
//!   through [`validate_move`]
//!
//! # Module Structure
//!
//! - `piece_moves` - Pseudo-legal projection for each piece type
//! - `legality` - Castling, king safety, checkmate and stalemate
//!
//! [`Board`]: crate::game::board::Board
//! [`PieceType`]: crate::game::types::PieceType

pub mod legality;
pub mod piece_moves;


// Re-export commonly used items
pub use legality::{
    all_legal_moves, is_checkmate, is_king_in_check, is_move_legal, is_square_attacked, is_stalemate,
    legal_destinations, validate_move, MoveKind, RulesMode, ValidatedMove,
};
pub use piece_moves::pseudo_legal_moves;
