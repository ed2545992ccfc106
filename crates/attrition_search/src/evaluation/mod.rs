//! Static evaluation of a packed position
//!
//! Scores are centipawns from White's point of view and combine:
//! - Material scaled by each piece's remaining HP fraction
//! - A bonus per banked action point
//! - A penalty for every piece whose loyalty has dropped into the defecting band
//! - A bonus for every non-king piece standing in the opponent's half
//!
//! ## Module Organization
//!
//! - `material` - HP-scaled material balance
//! - `position` - Full evaluation (material + AP + loyalty + advancement)

mod material;
mod position;

pub use material::evaluate_material;
pub use position::{evaluate_for_side, evaluate_position};
