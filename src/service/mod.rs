//! Service layer - concurrent access to many matches
//!
//! - `registry` - [`MatchRegistry`], one lock per match, string-level commands

pub mod registry;

pub use registry::{MatchId, MatchRegistry, MoveRequest};
