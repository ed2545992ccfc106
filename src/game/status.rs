//! Match status state machine
//!
//! `NotStarted -> InProgress -> terminal`. Every variant other than the first
//! two is terminal and has no transitions out.

use super::types::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    NotStarted,
    InProgress,
    Checkmate { winner: Color },
    Stalemate,
    Draw,
    Resignation { winner: Color },
    Forfeit { winner: Color },
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::NotStarted | GameStatus::InProgress)
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            GameStatus::Checkmate { winner }
            | GameStatus::Resignation { winner }
            | GameStatus::Forfeit { winner } => Some(winner),
            _ => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::NotStarted => f.write_str("not started"),
            GameStatus::InProgress => f.write_str("in progress"),
            GameStatus::Checkmate { winner } => write!(f, "checkmate, {} wins", winner),
            GameStatus::Stalemate => f.write_str("stalemate"),
            GameStatus::Draw => f.write_str("draw"),
            GameStatus::Resignation { winner } => write!(f, "resignation, {} wins", winner),
            GameStatus::Forfeit { winner } => write!(f, "forfeit, {} wins", winner),
        }
    }
}
