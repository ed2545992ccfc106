//! Error types for the engine
//!
//! Every rejected command surfaces as an [`EngineError`]. The variants mirror
//! the classes a client needs to tell apart: an illegal move (with the
//! specific reason), an unknown match, a command against the wrong state, and
//! input that could not be parsed.
//!
//! Commands validate before they mutate, so receiving any of these errors
//! means the game was left exactly as it was.

use crate::game::types::Position;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Why the legality engine rejected a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IllegalMoveReason {
    /// The source square is empty
    NoPieceAtSource,
    /// The piece on the source square belongs to the side not on move
    WrongTurn,
    /// The piece cannot reach the destination from where it stands
    IllegalGeometry,
    /// The move would leave the mover's own king attacked
    LeavesKingInCheck,
    /// A two-square king move whose castling conditions are not met
    CastlingNotAllowed,
    /// Promotion to a pawn or king
    InvalidPromotion,
}

impl fmt::Display for IllegalMoveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IllegalMoveReason::NoPieceAtSource => "no piece at source square",
            IllegalMoveReason::WrongTurn => "not this side's turn",
            IllegalMoveReason::IllegalGeometry => "piece cannot move that way",
            IllegalMoveReason::LeavesKingInCheck => "move leaves own king in check",
            IllegalMoveReason::CastlingNotAllowed => "castling not allowed",
            IllegalMoveReason::InvalidPromotion => "invalid promotion piece",
        };
        f.write_str(text)
    }
}

/// Coarse error class reported to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    IllegalMove,
    NotFound,
    InvalidState,
    MalformedInput,
}

/// Errors returned by engine commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The legality engine rejected the move
    #[error("Illegal move {from}-{to}: {reason}")]
    IllegalMove {
        from: Position,
        to: Position,
        reason: IllegalMoveReason,
    },

    /// Unknown match, piece or ability
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// Command issued against a game that cannot accept it
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    /// Unparseable square notation, piece name or out-of-range coordinate
    #[error("Malformed input: {message}")]
    MalformedInput { message: String },
}

impl EngineError {
    pub fn illegal(from: Position, to: Position, reason: IllegalMoveReason) -> Self {
        EngineError::IllegalMove { from, to, reason }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        EngineError::NotFound { what: what.into() }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        EngineError::InvalidState {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        EngineError::MalformedInput {
            message: message.into(),
        }
    }

    /// The error class, for clients that only branch on the category
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::IllegalMove { .. } => ErrorKind::IllegalMove,
            EngineError::NotFound { .. } => ErrorKind::NotFound,
            EngineError::InvalidState { .. } => ErrorKind::InvalidState,
            EngineError::MalformedInput { .. } => ErrorKind::MalformedInput,
        }
    }

    /// The specific rejection reason for illegal moves
    pub fn illegal_reason(&self) -> Option<IllegalMoveReason> {
        match self {
            EngineError::IllegalMove { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, EngineError>;

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file I/O error
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config deserialization error
    #[error("Config serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Values that parse but make no sense together
    #[error("Invalid config: {message}")]
    Invalid { message: String },
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_classification() {
        let from = Position::new(4, 1).expect("e2");
        let to = Position::new(4, 4).expect("e5");
        let err = EngineError::illegal(from, to, IllegalMoveReason::IllegalGeometry);

        assert_eq!(err.kind(), ErrorKind::IllegalMove);
        assert_eq!(err.illegal_reason(), Some(IllegalMoveReason::IllegalGeometry));
        assert_eq!(err.to_string(), "Illegal move e2-e5: piece cannot move that way");
        assert_eq!(EngineError::not_found("match").kind(), ErrorKind::NotFound);
    }
}
