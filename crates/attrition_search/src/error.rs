//! Error types for the search layer
//!
//! Covers failures while building a packed snapshot. Running out of legal
//! moves is not an error: the search reports it as `None`.

use thiserror::Error;

/// Errors that can occur while packing a position for search
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Invalid square index (out of bounds)
    #[error("Invalid square index: {square} (must be 0-63)")]
    InvalidSquare { square: i8 },

    /// Two pieces were packed onto the same square
    #[error("Square {square} is already occupied")]
    SquareOccupied { square: i8 },

    /// Piece code outside pawn..king
    #[error("Invalid piece kind: {kind}")]
    InvalidPieceKind { kind: i8 },

    /// More active pieces than the packed arena holds
    #[error("Too many pieces for packed board (max {max})")]
    TooManyPieces { max: usize },
}

/// Result type alias for search operations
pub type SearchResult<T> = Result<T, SearchError>;
