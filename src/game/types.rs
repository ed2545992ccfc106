//! Type definitions for board coordinates, sides and piece kinds
//!
//! [`Position`] can only be constructed inside the board, so holding one is
//! proof that it is a valid square. Parsing and display use algebraic
//! notation (`"e4"`), which is also the serde representation.

use crate::core::error::{EngineError, GameResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Board square `(file, rank)`, both in `0..8`
///
/// File 0 is the a-file, rank 0 is White's back rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Position {
    file: u8,
    rank: u8,
}

impl Position {
    /// Create a position from file and rank indices
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MalformedInput`] if either coordinate is outside `0..8`.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let e4 = Position::new(4, 3)?;
    /// assert_eq!(e4.to_string(), "e4");
    /// ```
    pub fn new(file: u8, rank: u8) -> GameResult<Self> {
        if file > 7 || rank > 7 {
            return Err(EngineError::malformed(format!(
                "coordinate ({}, {}) is off the board",
                file, rank
            )));
        }
        Ok(Position { file, rank })
    }

    /// Create a position from a linear index (`rank * 8 + file`)
    pub fn from_index(index: usize) -> Option<Self> {
        if index < 64 {
            Some(Position {
                file: (index % 8) as u8,
                rank: (index / 8) as u8,
            })
        } else {
            None
        }
    }

    /// Create a position from algebraic notation (e.g., "e4")
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let square = Position::from_algebraic("e4")?;
    /// ```
    pub fn from_algebraic(s: &str) -> GameResult<Self> {
        let malformed = || EngineError::malformed(format!("'{}' is not a square", s));
        let mut chars = s.trim().chars();
        let file_char = chars.next().ok_or_else(malformed)?.to_ascii_lowercase();
        let rank_char = chars.next().ok_or_else(malformed)?;
        if chars.next().is_some() || !('a'..='h').contains(&file_char) {
            return Err(malformed());
        }
        let rank_num = rank_char.to_digit(10).ok_or_else(malformed)?;
        if !(1..=8).contains(&rank_num) {
            return Err(malformed());
        }
        Ok(Position {
            file: file_char as u8 - b'a',
            rank: rank_num as u8 - 1,
        })
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    /// Linear index `rank * 8 + file` (a1 = 0, h8 = 63)
    pub fn index(self) -> usize {
        self.rank as usize * 8 + self.file as usize
    }

    /// Step by a file/rank delta, `None` if that leaves the board
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let file = self.file as i8 + file_delta;
        let rank = self.rank as i8 + rank_delta;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Position {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }

    /// Both coordinate deltas at most 1, excluding the square itself
    pub fn is_adjacent(self, other: Position) -> bool {
        self != other
            && (self.file as i8 - other.file as i8).abs() <= 1
            && (self.rank as i8 - other.rank as i8).abs() <= 1
    }

    /// All 64 squares, a1 first
    pub fn all() -> impl Iterator<Item = Position> {
        (0..64).filter_map(Position::from_index)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, self.rank + 1)
    }
}

impl FromStr for Position {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_algebraic(s)
    }
}

impl TryFrom<String> for Position {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Position::from_algebraic(&value)
    }
}

impl From<Position> for String {
    fn from(position: Position) -> Self {
        position.to_string()
    }
}

/// Side of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank direction pawns advance in
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    pub fn back_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    pub fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Rank on which this side's pawns promote
    pub fn promotion_rank(self) -> u8 {
        self.opposite().back_rank()
    }

    /// Index into per-side arrays (White = 0, Black = 1)
    pub fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => f.write_str("White"),
            Color::Black => f.write_str("Black"),
        }
    }
}

impl FromStr for Color {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" | "w" => Ok(Color::White),
            "black" | "b" => Ok(Color::Black),
            other => Err(EngineError::malformed(format!("'{}' is not a side", other))),
        }
    }
}

/// Kind of piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// Piece value used by the damage formula and capture XP
    pub fn value(self) -> u32 {
        match self {
            PieceType::Pawn => 1,
            PieceType::Knight => 3,
            PieceType::Bishop => 3,
            PieceType::Rook => 5,
            PieceType::Queen => 9,
            PieceType::King => 4,
        }
    }

    /// Starting `(max_hp, armor)`
    pub fn base_stats(self) -> (i32, i32) {
        match self {
            PieceType::Pawn => (30, 2),
            PieceType::Knight => (50, 4),
            PieceType::Bishop => (50, 3),
            PieceType::Rook => (70, 6),
            PieceType::Queen => (90, 5),
            PieceType::King => (120, 8),
        }
    }

    /// Notation letter; pawns have none
    pub fn symbol(self) -> &'static str {
        match self {
            PieceType::Pawn => "",
            PieceType::Knight => "N",
            PieceType::Bishop => "B",
            PieceType::Rook => "R",
            PieceType::Queen => "Q",
            PieceType::King => "K",
        }
    }

    pub fn can_promote_to(self) -> bool {
        matches!(
            self,
            PieceType::Knight | PieceType::Bishop | PieceType::Rook | PieceType::Queen
        )
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceType::Pawn => "Pawn",
            PieceType::Knight => "Knight",
            PieceType::Bishop => "Bishop",
            PieceType::Rook => "Rook",
            PieceType::Queen => "Queen",
            PieceType::King => "King",
        };
        f.write_str(name)
    }
}

impl FromStr for PieceType {
    type Err = EngineError;

    /// Accepts letters (`"Q"`, `"n"`) and names (`"queen"`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "p" | "pawn" => Ok(PieceType::Pawn),
            "n" | "knight" => Ok(PieceType::Knight),
            "b" | "bishop" => Ok(PieceType::Bishop),
            "r" | "rook" => Ok(PieceType::Rook),
            "q" | "queen" => Ok(PieceType::Queen),
            "k" | "king" => Ok(PieceType::King),
            other => Err(EngineError::malformed(format!("'{}' is not a piece type", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_algebraic() {
        let square = Position::from_algebraic("e4").expect("valid square");
        assert_eq!(square.file(), 4);
        assert_eq!(square.rank(), 3);
        assert_eq!(square.to_string(), "e4");
        assert_eq!(square.index(), 28);

        let a1: Position = "a1".parse().expect("valid square");
        assert_eq!(a1.index(), 0);
    }

    #[test]
    fn test_position_rejects_bad_input() {
        for bad in ["", "e", "e9", "i4", "e44", "44"] {
            assert!(Position::from_algebraic(bad).is_err(), "'{}' should be rejected", bad);
        }
        assert!(Position::new(8, 0).is_err(), "File 8 is off the board");
    }

    #[test]
    fn test_position_adjacency() {
        let e4 = Position::new(4, 3).expect("e4");
        assert!(e4.is_adjacent(Position::new(5, 4).expect("f5")));
        assert!(e4.is_adjacent(Position::new(4, 2).expect("e3")));
        assert!(!e4.is_adjacent(Position::new(6, 3).expect("g4")));
        assert!(!e4.is_adjacent(e4), "A square is not adjacent to itself");
    }

    #[test]
    fn test_position_offset_stays_on_board() {
        let h8 = Position::new(7, 7).expect("h8");
        assert_eq!(h8.offset(1, 0), None);
        assert_eq!(h8.offset(-1, -1).map(|p| p.to_string()), Some("g7".to_string()));
    }

    #[test]
    fn test_position_serde_as_string() {
        let e4 = Position::new(4, 3).expect("e4");
        let json = serde_json::to_string(&e4).expect("serialize");
        assert_eq!(json, "\"e4\"");
        let back: Position = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, e4);
        assert!(serde_json::from_str::<Position>("\"z9\"").is_err());
    }

    #[test]
    fn test_piece_type_parsing() {
        assert_eq!("Q".parse::<PieceType>().ok(), Some(PieceType::Queen));
        assert_eq!("knight".parse::<PieceType>().ok(), Some(PieceType::Knight));
        assert!("x".parse::<PieceType>().is_err());
        assert!(!PieceType::King.can_promote_to());
    }
}
