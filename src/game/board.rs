//! Board: piece arena plus square index
//!
//! Pieces live in an arena (`Vec<Piece>`) addressed by their stable
//! [`PieceId`]; captured pieces stay in the arena with no position. A
//! 64-entry square table maps each square to the id of the piece on it, which
//! enforces at most one active piece per square.
//!
//! # Move Simulation
//!
//! King-safety checks need to try a move and look at the result.
//! [`Board::simulate`] applies the move in place and hands back a
//! [`MoveSimulation`] guard; dropping the guard restores the saved square
//! table and piece positions, so every exit path (early return, `?`, panic
//! unwinding) leaves the board as it was.

use super::piece::{Piece, PieceId};
use super::types::{Color, PieceType, Position};
use crate::core::error::{EngineError, GameResult};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Per-side castling rights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }
}

impl CastlingRights {
    pub fn none() -> Self {
        Self {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    pub fn has(&self, color: Color, kingside: bool) -> bool {
        match (color, kingside) {
            (Color::White, true) => self.white_kingside,
            (Color::White, false) => self.white_queenside,
            (Color::Black, true) => self.black_kingside,
            (Color::Black, false) => self.black_queenside,
        }
    }

    pub fn revoke(&mut self, color: Color, kingside: bool) {
        match (color, kingside) {
            (Color::White, true) => self.white_kingside = false,
            (Color::White, false) => self.white_queenside = false,
            (Color::Black, true) => self.black_kingside = false,
            (Color::Black, false) => self.black_queenside = false,
        }
    }

    pub fn revoke_all(&mut self, color: Color) {
        self.revoke(color, true);
        self.revoke(color, false);
    }

    /// Drop the right tied to a rook's home corner, if `square` is one
    pub fn revoke_corner(&mut self, square: Position) {
        match (square.file(), square.rank()) {
            (0, 0) => self.white_queenside = false,
            (7, 0) => self.white_kingside = false,
            (0, 7) => self.black_queenside = false,
            (7, 7) => self.black_kingside = false,
            _ => {}
        }
    }
}

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// Serialized form of the board; the square index is rebuilt on load
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BoardRecord {
    pieces: Vec<Piece>,
    castling: CastlingRights,
    en_passant: Option<Position>,
    halfmove_clock: u32,
}

/// The mutable piece set and square-level rule state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardRecord", into = "BoardRecord")]
pub struct Board {
    pieces: Vec<Piece>,
    squares: [Option<PieceId>; 64],
    castling: CastlingRights,
    en_passant: Option<Position>,
    halfmove_clock: u32,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    /// Board with no pieces and no castling rights
    pub fn empty() -> Self {
        Self {
            pieces: Vec::new(),
            squares: [None; 64],
            castling: CastlingRights::none(),
            en_passant: None,
            halfmove_clock: 0,
        }
    }

    /// Standard opening layout; ids ascend from a1 to h8
    pub fn standard() -> Self {
        let mut board = Self::empty();
        let ranks = [
            (0u8, Color::White, true),
            (1, Color::White, false),
            (6, Color::Black, false),
            (7, Color::Black, true),
        ];
        for (rank, color, officers) in ranks {
            for file in 0..8u8 {
                let piece_type = if officers {
                    BACK_RANK[file as usize]
                } else {
                    PieceType::Pawn
                };
                let id = board.pieces.len() as PieceId;
                if let Some(position) = Position::from_index(rank as usize * 8 + file as usize) {
                    board.squares[position.index()] = Some(id);
                    board.pieces.push(Piece::new(id, piece_type, color, position));
                }
            }
        }
        board.castling = CastlingRights::default();
        board
    }

    /// Place a new piece with base stats
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidState`] if the square is already occupied.
    pub fn add_piece(&mut self, piece_type: PieceType, color: Color, position: Position) -> GameResult<PieceId> {
        if self.squares[position.index()].is_some() {
            return Err(EngineError::invalid_state(format!("{} is already occupied", position)));
        }
        let id = self.pieces.len() as PieceId;
        self.pieces.push(Piece::new(id, piece_type, color, position));
        self.squares[position.index()] = Some(id);
        Ok(id)
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id as usize)
    }

    pub(crate) fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(id as usize)
    }

    pub fn piece_id_at(&self, position: Position) -> Option<PieceId> {
        self.squares[position.index()]
    }

    pub fn piece_at(&self, position: Position) -> Option<&Piece> {
        self.piece_id_at(position).and_then(|id| self.piece(id))
    }

    pub fn is_empty(&self, position: Position) -> bool {
        self.squares[position.index()].is_none()
    }

    pub fn color_at(&self, position: Position) -> Option<Color> {
        self.piece_at(position).map(|p| p.color)
    }

    /// Every piece ever placed, captured ones included
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub(crate) fn pieces_mut(&mut self) -> impl Iterator<Item = &mut Piece> {
        self.pieces.iter_mut()
    }

    /// Pieces still on the board, in id order
    pub fn active_pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter(|p| !p.is_captured())
    }

    pub fn active_pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.active_pieces().filter(move |p| p.color == color)
    }

    pub fn king_position(&self, color: Color) -> Option<Position> {
        self.active_pieces_of(color)
            .find(|p| p.piece_type == PieceType::King)
            .and_then(|p| p.position)
    }

    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    pub(crate) fn castling_mut(&mut self) -> &mut CastlingRights {
        &mut self.castling
    }

    pub fn en_passant(&self) -> Option<Position> {
        self.en_passant
    }

    pub(crate) fn set_en_passant(&mut self, target: Option<Position>) {
        self.en_passant = target;
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub(crate) fn set_halfmove_clock(&mut self, value: u32) {
        self.halfmove_clock = value;
    }

    /// Relocate an active piece to an empty square
    pub(crate) fn move_piece(&mut self, id: PieceId, to: Position) -> GameResult<()> {
        let from = self
            .piece(id)
            .and_then(|p| p.position)
            .ok_or_else(|| EngineError::invalid_state(format!("piece {} is not on the board", id)))?;
        if self.squares[to.index()].is_some() {
            return Err(EngineError::invalid_state(format!("{} is already occupied", to)));
        }
        self.squares[from.index()] = None;
        self.squares[to.index()] = Some(id);
        if let Some(piece) = self.piece_mut(id) {
            piece.position = Some(to);
            piece.has_moved = true;
        }
        Ok(())
    }

    /// Take a piece off the board; it stays in the arena
    pub(crate) fn capture_piece(&mut self, id: PieceId) {
        let Some(position) = self.piece(id).and_then(|p| p.position) else {
            return;
        };
        self.squares[position.index()] = None;
        if let Some(piece) = self.piece_mut(id) {
            piece.position = None;
        }
    }

    /// Apply a move in place until the returned guard is dropped
    ///
    /// `captured` is the square of the piece removed by the move, which for en
    /// passant differs from `to`. Nothing is validated: the guard exists only
    /// to look at the resulting position.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let safe = {
    ///     let sim = board.simulate(from, to, Some(to));
    ///     !is_king_in_check(sim.board(), color)
    /// }; // board restored here
    /// ```
    pub fn simulate(&mut self, from: Position, to: Position, captured: Option<Position>) -> MoveSimulation<'_> {
        let saved_squares = self.squares;
        let mut saved_positions: SmallVec<[(PieceId, Option<Position>); 2]> = SmallVec::new();

        if let Some(victim_square) = captured {
            if let Some(victim) = self.squares[victim_square.index()] {
                saved_positions.push((victim, Some(victim_square)));
                self.squares[victim_square.index()] = None;
                if let Some(piece) = self.pieces.get_mut(victim as usize) {
                    piece.position = None;
                }
            }
        }

        if let Some(mover) = self.squares[from.index()] {
            saved_positions.push((mover, Some(from)));
            self.squares[from.index()] = None;
            self.squares[to.index()] = Some(mover);
            if let Some(piece) = self.pieces.get_mut(mover as usize) {
                piece.position = Some(to);
            }
        }

        MoveSimulation {
            board: self,
            saved_squares,
            saved_positions,
        }
    }

    fn from_record(record: BoardRecord) -> GameResult<Self> {
        let mut squares = [None; 64];
        for (index, piece) in record.pieces.iter().enumerate() {
            if piece.id as usize != index {
                return Err(EngineError::malformed(format!(
                    "piece id {} stored at arena slot {}",
                    piece.id, index
                )));
            }
            if let Some(position) = piece.position {
                if squares[position.index()].replace(piece.id).is_some() {
                    return Err(EngineError::malformed(format!("two pieces on {}", position)));
                }
            }
        }
        Ok(Self {
            pieces: record.pieces,
            squares,
            castling: record.castling,
            en_passant: record.en_passant,
            halfmove_clock: record.halfmove_clock,
        })
    }
}

impl TryFrom<BoardRecord> for Board {
    type Error = EngineError;

    fn try_from(record: BoardRecord) -> Result<Self, Self::Error> {
        Board::from_record(record)
    }
}

impl From<Board> for BoardRecord {
    fn from(board: Board) -> Self {
        BoardRecord {
            pieces: board.pieces,
            castling: board.castling,
            en_passant: board.en_passant,
            halfmove_clock: board.halfmove_clock,
        }
    }
}

/// Scoped move simulation; restores the board on drop
pub struct MoveSimulation<'a> {
    board: &'a mut Board,
    saved_squares: [Option<PieceId>; 64],
    saved_positions: SmallVec<[(PieceId, Option<Position>); 2]>,
}

impl MoveSimulation<'_> {
    pub fn board(&self) -> &Board {
        self.board
    }
}

impl Drop for MoveSimulation<'_> {
    fn drop(&mut self) {
        self.board.squares = self.saved_squares;
        for &(id, position) in &self.saved_positions {
            if let Some(piece) = self.board.pieces.get_mut(id as usize) {
                piece.position = position;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(s: &str) -> Position {
        Position::from_algebraic(s).expect("valid square")
    }

    #[test]
    fn test_standard_layout() {
        let board = Board::standard();
        assert_eq!(board.active_pieces().count(), 32);
        assert_eq!(board.piece_at(pos("d1")).map(|p| p.piece_type()), Some(PieceType::Queen));
        assert_eq!(board.piece_at(pos("e8")).map(|p| p.piece_type()), Some(PieceType::King));
        assert_eq!(board.king_position(Color::White), Some(pos("e1")));
        assert!(board.castling().has(Color::Black, false));
    }

    #[test]
    fn test_add_piece_rejects_occupied_square() {
        let mut board = Board::empty();
        board
            .add_piece(PieceType::Rook, Color::White, pos("a1"))
            .expect("empty square");
        assert!(board.add_piece(PieceType::Knight, Color::Black, pos("a1")).is_err());
    }

    #[test]
    fn test_capture_excludes_piece_from_active_queries() {
        let mut board = Board::standard();
        let id = board.piece_id_at(pos("d8")).expect("black queen");
        board.capture_piece(id);

        assert!(board.is_empty(pos("d8")));
        assert!(board.piece(id).expect("still in arena").is_captured());
        assert_eq!(board.active_pieces_of(Color::Black).count(), 15);
    }

    #[test]
    fn test_simulation_restores_on_drop() {
        let mut board = Board::standard();
        let before = board.clone();

        {
            let sim = board.simulate(pos("d1"), pos("d7"), Some(pos("d7")));
            assert_eq!(
                sim.board().piece_at(pos("d7")).map(|p| p.color()),
                Some(Color::White),
                "Queen sits on d7 during simulation"
            );
            assert!(sim.board().is_empty(pos("d1")));
        }

        assert_eq!(board, before, "Board must be restored exactly");
    }

    #[test]
    fn test_serde_round_trip_rebuilds_index() {
        let mut board = Board::standard();
        let id = board.piece_id_at(pos("e2")).expect("pawn");
        board.move_piece(id, pos("e4")).expect("e4 is empty");

        let json = serde_json::to_string(&board).expect("serialize");
        let back: Board = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, board);
        assert_eq!(back.piece_id_at(pos("e4")), Some(id));
    }

    #[test]
    fn test_deserialize_rejects_doubled_square() {
        let mut board = Board::empty();
        board.add_piece(PieceType::Rook, Color::White, pos("a1")).expect("a1");
        board.add_piece(PieceType::Rook, Color::Black, pos("h8")).expect("h8");
        let json = serde_json::to_string(&board)
            .expect("serialize")
            .replace("\"h8\"", "\"a1\"");

        assert!(serde_json::from_str::<Board>(&json).is_err());
    }
}
