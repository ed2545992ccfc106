//! # Packed Search Types - Fixed-Size Board Snapshot
//!
//! ## Overview
//!
//! The search never touches the authoritative game aggregate. Instead the
//! caller packs the current position into a [`PackedBoard`] once per search,
//! and every node of the tree works on a by-value copy of it.
//!
//! ## Layout
//!
//! 1. **Square table** (`squares: [i8; 64]`) - slot index of the piece on
//!    each square, or [`EMPTY`]
//! 2. **Piece arena** (`pieces: [PackedPiece; 32]`) - per-piece combat stats
//!    (HP, armor, loyalty, level) addressed by slot
//! 3. **Occupancy bitsets** (`white`, `black`) - O(1) color/occupancy tests
//! 4. **Rule state** - side to move, castling flags, en-passant square, turn
//!    number and the attrition activation turn
//!
//! The whole struct is `Copy` and a few hundred bytes, so cloning it per node
//! is cheaper than tracking undo information for combat side effects.
//!
//! ## Move Lists
//!
//! [`MoveList`] is a fixed array with a length, so generation never
//! allocates during search.

use super::bitset::BitSet;
use super::combat::CombatModel;
use super::board::*;
use super::constants::*;
use super::error::{SearchError, SearchResult};

pub type Color = i8;
pub type Square = i8;

/// One piece in the packed arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PackedPiece {
    pub kind: i8,
    pub color: Color,
    /// [`NO_SQUARE`] once captured
    pub square: Square,
    pub hp: i16,
    pub max_hp: i16,
    pub armor: i16,
    pub loyalty: u8,
    pub level: u8,
}

impl Default for PackedPiece {
    fn default() -> Self {
        PackedPiece {
            kind: VOID_ID,
            color: COLOR_WHITE,
            square: NO_SQUARE,
            hp: 0,
            max_hp: 0,
            armor: 0,
            loyalty: 0,
            level: 1,
        }
    }
}

impl PackedPiece {
    /// Piece with the standard stats for its kind, full health, level 1
    pub fn new(kind: i8, color: Color, square: Square) -> Self {
        let (max_hp, armor) = if (PAWN_ID..=KING_ID).contains(&kind) {
            BASE_STATS[kind as usize]
        } else {
            (0, 0)
        };
        PackedPiece {
            kind,
            color,
            square,
            hp: max_hp,
            max_hp,
            armor,
            loyalty: if kind == KING_ID { 100 } else { 75 },
            level: 1,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.square != NO_SQUARE
    }

    /// Current HP as a fraction of max HP; a zero max HP counts as healthy.
    #[inline]
    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp <= 0 {
            1.0
        } else {
            self.hp as f32 / self.max_hp as f32
        }
    }
}

/// A move in the packed representation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct PackedMove {
    pub from: Square,
    pub to: Square,
    pub flags: u8,
    /// Piece code to promote to, or [`VOID_ID`]
    pub promotion: i8,
}

impl PackedMove {
    pub fn new(from: Square, to: Square, flags: u8) -> Self {
        PackedMove {
            from,
            to,
            flags,
            promotion: VOID_ID,
        }
    }

    #[inline]
    pub fn is_attack(&self) -> bool {
        self.flags & FLAG_ATTACK != 0
    }

    #[inline]
    pub fn is_castle(&self) -> bool {
        self.flags & FLAG_CASTLE != 0
    }

    #[inline]
    pub fn is_en_passant(&self) -> bool {
        self.flags & FLAG_EN_PASSANT != 0
    }
}

/// Fixed-capacity move buffer.
#[derive(Clone)]
pub struct MoveList {
    moves: [PackedMove; MAX_MOVES],
    len: usize,
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList {
            moves: [PackedMove::default(); MAX_MOVES],
            len: 0,
        }
    }
}

impl MoveList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a move; silently drops overflow past [`MAX_MOVES`].
    #[inline]
    pub fn push(&mut self, mv: PackedMove) {
        if self.len < MAX_MOVES {
            self.moves[self.len] = mv;
            self.len += 1;
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn as_slice(&self) -> &[PackedMove] {
        &self.moves[..self.len]
    }

    pub fn as_mut_slice(&mut self) -> &mut [PackedMove] {
        &mut self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PackedMove> {
        self.as_slice().iter()
    }
}

/// Packed snapshot of a position for lookahead.
#[derive(Copy, Clone, Debug)]
pub struct PackedBoard {
    pub squares: [i8; 64],
    pub pieces: [PackedPiece; MAX_PIECES],
    pub piece_count: u8,
    pub white: BitSet,
    pub black: BitSet,
    pub side_to_move: Color,
    pub castling: u8,
    pub en_passant: Square,
    pub turn_number: u32,
    /// Turn from which attacks resolve as combat
    pub attrition_start: u32,
    /// Action points, indexed by [`color_index`]
    pub action_points: [u8; 2],
    /// Combat and AP parameters for lookahead
    pub combat: CombatModel,
}

impl PackedBoard {
    /// Empty board with White to move on turn 1
    pub fn empty(attrition_start: u32) -> Self {
        PackedBoard {
            squares: [EMPTY; 64],
            pieces: [PackedPiece::default(); MAX_PIECES],
            piece_count: 0,
            white: BitSet::new(),
            black: BitSet::new(),
            side_to_move: COLOR_WHITE,
            castling: 0,
            en_passant: NO_SQUARE,
            turn_number: 1,
            attrition_start,
            action_points: [0, 0],
            combat: CombatModel::default(),
        }
    }

    /// Standard opening position with default stats and full castling rights
    pub fn standard(attrition_start: u32) -> Self {
        let mut board = Self::empty(attrition_start);
        for (square, &code) in SETUP.iter().enumerate() {
            if code == 0 {
                continue;
            }
            let color = if code > 0 { COLOR_WHITE } else { COLOR_BLACK };
            let piece = PackedPiece::new(code.abs(), color, square as i8);
            // The standard layout has exactly 32 pieces on distinct squares.
            let _ = board.add_piece(piece);
        }
        board.castling = CASTLE_WHITE_KINGSIDE
            | CASTLE_WHITE_QUEENSIDE
            | CASTLE_BLACK_KINGSIDE
            | CASTLE_BLACK_QUEENSIDE;
        board
    }

    /// Place a piece into the next free arena slot
    ///
    /// # Errors
    ///
    /// Rejects invalid squares and kinds, occupied squares, and a full arena.
    pub fn add_piece(&mut self, piece: PackedPiece) -> SearchResult<u8> {
        if !(PAWN_ID..=KING_ID).contains(&piece.kind) {
            return Err(SearchError::InvalidPieceKind { kind: piece.kind });
        }
        if !is_valid_pos(piece.square as i32) {
            return Err(SearchError::InvalidSquare {
                square: piece.square,
            });
        }
        if self.squares[piece.square as usize] != EMPTY {
            return Err(SearchError::SquareOccupied {
                square: piece.square,
            });
        }
        if self.piece_count as usize >= MAX_PIECES {
            return Err(SearchError::TooManyPieces { max: MAX_PIECES });
        }

        let slot = self.piece_count;
        self.pieces[slot as usize] = piece;
        self.squares[piece.square as usize] = slot as i8;
        self.occupancy_mut(piece.color).insert(piece.square as u32);
        self.piece_count += 1;
        Ok(slot)
    }

    #[inline]
    pub fn is_attrition(&self) -> bool {
        self.turn_number >= self.attrition_start
    }

    #[inline]
    pub fn occupied(&self) -> BitSet {
        self.white.union(self.black)
    }

    #[inline]
    pub fn occupancy(&self, color: Color) -> BitSet {
        if color > 0 {
            self.white
        } else {
            self.black
        }
    }

    #[inline]
    pub fn occupancy_mut(&mut self, color: Color) -> &mut BitSet {
        if color > 0 {
            &mut self.white
        } else {
            &mut self.black
        }
    }

    #[inline]
    pub fn is_empty_square(&self, square: Square) -> bool {
        !self.occupied().contains(square as u32)
    }

    /// Piece on a square, if any
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<&PackedPiece> {
        let slot = self.squares[square as usize];
        if slot == EMPTY {
            None
        } else {
            Some(&self.pieces[slot as usize])
        }
    }

    /// Color of the piece on a square, if any
    #[inline]
    pub fn color_at(&self, square: Square) -> Option<Color> {
        if self.white.contains(square as u32) {
            Some(COLOR_WHITE)
        } else if self.black.contains(square as u32) {
            Some(COLOR_BLACK)
        } else {
            None
        }
    }

    /// Active pieces in slot order
    pub fn active_pieces(&self) -> impl Iterator<Item = &PackedPiece> {
        self.pieces[..self.piece_count as usize]
            .iter()
            .filter(|p| p.is_active())
    }

    /// Square of a color's king, `None` if it has fallen
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.active_pieces()
            .find(|p| p.kind == KING_ID && p.color == color)
            .map(|p| p.square)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_board_layout() {
        let board = PackedBoard::standard(25);

        assert_eq!(board.piece_count, 32, "Standard layout has 32 pieces");
        assert_eq!(board.white.count_ones(), 16);
        assert_eq!(board.black.count_ones(), 16);
        assert_eq!(board.king_square(COLOR_WHITE), Some(4), "White king on e1");
        assert_eq!(board.king_square(COLOR_BLACK), Some(60), "Black king on e8");
        assert_eq!(board.piece_at(3).map(|p| p.kind), Some(QUEEN_ID), "d1 queen");
    }

    #[test]
    fn test_add_piece_rejects_occupied_square() {
        let mut board = PackedBoard::empty(25);
        board
            .add_piece(PackedPiece::new(ROOK_ID, COLOR_WHITE, 0))
            .expect("first placement succeeds");

        let err = board.add_piece(PackedPiece::new(KNIGHT_ID, COLOR_BLACK, 0));
        assert_eq!(err, Err(SearchError::SquareOccupied { square: 0 }));
    }

    #[test]
    fn test_hp_fraction_with_zero_max_hp() {
        let mut piece = PackedPiece::new(PAWN_ID, COLOR_WHITE, 8);
        piece.max_hp = 0;
        assert_eq!(piece.hp_fraction(), 1.0, "Zero max HP must not divide by zero");
    }

    #[test]
    fn test_move_list_caps_at_capacity() {
        let mut list = MoveList::new();
        for _ in 0..(MAX_MOVES + 10) {
            list.push(PackedMove::new(0, 1, 0));
        }
        assert_eq!(list.len(), MAX_MOVES);
    }
}
