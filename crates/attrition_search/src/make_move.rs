//! Copy-make move application for the packed board
//!
//! Every node of the search works on its own copy of the board, so a move is
//! applied by copying the parent and mutating the copy. There is no unmake:
//! combat changes HP on both outcomes, and a copy of a `Copy` struct is
//! cheaper than recording all of that for undo.
//!
//! ## Attacks
//!
//! - Outside attrition an attack is an ordinary capture.
//! - In attrition the defender takes [`expected_damage`]. If that kills it the
//!   attacker moves in; otherwise the attack bounces and the attacker stays.
//! - En passant lands on an empty square, so it always captures outright.

use crate::board::*;
use crate::combat::expected_damage;
use crate::constants::*;
use crate::move_gen::{castle_rook_squares, en_passant_victim_square};
use crate::types::*;

impl PackedBoard {
    /// Return the position after `mv`. The receiver is untouched.
    pub fn make_move(&self, mv: PackedMove) -> PackedBoard {
        let mut next = *self;
        next.en_passant = NO_SQUARE;

        let color = self.side_to_move;
        let Some(mover) = self.piece_at(mv.from).copied() else {
            next.pass_turn();
            return next;
        };

        let mut bounced = false;
        if mv.is_attack() {
            let victim_square = if mv.is_en_passant() {
                en_passant_victim_square(mv.to, color)
            } else {
                mv.to
            };
            let victim_slot = self.squares[victim_square as usize];
            if victim_slot != EMPTY {
                let victim = self.pieces[victim_slot as usize];
                let lethal = if self.is_attrition() && !mv.is_en_passant() {
                    let damage = expected_damage(&mover, &victim, self.turn_number, &self.combat);
                    let remaining = victim.hp.saturating_sub(damage).max(0);
                    next.pieces[victim_slot as usize].hp = remaining;
                    remaining == 0
                } else {
                    true
                };

                if lethal {
                    next.remove_piece(victim_square);
                    next.clear_castling_for(victim_square);
                } else {
                    bounced = true;
                }
            }
        }

        if !bounced {
            next.relocate(mv.from, mv.to);

            if mv.is_castle() {
                if let Some((rook_from, rook_to)) = castle_rook_squares(mv.to) {
                    next.relocate(rook_from, rook_to);
                }
            }

            if mv.flags & FLAG_PROMOTION != 0 && mover.kind == PAWN_ID {
                let slot = next.squares[mv.to as usize];
                if slot != EMPTY {
                    next.pieces[slot as usize].kind = if mv.promotion == VOID_ID {
                        QUEEN_ID
                    } else {
                        mv.promotion
                    };
                }
            }

            if mv.flags & FLAG_DOUBLE_PUSH != 0 {
                next.en_passant = (mv.from + mv.to) / 2;
            }

            if mover.kind == KING_ID {
                next.castling &= if color > 0 {
                    !(CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE)
                } else {
                    !(CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE)
                };
            }
            next.clear_castling_for(mv.from);
        }

        next.pass_turn();
        next
    }

    /// Flip the side to move, advance the turn counter when White is up
    /// again and grant the incoming side its action points.
    fn pass_turn(&mut self) {
        self.side_to_move = opposite(self.side_to_move);
        if self.side_to_move == COLOR_WHITE {
            self.turn_number += 1;
        }
        let ap = &mut self.action_points[color_index(self.side_to_move)];
        *ap = ap.saturating_add(self.combat.ap_per_turn).min(self.combat.max_ap);
    }

    fn remove_piece(&mut self, square: Square) {
        let slot = self.squares[square as usize];
        if slot == EMPTY {
            return;
        }
        let color = self.pieces[slot as usize].color;
        self.pieces[slot as usize].square = NO_SQUARE;
        self.squares[square as usize] = EMPTY;
        self.occupancy_mut(color).remove(square as u32);
    }

    fn relocate(&mut self, from: Square, to: Square) {
        let slot = self.squares[from as usize];
        if slot == EMPTY {
            return;
        }
        let color = self.pieces[slot as usize].color;
        self.squares[from as usize] = EMPTY;
        self.squares[to as usize] = slot;
        self.pieces[slot as usize].square = to;
        let occupancy = self.occupancy_mut(color);
        occupancy.remove(from as u32);
        occupancy.insert(to as u32);
    }

    /// A rook leaving or dying on its corner loses that side's castling right.
    fn clear_castling_for(&mut self, square: Square) {
        let right = match square {
            0 => CASTLE_WHITE_QUEENSIDE,
            7 => CASTLE_WHITE_KINGSIDE,
            56 => CASTLE_BLACK_QUEENSIDE,
            63 => CASTLE_BLACK_KINGSIDE,
            _ => 0,
        };
        self.castling &= !right;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duel(attrition_start: u32, defender_hp: i16) -> PackedBoard {
        let mut board = PackedBoard::empty(attrition_start);
        board.add_piece(PackedPiece::new(KING_ID, COLOR_WHITE, 4)).expect("e1");
        board.add_piece(PackedPiece::new(KING_ID, COLOR_BLACK, 60)).expect("e8");
        board.add_piece(PackedPiece::new(ROOK_ID, COLOR_WHITE, 24)).expect("a4");
        let mut knight = PackedPiece::new(KNIGHT_ID, COLOR_BLACK, 32);
        knight.hp = defender_hp;
        board.add_piece(knight).expect("a5");
        board
    }

    #[test]
    fn test_standard_capture_replaces_defender() {
        let board = duel(25, 50);
        let next = board.make_move(PackedMove::new(24, 32, FLAG_ATTACK));

        assert_eq!(next.piece_at(32).map(|p| p.kind), Some(ROOK_ID));
        assert!(next.is_empty_square(24));
        assert_eq!(next.black.count_ones(), 1, "Only the black king remains");
    }

    #[test]
    fn test_attrition_bounce_keeps_attacker_home() {
        let board = duel(1, 50);
        let next = board.make_move(PackedMove::new(24, 32, FLAG_ATTACK));

        assert_eq!(next.piece_at(24).map(|p| p.kind), Some(ROOK_ID), "Rook bounced");
        let knight = next.piece_at(32).expect("knight survives");
        assert!(knight.hp < 50 && knight.hp > 0, "Knight took damage: {}", knight.hp);
    }

    #[test]
    fn test_attrition_lethal_hit_moves_in() {
        let board = duel(1, 3);
        let next = board.make_move(PackedMove::new(24, 32, FLAG_ATTACK));

        assert_eq!(next.piece_at(32).map(|p| p.kind), Some(ROOK_ID));
    }

    #[test]
    fn test_turn_number_advances_after_black_moves() {
        let board = PackedBoard::standard(25);
        let after_white = board.make_move(PackedMove::new(12, 28, FLAG_DOUBLE_PUSH));
        assert_eq!(after_white.turn_number, 1);
        assert_eq!(after_white.en_passant, 20, "e3 is the en-passant target");

        let after_black = after_white.make_move(PackedMove::new(52, 36, FLAG_DOUBLE_PUSH));
        assert_eq!(after_black.turn_number, 2);
        assert_eq!(after_black.side_to_move, COLOR_WHITE);
    }

    #[test]
    fn test_castle_relocates_rook_and_clears_rights() {
        let mut board = PackedBoard::empty(25);
        board.add_piece(PackedPiece::new(KING_ID, COLOR_WHITE, 4)).expect("e1");
        board.add_piece(PackedPiece::new(ROOK_ID, COLOR_WHITE, 7)).expect("h1");
        board.add_piece(PackedPiece::new(KING_ID, COLOR_BLACK, 60)).expect("e8");
        board.castling = CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE;

        let next = board.make_move(PackedMove::new(4, 6, FLAG_CASTLE));
        assert_eq!(next.piece_at(5).map(|p| p.kind), Some(ROOK_ID), "Rook on f1");
        assert_eq!(next.piece_at(6).map(|p| p.kind), Some(KING_ID), "King on g1");
        assert_eq!(next.castling, 0);
    }

    #[test]
    fn test_heavier_combat_model_turns_bounce_into_kill() {
        let mut board = duel(1, 50);
        board.combat.damage_per_value = 40.0;
        let next = board.make_move(PackedMove::new(24, 32, FLAG_ATTACK));

        assert_eq!(next.piece_at(32).map(|p| p.kind), Some(ROOK_ID), "Rook moved in");
    }

    #[test]
    fn test_action_points_follow_model_cap() {
        let mut board = PackedBoard::standard(25);
        board.combat.ap_per_turn = 3;
        board.combat.max_ap = 20;
        board.action_points = [0, 16];

        let next = board.make_move(PackedMove::new(12, 28, FLAG_DOUBLE_PUSH));
        assert_eq!(next.action_points[color_index(COLOR_BLACK)], 19, "Cap above ten is honoured");

        let again = next.make_move(PackedMove::new(52, 36, FLAG_DOUBLE_PUSH));
        let last = again.make_move(PackedMove::new(11, 27, FLAG_DOUBLE_PUSH));
        assert_eq!(last.action_points[color_index(COLOR_BLACK)], 20);
    }
}
