//! Played-move records and their notation
//!
//! A [`Move`] is written once, after the move is fully applied, and never
//! changed. Notation is long algebraic with markers for the special cases:
//!
//! | Case          | Example          |
//! |---------------|------------------|
//! | Quiet         | `Ng1-f3`         |
//! | Capture       | `e4xd5`          |
//! | Bounce        | `Qd1~d7(-23)`    |
//! | En passant    | `e5xd6 e.p.`     |
//! | Promotion     | `e7-e8=Q`        |
//! | Castling      | `O-O`, `O-O-O`   |
//! | Check / mate  | `+`, `#` suffix  |

use super::piece::PieceId;
use super::types::{Color, PieceType, Position};
use serde::{Deserialize, Serialize};

/// Immutable record of a played move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub piece_id: PieceId,
    pub piece_type: PieceType,
    pub color: Color,
    pub captured: Option<PieceId>,
    pub is_castling: bool,
    pub is_kingside_castle: bool,
    pub is_en_passant: bool,
    pub promotion: Option<PieceType>,
    pub is_check: bool,
    pub is_checkmate: bool,
    /// Non-lethal attack: the attacker stayed on `from`
    pub is_attack_bounce: bool,
    pub damage_dealt: Option<i32>,
    pub is_critical: bool,
    /// Full-move number the move was played in
    pub turn_number: u32,
    pub notation: String,
}

impl Move {
    /// Build the notation string from the record's flags
    pub fn notation_for(&self) -> String {
        let mut text = if self.is_castling {
            if self.is_kingside_castle {
                "O-O".to_string()
            } else {
                "O-O-O".to_string()
            }
        } else {
            let separator = if self.is_attack_bounce {
                "~"
            } else if self.captured.is_some() {
                "x"
            } else {
                "-"
            };
            let mut body = format!("{}{}{}{}", self.piece_type.symbol(), self.from, separator, self.to);
            if self.is_attack_bounce {
                if let Some(damage) = self.damage_dealt {
                    body.push_str(&format!("(-{})", damage));
                }
            }
            if let Some(promotion) = self.promotion {
                body.push('=');
                body.push_str(promotion.symbol());
            }
            if self.is_en_passant {
                body.push_str(" e.p.");
            }
            body
        };

        if self.is_checkmate {
            text.push('#');
        } else if self.is_check {
            text.push('+');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(from: &str, to: &str, piece_type: PieceType) -> Move {
        Move {
            from: Position::from_algebraic(from).expect("from"),
            to: Position::from_algebraic(to).expect("to"),
            piece_id: 0,
            piece_type,
            color: Color::White,
            captured: None,
            is_castling: false,
            is_kingside_castle: false,
            is_en_passant: false,
            promotion: None,
            is_check: false,
            is_checkmate: false,
            is_attack_bounce: false,
            damage_dealt: None,
            is_critical: false,
            turn_number: 1,
            notation: String::new(),
        }
    }

    #[test]
    fn test_quiet_and_capture_notation() {
        let quiet = record("g1", "f3", PieceType::Knight);
        assert_eq!(quiet.notation_for(), "Ng1-f3");

        let mut capture = record("e4", "d5", PieceType::Pawn);
        capture.captured = Some(20);
        assert_eq!(capture.notation_for(), "e4xd5");
    }

    #[test]
    fn test_bounce_never_renders_as_capture() {
        let mut bounce = record("d1", "d7", PieceType::Queen);
        bounce.is_attack_bounce = true;
        bounce.damage_dealt = Some(23);
        assert_eq!(bounce.notation_for(), "Qd1~d7(-23)");
        assert!(!bounce.notation_for().contains('x'));
    }

    #[test]
    fn test_special_move_notation() {
        let mut castle = record("e1", "g1", PieceType::King);
        castle.is_castling = true;
        castle.is_kingside_castle = true;
        castle.is_check = true;
        assert_eq!(castle.notation_for(), "O-O+");

        let mut promo = record("e7", "e8", PieceType::Pawn);
        promo.promotion = Some(PieceType::Queen);
        promo.is_checkmate = true;
        assert_eq!(promo.notation_for(), "e7-e8=Q#");

        let mut ep = record("e5", "d6", PieceType::Pawn);
        ep.captured = Some(19);
        ep.is_en_passant = true;
        assert_eq!(ep.notation_for(), "e5xd6 e.p.");
    }
}
