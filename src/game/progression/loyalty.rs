//! Loyalty relationships between pieces
//!
//! Each [`LoyaltyRelationship`] is a directed `vassal -> lord` edge carrying
//! an audit trail of every loyalty change applied to the vassal through it.
//! Lords may have many vassals and a piece may be both lord and vassal; the
//! graph is not required to be a tree.
//!
//! # Standard Hierarchy
//!
//! Officers serve their king. Each pawn serves the officer that started on
//! its file's back rank (the d-pawn serves the queen, the e-pawn the king).

use crate::core::config::ProgressionConfig;
use crate::game::board::Board;
use crate::game::piece::PieceId;
use crate::game::types::{Color, PieceType, Position};
use serde::{Deserialize, Serialize};

/// Why a loyalty change happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoyaltyReason {
    LordAdjacent,
    LordCaptured,
    Rally,
}

/// One entry in a relationship's audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyChange {
    pub turn: u32,
    /// Delta actually applied after clamping
    pub delta: i32,
    pub loyalty_after: i32,
    pub reason: LoyaltyReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyRelationship {
    pub vassal: PieceId,
    pub lord: PieceId,
    pub history: Vec<LoyaltyChange>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyManager {
    relationships: Vec<LoyaltyRelationship>,
}

impl LoyaltyManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the standard hierarchy from a starting layout
    pub fn build_standard(board: &Board) -> Self {
        let mut manager = Self::new();
        for color in [Color::White, Color::Black] {
            let Some(king) = board
                .active_pieces_of(color)
                .find(|p| p.piece_type() == PieceType::King)
                .map(|p| p.id())
            else {
                continue;
            };

            let edges: Vec<(PieceId, PieceId)> = board
                .active_pieces_of(color)
                .filter(|p| p.piece_type() != PieceType::King)
                .filter_map(|p| {
                    if p.piece_type() != PieceType::Pawn {
                        return Some((p.id(), king));
                    }
                    let file = p.position()?.file();
                    let lord = board
                        .piece_at(Position::new(file, color.back_rank()).ok()?)
                        .filter(|l| l.color() == color && l.piece_type() != PieceType::Pawn)?;
                    Some((p.id(), lord.id()))
                })
                .collect();

            for (vassal, lord) in edges {
                manager.add(vassal, lord);
            }
        }
        manager
    }

    /// Add a `vassal -> lord` edge; a vassal keeps only its first lord
    pub fn add(&mut self, vassal: PieceId, lord: PieceId) {
        if vassal == lord || self.lord_of(vassal).is_some() {
            return;
        }
        self.relationships.push(LoyaltyRelationship {
            vassal,
            lord,
            history: Vec::new(),
        });
    }

    pub fn relationships(&self) -> &[LoyaltyRelationship] {
        &self.relationships
    }

    pub fn lord_of(&self, vassal: PieceId) -> Option<PieceId> {
        self.relationships.iter().find(|r| r.vassal == vassal).map(|r| r.lord)
    }

    pub fn vassals_of(&self, lord: PieceId) -> impl Iterator<Item = PieceId> + '_ {
        self.relationships.iter().filter(move |r| r.lord == lord).map(|r| r.vassal)
    }

    pub fn history_of(&self, vassal: PieceId) -> &[LoyaltyChange] {
        self.relationships
            .iter()
            .find(|r| r.vassal == vassal)
            .map(|r| r.history.as_slice())
            .unwrap_or(&[])
    }

    /// Apply a change to a vassal's loyalty and log it on its edge
    ///
    /// Returns the applied delta. Pieces with no lord still change; the change
    /// is just not recorded anywhere.
    pub fn apply(&mut self, board: &mut Board, vassal: PieceId, delta: i32, turn: u32, reason: LoyaltyReason) -> i32 {
        let Some(piece) = board.piece_mut(vassal) else {
            return 0;
        };
        let applied = piece.adjust_loyalty(delta);
        let loyalty_after = piece.loyalty();
        if let Some(relationship) = self.relationships.iter_mut().find(|r| r.vassal == vassal) {
            relationship.history.push(LoyaltyChange {
                turn,
                delta: applied,
                loyalty_after,
                reason,
            });
        }
        applied
    }

    /// Per-turn recompute for one side: vassals beside a living lord gain loyalty
    ///
    /// Returns how many vassals gained.
    pub fn update_turn(&mut self, board: &mut Board, color: Color, turn: u32, config: &ProgressionConfig) -> usize {
        let beside_lord: Vec<PieceId> = self
            .relationships
            .iter()
            .filter(|r| {
                let (Some(vassal), Some(lord)) = (board.piece(r.vassal), board.piece(r.lord)) else {
                    return false;
                };
                match (vassal.position(), lord.position()) {
                    (Some(v), Some(l)) => vassal.color() == color && v.is_adjacent(l),
                    _ => false,
                }
            })
            .map(|r| r.vassal)
            .collect();

        for &vassal in &beside_lord {
            self.apply(board, vassal, config.adjacency_loyalty_gain, turn, LoyaltyReason::LordAdjacent);
        }
        beside_lord.len()
    }

    /// A lord was captured: every surviving vassal loses loyalty at once
    pub fn on_lord_captured(&mut self, board: &mut Board, lord: PieceId, turn: u32, config: &ProgressionConfig) {
        let vassals: Vec<PieceId> = self
            .vassals_of(lord)
            .filter(|&v| board.piece(v).is_some_and(|p| !p.is_captured()))
            .collect();
        if vassals.is_empty() {
            return;
        }

        tracing::info!("[LOYALTY] Lord {} captured, {} vassals shaken", lord, vassals.len());
        for vassal in vassals {
            self.apply(board, vassal, -config.lord_lost_penalty, turn, LoyaltyReason::LordCaptured);
        }
    }
}
