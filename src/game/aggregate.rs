//! The game aggregate and its turn state machine
//!
//! [`Game`] owns the board and every piece of per-match state. All commands
//! validate first and mutate second, so a rejected command leaves the game
//! exactly as it was.
//!
//! # Move Sequence
//!
//! 1. Validate (status, turn, geometry, castling, king safety, promotion piece)
//! 2. Apply castling, en passant, capture or combat
//! 3. Promote, update castling rights, en passant target and half-move clock
//! 4. Progression tick for the side that moved (effects, cooldowns, loyalty, survival XP)
//! 5. Flip the turn, bump the turn number on return to White, grant AP
//! 6. Recompute check, checkmate, stalemate and the fifty-move draw
//! 7. Append the [`Move`] record
//!
//! # Concurrency
//!
//! A `Game` is plain data mutated in place. Callers that share one across
//! threads must serialize access; see
//! [`MatchRegistry`](crate::service::MatchRegistry).

use super::board::Board;
use super::combat::{self, CombatResult};
use super::moves::Move;
use super::piece::PieceId;
use super::progression::abilities::{self, AbilityEffect, AbilityImpact};
use super::progression::loyalty::{LoyaltyManager, LoyaltyReason};
use super::progression::xp::{self, Upgrade, XpSource};
use super::rules::{self, MoveKind, RulesMode};
use super::snapshot::GameSnapshot;
use super::status::GameStatus;
use super::types::{Color, PieceType, Position};
use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, GameResult, IllegalMoveReason};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Everything needed to rebuild a [`Game`]; the attrition flag is derived
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedGame {
    pub board: Board,
    pub current_turn: Color,
    pub turn_number: u32,
    pub status: GameStatus,
    pub played_moves: Vec<Move>,
    pub draw_offered_by: Option<Color>,
    pub action_points: [u32; 2],
    pub combat_seed: u64,
    pub loyalty: LoyaltyManager,
}

/// Aggregate root for one match
#[derive(Debug, Clone)]
pub struct Game {
    config: Arc<EngineConfig>,
    board: Board,
    current_turn: Color,
    turn_number: u32,
    status: GameStatus,
    played_moves: Vec<Move>,
    draw_offered_by: Option<Color>,
    action_points: [u32; 2],
    combat_seed: u64,
    loyalty: LoyaltyManager,
}

impl Game {
    /// Standard layout, not yet started
    pub fn setup(config: Arc<EngineConfig>, combat_seed: u64) -> Self {
        Self::with_board(config, Board::standard(), Color::White, 1, combat_seed, GameStatus::NotStarted)
    }

    /// Standard layout, in progress with White to move on turn 1
    pub fn new(config: Arc<EngineConfig>, combat_seed: u64) -> Self {
        Self::with_board(config, Board::standard(), Color::White, 1, combat_seed, GameStatus::InProgress)
    }

    /// Custom position, in progress
    ///
    /// Abilities are granted and the loyalty hierarchy is derived from the
    /// layout. If the side to move is already mated or stalemated the status
    /// reflects it immediately.
    pub fn from_board(
        config: Arc<EngineConfig>,
        board: Board,
        current_turn: Color,
        turn_number: u32,
        combat_seed: u64,
    ) -> Self {
        let mut game = Self::with_board(
            config,
            board,
            current_turn,
            turn_number.max(1),
            combat_seed,
            GameStatus::InProgress,
        );
        game.refresh_terminal_status(current_turn.opposite());
        game
    }

    fn with_board(
        config: Arc<EngineConfig>,
        mut board: Board,
        current_turn: Color,
        turn_number: u32,
        combat_seed: u64,
        status: GameStatus,
    ) -> Self {
        for piece in board.pieces_mut() {
            abilities::grant_abilities(piece, &config.abilities);
        }
        let loyalty = LoyaltyManager::build_standard(&board);
        let starting_ap = config.rules.starting_ap.min(config.rules.max_ap);
        Self {
            config,
            board,
            current_turn,
            turn_number,
            status,
            played_moves: Vec::new(),
            draw_offered_by: None,
            action_points: [starting_ap; 2],
            combat_seed,
            loyalty,
        }
    }

    /// `NotStarted -> InProgress`
    pub fn start(&mut self) -> GameResult<()> {
        if self.status != GameStatus::NotStarted {
            return Err(EngineError::invalid_state(format!("cannot start a game that is {}", self.status)));
        }
        self.status = GameStatus::InProgress;
        tracing::info!("[GAME] Match started (seed {})", self.combat_seed);
        Ok(())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_turn(&self) -> Color {
        self.current_turn
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn played_moves(&self) -> &[Move] {
        &self.played_moves
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.played_moves.last()
    }

    pub fn draw_offered_by(&self) -> Option<Color> {
        self.draw_offered_by
    }

    pub fn action_points(&self, color: Color) -> u32 {
        self.action_points[color.index()]
    }

    pub fn combat_seed(&self) -> u64 {
        self.combat_seed
    }

    pub fn loyalty(&self) -> &LoyaltyManager {
        &self.loyalty
    }

    /// Derived from the turn number; never stored
    pub fn is_attrition_mode(&self) -> bool {
        self.rules_mode() == RulesMode::Attrition
    }

    pub fn rules_mode(&self) -> RulesMode {
        RulesMode::for_turn(self.turn_number, self.config.rules.attrition_start_turn)
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        rules::is_king_in_check(&self.board, color)
    }

    fn require_in_progress(&self) -> GameResult<()> {
        if self.status == GameStatus::InProgress {
            Ok(())
        } else {
            Err(EngineError::invalid_state(format!("game is {}", self.status)))
        }
    }

    /// Legal destinations of the piece on `from`, ordered a1..h8
    ///
    /// # Errors
    ///
    /// [`EngineError::NotFound`] if the square is empty. A finished game
    /// returns an empty list.
    pub fn legal_destinations(&self, from: Position) -> GameResult<Vec<Position>> {
        if self.board.piece_at(from).is_none() {
            return Err(EngineError::not_found(format!("piece on {}", from)));
        }
        if self.status != GameStatus::InProgress {
            return Ok(Vec::new());
        }
        let mut board = self.board.clone();
        Ok(rules::legal_destinations(&mut board, from, self.rules_mode()))
    }

    /// Every legal move for the side to move, by piece id then destination
    pub fn all_legal_moves(&self) -> Vec<(Position, Position)> {
        if self.status != GameStatus::InProgress {
            return Vec::new();
        }
        let mut board = self.board.clone();
        rules::all_legal_moves(&mut board, self.current_turn, self.rules_mode())
    }

    pub fn is_move_legal(&self, from: Position, to: Position) -> bool {
        if self.status != GameStatus::InProgress {
            return false;
        }
        let mut board = self.board.clone();
        rules::is_move_legal(&mut board, from, to, self.current_turn, self.rules_mode())
    }

    /// Play a move for the side to move
    ///
    /// # Arguments
    ///
    /// * `from`, `to` - Source and destination squares
    /// * `promotion` - Piece for a pawn reaching the far rank; Queen if `None`.
    ///   Ignored for moves that do not promote.
    ///
    /// # Returns
    ///
    /// The recorded [`Move`], also appended to [`played_moves`](Self::played_moves).
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidState`] if the game is not in progress
    /// - [`EngineError::IllegalMove`] with the specific reason otherwise
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let mv = game.execute_move("e2".parse()?, "e4".parse()?, None)?;
    /// assert_eq!(mv.notation, "e2-e4");
    /// ```
    pub fn execute_move(&mut self, from: Position, to: Position, promotion: Option<PieceType>) -> GameResult<Move> {
        self.require_in_progress()?;
        let mode = self.rules_mode();
        let validated = rules::validate_move(&mut self.board, from, to, self.current_turn, mode)
            .map_err(|reason| EngineError::illegal(from, to, reason))?;

        let promotion_piece = if validated.promotes {
            let piece = promotion.unwrap_or(PieceType::Queen);
            if !piece.can_promote_to() {
                return Err(EngineError::illegal(from, to, IllegalMoveReason::InvalidPromotion));
            }
            Some(piece)
        } else {
            None
        };

        // Validation complete; nothing below is rejected
        let config = Arc::clone(&self.config);
        let color = validated.color;
        let mover = validated.piece_id;
        let turn_number = self.turn_number;
        let opponent_was_in_check = rules::is_king_in_check(&self.board, color.opposite());

        let mut captured: Option<PieceId> = None;
        let mut combat_result: Option<CombatResult> = None;
        let mut bounced = false;

        match validated.kind {
            MoveKind::Castle { rook_from, rook_to, .. } => {
                self.board.move_piece(mover, to)?;
                if let Some(rook) = self.board.piece_id_at(rook_from) {
                    self.board.move_piece(rook, rook_to)?;
                }
            }
            MoveKind::EnPassant { captured: square } => {
                if let Some(victim) = self.board.piece_id_at(square) {
                    self.board.capture_piece(victim);
                    captured = Some(victim);
                }
                self.board.move_piece(mover, to)?;
            }
            MoveKind::Capture => {
                let victim = self
                    .board
                    .piece_id_at(to)
                    .ok_or_else(|| EngineError::invalid_state(format!("capture target on {} vanished", to)))?;

                let lethal = if mode == RulesMode::Attrition {
                    let result = match (self.board.piece(mover), self.board.piece(victim)) {
                        (Some(attacker), Some(defender)) => {
                            combat::resolve(attacker, defender, turn_number, self.combat_seed, &config.combat)
                        }
                        _ => return Err(EngineError::invalid_state("combatant missing from arena")),
                    };
                    combat_result = Some(result);
                    let remaining = self
                        .board
                        .piece_mut(victim)
                        .map(|d| d.take_damage(result.damage_dealt))
                        .unwrap_or(0);
                    remaining == 0
                } else {
                    true
                };

                if lethal {
                    self.board.capture_piece(victim);
                    self.board.move_piece(mover, to)?;
                    captured = Some(victim);
                } else {
                    bounced = true;
                    if let (Some(result), Some(attacker)) = (combat_result, self.board.piece_mut(mover)) {
                        xp::award(
                            attacker,
                            XpSource::CombatDamage {
                                damage: result.damage_dealt,
                            },
                            &config.progression,
                        );
                    }
                    tracing::info!(
                        "[COMBAT] {} bounced off {} for {} damage",
                        from,
                        to,
                        combat_result.map(|r| r.damage_dealt).unwrap_or(0)
                    );
                }
            }
            MoveKind::Quiet => {
                self.board.move_piece(mover, to)?;
            }
        }

        if let Some(victim) = captured {
            self.on_capture(mover, victim, color, turn_number)?;
        }

        let promoted = match promotion_piece {
            Some(piece_type) if !bounced => {
                if let Some(piece) = self.board.piece_mut(mover) {
                    piece.piece_type = piece_type;
                    abilities::grant_abilities(piece, &config.abilities);
                }
                Some(piece_type)
            }
            _ => None,
        };

        self.update_square_state(&validated, captured.is_some(), bounced);
        self.progression_tick(color);
        self.advance_turn(color);

        let next = self.current_turn;
        let is_check = self.status == GameStatus::InProgress && rules::is_king_in_check(&self.board, next);
        // Only a newly given check pays; a standing one does not
        if is_check && !opponent_was_in_check {
            if let Some(piece) = self.board.piece_mut(mover) {
                xp::award(piece, XpSource::CheckDelivered, &config.progression);
            }
        }
        self.refresh_terminal_status(color);
        let is_checkmate = matches!(self.status, GameStatus::Checkmate { winner } if winner == color);

        let mut record = Move {
            from,
            to,
            piece_id: mover,
            piece_type: validated.piece_type,
            color,
            captured,
            is_castling: matches!(validated.kind, MoveKind::Castle { .. }),
            is_kingside_castle: matches!(validated.kind, MoveKind::Castle { kingside: true, .. }),
            is_en_passant: matches!(validated.kind, MoveKind::EnPassant { .. }),
            promotion: promoted,
            is_check,
            is_checkmate,
            is_attack_bounce: bounced,
            damage_dealt: combat_result.map(|r| r.damage_dealt),
            is_critical: combat_result.is_some_and(|r| r.is_critical),
            turn_number,
            notation: String::new(),
        };
        record.notation = record.notation_for();

        tracing::info!("[GAME] {} played {} (turn {})", color, record.notation, turn_number);
        if self.status.is_terminal() {
            tracing::info!("[GAME] Game over: {}", self.status);
        }

        self.played_moves.push(record.clone());
        Ok(record)
    }

    /// XP, loyalty fallout and regicide for a piece leaving the board
    fn on_capture(&mut self, mover: PieceId, victim: PieceId, color: Color, turn: u32) -> GameResult<()> {
        let victim_type = self
            .board
            .piece(victim)
            .map(|p| p.piece_type())
            .ok_or_else(|| EngineError::invalid_state("captured piece missing from arena"))?;

        if let Some(attacker) = self.board.piece_mut(mover) {
            xp::award(attacker, XpSource::Capture { victim: victim_type }, &self.config.progression);
        }
        self.loyalty
            .on_lord_captured(&mut self.board, victim, turn, &self.config.progression);

        if victim_type == PieceType::King {
            self.status = GameStatus::Checkmate { winner: color };
            tracing::info!("[COMBAT] {} king has fallen", color.opposite());
        }
        Ok(())
    }

    fn update_square_state(&mut self, validated: &rules::ValidatedMove, was_capture: bool, bounced: bool) {
        let castling = self.board.castling_mut();
        if !bounced {
            if validated.piece_type == PieceType::King {
                castling.revoke_all(validated.color);
            }
            castling.revoke_corner(validated.from);
        }
        if was_capture {
            castling.revoke_corner(validated.to);
        }

        let moved_pawn = validated.piece_type == PieceType::Pawn && !bounced;
        let double_step = moved_pawn && (validated.to.rank() as i8 - validated.from.rank() as i8).abs() == 2;
        let target = if double_step {
            Position::new(validated.from.file(), (validated.from.rank() + validated.to.rank()) / 2).ok()
        } else {
            None
        };
        self.board.set_en_passant(target);

        let clock = if moved_pawn || was_capture {
            0
        } else {
            self.board.halfmove_clock() + 1
        };
        self.board.set_halfmove_clock(clock);
    }

    fn progression_tick(&mut self, color: Color) {
        let config = Arc::clone(&self.config);
        abilities::tick_side(&mut self.board, color);
        self.loyalty
            .update_turn(&mut self.board, color, self.turn_number, &config.progression);

        // Survival XP closes out every `survival_interval`-th full turn
        let interval = config.progression.survival_interval;
        if color == Color::Black && interval > 0 && self.turn_number % interval == 0 {
            for piece in self.board.pieces_mut().filter(|p| !p.is_captured()) {
                xp::award(piece, XpSource::Survival, &config.progression);
            }
            tracing::debug!("[XP] Survival XP paid on turn {}", self.turn_number);
        }
    }

    fn advance_turn(&mut self, mover: Color) {
        if self.draw_offered_by.is_some_and(|offerer| offerer != mover) {
            // Moving instead of answering declines the offer
            self.draw_offered_by = None;
        }

        let next = mover.opposite();
        self.current_turn = next;
        if next == Color::White {
            self.turn_number += 1;
            if self.turn_number == self.config.rules.attrition_start_turn {
                tracing::info!("[GAME] Attrition mode begins on turn {}", self.turn_number);
            }
        }
        let rules = &self.config.rules;
        let ap = &mut self.action_points[next.index()];
        *ap = (*ap + rules.ap_per_turn).min(rules.max_ap);
    }

    /// Set a terminal status if the side to move is finished
    fn refresh_terminal_status(&mut self, last_mover: Color) {
        if self.status != GameStatus::InProgress {
            return;
        }
        let side = self.current_turn;
        let mode = self.rules_mode();
        if rules::is_checkmate(&mut self.board, side, mode) {
            self.status = GameStatus::Checkmate { winner: last_mover };
        } else if rules::is_stalemate(&mut self.board, side, mode) {
            self.status = GameStatus::Stalemate;
        } else if self.board.halfmove_clock() >= self.config.rules.fifty_move_limit {
            tracing::info!("[GAME] Fifty-move rule: draw");
            self.status = GameStatus::Draw;
        }
    }

    /// Offer a draw; a standing offer from the other side settles it
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidState`] if the game is not in progress, or if
    /// `color` already has an offer standing (the repeat changes nothing).
    pub fn offer_draw(&mut self, color: Color) -> GameResult<()> {
        self.require_in_progress()?;
        match self.draw_offered_by {
            Some(offerer) if offerer == color => Err(EngineError::invalid_state(format!(
                "{} already offered a draw",
                color
            ))),
            Some(_) => {
                self.draw_offered_by = None;
                self.status = GameStatus::Draw;
                tracing::info!("[GAME] Draw agreed");
                Ok(())
            }
            None => {
                self.draw_offered_by = Some(color);
                tracing::info!("[GAME] {} offers a draw", color);
                Ok(())
            }
        }
    }

    pub fn accept_draw(&mut self, color: Color) -> GameResult<()> {
        self.require_in_progress()?;
        if self.draw_offered_by != Some(color.opposite()) {
            return Err(EngineError::invalid_state(format!("no draw offer for {} to accept", color)));
        }
        self.draw_offered_by = None;
        self.status = GameStatus::Draw;
        tracing::info!("[GAME] {} accepts the draw", color);
        Ok(())
    }

    pub fn resign(&mut self, color: Color) -> GameResult<()> {
        self.require_in_progress()?;
        self.status = GameStatus::Resignation {
            winner: color.opposite(),
        };
        tracing::info!("[GAME] {} resigns", color);
        Ok(())
    }

    /// End the game against `color` for reasons outside the rules (timeouts,
    /// disconnects)
    pub fn forfeit(&mut self, color: Color) -> GameResult<()> {
        self.require_in_progress()?;
        self.status = GameStatus::Forfeit {
            winner: color.opposite(),
        };
        tracing::info!("[GAME] {} forfeits", color);
        Ok(())
    }

    /// Use an ability of the piece on `square`; does not end the turn
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidState`] if the game is not in progress, it is not
    ///   `color`'s turn, the piece is not `color`'s or lacks the ability, the
    ///   ability is cooling down, or AP is short
    /// - [`EngineError::NotFound`] for an empty square or an unknown ability
    pub fn use_ability(&mut self, color: Color, square: Position, ability_id: &str) -> GameResult<Vec<AbilityImpact>> {
        self.require_in_progress()?;
        if color != self.current_turn {
            return Err(EngineError::invalid_state(format!("not {}'s turn", color)));
        }
        let piece = self
            .board
            .piece_at(square)
            .ok_or_else(|| EngineError::not_found(format!("piece on {}", square)))?;
        if piece.color() != color {
            return Err(EngineError::invalid_state(format!("piece on {} is not {}'s", square, color)));
        }
        let definition = self
            .config
            .ability(ability_id)
            .cloned()
            .ok_or_else(|| EngineError::not_found(format!("ability '{}'", ability_id)))?;
        let slot = piece
            .ability(ability_id)
            .ok_or_else(|| EngineError::invalid_state(format!("piece on {} lacks '{}'", square, ability_id)))?;
        if !slot.is_ready() {
            return Err(EngineError::invalid_state(format!(
                "'{}' is cooling down for {} more turns",
                ability_id, slot.cooldown_remaining
            )));
        }
        let available = self.action_points[color.index()];
        if available < definition.ap_cost {
            return Err(EngineError::invalid_state(format!(
                "'{}' costs {} AP, {} has {}",
                ability_id, definition.ap_cost, color, available
            )));
        }

        let user = piece.id();
        let impacts = abilities::apply_effect(&mut self.board, user, &definition);
        if let AbilityEffect::RallyLoyalty { amount } = definition.effect {
            for impact in &impacts {
                self.loyalty
                    .apply(&mut self.board, impact.piece_id, amount, self.turn_number, LoyaltyReason::Rally);
            }
        }
        if let Some(piece) = self.board.piece_mut(user) {
            if let Some(slot) = piece.ability_mut(ability_id) {
                slot.cooldown_remaining = definition.cooldown;
            }
            xp::award(piece, XpSource::AbilityUse, &self.config.progression);
        }
        self.action_points[color.index()] -= definition.ap_cost;

        tracing::info!("[GAME] {} used '{}' from {}", color, ability_id, square);
        Ok(impacts)
    }

    /// Spend a piece's XP on a stat upgrade during its side's turn
    pub fn purchase_upgrade(&mut self, color: Color, square: Position, upgrade: Upgrade) -> GameResult<()> {
        self.require_in_progress()?;
        if color != self.current_turn {
            return Err(EngineError::invalid_state(format!("not {}'s turn", color)));
        }
        let id = self
            .board
            .piece_at(square)
            .filter(|p| p.color() == color)
            .map(|p| p.id())
            .ok_or_else(|| EngineError::not_found(format!("{} piece on {}", color, square)))?;
        let config = Arc::clone(&self.config);
        let piece = self
            .board
            .piece_mut(id)
            .ok_or_else(|| EngineError::not_found(format!("piece {}", id)))?;
        xp::purchase_upgrade(piece, upgrade, &config.progression)?;
        tracing::info!("[XP] {} bought {:?} for piece on {}", color, upgrade, square);
        Ok(())
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::from_game(self)
    }

    pub fn to_persisted(&self) -> PersistedGame {
        PersistedGame {
            board: self.board.clone(),
            current_turn: self.current_turn,
            turn_number: self.turn_number,
            status: self.status,
            played_moves: self.played_moves.clone(),
            draw_offered_by: self.draw_offered_by,
            action_points: self.action_points,
            combat_seed: self.combat_seed,
            loyalty: self.loyalty.clone(),
        }
    }

    /// Rebuild a game from persisted state
    ///
    /// # Errors
    ///
    /// [`EngineError::MalformedInput`] if the turn number is zero.
    pub fn restore(persisted: PersistedGame, config: Arc<EngineConfig>) -> GameResult<Self> {
        if persisted.turn_number == 0 {
            return Err(EngineError::malformed("turn number must start at 1"));
        }
        Ok(Self {
            config,
            board: persisted.board,
            current_turn: persisted.current_turn,
            turn_number: persisted.turn_number,
            status: persisted.status,
            played_moves: persisted.played_moves,
            draw_offered_by: persisted.draw_offered_by,
            action_points: persisted.action_points,
            combat_seed: persisted.combat_seed,
            loyalty: persisted.loyalty,
        })
    }

    pub fn to_json(&self) -> GameResult<String> {
        serde_json::to_string(&self.to_persisted())
            .map_err(|e| EngineError::invalid_state(format!("could not serialize game: {}", e)))
    }

    pub fn from_json(json: &str, config: Arc<EngineConfig>) -> GameResult<Self> {
        let persisted: PersistedGame =
            serde_json::from_str(json).map_err(|e| EngineError::malformed(format!("bad game JSON: {}", e)))?;
        Self::restore(persisted, config)
    }
}
