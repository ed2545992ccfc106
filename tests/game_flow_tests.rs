//! Game Flow Integration Tests
//!
//! Tests for full game flows including:
//! - Turn alternation and turn numbering
//! - Special moves through the aggregate (castling, en passant, promotion)
//! - Attrition combat: bounces and lethal attacks
//! - Loyalty fallout and terminal states
//! - Progression wiring: check and survival XP, upgrades, cooldowns

use attrition::core::{EngineConfig, ErrorKind, IllegalMoveReason};
use attrition::game::progression::Upgrade;
use attrition::game::{Board, Color, Game, GameStatus, PieceType, Position};
use std::sync::Arc;

fn pos(s: &str) -> Position {
    Position::from_algebraic(s).expect("valid square")
}

fn play(game: &mut Game, moves: &[(&str, &str)]) {
    for (from, to) in moves {
        game.execute_move(pos(from), pos(to), None)
            .unwrap_or_else(|e| panic!("{}-{} should be legal: {}", from, to, e));
    }
}

fn attrition_config() -> Arc<EngineConfig> {
    let mut config = EngineConfig::default();
    config.rules.attrition_start_turn = 1;
    Arc::new(config)
}

fn custom_game(config: Arc<EngineConfig>, pieces: &[(PieceType, Color, &str)], to_move: Color) -> Game {
    let mut board = Board::empty();
    for &(piece_type, color, square) in pieces {
        board.add_piece(piece_type, color, pos(square)).expect("distinct squares");
    }
    Game::from_board(config, board, to_move, 1, 42)
}

// ============================================================================
// Turn Alternation Tests
// ============================================================================

#[test]
fn test_white_moves_first() {
    let mut game = Game::new(Arc::new(EngineConfig::default()), 1);

    assert_eq!(game.current_turn(), Color::White);
    assert_eq!(game.all_legal_moves().len(), 20, "White should have 20 moves");

    let err = game
        .execute_move(pos("e7"), pos("e5"), None)
        .expect_err("Black cannot move first");
    assert_eq!(err.illegal_reason(), Some(IllegalMoveReason::WrongTurn));

    let err = game
        .execute_move(pos("e4"), pos("e5"), None)
        .expect_err("Empty source square");
    assert_eq!(err.illegal_reason(), Some(IllegalMoveReason::NoPieceAtSource));
}

#[test]
fn test_turn_number_advances_after_black() {
    let mut game = Game::new(Arc::new(EngineConfig::default()), 1);

    play(&mut game, &[("e2", "e4")]);
    assert_eq!(game.turn_number(), 1, "Still turn 1 after White's move");
    assert_eq!(game.current_turn(), Color::Black);

    play(&mut game, &[("e7", "e5")]);
    assert_eq!(game.turn_number(), 2, "Turn 2 once Black has replied");
    assert_eq!(game.current_turn(), Color::White);
    assert_eq!(game.played_moves().len(), 2);
}

#[test]
fn test_snapshot_reflects_last_move() {
    let mut game = Game::new(Arc::new(EngineConfig::default()), 1);
    play(&mut game, &[("g1", "f3")]);

    let snapshot = game.snapshot();
    let last = snapshot.last_move.as_ref().expect("one move played");
    assert_eq!(last.notation, "Ng1-f3");
    assert_eq!(snapshot.move_history, vec!["Ng1-f3".to_string()]);
    assert_eq!(snapshot.pieces.len(), 32);
    assert!(!snapshot.is_attrition_mode);
    assert!(snapshot.piece_on(pos("f3")).is_some_and(|p| p.piece_type == PieceType::Knight));
}

// ============================================================================
// Terminal States
// ============================================================================

#[test]
fn test_fools_mate() {
    let mut game = Game::new(Arc::new(EngineConfig::default()), 1);
    play(&mut game, &[("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")]);

    assert_eq!(game.status(), GameStatus::Checkmate { winner: Color::Black });
    let last = game.last_move().expect("mating move recorded");
    assert!(last.is_checkmate);
    assert!(last.notation.ends_with('#'), "Mate marker: {}", last.notation);

    let err = game
        .execute_move(pos("a2"), pos("a3"), None)
        .expect_err("Game is over");
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn test_fifty_move_rule_draw() {
    let mut config = EngineConfig::default();
    config.rules.fifty_move_limit = 4;
    let mut game = custom_game(
        Arc::new(config),
        &[
            (PieceType::King, Color::White, "a1"),
            (PieceType::Knight, Color::White, "b1"),
            (PieceType::King, Color::Black, "h8"),
            (PieceType::Knight, Color::Black, "g8"),
        ],
        Color::White,
    );

    play(&mut game, &[("b1", "c3"), ("g8", "f6"), ("c3", "b1")]);
    assert_eq!(game.status(), GameStatus::InProgress);
    play(&mut game, &[("f6", "g8")]);
    assert_eq!(game.status(), GameStatus::Draw, "Four quiet half-moves reach the limit");
}

#[test]
fn test_resignation_and_draw_agreement() {
    let mut game = Game::new(Arc::new(EngineConfig::default()), 1);
    game.resign(Color::White).expect("in progress");
    assert_eq!(game.status(), GameStatus::Resignation { winner: Color::Black });
    assert!(game.resign(Color::Black).is_err(), "Terminal states have no exits");

    let mut game = Game::new(Arc::new(EngineConfig::default()), 1);
    game.offer_draw(Color::White).expect("first offer");
    game.accept_draw(Color::Black).expect("standing offer");
    assert_eq!(game.status(), GameStatus::Draw);
}

#[test]
fn test_forfeit_ends_the_game() {
    let mut game = Game::new(Arc::new(EngineConfig::default()), 1);
    play(&mut game, &[("e2", "e4")]);

    game.forfeit(Color::Black).expect("in progress");
    assert_eq!(game.status(), GameStatus::Forfeit { winner: Color::White });
    assert_eq!(game.snapshot().status.winner(), Some(Color::White));
    assert!(game.forfeit(Color::White).is_err(), "Terminal states have no exits");
    assert!(game.execute_move(pos("e7"), pos("e5"), None).is_err());
}

// ============================================================================
// Special Moves
// ============================================================================

#[test]
fn test_kingside_castling() {
    let mut game = Game::new(Arc::new(EngineConfig::default()), 1);
    play(
        &mut game,
        &[("e2", "e4"), ("e7", "e5"), ("g1", "f3"), ("b8", "c6"), ("f1", "c4"), ("g8", "f6")],
    );

    let mv = game.execute_move(pos("e1"), pos("g1"), None).expect("castling is legal");
    assert!(mv.is_castling && mv.is_kingside_castle);
    assert_eq!(mv.notation, "O-O");
    assert_eq!(game.board().piece_at(pos("g1")).map(|p| p.piece_type()), Some(PieceType::King));
    assert_eq!(game.board().piece_at(pos("f1")).map(|p| p.piece_type()), Some(PieceType::Rook));
    assert!(game.board().is_empty(pos("h1")));
    assert!(!game.board().castling().has(Color::White, true));
    assert!(!game.board().castling().has(Color::White, false));
}

#[test]
fn test_castling_blocked_in_standard_mode() {
    let mut game = Game::new(Arc::new(EngineConfig::default()), 1);
    let err = game
        .execute_move(pos("e1"), pos("g1"), None)
        .expect_err("Bishop and knight are in the way");
    assert_eq!(err.illegal_reason(), Some(IllegalMoveReason::CastlingNotAllowed));
}

#[test]
fn test_en_passant_through_the_game() {
    let mut game = Game::new(Arc::new(EngineConfig::default()), 1);
    play(&mut game, &[("e2", "e4"), ("a7", "a6"), ("e4", "e5"), ("d7", "d5")]);
    assert_eq!(game.board().en_passant(), Some(pos("d6")));

    let mv = game.execute_move(pos("e5"), pos("d6"), None).expect("en passant");
    assert!(mv.is_en_passant);
    assert!(mv.captured.is_some());
    assert_eq!(mv.notation, "e5xd6 e.p.");
    assert!(game.board().is_empty(pos("d5")), "Passed pawn is removed");
    assert_eq!(game.board().halfmove_clock(), 0);
}

#[test]
fn test_promotion_defaults_to_queen() {
    let pieces = [
        (PieceType::King, Color::White, "e1"),
        (PieceType::Pawn, Color::White, "a7"),
        (PieceType::King, Color::Black, "h5"),
    ];

    let mut game = custom_game(Arc::new(EngineConfig::default()), &pieces, Color::White);
    let mv = game.execute_move(pos("a7"), pos("a8"), None).expect("promotion");
    assert_eq!(mv.promotion, Some(PieceType::Queen));
    assert_eq!(mv.notation, "a7-a8=Q");
    assert_eq!(game.board().piece_at(pos("a8")).map(|p| p.piece_type()), Some(PieceType::Queen));

    let mut game = custom_game(Arc::new(EngineConfig::default()), &pieces, Color::White);
    let err = game
        .execute_move(pos("a7"), pos("a8"), Some(PieceType::King))
        .expect_err("Kings are not a promotion choice");
    assert_eq!(err.illegal_reason(), Some(IllegalMoveReason::InvalidPromotion));
    assert!(game.board().piece_at(pos("a7")).is_some(), "Rejected promotion changes nothing");

    game.execute_move(pos("a7"), pos("a8"), Some(PieceType::Knight))
        .expect("underpromotion");
    assert_eq!(game.board().piece_at(pos("a8")).map(|p| p.piece_type()), Some(PieceType::Knight));
}

#[test]
fn test_king_safety_only_in_standard_mode() {
    let pieces = [
        (PieceType::King, Color::White, "d1"),
        (PieceType::Rook, Color::Black, "e8"),
        (PieceType::King, Color::Black, "h8"),
    ];

    let mut standard = custom_game(Arc::new(EngineConfig::default()), &pieces, Color::White);
    let err = standard
        .execute_move(pos("d1"), pos("e1"), None)
        .expect_err("Walks into the rook's file");
    assert_eq!(err.illegal_reason(), Some(IllegalMoveReason::LeavesKingInCheck));

    let mut attrition = custom_game(attrition_config(), &pieces, Color::White);
    assert!(attrition.is_attrition_mode());
    attrition
        .execute_move(pos("d1"), pos("e1"), None)
        .expect("Attrition mode skips king safety");
}

// ============================================================================
// Attrition Combat
// ============================================================================

fn bounce_position() -> Vec<(PieceType, Color, &'static str)> {
    vec![
        (PieceType::King, Color::White, "a1"),
        (PieceType::Pawn, Color::White, "d4"),
        (PieceType::King, Color::Black, "h8"),
        (PieceType::Queen, Color::Black, "e5"),
    ]
}

#[test]
fn test_weak_attack_bounces() {
    let mut game = custom_game(attrition_config(), &bounce_position(), Color::White);

    let mv = game.execute_move(pos("d4"), pos("e5"), None).expect("pawn attacks queen");
    assert!(mv.is_attack_bounce, "A pawn cannot kill a healthy queen");
    assert!(mv.captured.is_none());
    assert!(mv.notation.starts_with("d4~e5("), "Bounce notation: {}", mv.notation);

    let damage = mv.damage_dealt.expect("combat ran");
    assert!(damage >= 1);
    let queen = game.board().piece_at(pos("e5")).expect("queen survives");
    assert_eq!(queen.current_hp(), queen.max_hp() - damage);
    assert!(game.board().piece_at(pos("d4")).is_some(), "Attacker stays home");
    assert_eq!(game.current_turn(), Color::Black, "A bounce still ends the turn");
}

#[test]
fn test_lethal_attack_captures_and_moves_in() {
    let mut game = custom_game(
        attrition_config(),
        &[
            (PieceType::King, Color::White, "a1"),
            (PieceType::Queen, Color::White, "d1"),
            (PieceType::King, Color::Black, "h8"),
            (PieceType::Pawn, Color::Black, "d7"),
        ],
        Color::White,
    );

    let mv = game.execute_move(pos("d1"), pos("d7"), None).expect("queen attacks pawn");
    assert!(!mv.is_attack_bounce);
    assert!(mv.captured.is_some());
    assert!(mv.damage_dealt.is_some());
    assert_eq!(game.board().piece_at(pos("d7")).map(|p| p.color()), Some(Color::White));
    assert!(game.board().is_empty(pos("d1")));

    let queen = game.board().piece_at(pos("d7")).expect("queen moved in");
    assert!(queen.total_xp() >= 20, "Capture XP for the attacker");
}

#[test]
fn test_bounce_does_not_reset_halfmove_clock() {
    let mut game = custom_game(attrition_config(), &bounce_position(), Color::White);
    play(&mut game, &[("a1", "b1"), ("h8", "g8")]);
    assert_eq!(game.board().halfmove_clock(), 2);

    let mv = game.execute_move(pos("d4"), pos("e5"), None).expect("pawn attacks queen");
    assert!(mv.is_attack_bounce);
    assert_eq!(game.board().halfmove_clock(), 3, "The pawn never moved and nothing died");
}

#[test]
fn test_combat_is_deterministic_per_seed() {
    let run = || {
        let mut game = custom_game(attrition_config(), &bounce_position(), Color::White);
        game.execute_move(pos("d4"), pos("e5"), None).expect("attack");
        game.to_json().expect("serialize")
    };
    assert_eq!(run(), run(), "Same seed and moves give the same game");
}

#[test]
fn test_attrition_game_survives_json_round_trip() {
    let config = attrition_config();
    let mut game = custom_game(Arc::clone(&config), &bounce_position(), Color::White);
    game.execute_move(pos("d4"), pos("e5"), None).expect("attack");

    let restored = Game::from_json(&game.to_json().expect("serialize"), config).expect("restore");
    assert_eq!(restored.snapshot(), game.snapshot());
    assert_eq!(restored.legal_destinations(pos("e5")).ok(), game.legal_destinations(pos("e5")).ok());
}

// ============================================================================
// Loyalty
// ============================================================================

#[test]
fn test_capturing_a_lord_shakes_its_vassals() {
    let mut game = custom_game(
        Arc::new(EngineConfig::default()),
        &[
            (PieceType::King, Color::White, "e1"),
            (PieceType::Bishop, Color::White, "h1"),
            (PieceType::King, Color::Black, "e8"),
            (PieceType::Rook, Color::Black, "a8"),
            (PieceType::Pawn, Color::Black, "a7"),
        ],
        Color::White,
    );
    let pawn = game.board().piece_id_at(pos("a7")).expect("pawn");
    let rook = game.board().piece_id_at(pos("a8")).expect("rook");
    assert_eq!(game.loyalty().lord_of(pawn), Some(rook), "Pawn serves the rook on its file");
    let before = game.board().piece(pawn).map(|p| p.loyalty()).expect("pawn");

    game.execute_move(pos("h1"), pos("a8"), None).expect("bishop takes rook");

    let after = game.board().piece(pawn).map(|p| p.loyalty()).expect("pawn");
    assert_eq!(after, before - game.config().progression.lord_lost_penalty);
}

// ============================================================================
// Progression Wiring
// ============================================================================

#[test]
fn test_new_check_pays_xp_and_marks_checked_king() {
    let mut game = custom_game(
        Arc::new(EngineConfig::default()),
        &[
            (PieceType::King, Color::White, "a1"),
            (PieceType::Rook, Color::White, "h2"),
            (PieceType::King, Color::Black, "e8"),
        ],
        Color::White,
    );

    let mv = game.execute_move(pos("h2"), pos("e2"), None).expect("rook checks");
    assert!(mv.is_check);
    assert!(mv.notation.ends_with('+'), "Check marker: {}", mv.notation);

    let rook = game.board().piece_at(pos("e2")).expect("rook");
    assert_eq!(rook.total_xp(), game.config().progression.xp_check, "Check XP for the mover");

    let snapshot = game.snapshot();
    assert!(snapshot.in_check);
    assert_eq!(snapshot.checked_king, Some(pos("e8")));
}

#[test]
fn test_standing_check_pays_no_xp() {
    let mut game = custom_game(
        attrition_config(),
        &[
            (PieceType::King, Color::White, "a1"),
            (PieceType::Knight, Color::White, "b1"),
            (PieceType::King, Color::Black, "h8"),
            (PieceType::Queen, Color::Black, "c3"),
        ],
        Color::White,
    );
    assert!(game.is_in_check(Color::White), "Queen on c3 checks a1");

    let mv = game.execute_move(pos("b1"), pos("c3"), None).expect("knight attacks queen");
    assert!(mv.is_attack_bounce);
    assert!(game.is_in_check(Color::White), "Queen survived, check stands");

    let mv = game.execute_move(pos("h8"), pos("g8"), None).expect("quiet king move");
    assert!(mv.is_check, "Record still reports the standing check");
    let king = game.board().piece_at(pos("g8")).expect("black king");
    assert_eq!(king.total_xp(), 0, "A check that was already there earns nothing");
}

#[test]
fn test_survival_xp_on_interval_turn() {
    let mut board = Board::empty();
    for (piece_type, color, square) in [
        (PieceType::King, Color::White, "a1"),
        (PieceType::Knight, Color::White, "b1"),
        (PieceType::King, Color::Black, "h8"),
        (PieceType::Knight, Color::Black, "g8"),
    ] {
        board.add_piece(piece_type, color, pos(square)).expect("distinct squares");
    }
    let config = Arc::new(EngineConfig::default());
    let survival = config.progression.xp_survival;
    let mut game = Game::from_board(config, board, Color::White, 10, 42);

    play(&mut game, &[("b1", "c3")]);
    assert_eq!(game.board().piece_at(pos("c3")).map(|p| p.total_xp()), Some(0), "Paid when turn 10 closes");

    play(&mut game, &[("g8", "f6")]);
    assert_eq!(game.turn_number(), 11);
    assert_eq!(game.board().piece_at(pos("c3")).map(|p| p.total_xp()), Some(survival));
    assert_eq!(game.board().piece_at(pos("f6")).map(|p| p.total_xp()), Some(survival));

    play(&mut game, &[("c3", "b1"), ("f6", "g8")]);
    assert_eq!(
        game.board().piece_at(pos("b1")).map(|p| p.total_xp()),
        Some(survival),
        "Turn 11 is not an interval turn"
    );
}

#[test]
fn test_purchase_upgrade_through_the_game() {
    let mut game = custom_game(
        Arc::new(EngineConfig::default()),
        &[
            (PieceType::King, Color::White, "a1"),
            (PieceType::Queen, Color::White, "d1"),
            (PieceType::King, Color::Black, "h8"),
            (PieceType::Rook, Color::Black, "d7"),
        ],
        Color::White,
    );
    play(&mut game, &[("d1", "d7")]);
    let queen = game.board().piece_at(pos("d7")).expect("queen took the rook");
    assert_eq!((queen.xp(), queen.total_xp(), queen.level()), (100, 100, 2));
    let armor = queen.armor();

    let err = game
        .purchase_upgrade(Color::White, pos("d7"), Upgrade::Armor)
        .expect_err("Not White's turn");
    assert_eq!(err.kind(), ErrorKind::InvalidState);

    play(&mut game, &[("h8", "g8")]);
    game.purchase_upgrade(Color::White, pos("d7"), Upgrade::Armor)
        .expect("100 XP covers armor");

    let queen = game.board().piece_at(pos("d7")).expect("queen");
    assert_eq!(queen.armor(), armor + game.config().progression.armor_upgrade_amount);
    assert_eq!((queen.xp(), queen.total_xp(), queen.level()), (50, 100, 2), "Spending keeps level");

    let err = game
        .purchase_upgrade(Color::White, pos("g8"), Upgrade::Vitality)
        .expect_err("Black's king is not White's");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_progression_tick_raises_loyalty_beside_lord() {
    let mut game = Game::new(Arc::new(EngineConfig::default()), 1);
    let loyalty = |game: &Game, square: &str| game.board().piece_at(pos(square)).map(|p| p.loyalty());
    assert_eq!(loyalty(&game, "d1"), Some(75));

    play(&mut game, &[("e2", "e4")]);
    let gain = game.config().progression.adjacency_loyalty_gain;
    assert_eq!(loyalty(&game, "d1"), Some(75 + gain), "Queen stands beside her king");
    assert_eq!(loyalty(&game, "e4"), Some(75), "The pawn left its lord");
    assert_eq!(loyalty(&game, "d8"), Some(75), "Only the side that moved ticks");
}

#[test]
fn test_progression_tick_counts_down_cooldowns_and_effects() {
    let mut game = Game::new(Arc::new(EngineConfig::default()), 1);
    game.use_ability(Color::White, pos("a1"), "fortify").expect("3 AP covers fortify");

    let cooldown = |game: &Game| {
        game.board()
            .piece_at(pos("a1"))
            .and_then(|p| p.ability("fortify"))
            .map(|a| a.cooldown_remaining)
    };
    let remaining = |game: &Game| {
        game.board()
            .piece_at(pos("a1"))
            .and_then(|p| p.effects().first())
            .map(|e| e.remaining_turns)
    };
    assert_eq!(cooldown(&game), Some(4));
    assert_eq!(remaining(&game), Some(3));

    play(&mut game, &[("e2", "e4")]);
    assert_eq!(cooldown(&game), Some(3), "White's move ticks White's pieces");
    assert_eq!(remaining(&game), Some(2));

    play(&mut game, &[("e7", "e5")]);
    assert_eq!(cooldown(&game), Some(3), "Black's move leaves White alone");

    play(&mut game, &[("d2", "d4")]);
    assert_eq!(cooldown(&game), Some(2));
    assert_eq!(remaining(&game), Some(1));
}
