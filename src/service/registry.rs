//! Match registry: the serialized command entry point
//!
//! Each match lives behind its own `parking_lot::Mutex`, so at most one
//! command mutates a given game at a time while different matches proceed in
//! parallel. The map itself sits behind an `RwLock` that is only held long
//! enough to clone a match handle.
//!
//! # AI Moves
//!
//! [`MatchRegistry::request_ai_move_async`] packs the position under the
//! match lock, releases it, searches on a tokio blocking worker, then retakes
//! the lock and applies the result through [`Game::execute_move`]. If any
//! move landed in the meantime the stale result is discarded.

use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, GameResult};
use crate::game::ai::{pack_game, unpack_move, ChosenMove, MoveChooser};
use crate::game::progression::xp::Upgrade;
use crate::game::{Color, Game, GameSnapshot, GameStatus, PieceType, Position};
use attrition_search::{find_best_move, SearchConfig};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

pub type MatchId = Uuid;

type MatchHandle = Arc<Mutex<Game>>;

/// A move as submitted by a client, in algebraic notation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub promotion: Option<String>,
}

impl MoveRequest {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            promotion: None,
        }
    }

    /// Parse into squares and an optional piece type
    ///
    /// # Errors
    ///
    /// [`EngineError::MalformedInput`] for bad squares or piece names.
    pub fn parse(&self) -> GameResult<(Position, Position, Option<PieceType>)> {
        let from: Position = self.from.parse()?;
        let to: Position = self.to.parse()?;
        let promotion = self.promotion.as_deref().map(str::parse::<PieceType>).transpose()?;
        Ok((from, to, promotion))
    }
}

pub struct MatchRegistry {
    config: Arc<EngineConfig>,
    matches: RwLock<HashMap<MatchId, MatchHandle>>,
}

impl MatchRegistry {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            config,
            matches: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &Arc<EngineConfig> {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.matches.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.read().is_empty()
    }

    /// Start a new match with the standard layout
    ///
    /// A `None` seed draws one at random; pass a seed for reproducible combat.
    pub fn create_match(&self, combat_seed: Option<u64>) -> MatchId {
        let seed = combat_seed.unwrap_or_else(rand::random);
        let id = self.insert(Game::new(Arc::clone(&self.config), seed));
        tracing::info!("[REGISTRY] Created match {} (seed {})", id, seed);
        id
    }

    /// Register an existing game under a fresh id
    pub fn insert(&self, game: Game) -> MatchId {
        let id = Uuid::new_v4();
        self.matches.write().insert(id, Arc::new(Mutex::new(game)));
        id
    }

    pub fn remove(&self, id: MatchId) -> GameResult<()> {
        self.matches
            .write()
            .remove(&id)
            .map(|_| tracing::info!("[REGISTRY] Removed match {}", id))
            .ok_or_else(|| not_found(id))
    }

    fn handle(&self, id: MatchId) -> GameResult<MatchHandle> {
        self.matches.read().get(&id).cloned().ok_or_else(|| not_found(id))
    }

    /// Run a command against one match under its lock
    fn with_game<T>(&self, id: MatchId, f: impl FnOnce(&mut Game) -> GameResult<T>) -> GameResult<T> {
        let handle = self.handle(id)?;
        let mut game = handle.lock();
        f(&mut game)
    }

    pub fn snapshot(&self, id: MatchId) -> GameResult<GameSnapshot> {
        self.with_game(id, |game| Ok(game.snapshot()))
    }

    pub fn submit_move(&self, id: MatchId, request: &MoveRequest) -> GameResult<GameSnapshot> {
        let (from, to, promotion) = request.parse()?;
        self.with_game(id, |game| {
            game.execute_move(from, to, promotion).inspect_err(|e| {
                tracing::debug!("[REGISTRY] Match {} rejected {}-{}: {}", id, from, to, e);
            })?;
            Ok(game.snapshot())
        })
    }

    /// Legal destinations of the piece on `square`, as algebraic squares
    pub fn legal_destinations(&self, id: MatchId, square: &str) -> GameResult<Vec<String>> {
        let from: Position = square.parse()?;
        self.with_game(id, |game| {
            Ok(game
                .legal_destinations(from)?
                .into_iter()
                .map(|p| p.to_string())
                .collect())
        })
    }

    pub fn resign(&self, id: MatchId, color: Color) -> GameResult<GameSnapshot> {
        self.with_game(id, |game| {
            game.resign(color)?;
            Ok(game.snapshot())
        })
    }

    pub fn offer_draw(&self, id: MatchId, color: Color) -> GameResult<GameSnapshot> {
        self.with_game(id, |game| {
            game.offer_draw(color)?;
            Ok(game.snapshot())
        })
    }

    pub fn accept_draw(&self, id: MatchId, color: Color) -> GameResult<GameSnapshot> {
        self.with_game(id, |game| {
            game.accept_draw(color)?;
            Ok(game.snapshot())
        })
    }

    pub fn forfeit(&self, id: MatchId, color: Color) -> GameResult<GameSnapshot> {
        self.with_game(id, |game| {
            game.forfeit(color)?;
            Ok(game.snapshot())
        })
    }

    pub fn use_ability(&self, id: MatchId, color: Color, square: &str, ability_id: &str) -> GameResult<GameSnapshot> {
        let square: Position = square.parse()?;
        self.with_game(id, |game| {
            game.use_ability(color, square, ability_id)?;
            Ok(game.snapshot())
        })
    }

    pub fn purchase_upgrade(&self, id: MatchId, color: Color, square: &str, upgrade: Upgrade) -> GameResult<GameSnapshot> {
        let square: Position = square.parse()?;
        self.with_game(id, |game| {
            game.purchase_upgrade(color, square, upgrade)?;
            Ok(game.snapshot())
        })
    }

    /// Serialized game state for durability layers
    pub fn export(&self, id: MatchId) -> GameResult<String> {
        self.with_game(id, |game| game.to_json())
    }

    pub fn import(&self, json: &str) -> GameResult<MatchId> {
        let game = Game::from_json(json, Arc::clone(&self.config))?;
        let id = self.insert(game);
        tracing::info!("[REGISTRY] Imported match {}", id);
        Ok(id)
    }

    /// Let `bot` move for the side to move, holding the match lock throughout
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the side to move has no legal move.
    pub fn request_ai_move(&self, id: MatchId, bot: &mut dyn MoveChooser) -> GameResult<Option<GameSnapshot>> {
        self.with_game(id, |game| {
            require_in_progress(game)?;
            let Some(mv) = bot.choose(game) else {
                return Ok(None);
            };
            game.execute_move(mv.from, mv.to, mv.promotion)?;
            tracing::info!("[REGISTRY] {} bot moved {}-{} in match {}", bot.name(), mv.from, mv.to, id);
            Ok(Some(game.snapshot()))
        })
    }

    /// Minimax move searched off the match lock on a blocking worker
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidState`] if the game is over, or if another
    /// command changed the position while the search ran.
    pub async fn request_ai_move_async(&self, id: MatchId) -> GameResult<Option<GameSnapshot>> {
        let handle = self.handle(id)?;

        let (packed, plies) = {
            let game = handle.lock();
            require_in_progress(&game)?;
            let packed = pack_game(&game)
                .map_err(|e| EngineError::invalid_state(format!("cannot pack position: {}", e)))?;
            (packed, game.played_moves().len())
        };

        let search_config = SearchConfig {
            depth: self.config.search.depth,
            time_budget: self.config.search.time_budget(),
        };
        let outcome = tokio::task::spawn_blocking(move || find_best_move(&packed, &search_config))
            .await
            .map_err(|e| EngineError::invalid_state(format!("search worker failed: {}", e)))?;

        let mut game = handle.lock();
        if game.played_moves().len() != plies || game.status() != GameStatus::InProgress {
            return Err(EngineError::invalid_state("position changed while searching"));
        }

        let chosen = outcome
            .and_then(|o| unpack_move(o.best_move))
            .filter(|mv| game.is_move_legal(mv.from, mv.to))
            .or_else(|| {
                game.all_legal_moves().first().map(|&(from, to)| ChosenMove {
                    from,
                    to,
                    promotion: None,
                })
            });
        let Some(mv) = chosen else {
            return Ok(None);
        };

        game.execute_move(mv.from, mv.to, mv.promotion)?;
        tracing::info!("[REGISTRY] AI moved {}-{} in match {}", mv.from, mv.to, id);
        Ok(Some(game.snapshot()))
    }
}

fn not_found(id: MatchId) -> EngineError {
    EngineError::not_found(format!("match {}", id))
}

fn require_in_progress(game: &Game) -> GameResult<()> {
    if game.status() == GameStatus::InProgress {
        Ok(())
    } else {
        Err(EngineError::invalid_state(format!("game is {}", game.status())))
    }
}
