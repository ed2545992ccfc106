//! Move choosers: random, greedy and minimax
//!
//! Every bot asks the authoritative [`Game`] for its legal moves or verifies
//! its pick against it, so no bot can disagree with the rules engine about
//! what is legal.

use super::bridge::{pack_game, unpack_move, ChosenMove};
use crate::core::config::SearchSettings;
use crate::game::aggregate::Game;
use attrition_search::{find_best_move, SearchConfig, SearchOutcome};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::str::FromStr;

/// Something that can pick a move for the side to move
pub trait MoveChooser: Send {
    fn name(&self) -> &'static str;

    /// `None` when the side to move has no legal move
    fn choose(&mut self, game: &Game) -> Option<ChosenMove>;
}

fn first_legal(game: &Game) -> Option<ChosenMove> {
    game.all_legal_moves().first().map(|&(from, to)| ChosenMove {
        from,
        to,
        promotion: None,
    })
}

/// Uniformly random legal move from a seeded generator
pub struct RandomBot {
    rng: StdRng,
}

impl RandomBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl MoveChooser for RandomBot {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose(&mut self, game: &Game) -> Option<ChosenMove> {
        let moves = game.all_legal_moves();
        if moves.is_empty() {
            return None;
        }
        let (from, to) = moves[self.rng.random_range(0..moves.len())];
        Some(ChosenMove {
            from,
            to,
            promotion: None,
        })
    }
}

/// One-ply capture seeker: the attack on the most valuable target, first found
/// on ties; otherwise the first legal move
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyBot;

impl MoveChooser for GreedyBot {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn choose(&mut self, game: &Game) -> Option<ChosenMove> {
        let moves = game.all_legal_moves();
        let mut best: Option<(usize, u32)> = None;
        for (index, &(_, to)) in moves.iter().enumerate() {
            let Some(victim) = game.board().piece_at(to) else {
                continue;
            };
            let value = victim.piece_type().value();
            match best {
                Some((_, best_value)) if best_value >= value => {}
                _ => best = Some((index, value)),
            }
        }

        match best {
            Some((index, _)) => moves.get(index).map(|&(from, to)| ChosenMove {
                from,
                to,
                promotion: None,
            }),
            None => first_legal(game),
        }
    }
}

/// Fixed-depth minimax over the packed board
#[derive(Debug, Clone)]
pub struct MinimaxBot {
    config: SearchConfig,
    last_outcome: Option<SearchOutcome>,
}

impl MinimaxBot {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            last_outcome: None,
        }
    }

    pub fn from_settings(settings: &SearchSettings) -> Self {
        Self::new(SearchConfig {
            depth: settings.depth,
            time_budget: settings.time_budget(),
        })
    }

    /// Statistics of the most recent search
    pub fn last_outcome(&self) -> Option<&SearchOutcome> {
        self.last_outcome.as_ref()
    }
}

impl MoveChooser for MinimaxBot {
    fn name(&self) -> &'static str {
        "minimax"
    }

    fn choose(&mut self, game: &Game) -> Option<ChosenMove> {
        let packed = match pack_game(game) {
            Ok(packed) => packed,
            Err(e) => {
                tracing::warn!("[AI] Could not pack position: {}. Falling back.", e);
                return first_legal(game);
            }
        };

        self.last_outcome = find_best_move(&packed, &self.config);
        let chosen = self.last_outcome.and_then(|o| unpack_move(o.best_move));

        match chosen {
            Some(mv) if game.is_move_legal(mv.from, mv.to) => Some(mv),
            Some(mv) => {
                tracing::warn!(
                    "[AI] Search proposed {}-{}, rejected by the rules engine. Falling back.",
                    mv.from,
                    mv.to
                );
                first_legal(game)
            }
            None => first_legal(game),
        }
    }
}

/// Bot selection for the CLI and registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotKind {
    Random,
    Greedy,
    Minimax,
}

impl BotKind {
    pub fn build(self, seed: u64, settings: &SearchSettings) -> Box<dyn MoveChooser> {
        match self {
            BotKind::Random => Box::new(RandomBot::new(seed)),
            BotKind::Greedy => Box::new(GreedyBot),
            BotKind::Minimax => Box::new(MinimaxBot::from_settings(settings)),
        }
    }
}

impl fmt::Display for BotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotKind::Random => f.write_str("random"),
            BotKind::Greedy => f.write_str("greedy"),
            BotKind::Minimax => f.write_str("minimax"),
        }
    }
}

impl FromStr for BotKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(BotKind::Random),
            "greedy" => Ok(BotKind::Greedy),
            "minimax" => Ok(BotKind::Minimax),
            other => Err(format!("unknown bot '{}' (expected random, greedy or minimax)", other)),
        }
    }
}
