//! Fixed-depth minimax search over the packed board
//!
//! This module implements the AI move chooser using:
//! - Negamax variant of alpha-beta pruning
//! - Copy-make on [`PackedBoard`] instead of make/unmake
//! - Move ordering at interior nodes for better pruning
//!
//! ## Tie Breaking
//!
//! The root walks moves in generation order and only replaces its best move on
//! a strictly better score, so among equally scored moves the first one found
//! wins. Alpha-beta returns the same root choice as plain minimax: a later
//! move can only displace the incumbent by truly beating it.
//!
//! ## Time Budget
//!
//! Depth is fixed and small. The optional time budget is advisory: the search
//! always completes and only logs when it ran over.
//!
//! ## Module Organization
//!
//! - `alphabeta` - Root search and the negamax recursion
//! - `ordering` - Move ordering heuristics

mod alphabeta;
mod ordering;

use crate::constants::*;
use crate::types::*;
use instant::Instant;
use std::time::Duration;

/// Knobs for a single search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Plies to look ahead, clamped to `1..=MAX_SEARCH_DEPTH`
    pub depth: u8,
    /// Advisory wall-clock budget; exceeding it is logged, never enforced
    pub time_budget: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: DEFAULT_DEPTH,
            time_budget: None,
        }
    }
}

/// Result of a completed search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub best_move: PackedMove,
    /// Score from the side to move's perspective
    pub score: i32,
    pub nodes: u64,
    pub depth: u8,
}

/// Search the position and return the best move for the side to move.
///
/// Returns `None` when the side to move has no legal move (or no king): the
/// caller has already reached a terminal state and should report it.
///
/// # Examples
///
/// ```rust,ignore
/// let board = PackedBoard::standard(25);
/// let outcome = find_best_move(&board, &SearchConfig::default()).unwrap();
/// println!("{} -> {}", outcome.best_move.from, outcome.best_move.to);
/// ```
pub fn find_best_move(board: &PackedBoard, config: &SearchConfig) -> Option<SearchOutcome> {
    let depth = config.depth.clamp(1, MAX_SEARCH_DEPTH);
    let start = Instant::now();
    let mut nodes = 0u64;

    let (best_move, score) = alphabeta::search_root(board, depth, &mut nodes)?;

    let elapsed = start.elapsed();
    tracing::debug!(
        "[AI] depth {} searched {} nodes in {:?}, score {}",
        depth,
        nodes,
        elapsed,
        score
    );
    if let Some(budget) = config.time_budget {
        if elapsed > budget {
            tracing::warn!(
                "[AI] Search took {:?}, over the advisory budget of {:?}",
                elapsed,
                budget
            );
        }
    }

    Some(SearchOutcome {
        best_move,
        score,
        nodes,
        depth,
    })
}
