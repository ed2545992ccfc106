//! Command-line driver: bot-versus-bot self-play
//!
//! ```text
//! attrition selfplay --white minimax --black greedy --seed 7
//! ```

use anyhow::{bail, Context};
use attrition::core::{init_tracing, EngineConfig};
use attrition::game::ai::BotKind;
use attrition::game::{Color, Game, GameStatus};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "attrition", version, about = "Attrition chess engine")]
struct Cli {
    /// JSON configuration file; defaults are used if it is missing
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play one game between two bots and print the result
    Selfplay {
        #[arg(long, default_value = "minimax")]
        white: BotKind,

        #[arg(long, default_value = "random")]
        black: BotKind,

        /// Seeds both combat and the random bots
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// Overrides the configured search depth
        #[arg(long)]
        depth: Option<u8>,

        #[arg(long, default_value_t = 300)]
        max_plies: usize,

        /// Print the final game as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    init_tracing("info");
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load_or_default(path),
        None => EngineConfig::default(),
    };

    match cli.command {
        Command::Selfplay {
            white,
            black,
            seed,
            depth,
            max_plies,
            json,
        } => {
            if let Some(depth) = depth {
                config.search.depth = depth;
            }
            config.validate().context("invalid configuration")?;
            selfplay(Arc::new(config), white, black, seed, max_plies, json)
        }
    }
}

fn selfplay(
    config: Arc<EngineConfig>,
    white: BotKind,
    black: BotKind,
    seed: u64,
    max_plies: usize,
    json: bool,
) -> anyhow::Result<()> {
    let mut white_bot = white.build(seed, &config.search);
    let mut black_bot = black.build(seed.wrapping_add(1), &config.search);
    let mut game = Game::new(Arc::clone(&config), seed);

    tracing::info!("[GAME] Self-play: {} (white) vs {} (black), seed {}", white, black, seed);

    while game.status() == GameStatus::InProgress && game.played_moves().len() < max_plies {
        let bot = match game.current_turn() {
            Color::White => white_bot.as_mut(),
            Color::Black => black_bot.as_mut(),
        };
        let Some(mv) = bot.choose(&game) else {
            bail!("{} bot found no move in a live position", bot.name());
        };
        let played = game
            .execute_move(mv.from, mv.to, mv.promotion)
            .with_context(|| format!("{} bot played an illegal move", bot.name()))?;
        println!("{:>3}. {}", game.played_moves().len(), played.notation);
    }

    if json {
        println!("{}", game.to_json()?);
    }

    match game.status() {
        GameStatus::InProgress => println!("Stopped after {} plies, game still in progress", max_plies),
        status => println!("Result: {} after {} plies", status, game.played_moves().len()),
    }
    Ok(())
}
