//! Core module - errors, configuration and logging setup
//!
//! Everything here is shared infrastructure with no game rules in it.
//!
//! # Module Structure
//!
//! - `error` - [`EngineError`] and its rejection classes, [`ConfigError`]
//! - `config` - [`EngineConfig`] and its sections, JSON load with fallback
//! - `logging` - tracing subscriber installation for binaries

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used items
pub use config::{CombatConfig, EngineConfig, ProgressionConfig, RulesConfig, SearchSettings};
pub use error::{ConfigError, ConfigResult, EngineError, ErrorKind, GameResult, IllegalMoveReason};
pub use logging::init_tracing;
