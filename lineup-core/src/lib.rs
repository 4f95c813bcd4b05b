//! LineUp Core - Game engine and AI
//!
//! This crate provides the core game logic for LineUp, a connect-N game
//! played by dropping discs into the columns of an upright grid:
//! - Board storage and gravity (row 0 is the bottom)
//! - Disc kinds and their landing effects
//! - Line detection over the cells a move touched
//! - Turn protocol, stock accounting, and undo/redo snapshots
//! - Rule variants, configuration, and saved games
//! - A one-ply computer opponent

pub mod error;
pub mod player;
pub mod board;
pub mod disc;
pub mod moves;
pub mod rules;
pub mod history;
pub mod variant;
pub mod config;
pub mod game;
pub mod ai;
pub mod save;

// Re-exports for convenient access
pub use error::{GameError, IllegalMove};
pub use player::{Inventory, Player, PlayerId};
pub use board::{Board, Cell, Pos};
pub use disc::{clear_blast, resolve_effect, Disc, DiscKind, EffectOutcome};
pub use moves::{ChangeSet, PlaceDiscMove};
pub use rules::{WinFlags, WinRule, DEFAULT_WIN_LEN};
pub use history::{capture_snapshot, restore_snapshot, GameStateSnapshot, History, TurnMeta, MAX_HISTORY};
pub use variant::Variant;
pub use config::GameConfig;
pub use game::{legal_columns, simulate_placement, GameSession, Simulation, TurnOutcome};
pub use ai::{AiMove, ImmediateWinAI};
pub use save::{load_game, save_game, SaveData};
