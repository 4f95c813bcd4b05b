//! Saved games
//!
//! A save holds the configuration, both seats, the live state, and the full
//! undo/redo stacks, so a loaded game can still be stepped back.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::GameSession;
use crate::history::{GameStateSnapshot, History};
use crate::player::{Player, PlayerId};

/// Serialized form of a [`GameSession`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    pub config: GameConfig,
    pub players: [Player; 2],
    pub current: GameStateSnapshot,
    /// Oldest first; the last entry is normally `current`
    #[serde(default)]
    pub undo: Vec<GameStateSnapshot>,
    /// In push order; the last entry is the next redo
    #[serde(default)]
    pub redo: Vec<GameStateSnapshot>,
}

impl SaveData {
    pub fn from_session(session: &GameSession) -> Self {
        let history = session.history();
        Self {
            config: session.config().clone(),
            players: session.players().clone(),
            current: session.capture(),
            undo: history.undo_stack().cloned().collect(),
            redo: history.redo_stack().cloned().collect(),
        }
    }

    /// Check that every stored state fits the saved configuration
    pub fn validate(&self) -> Result<(), GameError> {
        self.config.validate()?;

        for (seat, expected) in self.players.iter().zip(PlayerId::BOTH) {
            if seat.id != expected {
                return Err(GameError::InvalidSave(format!(
                    "seat {} holds player {}",
                    expected, seat.id
                )));
            }
        }

        let states = std::iter::once(&self.current)
            .chain(self.undo.iter())
            .chain(self.redo.iter());
        let (rows, cols) = self.config.board_size();
        for state in states {
            let board = state.board();
            let shape = (board.rows(), board.cols());
            let fits = shape == (rows, cols) || (self.config.variant.spins() && shape == (cols, rows));
            if !fits {
                return Err(GameError::InvalidSave(format!(
                    "stored board is {}x{} but the game is played on {}x{}",
                    shape.0, shape.1, rows, cols
                )));
            }
        }
        Ok(())
    }

    pub fn into_session(self) -> Result<GameSession, GameError> {
        self.validate()?;
        let history = History::from_stacks(self.undo, self.redo, self.config.max_history);
        GameSession::from_parts(self.config, self.players, &self.current, history)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write save file {}", path.display()))?;
        Ok(())
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read save file {}", path.display()))?;
        let data: SaveData = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse save file {}", path.display()))?;
        data.validate()?;
        Ok(data)
    }
}

/// Write `session` to `path`
pub fn save_game(session: &GameSession, path: &Path) -> anyhow::Result<()> {
    SaveData::from_session(session).save(path)?;
    tracing::info!(path = %path.display(), turn = session.turn_number(), "game saved");
    Ok(())
}

/// Read a session back from `path`
pub fn load_game(path: &Path) -> anyhow::Result<GameSession> {
    let session = SaveData::load(path)?.into_session()?;
    tracing::info!(path = %path.display(), turn = session.turn_number(), "game loaded");
    Ok(session)
}
