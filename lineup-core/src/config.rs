//! Session configuration
//!
//! Loadable from JSON; every field has a default so partial files work.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::history::MAX_HISTORY;
use crate::rules::DEFAULT_WIN_LEN;
use crate::variant::{Variant, DEFAULT_SPIN_INTERVAL};

/// Settings for a new game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Rule variant
    pub variant: Variant,
    /// Board rows (None = variant default)
    pub rows: Option<usize>,
    /// Board columns (None = variant default)
    pub cols: Option<usize>,
    /// Discs in a row needed to win
    pub win_len: usize,
    /// Snapshots kept for undo
    pub max_history: usize,
    /// Turns between rotations (Spin only)
    pub spin_interval: u32,
    /// Seed for stock allocation and AI choices (None = random)
    pub seed: Option<u64>,
    /// Player 2 is played by the computer
    pub player_two_ai: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Classic,
            rows: None,
            cols: None,
            win_len: DEFAULT_WIN_LEN,
            max_history: MAX_HISTORY,
            spin_interval: DEFAULT_SPIN_INTERVAL,
            seed: None,
            player_two_ai: false,
        }
    }
}

impl GameConfig {
    /// Defaults for a given variant
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            variant,
            ..Default::default()
        }
    }

    /// Set the board size
    pub fn with_size(mut self, rows: usize, cols: usize) -> Self {
        self.rows = Some(rows);
        self.cols = Some(cols);
        self
    }

    /// Set the win length
    pub fn with_win_len(mut self, win_len: usize) -> Self {
        self.win_len = win_len;
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Let the computer play player 2
    pub fn with_ai_opponent(mut self) -> Self {
        self.player_two_ai = true;
        self
    }

    /// Set the undo depth
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    /// Board size after applying variant defaults
    pub fn board_size(&self) -> (usize, usize) {
        let (default_rows, default_cols) = self.variant.default_size();
        (
            self.rows.unwrap_or(default_rows),
            self.cols.unwrap_or(default_cols),
        )
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), GameError> {
        let (rows, cols) = self.board_size();
        self.variant.validate_size(rows, cols)?;

        if self.win_len < 2 {
            return Err(GameError::InvalidWinLength(self.win_len));
        }
        if self.win_len > rows.max(cols) {
            return Err(GameError::InvalidConfig(format!(
                "win_len {} does not fit on a {}x{} board",
                self.win_len, rows, cols
            )));
        }
        if self.max_history == 0 {
            return Err(GameError::InvalidConfig("max_history must be > 0".into()));
        }
        if self.variant.spins() && self.spin_interval == 0 {
            return Err(GameError::InvalidConfig("spin_interval must be > 0".into()));
        }
        Ok(())
    }

    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults if the file does not exist.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }
}
