//! Error types for the engine

use crate::disc::DiscKind;
use crate::player::PlayerId;

/// Why a placement was rejected. The board and stock are untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IllegalMove {
    #[error("column {col} is full or out of range")]
    ColumnUnavailable { col: usize },

    #[error("player {player} has no {kind} discs left")]
    InsufficientStock { player: PlayerId, kind: DiscKind },

    #[error("{kind} discs are not used in this variant")]
    KindNotAllowed { kind: DiscKind },

    #[error("the game is already over")]
    GameOver,
}

/// Engine errors that are reported to the caller
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("nothing to {operation}")]
    HistoryUnderflow { operation: &'static str },

    #[error("win length {0} is too short (minimum 2)")]
    InvalidWinLength(usize),

    #[error("invalid board size {rows}x{cols}: {reason}")]
    InvalidBoardSize {
        rows: usize,
        cols: usize,
        reason: String,
    },

    #[error("config validation error: {0}")]
    InvalidConfig(String),

    #[error("invalid save data: {0}")]
    InvalidSave(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illegal_move_display() {
        let err = IllegalMove::InsufficientStock {
            player: PlayerId::Two,
            kind: DiscKind::Explosive,
        };
        assert_eq!(err.to_string(), "player 2 has no explosive discs left");

        let err = IllegalMove::ColumnUnavailable { col: 9 };
        assert_eq!(err.to_string(), "column 9 is full or out of range");
    }

    #[test]
    fn test_game_error_display() {
        let err = GameError::HistoryUnderflow { operation: "undo" };
        assert_eq!(err.to_string(), "nothing to undo");

        let err = GameError::InvalidBoardSize {
            rows: 5,
            cols: 7,
            reason: "rows must be >= 6".into(),
        };
        assert_eq!(err.to_string(), "invalid board size 5x7: rows must be >= 6");
    }
}
