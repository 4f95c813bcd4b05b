//! Line detection

use serde::{Deserialize, Serialize};

use crate::board::{Board, Pos};
use crate::error::GameError;
use crate::moves::ChangeSet;
use crate::player::PlayerId;

/// Default line length needed to win
pub const DEFAULT_WIN_LEN: usize = 4;

/// Axis directions as (row, col) steps: horizontal, vertical, two diagonals
const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Which players completed a line. Both may be set at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinFlags {
    pub player1: bool,
    pub player2: bool,
}

impl WinFlags {
    pub fn any(&self) -> bool {
        self.player1 || self.player2
    }

    pub fn both(&self) -> bool {
        self.player1 && self.player2
    }

    pub fn get(&self, player: PlayerId) -> bool {
        match player {
            PlayerId::One => self.player1,
            PlayerId::Two => self.player2,
        }
    }

    fn mark(&mut self, player: PlayerId) {
        match player {
            PlayerId::One => self.player1 = true,
            PlayerId::Two => self.player2 = true,
        }
    }

    /// Sole winner, if exactly one flag is set
    pub fn winner(&self) -> Option<PlayerId> {
        match (self.player1, self.player2) {
            (true, false) => Some(PlayerId::One),
            (false, true) => Some(PlayerId::Two),
            _ => None,
        }
    }
}

/// Connect-N rule
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WinRule {
    win_len: usize,
}

impl WinRule {
    pub fn new(win_len: usize) -> Result<Self, GameError> {
        if win_len < 2 {
            return Err(GameError::InvalidWinLength(win_len));
        }
        Ok(Self { win_len })
    }

    pub fn win_len(&self) -> usize {
        self.win_len
    }

    /// Does the disc at `pos` sit on a line of `win_len` same-owner discs?
    pub fn check_cell_win(&self, board: &Board, pos: Pos) -> bool {
        let Some(owner) = board.owner_at(pos) else {
            return false;
        };

        AXES.iter().any(|&(dr, dc)| {
            let count = 1
                + self.run_length(board, pos, owner, dr, dc)
                + self.run_length(board, pos, owner, -dr, -dc);
            count >= self.win_len
        })
    }

    /// Consecutive `owner` discs stepping away from `pos` (exclusive)
    fn run_length(&self, board: &Board, pos: Pos, owner: PlayerId, dr: isize, dc: isize) -> usize {
        let mut count = 0;
        let mut row = pos.row as isize;
        let mut col = pos.col as isize;

        while count + 1 < self.win_len {
            row += dr;
            col += dc;
            if !board.in_bounds(row, col) {
                break;
            }
            if board.owner_at(Pos::new(row as usize, col as usize)) != Some(owner) {
                break;
            }
            count += 1;
        }

        count
    }

    /// Check only the cells a placement touched
    pub fn win_check(&self, board: &Board, changes: &ChangeSet) -> WinFlags {
        self.scan(board, changes.iter().copied())
    }

    /// Check every cell on the board
    pub fn win_check_board(&self, board: &Board) -> WinFlags {
        self.scan(board, board.cells().map(|cell| cell.pos()))
    }

    fn scan(&self, board: &Board, cells: impl Iterator<Item = Pos>) -> WinFlags {
        let mut flags = WinFlags::default();

        for pos in cells {
            let Some(owner) = board.owner_at(pos) else {
                continue;
            };
            if flags.get(owner) {
                continue;
            }
            if self.check_cell_win(board, pos) {
                flags.mark(owner);
                if flags.both() {
                    break;
                }
            }
        }

        flags
    }
}

impl Default for WinRule {
    fn default() -> Self {
        Self {
            win_len: DEFAULT_WIN_LEN,
        }
    }
}
