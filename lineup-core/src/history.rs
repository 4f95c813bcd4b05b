//! Snapshots and undo/redo history
//!
//! A snapshot is a deep copy of everything a turn can change. The history
//! owns every snapshot it is given; nothing else keeps references into them,
//! so later board mutations can never leak into a stored state.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::player::{Inventory, Player, PlayerId};
use crate::rules::WinFlags;

/// Default cap on stored snapshots
pub const MAX_HISTORY: usize = 100;

/// Turn bookkeeping that travels with a snapshot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnMeta {
    pub current_player: PlayerId,
    pub turn_number: u32,
    pub wins: WinFlags,
    pub game_over: bool,
}

impl TurnMeta {
    /// Start of a game: player 1 to move, turn 0
    pub fn initial() -> Self {
        Self {
            current_player: PlayerId::One,
            turn_number: 0,
            wins: WinFlags::default(),
            game_over: false,
        }
    }
}

/// Immutable copy of a full game state
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    board: Board,
    inventories: [Inventory; 2],
    meta: TurnMeta,
}

impl GameStateSnapshot {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn inventory(&self, player: PlayerId) -> &Inventory {
        &self.inventories[player.index()]
    }

    pub fn meta(&self) -> TurnMeta {
        self.meta
    }

    pub fn current_player(&self) -> PlayerId {
        self.meta.current_player
    }

    pub fn turn_number(&self) -> u32 {
        self.meta.turn_number
    }
}

/// Deep-copy the live state
pub fn capture_snapshot(board: &Board, players: &[Player; 2], meta: TurnMeta) -> GameStateSnapshot {
    GameStateSnapshot {
        board: board.clone(),
        inventories: [players[0].inventory.clone(), players[1].inventory.clone()],
        meta,
    }
}

/// Rebuild owned state from a snapshot; the snapshot itself is left intact
pub fn restore_snapshot(snapshot: &GameStateSnapshot) -> (Board, [Inventory; 2], TurnMeta) {
    (
        snapshot.board.clone(),
        snapshot.inventories.clone(),
        snapshot.meta,
    )
}

/// Undo/redo stacks. The top of the undo stack is the current state.
#[derive(Clone, Debug)]
pub struct History {
    /// Oldest at the front, current at the back
    undo: VecDeque<GameStateSnapshot>,
    /// Most recently undone at the back
    redo: Vec<GameStateSnapshot>,
    max_depth: usize,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Rebuild from persisted stacks, both given oldest first
    pub fn from_stacks(
        undo: Vec<GameStateSnapshot>,
        redo: Vec<GameStateSnapshot>,
        max_depth: usize,
    ) -> Self {
        let mut history = Self::new(max_depth);
        history.undo = undo.into();
        history.redo = redo;
        history.enforce_cap();
        history
    }

    /// Record a committed turn. Any undone future is discarded.
    pub fn save_state(&mut self, snapshot: GameStateSnapshot) {
        self.undo.push_back(snapshot);
        self.redo.clear();
        self.enforce_cap();
    }

    fn enforce_cap(&mut self) {
        while self.undo.len() > self.max_depth {
            self.undo.pop_front();
        }
    }

    /// Needs a prior state beneath the current one
    pub fn can_undo(&self) -> bool {
        self.undo.len() >= 2
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Step back one turn, returning the state to restore
    pub fn undo(&mut self) -> Option<&GameStateSnapshot> {
        if !self.can_undo() {
            return None;
        }
        let current = self.undo.pop_back()?;
        self.redo.push(current);
        self.undo.back()
    }

    /// Re-apply the most recently undone turn, returning the state to restore
    pub fn redo(&mut self) -> Option<&GameStateSnapshot> {
        let next = self.redo.pop()?;
        self.undo.push_back(next);
        self.enforce_cap();
        self.undo.back()
    }

    pub fn current(&self) -> Option<&GameStateSnapshot> {
        self.undo.back()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Undo stack, oldest first
    pub fn undo_stack(&self) -> impl Iterator<Item = &GameStateSnapshot> + '_ {
        self.undo.iter()
    }

    /// Redo stack, oldest push first
    pub fn redo_stack(&self) -> impl Iterator<Item = &GameStateSnapshot> + '_ {
        self.redo.iter()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_HISTORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disc::{Disc, DiscKind};

    fn players() -> [Player; 2] {
        let mut one = Player::human(PlayerId::One);
        let mut two = Player::computer(PlayerId::Two);
        one.inventory.add(DiscKind::Ordinary, 5);
        two.inventory.add(DiscKind::Ordinary, 5);
        [one, two]
    }

    fn snapshot_at(turn: u32) -> GameStateSnapshot {
        let meta = TurnMeta {
            turn_number: turn,
            ..TurnMeta::initial()
        };
        capture_snapshot(&Board::new(6, 7), &players(), meta)
    }

    #[test]
    fn test_snapshot_is_deep_copy() {
        let mut board = Board::new(6, 7);
        let mut players = players();
        let snapshot = capture_snapshot(&board, &players, TurnMeta::initial());

        board.place_disc(0, Disc::ordinary(PlayerId::One)).unwrap();
        players[0].inventory.consume(DiscKind::Ordinary);

        assert_eq!(snapshot.board().disc_count(), 0);
        assert_eq!(snapshot.inventory(PlayerId::One).count(DiscKind::Ordinary), 5);
    }

    #[test]
    fn test_restore_returns_copies() {
        let snapshot = snapshot_at(3);
        let (mut board, inventories, meta) = restore_snapshot(&snapshot);
        board.place_disc(0, Disc::ordinary(PlayerId::Two)).unwrap();
        assert_eq!(meta.turn_number, 3);
        assert_eq!(inventories[1].count(DiscKind::Ordinary), 5);
        assert_eq!(snapshot.board().disc_count(), 0);
    }

    #[test]
    fn test_undo_needs_two_entries() {
        let mut history = History::default();
        assert!(history.undo().is_none());
        history.save_state(snapshot_at(0));
        assert!(!history.can_undo());
        assert!(history.undo().is_none());
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn test_undo_then_redo() {
        let mut history = History::default();
        for turn in 0..3 {
            history.save_state(snapshot_at(turn));
        }

        assert_eq!(history.undo().map(|s| s.turn_number()), Some(1));
        assert_eq!(history.redo_len(), 1);
        assert_eq!(history.redo().map(|s| s.turn_number()), Some(2));
        assert_eq!(history.undo_len(), 3);
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_save_clears_redo() {
        let mut history = History::default();
        history.save_state(snapshot_at(0));
        history.save_state(snapshot_at(1));
        history.undo();
        assert!(history.can_redo());
        history.save_state(snapshot_at(7));
        assert!(!history.can_redo());
        assert_eq!(history.current().map(|s| s.turn_number()), Some(7));
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut history = History::new(3);
        for turn in 0..5 {
            history.save_state(snapshot_at(turn));
        }
        assert_eq!(history.undo_len(), 3);
        let turns: Vec<u32> = history.undo_stack().map(|s| s.turn_number()).collect();
        assert_eq!(turns, vec![2, 3, 4]);
    }
}
