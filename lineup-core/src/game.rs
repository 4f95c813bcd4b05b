//! Game session and the turn protocol
//!
//! A [`GameSession`] owns the board, both players, and the undo history.
//! [`GameSession::apply_turn`] is the only way play mutates it:
//!
//! legality check -> consume stock -> place -> resolve effect -> settle
//! -> win check -> (spin) -> snapshot

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::board::Board;
use crate::config::GameConfig;
use crate::disc::{Disc, DiscKind};
use crate::error::{GameError, IllegalMove};
use crate::history::{capture_snapshot, restore_snapshot, GameStateSnapshot, History, TurnMeta};
use crate::moves::{ChangeSet, PlaceDiscMove};
use crate::player::{Player, PlayerId};
use crate::rules::{WinFlags, WinRule};
use crate::variant::Variant;

// ============================================================================
// TURN OUTCOMES
// ============================================================================

/// Result of one call to [`GameSession::apply_turn`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// One or both players completed a line; the game is over
    Win(WinFlags),
    /// The board filled up (or the next player has nothing left to play)
    Draw,
    /// Play passes to the other player
    Continue,
    /// Rejected before anything changed
    Illegal(IllegalMove),
}

impl TurnOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnOutcome::Win(_) | TurnOutcome::Draw)
    }

    pub fn is_illegal(&self) -> bool {
        matches!(self, TurnOutcome::Illegal(_))
    }
}

// ============================================================================
// READ-ONLY INTERFACE FOR COLLABORATORS
// ============================================================================

/// Columns that can take a disc
pub fn legal_columns(board: &Board) -> Vec<usize> {
    board.legal_columns()
}

/// Preview of a placement on a cloned board
#[derive(Clone, Debug)]
pub struct Simulation {
    pub board: Board,
    pub changes: ChangeSet,
    pub wins: WinFlags,
}

impl Simulation {
    pub fn would_win(&self, player: PlayerId) -> bool {
        self.wins.get(player)
    }
}

/// Play `kind` into `col` for `owner` on a copy of `board`. The input board
/// is never touched. Returns `None` when the column cannot take a disc.
pub fn simulate_placement(
    board: &Board,
    col: usize,
    kind: DiscKind,
    owner: PlayerId,
    rule: &WinRule,
) -> Option<Simulation> {
    let mut preview = board.clone();
    let mut mv = PlaceDiscMove::new(col, Disc::new(kind, owner));
    if !mv.execute(&mut preview) {
        return None;
    }

    let wins = evaluate_wins(rule, &preview, mv.changes());
    Some(Simulation {
        board: preview,
        changes: mv.changes().clone(),
        wins,
    })
}

/// Scan the changed cells; fall back to the whole board when an effect
/// left no record of what it touched.
fn evaluate_wins(rule: &WinRule, board: &Board, changes: &ChangeSet) -> WinFlags {
    if changes.is_empty() {
        tracing::warn!("empty change set, scanning the whole board");
        return rule.win_check_board(board);
    }
    rule.win_check(board, changes)
}

// ============================================================================
// GAME SESSION
// ============================================================================

/// One game: board, players, history, and turn bookkeeping
#[derive(Clone, Debug)]
pub struct GameSession {
    config: GameConfig,
    rule: WinRule,
    board: Board,
    players: [Player; 2],
    meta: TurnMeta,
    history: History,
}

impl GameSession {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Start a new game. The opening position is the first history entry.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let (rows, cols) = config.board_size();
        let rule = WinRule::new(config.win_len)?;

        let mut players = [
            Player::human(PlayerId::One),
            if config.player_two_ai {
                Player::computer(PlayerId::Two)
            } else {
                Player::human(PlayerId::Two)
            },
        ];

        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        config.variant.allocate_stock(rows, cols, &mut players, &mut rng);

        let mut session = Self {
            history: History::new(config.max_history),
            config,
            rule,
            board: Board::new(rows, cols),
            players,
            meta: TurnMeta::initial(),
        };
        session.commit_snapshot();

        tracing::info!(
            variant = %session.config.variant,
            rows,
            cols,
            win_len = session.rule.win_len(),
            "new game"
        );
        Ok(session)
    }

    /// Reassemble a session from persisted parts. The live state is taken
    /// from `current`; `history` is used as-is.
    pub fn from_parts(
        config: GameConfig,
        players: [Player; 2],
        current: &GameStateSnapshot,
        history: History,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let rule = WinRule::new(config.win_len)?;
        let (board, inventories, meta) = restore_snapshot(current);

        let mut session = Self {
            config,
            rule,
            board,
            players,
            meta,
            history,
        };
        for player in PlayerId::BOTH {
            session.players[player.index()].inventory = inventories[player.index()].clone();
        }
        Ok(session)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn variant(&self) -> Variant {
        self.config.variant
    }

    pub fn rule(&self) -> &WinRule {
        &self.rule
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn current_player(&self) -> PlayerId {
        self.meta.current_player
    }

    pub fn turn_number(&self) -> u32 {
        self.meta.turn_number
    }

    pub fn meta(&self) -> TurnMeta {
        self.meta
    }

    pub fn wins(&self) -> WinFlags {
        self.meta.wins
    }

    pub fn is_game_over(&self) -> bool {
        self.meta.game_over
    }

    /// Sole winner, if the game ended with exactly one line owner
    pub fn winner(&self) -> Option<PlayerId> {
        self.meta.wins.winner()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn legal_columns(&self) -> Vec<usize> {
        legal_columns(&self.board)
    }

    /// Kinds `id` may play right now (allowed by the variant and in stock)
    pub fn playable_kinds(&self, id: PlayerId) -> Vec<DiscKind> {
        let variant = self.config.variant;
        self.player(id)
            .inventory
            .available_kinds()
            .filter(|&kind| variant.allows(kind))
            .collect()
    }

    fn can_move(&self, id: PlayerId) -> bool {
        !self.board.is_full() && !self.playable_kinds(id).is_empty()
    }

    // ========================================================================
    // TURN PROTOCOL
    // ========================================================================

    /// Play `kind` into `col` for the current player
    pub fn apply_turn(&mut self, col: usize, kind: DiscKind) -> TurnOutcome {
        let mover = self.meta.current_player;

        if let Err(reason) = self.check_legal(mover, col, kind) {
            tracing::debug!(player = %mover, col, kind = %kind, %reason, "move rejected");
            return TurnOutcome::Illegal(reason);
        }

        if !self.players[mover.index()].inventory.consume(kind) {
            return TurnOutcome::Illegal(IllegalMove::InsufficientStock { player: mover, kind });
        }

        let mut mv = PlaceDiscMove::new(col, Disc::new(kind, mover));
        if !mv.execute(&mut self.board) {
            // stale column: give the disc back
            self.players[mover.index()].inventory.add(kind, 1);
            tracing::warn!(player = %mover, col, "placement failed after legality check");
            return TurnOutcome::Illegal(IllegalMove::ColumnUnavailable { col });
        }

        for disc in mv.returned() {
            self.players[disc.owner.index()]
                .inventory
                .add(DiscKind::Ordinary, 1);
        }

        let mut wins = evaluate_wins(&self.rule, &self.board, mv.changes());
        self.meta.turn_number += 1;

        tracing::debug!(
            turn = self.meta.turn_number,
            player = %mover,
            col,
            kind = %kind,
            changed = mv.changes().len(),
            "disc placed"
        );

        if !wins.any() && self.spin_due() {
            wins = self.spin();
        }

        let outcome = if wins.any() {
            TurnOutcome::Win(wins)
        } else if !self.can_move(mover.opponent()) {
            TurnOutcome::Draw
        } else {
            self.meta.current_player = mover.opponent();
            TurnOutcome::Continue
        };

        self.meta.wins = wins;
        self.meta.game_over = outcome.is_terminal();
        self.commit_snapshot();

        if self.meta.game_over {
            tracing::info!(turn = self.meta.turn_number, ?outcome, "game over");
        }
        outcome
    }

    fn check_legal(&self, mover: PlayerId, col: usize, kind: DiscKind) -> Result<(), IllegalMove> {
        if self.meta.game_over {
            return Err(IllegalMove::GameOver);
        }
        if !self.config.variant.allows(kind) {
            return Err(IllegalMove::KindNotAllowed { kind });
        }
        if !self.board.is_column_legal(col) {
            return Err(IllegalMove::ColumnUnavailable { col });
        }
        if !self.players[mover.index()].inventory.can_use(kind) {
            return Err(IllegalMove::InsufficientStock { player: mover, kind });
        }
        Ok(())
    }

    fn spin_due(&self) -> bool {
        self.config.variant.spins()
            && self.config.spin_interval > 0
            && self.meta.turn_number % self.config.spin_interval == 0
            && !self.board.is_full()
    }

    /// Turn the board clockwise, let it settle, and look for lines anywhere
    fn spin(&mut self) -> WinFlags {
        self.board.rotate_cw();
        self.board.apply_gravity();
        tracing::info!(
            turn = self.meta.turn_number,
            rows = self.board.rows(),
            cols = self.board.cols(),
            "board spun"
        );
        self.rule.win_check_board(&self.board)
    }

    // ========================================================================
    // SNAPSHOTS AND HISTORY
    // ========================================================================

    /// Deep copy of the live state
    pub fn capture(&self) -> GameStateSnapshot {
        capture_snapshot(&self.board, &self.players, self.meta)
    }

    fn commit_snapshot(&mut self) {
        let snapshot = self.capture();
        self.history.save_state(snapshot);
    }

    /// Make `snapshot` the live state. A board of different dimensions
    /// (e.g. after a spin) replaces the live one wholesale.
    pub fn restore(&mut self, snapshot: &GameStateSnapshot) {
        let (board, inventories, meta) = restore_snapshot(snapshot);

        if board.rows() == self.board.rows() && board.cols() == self.board.cols() {
            self.board.clone_from(&board);
        } else {
            tracing::debug!(
                from_rows = self.board.rows(),
                from_cols = self.board.cols(),
                to_rows = board.rows(),
                to_cols = board.cols(),
                "board dimensions differ, replacing board"
            );
            self.board = board;
        }

        for (player, inventory) in self.players.iter_mut().zip(inventories) {
            player.inventory = inventory;
        }
        self.meta = meta;
    }

    /// Step back to the start of the previous turn
    pub fn undo(&mut self) -> Result<(), GameError> {
        let snapshot = self
            .history
            .undo()
            .cloned()
            .ok_or(GameError::HistoryUnderflow { operation: "undo" })?;
        self.restore(&snapshot);
        tracing::debug!(turn = self.meta.turn_number, player = %self.meta.current_player, "undo");
        Ok(())
    }

    /// Re-apply the most recently undone turn
    pub fn redo(&mut self) -> Result<(), GameError> {
        let snapshot = self
            .history
            .redo()
            .cloned()
            .ok_or(GameError::HistoryUnderflow { operation: "redo" })?;
        self.restore(&snapshot);
        tracing::debug!(turn = self.meta.turn_number, player = %self.meta.current_player, "redo");
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
