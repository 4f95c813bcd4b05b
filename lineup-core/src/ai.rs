//! Computer opponent
//!
//! Takes an immediate win when one exists, otherwise drops a random disc
//! (ordinary when it has any). Reads the session only through
//! [`legal_columns`] and [`simulate_placement`].

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::disc::DiscKind;
use crate::game::{legal_columns, simulate_placement, GameSession, TurnOutcome};

/// Seed used by [`ImmediateWinAI::new`]
const DEFAULT_SEED: u64 = 42;

/// A column and the kind to drop there
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AiMove {
    pub col: usize,
    pub kind: DiscKind,
}

/// One-ply computer player
pub struct ImmediateWinAI {
    rng: ChaCha8Rng,
}

impl ImmediateWinAI {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Pick a move for the player to act. `None` when the game is over or
    /// the player has nothing legal to play.
    pub fn best_move(&mut self, session: &GameSession) -> Option<AiMove> {
        if session.is_game_over() {
            return None;
        }

        let me = session.current_player();
        let columns = legal_columns(session.board());
        let kinds = session.playable_kinds(me);
        if columns.is_empty() || kinds.is_empty() {
            return None;
        }

        for &col in &columns {
            for &kind in &kinds {
                let Some(sim) = simulate_placement(session.board(), col, kind, me, session.rule())
                else {
                    continue;
                };
                // a shared line still ends the game, but never hand one over
                if sim.would_win(me) && !sim.would_win(me.opponent()) {
                    tracing::debug!(player = %me, col, kind = %kind, "winning move found");
                    return Some(AiMove { col, kind });
                }
            }
        }

        let col = *columns.choose(&mut self.rng)?;
        let kind = if kinds.contains(&DiscKind::Ordinary) {
            DiscKind::Ordinary
        } else {
            kinds[0]
        };
        Some(AiMove { col, kind })
    }

    /// Play both sides until the game ends or `max_turns` have been made.
    /// Returns the moves in order.
    pub fn play_game(&mut self, session: &mut GameSession, max_turns: u32) -> Vec<AiMove> {
        let mut played = Vec::new();

        while !session.is_game_over() && (played.len() as u32) < max_turns {
            let Some(mv) = self.best_move(session) else {
                break;
            };
            match session.apply_turn(mv.col, mv.kind) {
                TurnOutcome::Illegal(reason) => {
                    tracing::warn!(col = mv.col, kind = %mv.kind, %reason, "computer move rejected");
                    break;
                }
                _ => played.push(mv),
            }
        }

        played
    }
}

impl Default for ImmediateWinAI {
    fn default() -> Self {
        Self::new()
    }
}
