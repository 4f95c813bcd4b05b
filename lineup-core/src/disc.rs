//! Disc kinds and the effects they trigger when they land
//!
//! Every placed disc goes through [`resolve_effect`], a single dispatch over
//! the closed [`DiscKind`] set. Effects mutate the board in place, settle it
//! with gravity where discs were removed, and report every cell they touched
//! so win detection can stay local to the change.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Pos};
use crate::moves::ChangeSet;
use crate::player::PlayerId;

// ============================================================================
// DISC KINDS
// ============================================================================

/// Disc kind. Deserializes from a name (any case) or a numeric index;
/// anything unrecognised becomes `Ordinary`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "DiscKindRepr")]
pub enum DiscKind {
    Ordinary,
    Boring,
    Magnetic,
    Explosive,
}

impl DiscKind {
    pub const ALL: [DiscKind; 4] = [
        DiscKind::Ordinary,
        DiscKind::Boring,
        DiscKind::Magnetic,
        DiscKind::Explosive,
    ];

    pub const SPECIALS: [DiscKind; 3] = [DiscKind::Boring, DiscKind::Magnetic, DiscKind::Explosive];

    pub fn name(self) -> &'static str {
        match self {
            DiscKind::Ordinary => "ordinary",
            DiscKind::Boring => "boring",
            DiscKind::Magnetic => "magnetic",
            DiscKind::Explosive => "explosive",
        }
    }

    /// Input letter used by the console front end
    pub fn letter(self) -> char {
        match self {
            DiscKind::Ordinary => 'O',
            DiscKind::Boring => 'B',
            DiscKind::Magnetic => 'M',
            DiscKind::Explosive => 'E',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'O' => Some(DiscKind::Ordinary),
            'B' => Some(DiscKind::Boring),
            'M' => Some(DiscKind::Magnetic),
            'E' => Some(DiscKind::Explosive),
            _ => None,
        }
    }

    /// Lenient lookup used when reading saved games
    pub fn from_name_lenient(name: &str) -> Self {
        let trimmed = name.trim();
        if let Ok(index) = trimmed.parse::<u64>() {
            return Self::from_index_lenient(index);
        }
        DiscKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(trimmed))
            .unwrap_or(DiscKind::Ordinary)
    }

    pub fn from_index_lenient(index: u64) -> Self {
        DiscKind::ALL
            .get(index as usize)
            .copied()
            .unwrap_or(DiscKind::Ordinary)
    }
}

impl fmt::Display for DiscKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DiscKindRepr {
    Index(u64),
    Name(String),
}

impl From<DiscKindRepr> for DiscKind {
    fn from(repr: DiscKindRepr) -> Self {
        match repr {
            DiscKindRepr::Index(index) => DiscKind::from_index_lenient(index),
            DiscKindRepr::Name(name) => DiscKind::from_name_lenient(&name),
        }
    }
}

/// A disc on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Disc {
    pub kind: DiscKind,
    pub owner: PlayerId,
}

impl Disc {
    pub const fn new(kind: DiscKind, owner: PlayerId) -> Self {
        Self { kind, owner }
    }

    pub const fn ordinary(owner: PlayerId) -> Self {
        Self::new(DiscKind::Ordinary, owner)
    }

    /// Console symbol: player 1 `@ B M E`, player 2 `# b m e`
    pub fn symbol(&self) -> char {
        match (self.owner, self.kind) {
            (PlayerId::One, DiscKind::Ordinary) => '@',
            (PlayerId::Two, DiscKind::Ordinary) => '#',
            (PlayerId::One, kind) => kind.letter(),
            (PlayerId::Two, kind) => kind.letter().to_ascii_lowercase(),
        }
    }
}

// ============================================================================
// EFFECT RESOLUTION
// ============================================================================

/// What an effect did to the board
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectOutcome {
    /// Cells mutated by the effect, including ones moved by gravity
    pub changes: ChangeSet,
    /// Discs lifted off the board that go back to their owner's Ordinary stock
    pub returned: Vec<Disc>,
}

/// Run the landing effect of the disc at `pos`.
///
/// An empty cell means there is nothing left to resolve; the call is a no-op.
pub fn resolve_effect(board: &mut Board, pos: Pos) -> EffectOutcome {
    let Some(disc) = board.disc_at(pos) else {
        tracing::debug!(row = pos.row, col = pos.col, "effect on empty cell ignored");
        return EffectOutcome::default();
    };

    let outcome = match disc.kind {
        DiscKind::Ordinary => resolve_ordinary(pos),
        DiscKind::Boring => resolve_boring(board, pos, disc),
        DiscKind::Magnetic => resolve_magnetic(board, pos, disc),
        DiscKind::Explosive => resolve_explosive(board, pos),
    };

    tracing::debug!(
        kind = %disc.kind,
        owner = %disc.owner,
        row = pos.row,
        col = pos.col,
        changed = outcome.changes.len(),
        returned = outcome.returned.len(),
        "effect resolved"
    );
    outcome
}

fn resolve_ordinary(pos: Pos) -> EffectOutcome {
    let mut outcome = EffectOutcome::default();
    outcome.changes.push(pos);
    outcome
}

/// Drills down its column: every other disc there goes back to its owner,
/// and the driller settles at the bottom as an ordinary disc.
fn resolve_boring(board: &mut Board, pos: Pos, disc: Disc) -> EffectOutcome {
    let mut outcome = EffectOutcome::default();

    for row in 0..board.rows() {
        if row == pos.row {
            continue;
        }
        let cell = Pos::new(row, pos.col);
        if let Some(removed) = board.take_disc(cell) {
            outcome.returned.push(removed);
            outcome.changes.push(cell);
        }
    }

    let bottom = Pos::new(0, pos.col);
    board.take_disc(pos);
    board.set_disc(bottom, Some(Disc::ordinary(disc.owner)));
    outcome.changes.push(pos);
    outcome.changes.push(bottom);

    outcome.changes.extend(board.apply_gravity());
    outcome
}

/// Pulls the nearest same-owner disc beneath it one slot closer, then
/// becomes ordinary. Landing on the floor or on an own disc just converts.
fn resolve_magnetic(board: &mut Board, pos: Pos, disc: Disc) -> EffectOutcome {
    let mut outcome = EffectOutcome::default();
    outcome.changes.push(pos);

    let settled = pos.row == 0 || board.owner_at(Pos::new(pos.row - 1, pos.col)) == Some(disc.owner);

    if !settled {
        let partner = (0..pos.row - 1)
            .rev()
            .map(|row| Pos::new(row, pos.col))
            .find(|&cell| board.owner_at(cell) == Some(disc.owner));

        if let Some(partner) = partner {
            let toward = Pos::new(partner.row + 1, partner.col);
            board.swap(partner, toward);
            outcome.changes.push(partner);
            outcome.changes.push(toward);
        }
    }

    board.set_disc(pos, Some(Disc::ordinary(disc.owner)));
    outcome
}

fn resolve_explosive(board: &mut Board, pos: Pos) -> EffectOutcome {
    let mut outcome = EffectOutcome {
        changes: clear_blast(board, pos),
        returned: Vec::new(),
    };
    outcome.changes.extend(board.apply_gravity());
    outcome
}

/// Empty the 3x3 block around `pos` (clipped to the board), without settling.
/// Cleared discs leave play for good.
pub fn clear_blast(board: &mut Board, pos: Pos) -> ChangeSet {
    let mut cleared = ChangeSet::new();
    for dr in -1isize..=1 {
        for dc in -1isize..=1 {
            let row = pos.row as isize + dr;
            let col = pos.col as isize + dc;
            if !board.in_bounds(row, col) {
                continue;
            }
            let cell = Pos::new(row as usize, col as usize);
            board.take_disc(cell);
            cleared.push(cell);
        }
    }
    cleared
}
