//! Rule variants: board size, stock profile, and spin behaviour

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::disc::DiscKind;
use crate::error::GameError;
use crate::player::Player;

/// Smallest Classic board
pub const CLASSIC_MIN_ROWS: usize = 6;
pub const CLASSIC_MIN_COLS: usize = 7;

/// Largest side accepted for any board
pub const MAX_BOARD_DIM: usize = 32;

/// Fixed board for Basic and Spin
pub const FIXED_ROWS: usize = 8;
pub const FIXED_COLS: usize = 9;

/// Turns between board rotations in Spin
pub const DEFAULT_SPIN_INTERVAL: u32 = 5;

/// Each Classic player gets this many of each of their two special kinds
const SPECIAL_STOCK: u32 = 2;
const SPECIALS_PER_PLAYER: usize = 2;

const ORDINARY_ONLY: &[DiscKind] = &[DiscKind::Ordinary];

/// Game variant
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Any size (at least 6x7, rows <= cols) with special discs
    #[default]
    Classic,
    /// 8x9, ordinary discs only
    Basic,
    /// 8x9, ordinary discs only, the board turns every few turns
    Spin,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Classic, Variant::Basic, Variant::Spin];

    pub fn name(self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Basic => "basic",
            Variant::Spin => "spin",
        }
    }

    /// (rows, cols) used when none are given
    pub fn default_size(self) -> (usize, usize) {
        match self {
            Variant::Classic => (CLASSIC_MIN_ROWS, CLASSIC_MIN_COLS),
            Variant::Basic | Variant::Spin => (FIXED_ROWS, FIXED_COLS),
        }
    }

    pub fn allowed_kinds(self) -> &'static [DiscKind] {
        match self {
            Variant::Classic => &DiscKind::ALL,
            Variant::Basic | Variant::Spin => ORDINARY_ONLY,
        }
    }

    pub fn allows(self, kind: DiscKind) -> bool {
        self.allowed_kinds().contains(&kind)
    }

    pub fn spins(self) -> bool {
        self == Variant::Spin
    }

    pub fn validate_size(self, rows: usize, cols: usize) -> Result<(), GameError> {
        let reject = |reason: String| GameError::InvalidBoardSize { rows, cols, reason };

        match self {
            Variant::Classic => {
                if rows < CLASSIC_MIN_ROWS {
                    return Err(reject(format!("rows must be >= {}", CLASSIC_MIN_ROWS)));
                }
                if cols < CLASSIC_MIN_COLS {
                    return Err(reject(format!("columns must be >= {}", CLASSIC_MIN_COLS)));
                }
                if rows > cols {
                    return Err(reject("rows cannot exceed columns".to_string()));
                }
                if cols > MAX_BOARD_DIM {
                    return Err(reject(format!("columns must be <= {}", MAX_BOARD_DIM)));
                }
            }
            Variant::Basic | Variant::Spin => {
                // a spun board has its dimensions swapped
                let fixed = (rows, cols) == (FIXED_ROWS, FIXED_COLS)
                    || (self.spins() && (rows, cols) == (FIXED_COLS, FIXED_ROWS));
                if !fixed {
                    return Err(reject(format!(
                        "{} is played on {}x{}",
                        self.name(),
                        FIXED_ROWS,
                        FIXED_COLS
                    )));
                }
            }
        }
        Ok(())
    }

    /// Hand out starting stock: half the cells each. Sizes are expected to
    /// have passed [`Variant::validate_size`].
    ///
    /// Classic players each draw two different special kinds (two discs of
    /// each) and fill the rest with ordinary discs.
    pub fn allocate_stock<R: Rng>(self, rows: usize, cols: usize, players: &mut [Player; 2], rng: &mut R) {
        let per_player = u32::try_from(rows.saturating_mul(cols) / 2).unwrap_or(u32::MAX);

        for player in players.iter_mut() {
            match self {
                Variant::Classic => {
                    let specials: Vec<DiscKind> = DiscKind::SPECIALS
                        .choose_multiple(rng, SPECIALS_PER_PLAYER)
                        .copied()
                        .collect();
                    let special_total = SPECIAL_STOCK * specials.len() as u32;
                    player
                        .inventory
                        .add(DiscKind::Ordinary, per_player.saturating_sub(special_total));
                    for kind in specials {
                        player.inventory.add(kind, SPECIAL_STOCK);
                    }
                }
                Variant::Basic | Variant::Spin => {
                    player.inventory.add(DiscKind::Ordinary, per_player);
                }
            }

            tracing::debug!(
                player = %player.id,
                variant = self.name(),
                total = player.inventory.total(),
                "stock allocated"
            );
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Variant::ALL
            .into_iter()
            .find(|variant| variant.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown variant '{}' (expected classic, basic or spin)", wanted))
    }
}
