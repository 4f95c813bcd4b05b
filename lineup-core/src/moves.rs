//! A single disc placement and the cells it changed

use serde::{Deserialize, Serialize};

use crate::board::{Board, Pos};
use crate::disc::{resolve_effect, Disc};

/// Cells mutated by the latest placement, in the order they were touched.
/// Duplicates are allowed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    cells: Vec<Pos>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pos: Pos) {
        self.cells.push(pos);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.cells.contains(&pos)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pos> {
        self.cells.iter()
    }

    pub fn as_slice(&self) -> &[Pos] {
        &self.cells
    }
}

impl Extend<Pos> for ChangeSet {
    fn extend<I: IntoIterator<Item = Pos>>(&mut self, iter: I) {
        self.cells.extend(iter);
    }
}

impl FromIterator<Pos> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = Pos>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a Pos;
    type IntoIter = std::slice::Iter<'a, Pos>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// Drop one disc into a column and resolve its effect
#[derive(Clone, Debug)]
pub struct PlaceDiscMove {
    col: usize,
    disc: Disc,
    row_placed: Option<usize>,
    changes: ChangeSet,
    returned: Vec<Disc>,
}

impl PlaceDiscMove {
    pub fn new(col: usize, disc: Disc) -> Self {
        Self {
            col,
            disc,
            row_placed: None,
            changes: ChangeSet::new(),
            returned: Vec::new(),
        }
    }

    /// Place the disc and run its effect. Returns false when the column
    /// could not take it, in which case the board is untouched.
    pub fn execute(&mut self, board: &mut Board) -> bool {
        self.row_placed = board.place_disc(self.col, self.disc);
        let Some(row) = self.row_placed else {
            return false;
        };

        let outcome = resolve_effect(board, Pos::new(row, self.col));
        self.changes = outcome.changes;
        self.returned = outcome.returned;
        true
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn disc(&self) -> Disc {
        self.disc
    }

    pub fn was_placed(&self) -> bool {
        self.row_placed.is_some()
    }

    /// Landing row before the effect ran
    pub fn row_placed(&self) -> Option<usize> {
        self.row_placed
    }

    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    /// Discs the effect sent back to their owners
    pub fn returned(&self) -> &[Disc] {
        &self.returned
    }
}
