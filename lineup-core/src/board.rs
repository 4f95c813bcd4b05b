//! Gravity board geometry
//!
//! Row 0 is the bottom row. Discs enter a column from the top and fall to
//! the lowest empty cell.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::disc::Disc;
use crate::error::GameError;
use crate::player::PlayerId;

/// Board position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A board cell. Position is fixed; only the occupant changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    row: usize,
    col: usize,
    pub occupant: Option<Disc>,
}

impl Cell {
    fn empty(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            occupant: None,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn pos(&self) -> Pos {
        Pos::new(self.row, self.col)
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    pub fn owner(&self) -> Option<PlayerId> {
        self.occupant.map(|disc| disc.owner)
    }
}

/// Game board (clone for an independent copy)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardRecord", into = "BoardRecord")]
pub struct Board {
    rows: usize,
    cols: usize,
    /// Row-major: index = row * cols + col
    cells: Vec<Cell>,
}

impl Board {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    pub fn new(rows: usize, cols: usize) -> Self {
        let cells = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| Cell::empty(row, col)))
            .collect();
        Self { rows, cols, cells }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    fn index(&self, pos: Pos) -> usize {
        pos.row * self.cols + pos.col
    }

    /// Cell at `pos`, or `None` when off the board
    pub fn cell(&self, pos: Pos) -> Option<&Cell> {
        if pos.row < self.rows && pos.col < self.cols {
            Some(&self.cells[self.index(pos)])
        } else {
            None
        }
    }

    fn cell_mut(&mut self, pos: Pos) -> Option<&mut Cell> {
        if pos.row < self.rows && pos.col < self.cols {
            let idx = self.index(pos);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    pub fn disc_at(&self, pos: Pos) -> Option<Disc> {
        self.cell(pos).and_then(|cell| cell.occupant)
    }

    pub fn owner_at(&self, pos: Pos) -> Option<PlayerId> {
        self.cell(pos).and_then(Cell::owner)
    }

    /// Iterate cells bottom row first
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    pub fn disc_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Occupied cells in one column
    pub fn column_height(&self, col: usize) -> usize {
        (0..self.rows)
            .filter(|&row| self.disc_at(Pos::new(row, col)).is_some())
            .count()
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Remove and return the disc at `pos`
    pub fn take_disc(&mut self, pos: Pos) -> Option<Disc> {
        self.cell_mut(pos).and_then(|cell| cell.occupant.take())
    }

    /// Overwrite the occupant at `pos`. Off-board positions are ignored.
    pub fn set_disc(&mut self, pos: Pos, disc: Option<Disc>) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.occupant = disc;
        }
    }

    /// Exchange the occupants of two cells
    pub fn swap(&mut self, a: Pos, b: Pos) {
        let first = self.disc_at(a);
        let second = self.disc_at(b);
        self.set_disc(a, second);
        self.set_disc(b, first);
    }

    // ========================================================================
    // GRAVITY AND PLACEMENT
    // ========================================================================

    /// A column can take a disc when it exists and its top cell is empty
    pub fn is_column_legal(&self, col: usize) -> bool {
        if col >= self.cols || self.rows == 0 {
            return false;
        }
        self.disc_at(Pos::new(self.rows - 1, col)).is_none()
    }

    pub fn legal_columns(&self) -> Vec<usize> {
        (0..self.cols).filter(|&col| self.is_column_legal(col)).collect()
    }

    /// Drop a disc into a column, returning the row it landed on
    pub fn place_disc(&mut self, col: usize, disc: Disc) -> Option<usize> {
        if !self.is_column_legal(col) {
            return None;
        }
        let row = (0..self.rows).find(|&row| self.disc_at(Pos::new(row, col)).is_none())?;
        self.set_disc(Pos::new(row, col), Some(disc));
        Some(row)
    }

    /// Compact every column downward, keeping disc order.
    ///
    /// Returns the positions whose occupant changed; empty when the board
    /// was already settled.
    pub fn apply_gravity(&mut self) -> Vec<Pos> {
        let mut moved = Vec::new();

        for col in 0..self.cols {
            let mut next_fill = 0;
            for row in 0..self.rows {
                let from = Pos::new(row, col);
                let Some(disc) = self.disc_at(from) else {
                    continue;
                };
                if next_fill != row {
                    let to = Pos::new(next_fill, col);
                    self.set_disc(to, Some(disc));
                    self.set_disc(from, None);
                    moved.push(to);
                    moved.push(from);
                }
                next_fill += 1;
            }
        }

        moved
    }

    pub fn is_full(&self) -> bool {
        (0..self.cols).all(|col| !self.is_column_legal(col))
    }

    /// Rotate a quarter turn clockwise. Dimensions swap; discs are not
    /// settled, so callers follow up with [`Board::apply_gravity`].
    pub fn rotate_cw(&mut self) {
        let mut rotated = Board::new(self.cols, self.rows);
        for row in 0..rotated.rows {
            for col in 0..rotated.cols {
                let source = Pos::new(self.rows - 1 - col, row);
                rotated.set_disc(Pos::new(row, col), self.disc_at(source));
            }
        }
        *self = rotated;
    }
}

impl fmt::Display for Board {
    /// Top row first, `|` separated, with 1-based column labels underneath
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.rows).rev() {
            for col in 0..self.cols {
                let symbol = self
                    .disc_at(Pos::new(row, col))
                    .map(|disc| disc.symbol())
                    .unwrap_or(' ');
                write!(f, "|{}", symbol)?;
            }
            writeln!(f, "|")?;
        }
        for col in 1..=self.cols {
            write!(f, " {}", col % 10)?;
        }
        writeln!(f)
    }
}

// ============================================================================
// PERSISTED FORM
// ============================================================================

/// Board as stored on disk: `cells[row][col]`, bottom row first
#[derive(Clone, Debug, Serialize, Deserialize)]
struct BoardRecord {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<Option<Disc>>>,
}

impl From<Board> for BoardRecord {
    fn from(board: Board) -> Self {
        let cells = (0..board.rows)
            .map(|row| {
                (0..board.cols)
                    .map(|col| board.disc_at(Pos::new(row, col)))
                    .collect()
            })
            .collect();
        Self {
            rows: board.rows,
            cols: board.cols,
            cells,
        }
    }
}

impl TryFrom<BoardRecord> for Board {
    type Error = GameError;

    fn try_from(record: BoardRecord) -> Result<Self, Self::Error> {
        if record.cells.len() != record.rows
            || record.cells.iter().any(|row| row.len() != record.cols)
        {
            return Err(GameError::InvalidSave(format!(
                "board cells do not match declared size {}x{}",
                record.rows, record.cols
            )));
        }

        let mut board = Board::new(record.rows, record.cols);
        for (row, discs) in record.cells.into_iter().enumerate() {
            for (col, disc) in discs.into_iter().enumerate() {
                board.set_disc(Pos::new(row, col), disc);
            }
        }
        Ok(board)
    }
}
