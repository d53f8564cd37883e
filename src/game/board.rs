use serde::{Deserialize, Serialize};

use super::PlayerId;
use crate::error::SetupError;

/// A single grid square. `owner` is set exactly when `orbs > 0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub orbs: u32,
    pub owner: Option<PlayerId>,
}

impl Cell {
    pub fn empty() -> Self {
        Cell::default()
    }

    pub fn owned(orbs: u32, owner: impl Into<PlayerId>) -> Self {
        Cell {
            orbs,
            owner: Some(owner.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.orbs == 0
    }

    pub fn is_owned_by(&self, player: &PlayerId) -> bool {
        self.owner.as_ref() == Some(player)
    }

    fn is_consistent(&self) -> bool {
        (self.orbs > 0) == self.owner.is_some()
    }
}

/// Orbs a cell at `(row, col)` can hold before it explodes: 2 in a corner,
/// 3 on an edge, 4 in the interior.
pub fn critical_mass(row: usize, col: usize, rows: usize, cols: usize) -> u32 {
    let on_row_edge = row == 0 || row + 1 == rows;
    let on_col_edge = col == 0 || col + 1 == cols;
    match (on_row_edge, on_col_edge) {
        (true, true) => 2,
        (true, false) | (false, true) => 3,
        (false, false) => 4,
    }
}

/// Fixed-size grid of cells, stored row-major.
///
/// Serialized as a list of rows; deserializing goes through
/// [`Board::from_rows`] so a snapshot is validated like any other input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board, at least 2x2
    pub fn new(rows: usize, cols: usize) -> Result<Self, SetupError> {
        let len = checked_len(rows, cols)?;
        Ok(Board {
            rows,
            cols,
            cells: vec![Cell::empty(); len],
        })
    }

    /// Rebuild a board from a snapshot, checking shape and cell invariants.
    pub fn from_rows(grid: Vec<Vec<Cell>>) -> Result<Self, SetupError> {
        let rows = grid.len();
        let cols = grid.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(checked_len(rows, cols)?);
        for (row, line) in grid.into_iter().enumerate() {
            if line.len() != cols {
                return Err(SetupError::RaggedBoard {
                    row,
                    len: line.len(),
                    expected: cols,
                });
            }
            for (col, cell) in line.into_iter().enumerate() {
                if !cell.is_consistent() {
                    return Err(SetupError::InconsistentCell { row, col });
                }
                cells.push(cell);
            }
        }

        Ok(Board { rows, cols, cells })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// Get the cell at a specific position. Panics if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> &Cell {
        &self.cells[self.index(row, col)]
    }

    pub(crate) fn get_mut(&mut self, row: usize, col: usize) -> &mut Cell {
        let idx = self.index(row, col);
        &mut self.cells[idx]
    }

    pub fn critical_mass(&self, row: usize, col: usize) -> u32 {
        critical_mass(row, col, self.rows, self.cols)
    }

    /// In-bounds orthogonal neighbours: up, down, left, right.
    pub fn neighbors(&self, row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> {
        let (rows, cols) = (self.rows, self.cols);
        [
            (row > 0).then(|| (row - 1, col)),
            (row + 1 < rows).then(|| (row + 1, col)),
            (col > 0).then(|| (row, col - 1)),
            (col + 1 < cols).then(|| (row, col + 1)),
        ]
        .into_iter()
        .flatten()
    }

    /// Iterate over `(row, col, cell)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Cell)> {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (i / cols, i % cols, cell))
    }

    /// First cell in row-major order that has reached its critical mass
    pub fn first_unstable(&self) -> Option<(usize, usize)> {
        self.iter()
            .find(|&(row, col, cell)| cell.orbs >= self.critical_mass(row, col))
            .map(|(row, col, _)| (row, col))
    }

    pub fn is_stable(&self) -> bool {
        self.first_unstable().is_none()
    }

    pub fn total_orbs(&self) -> u32 {
        self.cells.iter().map(|c| c.orbs).sum()
    }

    pub fn owns_any(&self, player: &PlayerId) -> bool {
        self.cells.iter().any(|c| c.is_owned_by(player))
    }

    /// Orbs held by `player` across the board
    pub fn orbs_of(&self, player: &PlayerId) -> u32 {
        self.cells
            .iter()
            .filter(|c| c.is_owned_by(player))
            .map(|c| c.orbs)
            .sum()
    }

    /// Orb totals for each of `players`, in the given order
    pub fn orbs_by_owner<'a>(
        &self,
        players: impl IntoIterator<Item = &'a PlayerId>,
    ) -> Vec<(&'a PlayerId, u32)> {
        players
            .into_iter()
            .map(|id| (id, self.orbs_of(id)))
            .collect()
    }

    /// Replace every cell with a single orb owned by `owner`
    pub(crate) fn fill(&mut self, owner: &PlayerId) {
        for cell in &mut self.cells {
            *cell = Cell::owned(1, owner.clone());
        }
    }

    /// Full board state, used to detect repeated positions
    pub(crate) fn state_key(&self) -> Vec<Cell> {
        self.cells.clone()
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            self.in_bounds(row, col),
            "cell ({row}, {col}) outside {}x{} board",
            self.rows,
            self.cols
        );
        row * self.cols + col
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Board {
    type Error = SetupError;

    fn try_from(grid: Vec<Vec<Cell>>) -> Result<Self, Self::Error> {
        Board::from_rows(grid)
    }
}

impl From<Board> for Vec<Vec<Cell>> {
    fn from(board: Board) -> Self {
        let cols = board.cols;
        let mut cells = board.cells.into_iter();
        (0..board.rows)
            .map(|_| cells.by_ref().take(cols).collect())
            .collect()
    }
}

/// Cell count for a `rows × cols` board. Single rows or columns are rejected:
/// their cells have fewer neighbours than their critical mass, so explosions
/// would destroy orbs.
fn checked_len(rows: usize, cols: usize) -> Result<usize, SetupError> {
    if rows < 2 || cols < 2 {
        return Err(SetupError::TooSmall { rows, cols });
    }
    rows.checked_mul(cols)
        .ok_or(SetupError::TooLarge { rows, cols })
}
