use rand::Rng;
use tracing::trace;

use super::Piece;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Number of pieces in a line needed to win.
pub const WIN_LENGTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Yellow,
    Red,
}

impl Cell {
    /// The piece occupying this cell, if any
    pub fn piece(self) -> Option<Piece> {
        match self {
            Cell::Empty => None,
            Cell::Yellow => Some(Piece::Yellow),
            Cell::Red => Some(Piece::Red),
        }
    }
}

/// Owned copy of the grid, indexed `[row][column]` with row 0 at the top.
pub type Grid = Vec<Vec<Cell>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaceError {
    #[error("column is full")]
    ColumnFull,

    #[error("column is out of range")]
    InvalidColumn,
}

/// Gravity grid. Row 0 is the top, row `rows - 1` is the bottom; pieces
/// always settle on the lowest empty row of a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board with the standard 6x7 layout
    pub fn new() -> Self {
        Self::with_size(ROWS, COLS)
    }

    /// Create an empty board with custom dimensions.
    ///
    /// Panics if either dimension is zero.
    pub fn with_size(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "board needs at least one row and one column");
        Board {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.cols
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, the last row is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.cols + col]
    }

    fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row * self.cols + col] = cell;
    }

    /// Cell lookup with signed coordinates; `None` when off the board.
    fn cell_at(&self, row: i32, col: i32) -> Option<Cell> {
        if row < 0 || col < 0 || row as usize >= self.rows || col as usize >= self.cols {
            return None;
        }
        Some(self.get(row as usize, col as usize))
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= self.cols {
            return true;
        }
        self.get(0, col) != Cell::Empty
    }

    /// Lowest empty row of a column, where the next piece would land
    pub fn next_open_row(&self, col: usize) -> Option<usize> {
        if col >= self.cols {
            return None;
        }
        (0..self.rows).rev().find(|&row| self.get(row, col) == Cell::Empty)
    }

    /// Drop a piece in a column, returns the row where it landed.
    /// A failed placement leaves the board untouched.
    pub fn place(&mut self, col: usize, piece: Piece) -> Result<usize, PlaceError> {
        if col >= self.cols {
            return Err(PlaceError::InvalidColumn);
        }

        let row = self.next_open_row(col).ok_or(PlaceError::ColumnFull)?;
        self.set(row, col, piece.to_cell());
        trace!(row, col, %piece, "piece placed");
        Ok(row)
    }

    /// Row written by the most recent placement in `col`: the first empty
    /// row from the bottom plus one, or row 0 once the column is full.
    /// `None` if nothing was ever dropped there.
    pub fn row_of_most_recent_fill(&self, col: usize) -> Option<usize> {
        if col >= self.cols || self.get(self.rows - 1, col) == Cell::Empty {
            return None;
        }
        match self.next_open_row(col) {
            Some(row) => Some(row + 1),
            None => Some(0),
        }
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..self.cols).all(|col| self.is_column_full(col))
    }

    /// Winner decided by the piece at (row, col), normally the last one placed.
    /// `None` if the cell is empty or completes no line.
    pub fn find_winner(&self, row: usize, col: usize) -> Option<Piece> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let piece = self.get(row, col).piece()?;
        self.completes_line(row, col, piece).then_some(piece)
    }

    /// Whether `piece` at (row, col) would sit in a line of four. The cell
    /// itself is never inspected, so this works for empty candidate cells too.
    fn completes_line(&self, row: usize, col: usize, piece: Piece) -> bool {
        let cell = piece.to_cell();

        self.check_vertical(row, col, cell)
            || self.check_horizontal(row, col, cell)
            || self.check_diagonal_up(row, col, cell)
            || self.check_diagonal_down(row, col, cell)
    }

    /// Count matching cells walking from (row, col) in direction (dr, dc),
    /// not counting the starting cell.
    fn count_direction(&self, row: usize, col: usize, dr: i32, dc: i32, cell: Cell) -> usize {
        let mut count = 0;
        let mut r = row as i32 + dr;
        let mut c = col as i32 + dc;
        while self.cell_at(r, c) == Some(cell) {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }

    /// Check vertical win (down from the position)
    fn check_vertical(&self, row: usize, col: usize, cell: Cell) -> bool {
        // Only need to check downward (pieces fall down)
        if row + WIN_LENGTH > self.rows {
            return false;
        }
        (row + 1..row + WIN_LENGTH).all(|r| self.get(r, col) == cell)
    }

    /// Check horizontal win (left-right through the position)
    fn check_horizontal(&self, row: usize, col: usize, cell: Cell) -> bool {
        let left = self.count_direction(row, col, 0, -1, cell);
        let right = self.count_direction(row, col, 0, 1, cell);
        left + right >= WIN_LENGTH - 1
    }

    /// Check diagonal win (bottom-left to top-right, /)
    fn check_diagonal_up(&self, row: usize, col: usize, cell: Cell) -> bool {
        let down_left = self.count_direction(row, col, 1, -1, cell);
        let up_right = self.count_direction(row, col, -1, 1, cell);
        down_left + up_right >= WIN_LENGTH - 1
    }

    /// Check diagonal win (top-left to bottom-right, \)
    fn check_diagonal_down(&self, row: usize, col: usize, cell: Cell) -> bool {
        let up_left = self.count_direction(row, col, -1, -1, cell);
        let down_right = self.count_direction(row, col, 1, 1, cell);
        up_left + down_right >= WIN_LENGTH - 1
    }

    /// Leftmost column where dropping `piece` wins immediately.
    /// The board is not mutated.
    pub fn find_next_winning_column(&self, piece: Piece) -> Option<usize> {
        (0..self.cols).find(|&col| {
            self.next_open_row(col)
                .is_some_and(|row| self.completes_line(row, col, piece))
        })
    }

    /// Uniformly sample a non-full column, redrawing on full ones.
    /// `None` only when the whole board is full.
    pub fn random_legal_column<R: Rng>(&self, rng: &mut R) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        loop {
            let col = rng.random_range(0..self.cols);
            if !self.is_column_full(col) {
                return Some(col);
            }
        }
    }

    /// Independent copy of every cell, O(rows * columns)
    pub fn snapshot(&self) -> Grid {
        self.cells
            .chunks(self.cols)
            .map(|row| row.to_vec())
            .collect()
    }

    /// Clear every cell back to empty
    pub fn reset(&mut self) {
        self.cells.fill(Cell::Empty);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
