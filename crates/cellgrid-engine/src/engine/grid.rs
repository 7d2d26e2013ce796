//! Grid data store.
//!
//! - [`GridView`] - Read-only, bounds-checked access used by the evaluator
//! - [`Grid`] - Row-major, 0-indexed table of string cells (empty = blank)
//!
//! Every mutation through [`Grid`] keeps all rows the same width. Plain
//! `Vec<Vec<String>>` snapshots may be ragged; reads past the end of a short
//! row simply return `None`.

use serde::{Deserialize, Serialize};

use super::cell_ref::CellRef;

/// Read-only access to a two-dimensional table of cell strings.
pub trait GridView {
    /// The value at (row, col), or None when outside the grid.
    fn cell(&self, row: usize, col: usize) -> Option<&str>;

    fn row_count(&self) -> usize;

    /// Number of cells in `row`; 0 past the last row.
    fn row_len(&self, row: usize) -> usize;

    fn cell_at(&self, at: CellRef) -> Option<&str> {
        self.cell(at.row, at.col)
    }
}

impl<S: AsRef<str>> GridView for [Vec<S>] {
    fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.get(row)?.get(col).map(AsRef::<str>::as_ref)
    }

    fn row_count(&self) -> usize {
        self.len()
    }

    fn row_len(&self, row: usize) -> usize {
        self.get(row).map_or(0, Vec::len)
    }
}

impl<S: AsRef<str>> GridView for Vec<Vec<S>> {
    fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.as_slice().cell(row, col)
    }

    fn row_count(&self) -> usize {
        self.len()
    }

    fn row_len(&self, row: usize) -> usize {
        self.as_slice().row_len(row)
    }
}

/// Mutable rectangular table of cell strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    /// Create a grid of `rows` x `cols` blank cells.
    pub fn new(rows: usize, cols: usize) -> Grid {
        Grid {
            rows: vec![vec![String::new(); cols]; rows],
        }
    }

    /// Build a grid from existing rows, padding short rows with blanks.
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Grid {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Grid { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Store a value, growing the grid to contain `at` first.
    /// Returns the previous value.
    pub fn set(&mut self, at: CellRef, value: impl Into<String>, default_cols: usize) -> String {
        self.ensure_contains(at, default_cols);
        std::mem::replace(&mut self.rows[at.row][at.col], value.into())
    }

    /// Grow the grid so `at` is inside it. Returns whether anything grew.
    ///
    /// New rows take the current width, or `default_cols` when the grid has
    /// no columns yet.
    pub fn ensure_contains(&mut self, at: CellRef, default_cols: usize) -> bool {
        let mut grew = false;
        if at.row >= self.row_count() {
            self.add_rows(at.row + 1 - self.row_count(), default_cols);
            grew = true;
        }
        if at.col >= self.col_count() {
            self.add_columns(at.col + 1 - self.col_count());
            grew = true;
        }
        grew
    }

    /// Append `count` blank rows.
    pub fn add_rows(&mut self, count: usize, default_cols: usize) {
        if count == 0 {
            return;
        }
        let width = match self.col_count() {
            0 => default_cols,
            n => n,
        };
        if width > self.col_count() {
            self.add_columns(width - self.col_count());
        }
        self.rows
            .extend(std::iter::repeat_with(|| vec![String::new(); width]).take(count));
    }

    /// Append `count` blank columns to every row.
    pub fn add_columns(&mut self, count: usize) {
        for row in &mut self.rows {
            row.extend(std::iter::repeat_with(String::new).take(count));
        }
    }

    /// Insert a blank row before index `at` (`at == row_count()` appends).
    /// Returns false when `at` is past the end.
    pub fn insert_row(&mut self, at: usize) -> bool {
        if at > self.row_count() {
            return false;
        }
        self.rows.insert(at, vec![String::new(); self.col_count()]);
        true
    }

    /// Insert a blank column before index `at` (`at == col_count()` appends).
    /// Returns false when `at` is past the end.
    pub fn insert_column(&mut self, at: usize) -> bool {
        if at > self.col_count() {
            return false;
        }
        for row in &mut self.rows {
            row.insert(at, String::new());
        }
        true
    }

    /// Blank every in-bounds cell of the rectangle spanned by `a` and `b`
    /// (corners in any order). Returns the cells that were non-empty.
    pub fn clear(&mut self, a: CellRef, b: CellRef) -> Vec<CellRef> {
        let mut cleared = Vec::new();
        let max_row = a.row.max(b.row).min(self.row_count().saturating_sub(1));
        let max_col = a.col.max(b.col).min(self.col_count().saturating_sub(1));
        if self.rows.is_empty() || self.col_count() == 0 {
            return cleared;
        }
        for row in a.row.min(b.row)..=max_row {
            for col in a.col.min(b.col)..=max_col {
                let cell = &mut self.rows[row][col];
                if !cell.is_empty() {
                    cell.clear();
                    cleared.push(CellRef::new(row, col));
                }
            }
        }
        cleared
    }
}

impl GridView for Grid {
    fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.as_slice().cell(row, col)
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row_len(&self, row: usize) -> usize {
        self.rows.as_slice().row_len(row)
    }
}

impl From<Vec<Vec<String>>> for Grid {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Grid::from_rows(rows)
    }
}
