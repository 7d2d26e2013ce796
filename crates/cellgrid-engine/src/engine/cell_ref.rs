//! Cell reference parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style cell references
//! (e.g., "A1", "B2", "AA100") and zero-indexed row/column coordinates.
//!
//! Parsing is strict: only uppercase letters followed by digits are accepted.
//! The evaluator uppercases formula text before it gets here.
//!
//! # Examples
//!
//! ```
//! use cellgrid_engine::engine::CellRef;
//!
//! let cell = CellRef::parse("B3").unwrap();
//! assert_eq!(cell.col, 1); // 0-indexed
//! assert_eq!(cell.row, 2);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use super::error::FormulaError;

/// A reference to a cell by row and column indices (0-indexed).
///
/// Ordering is row-major, which matches grid iteration order.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse a cell reference from A1 notation (e.g., "A1", "B2", "AA10").
    ///
    /// Fails for row `0` and for coordinates too large for `usize`, which
    /// [`Position::parse`] accepts as positions outside any grid.
    pub fn parse(name: &str) -> Result<CellRef, FormulaError> {
        Position::parse(name)?
            .cell()
            .ok_or_else(|| FormulaError::InvalidReference(name.to_string()))
    }

    /// Convert column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }

    /// Convert uppercase column letters back to a 0-based column index.
    /// Returns None for empty input, non-uppercase letters or overflow.
    pub fn letters_to_col(letters: &str) -> Option<usize> {
        if letters.is_empty() {
            return None;
        }
        let mut acc = 0usize;
        for c in letters.bytes() {
            if !c.is_ascii_uppercase() {
                return None;
            }
            let digit = (c - b'A') as usize + 1;
            acc = acc.checked_mul(26)?.checked_add(digit)?;
        }
        acc.checked_sub(1)
    }
}

/// A reference as written in a formula, before it is checked against a grid.
///
/// Row `0` sits at row -1 and numbers too large to index saturate, so both
/// simply fall outside the grid.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Position {
    pub row: i128,
    pub col: i128,
}

impl Position {
    pub fn new(row: i128, col: i128) -> Position {
        Position { row, col }
    }

    /// Parse A1 notation. Fails only when `name` is not shaped like a
    /// reference.
    pub fn parse(name: &str) -> Result<Position, FormulaError> {
        let caps = cell_ref_re()
            .captures(name)
            .ok_or_else(|| FormulaError::InvalidReference(name.to_string()))?;

        let col = caps["letters"]
            .bytes()
            .fold(0i128, |acc, c| acc.saturating_mul(26).saturating_add((c - b'A') as i128 + 1));
        let row = caps["numbers"]
            .bytes()
            .fold(0i128, |acc, c| acc.saturating_mul(10).saturating_add((c - b'0') as i128));

        Ok(Position::new(row - 1, col - 1))
    }

    /// The grid cell at this position, if it can be indexed at all.
    pub fn cell(self) -> Option<CellRef> {
        Some(CellRef::new(
            usize::try_from(self.row).ok()?,
            usize::try_from(self.col).ok()?,
        ))
    }
}

fn cell_ref_re() -> &'static Regex {
    static CELL_RE: OnceLock<Regex> = OnceLock::new();
    CELL_RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Z]+)(?<numbers>[0-9]+)$")
            .expect("cell reference regex must compile")
    })
}

impl std::str::FromStr for CellRef {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row as u128 + 1)
    }
}
