//! Range arguments of function calls.
//!
//! A function call carries a single argument between its parentheses: either
//! one cell (`A1`) or an inclusive rectangle (`A1:C5`). Nested parentheses
//! are not supported; the argument ends at the first `)`.

use regex::Regex;
use std::sync::OnceLock;

use super::cell_ref::{CellRef, Position};
use super::error::FormulaError;
use super::grid::GridView;

/// Value read for a range cell outside the grid.
const OUT_OF_BOUNDS_VALUE: &str = "0";

fn call_args_re() -> &'static Regex {
    static ARGS_RE: OnceLock<Regex> = OnceLock::new();
    ARGS_RE.get_or_init(|| Regex::new(r"\(([^)]+)\)").expect("call argument regex must compile"))
}

/// The text between the first `(` and the next `)`, or `""` when there is
/// no non-empty parenthesized group.
///
/// `SUM(A1:A5)` -> `A1:A5`
pub fn extract_range(expression: &str) -> &str {
    call_args_re()
        .captures(expression)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str())
}

/// A parsed range argument. Corners may lie outside any grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RangeRef {
    Cell(Position),
    Area { start: Position, end: Position },
}

/// The values of a range as functions consume them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RangeValues<'g> {
    /// Cells of the range inside the grid, row-major.
    pub values: Vec<&'g str>,
    /// How many cells of the range lie outside the grid. Each reads as `"0"`.
    pub outside: u128,
}

impl RangeRef {
    /// Parse `A1` or `A1:B2`.
    ///
    /// Only the first two `:`-separated parts are read, so `A1:B2:C3`
    /// covers `A1:B2`.
    pub fn parse(text: &str) -> Result<RangeRef, FormulaError> {
        if text.is_empty() {
            return Err(FormulaError::EmptyArgument);
        }
        if !text.contains(':') {
            return Ok(RangeRef::Cell(Position::parse(text)?));
        }

        let mut parts = text.split(':');
        let start = Position::parse(parts.next().unwrap_or_default())?;
        let end = Position::parse(parts.next().unwrap_or_default())?;
        Ok(RangeRef::Area { start, end })
    }

    /// First and last corner, as written.
    pub fn bounds(&self) -> (Position, Position) {
        match *self {
            RangeRef::Cell(pos) => (pos, pos),
            RangeRef::Area { start, end } => (start, end),
        }
    }

    /// Number of cells [`cells`](Self::cells) yields, saturating.
    pub fn cell_count(&self) -> u128 {
        let (start, end) = self.bounds();
        span(start.row, end.row).saturating_mul(span(start.col, end.col))
    }

    /// Positions of the range in row-major order, start to end.
    ///
    /// Ranges are not normalized: when the start lies after the end on either
    /// axis the iteration is empty.
    pub fn cells(&self) -> impl Iterator<Item = Position> + use<> {
        let (start, end) = self.bounds();
        (start.row..=end.row)
            .flat_map(move |row| (start.col..=end.col).map(move |col| Position::new(row, col)))
    }

    /// Read the part of the range inside `grid`, counting the rest.
    ///
    /// Only cells inside the grid are visited, so the cost is bounded by the
    /// grid size however far the range reaches.
    pub fn read<'g, G: GridView + ?Sized>(&self, grid: &'g G) -> RangeValues<'g> {
        let (start, end) = self.bounds();
        let mut values = Vec::new();

        let last_row = end.row.min(grid.row_count() as i128 - 1);
        for row in start.row.max(0)..=last_row {
            let row = row as usize;
            let last_col = end.col.min(grid.row_len(row) as i128 - 1);
            for col in start.col.max(0)..=last_col {
                if let Some(value) = grid.cell(row, col as usize) {
                    values.push(value);
                }
            }
        }

        let outside = self.cell_count().saturating_sub(values.len() as u128);
        RangeValues { values, outside }
    }
}

/// Cells from `start` to `end` inclusive on one axis; 0 when reversed.
fn span(start: i128, end: i128) -> u128 {
    if end < start {
        0
    } else {
        end.abs_diff(start).saturating_add(1)
    }
}

/// Read the values of a range argument in row-major order, substituting
/// `"0"` for cells outside the grid.
///
/// Every cell of the range is materialized. [`RangeRef::read`] is the
/// bounded form the evaluator uses.
pub fn cells_in_range<G: GridView + ?Sized>(
    range: &str,
    grid: &G,
) -> Result<Vec<String>, FormulaError> {
    let range = RangeRef::parse(range)?;
    Ok(range
        .cells()
        .map(|pos| {
            pos.cell()
                .and_then(|at| grid.cell_at(at))
                .unwrap_or(OUT_OF_BOUNDS_VALUE)
                .to_string()
        })
        .collect())
}

/// Build the AutoSum formula for a selection, e.g. `=SUM(B2:B9)`.
pub fn autosum_formula(start: CellRef, end: CellRef) -> String {
    if start == end {
        format!("=SUM({})", start)
    } else {
        format!("=SUM({}:{})", start, end)
    }
}
