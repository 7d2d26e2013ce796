//! Dependency extraction from formula strings.
//!
//! Finds the cells a formula reads so callers can recompute it when those
//! cells change. Extraction follows the evaluator's own dispatch, so a
//! formula depends on exactly the cells evaluation would look at:
//!
//! - `=SUM(A1:B5)`: every cell of the range, in row-major order
//! - `=B2`: that one cell
//! - unrecognized or malformed formulas: nothing

use super::cell_ref::{CellRef, Position};
use super::expression::Expression;
use super::range::RangeRef;

const MAX_DEPENDENCY_RANGE_CELLS: u128 = 1_000_000;

/// Extract the cells `formula` (including its leading `=`) reads.
///
/// Ranges larger than a million cells are skipped rather than expanded.
/// Positions no grid can hold (row `0`) are not dependencies.
pub fn extract_dependencies(formula: &str) -> Vec<CellRef> {
    let Some(body) = formula.strip_prefix('=') else {
        return Vec::new();
    };
    let expression = body.to_uppercase();

    match Expression::classify(&expression) {
        Expression::Call { arg, .. } => {
            let Ok(range) = RangeRef::parse(arg) else {
                return Vec::new();
            };
            if range.cell_count() > MAX_DEPENDENCY_RANGE_CELLS {
                return Vec::new();
            }
            range.cells().filter_map(Position::cell).collect()
        }
        Expression::Reference(pos) => pos.cell().into_iter().collect(),
        Expression::Unrecognized => Vec::new(),
    }
}
