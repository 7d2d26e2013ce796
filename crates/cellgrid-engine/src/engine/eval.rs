//! Formula evaluation.
//!
//! [`evaluate`] turns the text a user typed into the string the cell shows.
//! It only reads the grid. Formulas are evaluated once; keeping results in
//! step with later edits is up to the caller (see `extract_dependencies`).

use super::error::FormulaError;
use super::expression::Expression;
use super::grid::GridView;
use super::range::RangeRef;

/// Stored in place of a value when a formula cannot be resolved.
pub const ERROR_SENTINEL: &str = "#ERROR";

/// Stored in place of a value when a formula reads itself, directly or
/// through other formulas, during recalculation.
pub const CIRCULAR_SENTINEL: &str = "#CIRCULAR";

/// Evaluate `formula` against `grid`.
///
/// - Text not starting with `=` is returned unchanged.
/// - `=SUM(..)`, `=AVERAGE(..)`/`=AVG(..)`, `=COUNT(..)`, `=MAX(..)`,
///   `=MIN(..)` aggregate their range argument.
/// - `=B12` returns that cell's value, or `""` outside the grid (row `0`
///   and rows too large to index are outside every grid).
/// - Any other formula is returned unchanged.
/// - A malformed reference or range yields `#ERROR`.
pub fn evaluate<G: GridView + ?Sized>(formula: &str, grid: &G) -> String {
    try_evaluate(formula, grid).unwrap_or_else(|_| ERROR_SENTINEL.to_string())
}

/// Like [`evaluate`], but reports why a formula failed instead of returning
/// the `#ERROR` sentinel.
pub fn try_evaluate<G: GridView + ?Sized>(formula: &str, grid: &G) -> Result<String, FormulaError> {
    let Some(body) = formula.strip_prefix('=') else {
        return Ok(formula.to_string());
    };
    let expression = body.to_uppercase();

    match Expression::classify(&expression) {
        Expression::Call { func, arg } => {
            let range = RangeRef::parse(arg)?.read(grid);
            Ok(func.apply_padded(&range.values, range.outside))
        }
        Expression::Reference(pos) => Ok(pos
            .cell()
            .and_then(|at| grid.cell_at(at))
            .unwrap_or_default()
            .to_string()),
        Expression::Unrecognized => Ok(formula.to_string()),
    }
}
