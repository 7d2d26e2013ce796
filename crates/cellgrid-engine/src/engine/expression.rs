//! Classification of formula bodies.
//!
//! ```text
//! expression    := function_call | cell_ref | <anything else, echoed raw>
//! function_call := fname "(" arg ")"
//! arg           := range | cell_ref
//! ```

use super::cell_ref::Position;
use super::functions::FormulaFn;
use super::range::extract_range;

/// What an uppercased formula body (the text after `=`) asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expression<'a> {
    /// `SUM(A1:B2)` and friends; `arg` is the raw text between the parentheses.
    Call { func: FormulaFn, arg: &'a str },
    /// A bare cell reference such as `B12`.
    Reference(Position),
    /// Anything else. The formula is shown as typed.
    Unrecognized,
}

impl<'a> Expression<'a> {
    /// Classify an uppercased expression.
    ///
    /// Call arguments are kept as text; malformed ones are reported when the
    /// argument is resolved.
    pub fn classify(expression: &'a str) -> Expression<'a> {
        if let Some(func) = FormulaFn::from_expression(expression) {
            return Expression::Call {
                func,
                arg: extract_range(expression),
            };
        }
        match Position::parse(expression) {
            Ok(pos) => Expression::Reference(pos),
            Err(_) => Expression::Unrecognized,
        }
    }
}
