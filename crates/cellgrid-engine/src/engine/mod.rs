//! Spreadsheet engine API.
//!
//! This module provides the formula engine and the grid it reads from:
//!
//! - [`Grid`], [`GridView`] - Row-major string storage and read-only access
//! - [`CellRef`], [`Position`] - Cell reference parsing (A1 notation ↔ row/col indices)
//! - [`RangeRef`], [`extract_range`], [`cells_in_range`] - Range arguments
//! - [`FormulaFn`] - The closed set of built-in functions
//! - [`evaluate`] - Evaluate a `=`-prefixed formula to its display string
//! - [`extract_dependencies`], [`detect_cycle`] - Inputs for recalculation
//! - [`shift_formula_references`] - Keep formula text in step with row/column inserts
//! - [`parse_number`], [`format_number`], [`format_fixed`] - Numeric coercion and display

mod cell_ref;
mod cycle;
mod deps;
mod error;
mod eval;
mod expression;
mod format;
mod functions;
mod grid;
mod range;
mod shift;

pub use cell_ref::{CellRef, Position};
pub use cycle::{DependencyMap, detect_cycle};
pub use deps::extract_dependencies;
pub use error::FormulaError;
pub use eval::{CIRCULAR_SENTINEL, ERROR_SENTINEL, evaluate, try_evaluate};
pub use expression::Expression;
pub use format::{format_fixed, format_number, parse_number};
pub use functions::FormulaFn;
pub use grid::{Grid, GridView};
pub use range::{RangeRef, RangeValues, autosum_formula, cells_in_range, extract_range};
pub use shift::{ShiftOperation, shift_formula_references};
