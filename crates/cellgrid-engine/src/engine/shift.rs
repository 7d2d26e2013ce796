//! Keep formula text in step with structural edits.
//!
//! When a row or column is inserted, the cells below/right of it move. Any
//! formula that referred to a moved cell must be rewritten to follow it, or a
//! later recalculation would read the wrong cell.

use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::cell_ref::CellRef;

/// Structural edit applied to the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftOperation {
    InsertRow(usize),
    InsertColumn(usize),
}

impl ShiftOperation {
    /// Where `cell` ends up after the edit, or None when it would move past
    /// the last addressable row or column.
    pub fn apply(self, cell: CellRef) -> Option<CellRef> {
        match self {
            ShiftOperation::InsertRow(at) if cell.row >= at => {
                Some(CellRef::new(cell.row.checked_add(1)?, cell.col))
            }
            ShiftOperation::InsertColumn(at) if cell.col >= at => {
                Some(CellRef::new(cell.row, cell.col.checked_add(1)?))
            }
            _ => Some(cell),
        }
    }
}

fn ref_token_re() -> &'static Regex {
    static REF_RE: OnceLock<Regex> = OnceLock::new();
    REF_RE.get_or_init(|| {
        Regex::new(r"\b([A-Za-z]+)([0-9]+)\b").expect("reference token regex must compile")
    })
}

/// Shift cell references in a formula for an inserted row/column.
///
/// Rules:
/// - Insert row at R: refs to row >= R become row + 1
/// - Insert column at C: refs to column >= C become column + 1
/// - Rewritten references are written in uppercase; everything else,
///   including text that is not a formula, is left as is.
/// - A reference that cannot move further (last addressable row or column)
///   is left as is.
pub fn shift_formula_references(formula: &str, op: ShiftOperation) -> String {
    if !formula.starts_with('=') {
        return formula.to_string();
    }

    ref_token_re()
        .replace_all(formula, |caps: &Captures| {
            let token = &caps[0];
            match CellRef::parse(&token.to_ascii_uppercase()) {
                Ok(cell) => match op.apply(cell) {
                    Some(moved) if moved != cell => moved.to_string(),
                    _ => token.to_string(),
                },
                Err(_) => token.to_string(),
            }
        })
        .into_owned()
}
