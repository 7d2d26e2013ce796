use super::{CellUpdate, Document};
use crate::config::RecalcMode;
use crate::error::{CellgridError, Result};
use cellgrid_engine::engine::{
    CellRef, ERROR_SENTINEL, ShiftOperation, autosum_formula, shift_formula_references,
    try_evaluate,
};

impl Document {
    /// Set cell contents from user input.
    ///
    /// The grid grows to contain `cell`. Input starting with `=` is evaluated
    /// against the grid and its result stored; anything else is stored as is.
    /// A failed formula stores `#ERROR` and reports the reason in the update.
    pub fn set_cell_from_input(&mut self, cell: CellRef, input: &str) -> CellUpdate {
        self.grow_to_contain(cell);

        let mut update = if input.starts_with('=') {
            self.formulas.insert(cell, input.to_string());
            self.evaluate_formula_cell(cell, input)
        } else {
            self.formulas.remove(&cell);
            self.grid.set(cell, input, self.config.initial_cols);
            CellUpdate {
                cell,
                value: input.to_string(),
                error: None,
            }
        };
        self.modified = true;

        if self.config.recalc == RecalcMode::Automatic {
            self.recalc_dependents(&[cell]);
            update.value = self.display_value(cell).to_string();
        }

        update
    }

    /// Evaluate `formula` for `cell` and store the result.
    pub(crate) fn evaluate_formula_cell(&mut self, cell: CellRef, formula: &str) -> CellUpdate {
        let (value, error) = match try_evaluate(formula, &self.grid) {
            Ok(value) => (value, None),
            Err(err) => {
                log::warn!("formula {:?} in {} failed: {}", formula, cell, err);
                (ERROR_SENTINEL.to_string(), Some(err))
            }
        };
        self.grid.set(cell, value.clone(), self.config.initial_cols);
        CellUpdate { cell, value, error }
    }

    fn grow_to_contain(&mut self, cell: CellRef) {
        if self.grid.ensure_contains(cell, self.config.initial_cols) {
            log::debug!(
                "grid grew to {} rows x {} cols for {}",
                self.grid.row_count(),
                self.grid.col_count(),
                cell
            );
        }
    }

    /// Append one blank row.
    pub fn add_row(&mut self) {
        self.grid.add_rows(1, self.config.initial_cols);
        self.modified = true;
    }

    /// Append one blank column.
    pub fn add_column(&mut self) {
        self.grid.add_columns(1);
        self.modified = true;
    }

    /// Append `load_more_rows` blank rows (the grid was scrolled to its end).
    pub fn load_more_rows(&mut self) {
        self.grid
            .add_rows(self.config.load_more_rows, self.config.initial_cols);
        log::debug!("loaded more rows, now {}", self.grid.row_count());
    }

    /// Append `load_more_cols` blank columns.
    pub fn load_more_cols(&mut self) {
        self.grid.add_columns(self.config.load_more_cols);
        log::debug!("loaded more columns, now {}", self.grid.col_count());
    }

    /// Insert a blank row before `at`.
    ///
    /// Formula sources move with their cells and their references follow the
    /// shifted rows. Stored results are not recomputed.
    pub fn insert_row(&mut self, at: usize) -> Result<()> {
        if !self.grid.insert_row(at) {
            return Err(CellgridError::OutOfRange {
                axis: "row",
                index: at,
                len: self.grid.row_count(),
            });
        }
        self.shift_formulas(ShiftOperation::InsertRow(at));
        self.modified = true;
        Ok(())
    }

    /// Insert a blank column before `at`. See [`Document::insert_row`].
    pub fn insert_column(&mut self, at: usize) -> Result<()> {
        if !self.grid.insert_column(at) {
            return Err(CellgridError::OutOfRange {
                axis: "column",
                index: at,
                len: self.grid.col_count(),
            });
        }
        self.shift_formulas(ShiftOperation::InsertColumn(at));
        self.modified = true;
        Ok(())
    }

    fn shift_formulas(&mut self, op: ShiftOperation) {
        self.formulas = std::mem::take(&mut self.formulas)
            .into_iter()
            .map(|(cell, formula)| {
                let moved = op.apply(cell).unwrap_or(cell);
                (moved, shift_formula_references(&formula, op))
            })
            .collect();
    }

    /// Clear every cell in the rectangle spanned by `a` and `b`.
    /// Returns the number of cells that held a value or formula.
    pub fn clear_range(&mut self, a: CellRef, b: CellRef) -> usize {
        let (top, bottom) = (a.row.min(b.row), a.row.max(b.row));
        let (left, right) = (a.col.min(b.col), a.col.max(b.col));

        let mut touched = self.grid.clear(a, b);
        self.formulas.retain(|cell, _| {
            let inside = (top..=bottom).contains(&cell.row) && (left..=right).contains(&cell.col);
            if inside && !touched.contains(cell) {
                touched.push(*cell);
            }
            !inside
        });

        if !touched.is_empty() {
            self.modified = true;
            if self.config.recalc == RecalcMode::Automatic {
                self.recalc_dependents(&touched);
            }
        }
        touched.len()
    }

    /// Write a block of inputs with its top-left corner at `origin`.
    ///
    /// Each value goes through [`Document::set_cell_from_input`], row by row.
    pub fn paste<S: AsRef<str>>(&mut self, origin: CellRef, block: &[Vec<S>]) -> Vec<CellUpdate> {
        let mut updates = Vec::new();
        for (r, row) in block.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                let cell = CellRef::new(origin.row + r, origin.col + c);
                updates.push(self.set_cell_from_input(cell, value.as_ref()));
            }
        }
        updates
    }

    /// Put `=SUM(start:end)` into `target`.
    pub fn autosum(&mut self, target: CellRef, start: CellRef, end: CellRef) -> CellUpdate {
        let formula = autosum_formula(start, end);
        self.set_cell_from_input(target, &formula)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use cellgrid_engine::engine::FormulaError;

    fn cell(name: &str) -> CellRef {
        CellRef::parse(name).unwrap()
    }

    fn small_doc() -> Document {
        Document::with_config(Config {
            initial_rows: 3,
            initial_cols: 3,
            ..Config::default()
        })
    }

    #[test]
    fn test_new_document_uses_config_size() {
        let doc = Document::new();
        assert_eq!(doc.grid.row_count(), 100);
        assert_eq!(doc.grid.col_count(), 26);
        assert!(!doc.modified);
    }

    #[test]
    fn test_set_plain_value() {
        let mut doc = small_doc();
        let update = doc.set_cell_from_input(cell("B2"), "hello");
        assert_eq!(update.value, "hello");
        assert_eq!(update.error, None);
        assert_eq!(doc.display_value(cell("B2")), "hello");
        assert!(doc.modified);
    }

    #[test]
    fn test_formula_result_is_stored_and_source_kept() {
        let mut doc = small_doc();
        doc.set_cell_from_input(cell("A1"), "2");
        doc.set_cell_from_input(cell("A2"), "3");
        let update = doc.set_cell_from_input(cell("A3"), "=sum(A1:A2)");
        assert_eq!(update.value, "5");
        assert_eq!(doc.display_value(cell("A3")), "5");
        assert_eq!(doc.editing_value(cell("A3")), "=sum(A1:A2)");
        assert_eq!(doc.editing_value(cell("A1")), "2");
    }

    #[test]
    fn test_formula_error_is_reported() {
        let mut doc = small_doc();
        let update = doc.set_cell_from_input(cell("A1"), "=SUM(ZZZ)");
        assert_eq!(update.value, "#ERROR");
        assert_eq!(
            update.error,
            Some(FormulaError::InvalidReference("ZZZ".to_string()))
        );
        assert_eq!(doc.display_value(cell("A1")), "#ERROR");
    }

    #[test]
    fn test_overwriting_formula_with_value_drops_source() {
        let mut doc = small_doc();
        doc.set_cell_from_input(cell("A1"), "=B1");
        doc.set_cell_from_input(cell("A1"), "plain");
        assert!(doc.formulas.is_empty());
        assert_eq!(doc.editing_value(cell("A1")), "plain");
    }

    #[test]
    fn test_manual_mode_does_not_update_dependents() {
        let mut doc = small_doc();
        doc.set_cell_from_input(cell("A1"), "1");
        doc.set_cell_from_input(cell("B1"), "=A1");
        doc.set_cell_from_input(cell("A1"), "7");
        assert_eq!(doc.display_value(cell("B1")), "1");
    }

    #[test]
    fn test_write_outside_grid_grows_all_rows() {
        let mut doc = small_doc();
        doc.set_cell_from_input(cell("E7"), "x");
        assert_eq!(doc.grid.row_count(), 7);
        assert_eq!(doc.grid.col_count(), 5);
        assert!(doc.grid.rows().iter().all(|row| row.len() == 5));
    }

    #[test]
    fn test_formula_sees_grid_after_growth() {
        let mut doc = small_doc();
        let update = doc.set_cell_from_input(cell("J10"), "=COUNT(A1:J10)");
        // Grown cells are blank and none of the cells has a value yet.
        assert_eq!(update.value, "0");
    }

    #[test]
    fn test_add_row_and_column() {
        let mut doc = small_doc();
        doc.add_row();
        doc.add_column();
        assert_eq!(doc.grid.row_count(), 4);
        assert_eq!(doc.grid.col_count(), 4);
    }

    #[test]
    fn test_load_more() {
        let mut doc = Document::with_config(Config {
            initial_rows: 1,
            initial_cols: 1,
            load_more_rows: 4,
            load_more_cols: 2,
            ..Config::default()
        });
        doc.load_more_rows();
        doc.load_more_cols();
        assert_eq!(doc.grid.row_count(), 5);
        assert_eq!(doc.grid.col_count(), 3);
    }

    #[test]
    fn test_insert_row_moves_formulas() {
        let mut doc = small_doc();
        doc.set_cell_from_input(cell("A1"), "1");
        doc.set_cell_from_input(cell("A2"), "2");
        doc.set_cell_from_input(cell("B2"), "=SUM(A1:A2)");
        doc.insert_row(1).unwrap();
        assert_eq!(doc.display_value(cell("B3")), "3");
        assert_eq!(doc.editing_value(cell("B3")), "=SUM(A1:A3)");
        assert_eq!(doc.display_value(cell("A3")), "2");
        assert!(doc.insert_row(99).is_err());
    }

    #[test]
    fn test_insert_row_with_reference_at_last_row() {
        let mut doc = small_doc();
        doc.set_cell_from_input(cell("A1"), &format!("=A{}", usize::MAX));
        doc.insert_row(0).unwrap();
        assert_eq!(
            doc.editing_value(cell("A2")),
            format!("=A{}", usize::MAX as u128 + 1)
        );
    }

    #[test]
    fn test_insert_column_moves_formulas() {
        let mut doc = small_doc();
        doc.set_cell_from_input(cell("B1"), "=A1");
        doc.insert_column(0).unwrap();
        assert_eq!(doc.editing_value(cell("C1")), "=B1");
        let err = doc.insert_column(10).unwrap_err();
        assert_eq!(err.to_string(), "Cannot insert column at 10: sheet has 4 columns");
    }

    #[test]
    fn test_clear_range_drops_values_and_formulas() {
        let mut doc = small_doc();
        doc.set_cell_from_input(cell("A1"), "1");
        doc.set_cell_from_input(cell("B2"), "=A1");
        doc.set_cell_from_input(cell("C3"), "keep");
        assert_eq!(doc.clear_range(cell("B2"), cell("A1")), 2);
        assert_eq!(doc.display_value(cell("A1")), "");
        assert_eq!(doc.editing_value(cell("B2")), "");
        assert_eq!(doc.display_value(cell("C3")), "keep");
    }

    #[test]
    fn test_paste_block_evaluates_formulas() {
        let mut doc = small_doc();
        let block = vec![vec!["1", "2"], vec!["=SUM(B2:C2)", "x"]];
        let updates = doc.paste(cell("B2"), &block);
        assert_eq!(updates.len(), 4);
        assert_eq!(doc.display_value(cell("C2")), "2");
        assert_eq!(doc.display_value(cell("B3")), "3");
        assert_eq!(doc.display_value(cell("C3")), "x");
    }

    #[test]
    fn test_autosum() {
        let mut doc = small_doc();
        doc.set_cell_from_input(cell("A1"), "4");
        doc.set_cell_from_input(cell("A2"), "5");
        let update = doc.autosum(cell("A3"), cell("A1"), cell("A2"));
        assert_eq!(update.value, "9");
        assert_eq!(doc.editing_value(cell("A3")), "=SUM(A1:A2)");
    }
}
