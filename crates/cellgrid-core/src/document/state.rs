use crate::config::Config;
use cellgrid_engine::engine::{CellRef, FormulaError, Grid, GridView};
use std::collections::HashMap;

/// Result of writing one cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellUpdate {
    pub cell: CellRef,
    /// The string now stored in the cell.
    pub value: String,
    /// Why the formula evaluated to `#ERROR`, for user notification.
    pub error: Option<FormulaError>,
}

/// UI-agnostic document state for the spreadsheet.
pub struct Document {
    /// Displayed cell values. Formula cells hold their result, not their text.
    pub grid: Grid,
    /// Source text of formula cells, kept so they can be re-edited and recomputed.
    pub formulas: HashMap<CellRef, String>,
    pub config: Config,
    /// Whether the grid has been modified
    pub modified: bool,
}

impl Document {
    /// Create a new document with default settings.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new document sized by `config`.
    pub fn with_config(config: Config) -> Self {
        Document {
            grid: Grid::new(config.initial_rows, config.initial_cols),
            formulas: HashMap::new(),
            config,
            modified: false,
        }
    }

    /// The value shown in a cell (`""` outside the grid).
    pub fn display_value(&self, cell: CellRef) -> &str {
        self.grid.cell_at(cell).unwrap_or_default()
    }

    /// The text to put in an editor for a cell: its formula if it has one,
    /// otherwise its displayed value.
    pub fn editing_value(&self, cell: CellRef) -> &str {
        match self.formulas.get(&cell) {
            Some(formula) => formula,
            None => self.display_value(cell),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
