//! CSV export functionality

use crate::document::Document;
use crate::error::Result;
use cellgrid_engine::engine::Grid;
use std::path::Path;

/// Render the grid as CSV text.
///
/// Every cell is quoted (with `"` doubled inside), cells are joined by `,`
/// and rows by `\n`. There is no trailing newline.
pub fn export_csv(grid: &Grid) -> String {
    grid.rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| escape_csv_field(cell))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write the grid as CSV to `path`.
pub fn write_csv(path: &Path, grid: &Grid) -> Result<()> {
    std::fs::write(path, export_csv(grid))?;
    Ok(())
}

/// Quote a field for CSV output
fn escape_csv_field(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

impl Document {
    /// The document's displayed values as CSV text.
    pub fn export_csv(&self) -> String {
        export_csv(&self.grid)
    }
}
