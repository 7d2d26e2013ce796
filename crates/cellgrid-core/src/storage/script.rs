//! Parser for edit scripts.
//!
//! One edit per line, in the order they are applied:
//!
//! ```text
//! # Quarterly totals
//! A1: 100
//! A2: 250
//! A3: =SUM(A1:A2)
//! B1: "  padded  "
//! ```

use crate::error::{CellgridError, Result};
use cellgrid_engine::engine::CellRef;
use std::fs;
use std::path::Path;

const MAX_SCRIPT_FILE_BYTES: u64 = 1_048_576; // 1 MiB

/// Read and parse an edit script from `path`.
pub fn read_edit_script(path: &Path) -> Result<Vec<(CellRef, String)>> {
    let meta = fs::metadata(path)?;
    if meta.len() > MAX_SCRIPT_FILE_BYTES {
        return Err(CellgridError::FileTooLarge {
            path: path.to_path_buf(),
            size: meta.len(),
            max: MAX_SCRIPT_FILE_BYTES,
        });
    }
    let content = fs::read_to_string(path)?;
    parse_edit_script(&content)
}

/// Parse edit script text into `(cell, input)` pairs.
pub fn parse_edit_script(content: &str) -> Result<Vec<(CellRef, String)>> {
    let mut edits = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((cell_ref_str, value_str)) = line.split_once(':') else {
            return Err(CellgridError::Parse {
                line: line_num + 1,
                message: "Expected 'CELLREF: VALUE' format".to_string(),
            });
        };

        let cell_ref_str = cell_ref_str.trim();
        let cell = CellRef::parse(&cell_ref_str.to_ascii_uppercase()).map_err(|_| {
            CellgridError::Parse {
                line: line_num + 1,
                message: format!("Invalid cell reference: {}", cell_ref_str),
            }
        })?;

        edits.push((cell, parse_value(value_str.trim())));
    }

    Ok(edits)
}

fn parse_value(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        return unescape_text(&value[1..value.len() - 1]);
    }
    value.to_string()
}

fn unescape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    out
}
