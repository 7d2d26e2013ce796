//! Storage: CSV export and edit scripts.

mod csv;
mod script;

pub use csv::{export_csv, write_csv};
pub use script::{parse_edit_script, read_edit_script};
