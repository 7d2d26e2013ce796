//! Error types for Cellgrid core.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the Cellgrid application
#[derive(Error, Debug)]
pub enum CellgridError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Failed to parse config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Refusing to read {}: file too large ({size} bytes, max {max})", .path.display())]
    FileTooLarge { path: PathBuf, size: u64, max: u64 },

    #[error("Cannot insert {axis} at {index}: sheet has {len} {axis}s")]
    OutOfRange {
        axis: &'static str,
        index: usize,
        len: usize,
    },
}

pub type Result<T> = std::result::Result<T, CellgridError>;
