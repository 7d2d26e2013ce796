//! cellgrid-core - UI-agnostic document model + storage.

pub mod config;
pub mod document;
pub mod error;
pub mod storage;

pub use config::{Config, RecalcMode};
pub use document::{CellUpdate, Document};
pub use error::{CellgridError, Result};

pub use cellgrid_engine::engine::{CellRef, Grid};
