//! cellgrid_engine - Spreadsheet formula engine and grid data store.

pub mod engine;
