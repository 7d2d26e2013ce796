//! User configuration.
//!
//! Read from `config.toml` in the platform config directory (or an explicit
//! path). Every key is optional:
//!
//! ```toml
//! initial_rows = 100
//! initial_cols = 26
//! load_more_rows = 50
//! load_more_cols = 10
//! recalc = "manual"      # or "automatic"
//! log_level = "warn"
//! ```

use crate::error::{CellgridError, Result};
use directories::ProjectDirs;
use log::LevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

/// When formula results are recomputed after the cells they read change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecalcMode {
    /// Formulas are evaluated once, when entered. `Document::recalculate`
    /// refreshes them on demand.
    #[default]
    Manual,
    /// Every edit recomputes the formulas that depend on the edited cell.
    Automatic,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Rows in a new sheet.
    pub initial_rows: usize,
    /// Columns in a new sheet, and the width of rows added to an empty one.
    pub initial_cols: usize,
    /// Rows appended by `Document::load_more_rows`.
    pub load_more_rows: usize,
    /// Columns appended by `Document::load_more_cols`.
    pub load_more_cols: usize,
    pub recalc: RecalcMode,
    pub log_level: Option<LevelFilter>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            initial_rows: 100,
            initial_cols: 26,
            load_more_rows: 50,
            load_more_cols: 10,
            recalc: RecalcMode::Manual,
            log_level: None,
        }
    }
}

impl Config {
    /// Parse config from TOML text.
    pub fn from_toml(content: &str) -> std::result::Result<Config, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load config from `path`, or from the default location when `path` is None.
    ///
    /// A missing default file yields the defaults; a missing explicit file is
    /// an error.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_config_path() {
                Some(p) => (p, false),
                None => return Ok(Config::default()),
            },
        };

        if !path.exists() {
            if explicit {
                return Err(CellgridError::ConfigNotFound(path));
            }
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let meta = std::fs::metadata(&path)?;
        if meta.len() > MAX_CONFIG_FILE_BYTES {
            return Err(CellgridError::FileTooLarge {
                path,
                size: meta.len(),
                max: MAX_CONFIG_FILE_BYTES,
            });
        }

        let content = std::fs::read_to_string(&path)?;
        let config =
            Config::from_toml(&content).map_err(|source| CellgridError::Config {
                path: path.clone(),
                source,
            })?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }
}

/// `config.toml` in the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "cellgrid")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
