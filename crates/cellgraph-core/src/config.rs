//! Sheet configuration.
//!
//! Bounds can be narrowed below the engine's addressable grid, e.g. from a
//! TOML file:
//!
//! ```toml
//! max_rows = 1000
//! max_cols = 26
//! ```

use serde::Deserialize;

use cellgraph_engine::engine::{MAX_COLS, MAX_ROWS, Position};

use crate::error::{Result, SheetError};

const MAX_CONFIG_BYTES: usize = 65_536;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    pub max_rows: usize,
    pub max_cols: usize,
}

impl Default for SheetConfig {
    fn default() -> Self {
        SheetConfig {
            max_rows: MAX_ROWS,
            max_cols: MAX_COLS,
        }
    }
}

impl SheetConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.len() > MAX_CONFIG_BYTES {
            return Err(SheetError::Config(format!(
                "config too large ({} bytes, max {})",
                content.len(),
                MAX_CONFIG_BYTES
            )));
        }
        let config: SheetConfig =
            toml::from_str(content).map_err(|e| SheetError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_rows == 0 || self.max_rows > MAX_ROWS {
            return Err(SheetError::Config(format!(
                "max_rows must be between 1 and {}, got {}",
                MAX_ROWS, self.max_rows
            )));
        }
        if self.max_cols == 0 || self.max_cols > MAX_COLS {
            return Err(SheetError::Config(format!(
                "max_cols must be between 1 and {}, got {}",
                MAX_COLS, self.max_cols
            )));
        }
        Ok(())
    }

    /// Whether `pos` is addressable in a sheet with this configuration.
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.max_rows && pos.col < self.max_cols
    }
}
