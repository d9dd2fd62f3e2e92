//! Configuration file handling for saving and loading yard configs.
//!
//! The yard configuration pins the grid topology and the persistence
//! location. It is deliberately separate from the persisted yard *state*: the
//! config describes the physical yard, the state describes what is in it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::grid::GridConfig;

/// Yard configuration that can be saved/loaded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YardConfig {
    // Grid topology
    pub zones: u32,
    pub rows_per_zone: u32,
    pub cols_per_zone: u32,
    pub slot_capacity: usize,

    // Persistence
    pub data_dir: PathBuf,
}

impl Default for YardConfig {
    fn default() -> Self {
        let grid = GridConfig::default();
        Self {
            zones: grid.zones,
            rows_per_zone: grid.rows_per_zone,
            cols_per_zone: grid.cols_per_zone,
            slot_capacity: grid.slot_capacity,
            data_dir: PathBuf::from("yard-data"),
        }
    }
}

impl YardConfig {
    /// Create a new configuration with the reference yard defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// The grid topology described by this configuration
    pub fn grid(&self) -> GridConfig {
        GridConfig {
            zones: self.zones,
            rows_per_zone: self.rows_per_zone,
            cols_per_zone: self.cols_per_zone,
            slot_capacity: self.slot_capacity,
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.zones == 0 || self.zones > 26 {
            anyhow::bail!("zones must be between 1 and 26 (got {})", self.zones);
        }

        // Slot ids format rows/columns as two digits.
        if self.rows_per_zone == 0 || self.rows_per_zone > 99 {
            anyhow::bail!(
                "rows_per_zone must be between 1 and 99 (got {})",
                self.rows_per_zone
            );
        }
        if self.cols_per_zone == 0 || self.cols_per_zone > 99 {
            anyhow::bail!(
                "cols_per_zone must be between 1 and 99 (got {})",
                self.cols_per_zone
            );
        }

        if self.slot_capacity == 0 {
            anyhow::bail!("slot_capacity must be at least 1");
        }

        if self.data_dir.as_os_str().is_empty() {
            anyhow::bail!("data_dir must be specified");
        }

        Ok(())
    }
}
