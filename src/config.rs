//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{CONFIG_DIR_ENV, CONFIG_DIR_NAME, DEFAULT_AUTOSAVE_SECS, DEFAULT_CONFIG_ID};
use crate::models::BuiltinCatalog;

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PathConfig {
    /// Catalog document replacing the bundled one
    pub catalog: Option<PathBuf>,
    /// Directory holding persisted records (defaults to `<config dir>/data`)
    pub data_dir: Option<PathBuf>,
}

/// Autosave settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    /// Whether long-running commands autosave at all
    pub enabled: bool,
    /// Seconds between saves
    pub interval_secs: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: DEFAULT_AUTOSAVE_SECS,
        }
    }
}

/// Grid geometry and the built-in configuration to start from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Built-in configuration used when no custom record exists
    pub config_id: String,
    /// Number of column tracks
    pub columns: usize,
    /// Side length of one square cell, in pixels
    pub cell_size: f64,
    /// Gap between tracks, in pixels
    pub gap: f64,
    /// Side length of the grab handle, in pixels
    pub handle_size: f64,
    /// Distance of the grab handle from the card's top-right corner
    pub handle_inset: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            config_id: DEFAULT_CONFIG_ID.to_string(),
            columns: 6,
            cell_size: 160.0,
            gap: 16.0,
            handle_size: 32.0,
            handle_inset: 8.0,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// File system paths
    pub paths: PathConfig,
    /// Autosave settings
    pub autosave: AutosaveConfig,
    /// Grid settings
    pub grid: GridSettings,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if the config file exists on disk.
    #[must_use]
    pub fn exists() -> bool {
        Self::config_file_path()
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Gets the config directory path.
    ///
    /// `DASHGRID_CONFIG_DIR` overrides the platform location:
    ///
    /// - Linux: `~/.config/Dashgrid/`
    /// - macOS: `~/Library/Application Support/Dashgrid/`
    /// - Windows: `%APPDATA%\Dashgrid\`
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|dir| !dir.is_empty()) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(CONFIG_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from a specific file, defaults when it is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    /// Saves configuration to the config file using atomic write.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to a specific file.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context(format!(
                "Failed to create config directory: {}",
                dir.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = path.with_extension("toml.tmp");

        // Write to temp file
        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        // Atomic rename
        fs::rename(&temp_path, path).context(format!(
            "Failed to rename temp config file to: {}",
            path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    ///
    /// Checks:
    /// - autosave interval is at least one second
    /// - the grid has at least one column and positive track sizes
    /// - the grab handle fits inside a single cell
    /// - the catalog file exists (if set)
    pub fn validate(&self) -> Result<()> {
        if self.autosave.interval_secs == 0 {
            anyhow::bail!("Autosave interval must be at least 1 second");
        }

        let grid = &self.grid;
        if grid.config_id.trim().is_empty() {
            anyhow::bail!("Grid config_id must not be empty");
        }
        if grid.columns == 0 {
            anyhow::bail!("Grid must have at least one column");
        }
        if grid.cell_size <= 0.0 || grid.gap < 0.0 {
            anyhow::bail!(
                "Invalid grid tracks: cell_size {} and gap {}",
                grid.cell_size,
                grid.gap
            );
        }
        if grid.handle_size <= 0.0
            || grid.handle_inset < 0.0
            || grid.handle_size + grid.handle_inset > grid.cell_size
        {
            anyhow::bail!(
                "Grab handle ({} + {} inset) must fit inside a {} cell",
                grid.handle_size,
                grid.handle_inset,
                grid.cell_size
            );
        }

        if let Some(catalog) = &self.paths.catalog {
            if !catalog.exists() {
                anyhow::bail!("Catalog file does not exist: {}", catalog.display());
            }
        }

        Ok(())
    }

    /// Directory holding persisted records.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.paths.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::config_dir()?.join("data")),
        }
    }

    /// Loads the configured catalog, or the bundled one.
    pub fn catalog(&self) -> Result<BuiltinCatalog> {
        match &self.paths.catalog {
            Some(path) => BuiltinCatalog::load(path),
            None => BuiltinCatalog::bundled(),
        }
    }

    /// Interval between autosaves.
    #[must_use]
    pub const fn autosave_period(&self) -> Duration {
        Duration::from_secs(self.autosave.interval_secs)
    }
}
