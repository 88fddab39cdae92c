//! Built-in configuration catalog.
//!
//! The catalog document lists named configurations, each bundling the
//! widget types available to the wizard and an initial grid arrangement:
//!
//! ```json
//! { "configs": [ { "id": "standard", "label": "Standard", "icon": "",
//!                  "widgets": [ ... ], "grid": [ ... ] } ] }
//! ```

use crate::models::{GridConfig, WidgetNode, WidgetRegistry, WidgetType};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Catalog bundled with the binary, used when no catalog path is configured.
pub const BUNDLED_CATALOG: &str = include_str!("../../assets/catalog.json");

/// One named built-in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Configuration identifier
    #[serde(default)]
    pub id: String,
    /// Display label
    #[serde(default)]
    pub label: String,
    /// Icon URL
    #[serde(default)]
    pub icon: String,
    /// Widget types offered by this configuration
    #[serde(default)]
    pub widgets: Vec<WidgetType>,
    /// Initial arrangement
    #[serde(default)]
    pub grid: Vec<WidgetNode>,
}

/// Parsed catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuiltinCatalog {
    /// Named configurations
    #[serde(default)]
    pub configs: Vec<CatalogEntry>,
}

impl BuiltinCatalog {
    /// Parses a catalog document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse configuration catalog")
    }

    /// Reads and parses a catalog file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("Invalid catalog: {}", path.display()))
    }

    /// The catalog compiled into the binary.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Identifiers of all configurations in the catalog.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.configs.iter().map(|entry| entry.id.as_str()).collect()
    }

    /// Resolves the grid configuration named `id`.
    ///
    /// Entries sharing the id are folded in order, later non-empty fields
    /// winning. An unknown id yields an empty grid carrying that id.
    #[must_use]
    pub fn grid(&self, id: &str) -> GridConfig {
        let mut config = GridConfig::new(id, id);
        for entry in self.configs.iter().filter(|entry| entry.id == id) {
            if !entry.label.is_empty() {
                config.label = entry.label.clone();
            }
            if !entry.icon.is_empty() {
                config.icon = entry.icon.clone();
            }
            if !entry.grid.is_empty() {
                config.grid = entry.grid.clone();
            }
        }
        config
    }

    /// Builds the widget-type registry of the configuration named `id`.
    pub fn registry(&self, id: &str) -> Result<WidgetRegistry> {
        let widgets = self
            .configs
            .iter()
            .rev()
            .find(|entry| entry.id == id && !entry.widgets.is_empty())
            .map(|entry| entry.widgets.clone())
            .unwrap_or_default();

        WidgetRegistry::new(widgets)
            .with_context(|| format!("Invalid widget types in configuration '{id}'"))
    }
}
