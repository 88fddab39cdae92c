//! Dashboard arrangement record.

use crate::constants::{CUSTOM_CONFIG_ID, CUSTOM_CONFIG_LABEL, DEFAULT_CONFIG_ID, DRAG_MARKER_ATTR};
use crate::models::{SlotNode, WidgetNode};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// The full dashboard arrangement.
///
/// Loaded once at startup (a persisted custom record wins over built-ins),
/// replaced by every autosave tick and persisted as a whole.
///
/// # Validation
///
/// - The reserved drag marker attribute never appears anywhere in the tree
/// - Every slot has a non-empty tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Configuration identifier ("custom" for user-derived records)
    #[serde(default)]
    pub id: String,
    /// Display label
    #[serde(default)]
    pub label: String,
    /// Icon URL
    #[serde(default)]
    pub icon: String,
    /// Placed widgets in grid order
    #[serde(default)]
    pub grid: Vec<WidgetNode>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            id: DEFAULT_CONFIG_ID.to_string(),
            label: "Standard".to_string(),
            icon: String::new(),
            grid: Vec::new(),
        }
    }
}

impl GridConfig {
    /// Creates an empty configuration with the given id and label.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: String::new(),
            grid: Vec::new(),
        }
    }

    /// Wraps a derived widget list as the user's custom configuration.
    #[must_use]
    pub fn custom(grid: Vec<WidgetNode>) -> Self {
        Self {
            id: CUSTOM_CONFIG_ID.to_string(),
            label: CUSTOM_CONFIG_LABEL.to_string(),
            icon: String::new(),
            grid,
        }
    }

    /// Returns true if this record was produced from the live grid.
    #[must_use]
    pub fn is_custom(&self) -> bool {
        self.id == CUSTOM_CONFIG_ID
    }

    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse grid configuration")
    }

    /// Serializes the configuration to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize grid configuration")
    }

    /// Validates the tree invariants.
    pub fn validate(&self) -> Result<()> {
        for (index, widget) in self.grid.iter().enumerate() {
            if widget.attributes.contains_key(DRAG_MARKER_ATTR) {
                anyhow::bail!(
                    "Widget {} carries reserved attribute '{}'",
                    index,
                    DRAG_MARKER_ATTR
                );
            }
            for slot in &widget.slots {
                validate_slot(slot, &format!("widget {index}"))?;
            }
        }
        Ok(())
    }
}

fn validate_slot(slot: &SlotNode, parent_path: &str) -> Result<()> {
    let path = format!("{parent_path} > slot '{}'", slot.name);

    if slot.tag.trim().is_empty() {
        anyhow::bail!("Slot at {path} has an empty tag");
    }
    if slot.attributes.contains_key(DRAG_MARKER_ATTR) {
        anyhow::bail!("Slot at {path} carries reserved attribute '{DRAG_MARKER_ATTR}'");
    }

    for child in &slot.slots {
        validate_slot(child, &path)?;
    }
    Ok(())
}
