//! Configuration service.
//!
//! Resolves the effective [`GridConfig`] at startup and persists the user's
//! custom arrangement. Resolution order:
//!
//! 1. the value already loaded or saved through this service
//! 2. the persisted custom record
//! 3. the named built-in configuration from the catalog
//!
//! The service is constructed explicitly and handed to whoever needs it;
//! there is no global instance.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::constants::CUSTOM_CONFIG_KEY;
use crate::models::{BuiltinCatalog, GridConfig, WidgetRegistry};
use crate::services::storage::ConfigStore;

/// Loads and saves grid configurations.
pub struct ConfigService {
    store: Box<dyn ConfigStore>,
    catalog: BuiltinCatalog,
    current: Option<GridConfig>,
}

impl std::fmt::Debug for ConfigService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigService")
            .field("catalog", &self.catalog.ids())
            .field("current", &self.current.as_ref().map(|config| &config.id))
            .finish_non_exhaustive()
    }
}

impl ConfigService {
    /// Creates a service over a storage backend and a built-in catalog.
    pub fn new(store: impl ConfigStore + 'static, catalog: BuiltinCatalog) -> Self {
        Self {
            store: Box::new(store),
            catalog,
            current: None,
        }
    }

    /// The built-in catalog.
    #[must_use]
    pub const fn catalog(&self) -> &BuiltinCatalog {
        &self.catalog
    }

    /// Configuration most recently loaded or saved, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&GridConfig> {
        self.current.as_ref()
    }

    /// Resolves the effective grid configuration.
    ///
    /// A persisted custom record always wins over the built-in named `id`.
    /// A custom record that cannot be parsed or fails validation is logged
    /// and skipped.
    ///
    /// # Arguments
    ///
    /// * `id` - Built-in configuration to fall back to
    ///
    /// # Returns
    ///
    /// * `Ok(GridConfig)` - The effective configuration
    /// * `Err(...)` - The storage backend could not be read
    pub fn load_grid(&mut self, id: &str) -> Result<GridConfig> {
        if let Some(config) = &self.current {
            return Ok(config.clone());
        }

        let config = match self.load_custom()? {
            Some(custom) => {
                info!(widgets = custom.grid.len(), "Loaded custom configuration");
                custom
            }
            None => {
                let builtin = self.catalog.grid(id);
                debug!(%id, widgets = builtin.grid.len(), "Loaded built-in configuration");
                builtin
            }
        };

        self.current = Some(config.clone());
        Ok(config)
    }

    fn load_custom(&self) -> Result<Option<GridConfig>> {
        let Some(json) = self
            .store
            .load(CUSTOM_CONFIG_KEY)
            .context("Failed to read custom configuration")?
        else {
            return Ok(None);
        };

        match GridConfig::from_json(&json).and_then(|config| config.validate().map(|()| config)) {
            Ok(config) => Ok(Some(config)),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "Ignoring unreadable custom configuration");
                Ok(None)
            }
        }
    }

    /// Widget types offered by the built-in configuration `id`.
    pub fn registry(&self, id: &str) -> Result<WidgetRegistry> {
        self.catalog.registry(id)
    }

    /// Persists `config` as the custom record, replacing any previous one.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of bytes written
    /// * `Err(...)` - Serialization or storage failure
    pub fn save_grid(&mut self, config: &GridConfig) -> Result<usize> {
        let json = config.to_json()?;
        self.store
            .save(CUSTOM_CONFIG_KEY, &json)
            .context("Failed to save custom configuration")?;
        self.current = Some(config.clone());
        info!(widgets = config.grid.len(), bytes = json.len(), "Saved custom configuration");
        Ok(json.len())
    }

    /// Deletes the custom record so the next load uses the built-in catalog.
    pub fn reset_custom(&mut self) -> Result<()> {
        self.store
            .remove(CUSTOM_CONFIG_KEY)
            .context("Failed to remove custom configuration")?;
        self.current = None;
        info!("Custom configuration reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SlotNode, WidgetNode};
    use crate::services::storage::MemoryStore;

    fn service(store: MemoryStore) -> ConfigService {
        ConfigService::new(store, BuiltinCatalog::bundled().unwrap())
    }

    fn custom() -> GridConfig {
        GridConfig::custom(vec![WidgetNode::new()
            .with_attribute("class", "row-small")
            .with_slot(SlotNode::new("content", "ettdash-bar-chart"))])
    }

    #[test]
    fn test_builtin_when_no_custom() {
        let mut service = service(MemoryStore::new());
        let config = service.load_grid("standard").unwrap();

        assert_eq!(config.id, "standard");
        assert_eq!(config.grid.len(), 2);
    }

    #[test]
    fn test_custom_takes_precedence() {
        let store = MemoryStore::with_record("config", &custom().to_json().unwrap());
        let mut service = service(store);

        assert_eq!(service.load_grid("standard").unwrap(), custom());
    }

    #[test]
    fn test_malformed_custom_falls_back() {
        let store = MemoryStore::with_record("config", "{not json");
        let mut service = service(store);

        assert_eq!(service.load_grid("standard").unwrap().id, "standard");
    }

    #[test]
    fn test_save_overwrites_and_caches() {
        let store = MemoryStore::new();
        let mut service = service(store.clone());

        let bytes = service.save_grid(&custom()).unwrap();
        let json = store.get("config").unwrap();
        assert_eq!(bytes, json.len());
        assert_eq!(GridConfig::from_json(&json).unwrap(), custom());

        // The cached value is returned without touching the store again.
        assert_eq!(service.load_grid("compact").unwrap(), custom());
    }

    #[test]
    fn test_reset_restores_builtin() {
        let store = MemoryStore::with_record("config", &custom().to_json().unwrap());
        let mut service = service(store.clone());
        service.load_grid("standard").unwrap();

        service.reset_custom().unwrap();

        assert!(store.get("config").is_none());
        assert_eq!(service.load_grid("standard").unwrap().id, "standard");
    }
}
