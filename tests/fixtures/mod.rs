//! Shared test fixtures for engine and CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use std::fs;
use std::path::{Path, PathBuf};

use dashgrid::dom::{NodeId, Point};
use dashgrid::engine::{Dashboard, DashboardOptions, GridMetrics, HandleRegion};
use dashgrid::models::{
    Attributes, BuiltinCatalog, CatalogEntry, InputKind, SlotNode, WidgetNode, WidgetType,
    WizardField,
};
use dashgrid::services::{ConfigService, MemoryStore};
use tempfile::TempDir;

/// Id of the catalog entry built by [`trio_catalog`].
pub const TRIO_ID: &str = "trio";

/// A widget whose content slot has the given tag.
pub fn widget(tag: &str, class: &str) -> WidgetNode {
    WidgetNode::new()
        .with_attribute("class", class)
        .with_slot(SlotNode::new("content", tag))
}

/// Three small widgets A, B, C.
pub fn trio() -> Vec<WidgetNode> {
    vec![
        widget("test-a", "square-small"),
        widget("test-b", "square-small"),
        widget("test-c", "square-small"),
    ]
}

/// A widget type with one attribute field and one slot field.
pub fn gauge_type() -> WidgetType {
    let mut widget_type = WidgetType::new("test-gauge")
        .with_field(WizardField::attribute("Limit", InputKind::Number, "limit").with_value("100"))
        .with_field(WizardField::slot("Title", "title"));
    widget_type.card_attributes = Attributes::new()
        .with("class", "row-small")
        .with("size", "row-small");
    widget_type
}

/// Catalog holding a single `trio` configuration with the gauge type.
pub fn trio_catalog() -> BuiltinCatalog {
    BuiltinCatalog {
        configs: vec![CatalogEntry {
            id: TRIO_ID.to_string(),
            label: "Trio".to_string(),
            icon: String::new(),
            widgets: vec![gauge_type()],
            grid: trio(),
        }],
    }
}

/// Options opening the `trio` configuration on a 100px grid with 10px gaps.
pub fn trio_options() -> DashboardOptions {
    DashboardOptions {
        config_id: TRIO_ID.to_string(),
        handle: HandleRegion::default(),
        metrics: GridMetrics {
            columns: 6,
            cell: 100.0,
            gap: 10.0,
            origin: Point::new(0.0, 0.0),
        },
        ..DashboardOptions::default()
    }
}

/// Opens the trio dashboard over a memory store.
pub fn open_trio(store: &MemoryStore) -> Dashboard {
    let service = ConfigService::new(store.clone(), trio_catalog());
    Dashboard::open(service, &trio_options()).expect("trio dashboard opens")
}

/// Center of an item's grab handle.
pub fn handle_point(dashboard: &Dashboard, item: NodeId) -> Point {
    let rect = dashboard.document().rect(item).expect("item has a box");
    dashboard.reorder().handle().center(rect)
}

/// Center of an item's box.
pub fn center_point(dashboard: &Dashboard, item: NodeId) -> Point {
    let rect = dashboard.document().rect(item).expect("item has a box");
    Point::new(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
}

/// Content tags of a widget list, in order.
pub fn content_tags(widgets: &[WidgetNode]) -> Vec<String> {
    widgets
        .iter()
        .map(|widget| {
            widget
                .slot("content")
                .map(|slot| slot.tag.clone())
                .unwrap_or_default()
        })
        .collect()
}

/// Temporary config directory for CLI tests.
pub fn temp_config_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Writes the trio catalog and a config pointing at it into `dir`.
///
/// Returns the path of the catalog file.
pub fn write_trio_config(dir: &Path) -> PathBuf {
    let catalog_path = dir.join("catalog.json");
    let catalog = serde_json::to_string_pretty(&trio_catalog()).expect("catalog serializes");
    fs::write(&catalog_path, catalog).expect("Failed to write catalog");

    let config = format!(
        "[paths]\ncatalog = {:?}\n\n[grid]\nconfig_id = \"{TRIO_ID}\"\n",
        catalog_path.to_string_lossy()
    );
    fs::write(dir.join("config.toml"), config).expect("Failed to write config");
    catalog_path
}

/// Path of the persisted custom record under a config directory.
pub fn custom_record_path(dir: &Path) -> PathBuf {
    dir.join("data").join("config.json")
}
