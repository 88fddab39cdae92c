//! Data models for dashboard configuration.
//!
//! This module contains the passive data shared by the engine, the services
//! and the CLI. Models are independent of the live element tree.

pub mod attributes;
pub mod catalog;
pub mod grid;
pub mod registry;
pub mod widget;

// Re-export all model types
pub use attributes::Attributes;
pub use catalog::{BuiltinCatalog, CatalogEntry};
pub use grid::GridConfig;
pub use registry::{FieldTarget, InputKind, WidgetRegistry, WidgetType, WizardField};
pub use widget::{SlotNode, WidgetNode, WidgetSize};
