//! Application-wide constants.
//!
//! Names, reserved identifiers and defaults shared by the engine, the
//! services and the CLI.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "Dashgrid";

/// The binary name of the application (used in command examples, lowercase).
pub const APP_BINARY_NAME: &str = "dashgrid";

/// Directory name used under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "Dashgrid";

/// Environment variable overriding the config directory (used by tests).
pub const CONFIG_DIR_ENV: &str = "DASHGRID_CONFIG_DIR";

/// Identifier of a user-derived configuration produced by autosave.
pub const CUSTOM_CONFIG_ID: &str = "custom";

/// Label of a user-derived configuration produced by autosave.
pub const CUSTOM_CONFIG_LABEL: &str = "Custom";

/// Storage key of the persisted custom configuration.
pub const CUSTOM_CONFIG_KEY: &str = "config";

/// Built-in configuration selected when nothing else is requested.
pub const DEFAULT_CONFIG_ID: &str = "standard";

/// Reserved attribute that flags transient drag state on foreign markup.
///
/// The engine keeps drag state in node flags; this name is still filtered
/// out of snapshots and rejected by validation.
pub const DRAG_MARKER_ATTR: &str = "data-dashgrid-dragging";

/// Element tag of a widget's root element.
pub const WIDGET_ROOT_TAG: &str = "dash-card";

/// Element tag of the grid container.
pub const GRID_TAG: &str = "dash-grid";

/// Class carried by the drop-zone placeholder.
pub const DROPZONE_CLASS: &str = "dropzone";

/// Slot name used for the main content of a wizard-built widget.
pub const CONTENT_SLOT: &str = "content";

/// Default autosave interval in seconds.
pub const DEFAULT_AUTOSAVE_SECS: u64 = 5;
