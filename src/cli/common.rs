//! Shared CLI plumbing: error type, exit codes and dashboard setup.

use std::fmt;

use crate::config::Config;
use crate::engine::{Dashboard, DashboardOptions};
use crate::models::{WidgetNode, WidgetSize};
use crate::services::{ConfigService, FileStore};

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Invalid input or a rejected operation
    ValidationError = 1,
    /// File system or parse failure
    IoError = 2,
}

impl ExitCode {
    /// Numeric code for `std::process::exit`.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Error reported by a CLI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    exit_code: ExitCode,
    message: String,
}

impl CliError {
    /// Invalid input or a rejected operation.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            exit_code: ExitCode::ValidationError,
            message: message.into(),
        }
    }

    /// File system or parse failure.
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            exit_code: ExitCode::IoError,
            message: message.into(),
        }
    }

    /// Exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        self.exit_code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type of CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Loads the application configuration.
pub fn load_config() -> CliResult<Config> {
    Config::load().map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))
}

/// Builds the configuration service over the configured data directory.
pub fn config_service(config: &Config) -> CliResult<ConfigService> {
    let catalog = config
        .catalog()
        .map_err(|e| CliError::io(format!("Failed to load catalog: {e:#}")))?;
    let data_dir = config
        .data_dir()
        .map_err(|e| CliError::io(format!("Failed to resolve data directory: {e:#}")))?;

    Ok(ConfigService::new(FileStore::new(data_dir), catalog))
}

/// Opens the dashboard described by the configuration.
pub fn open_dashboard(config: &Config) -> CliResult<Dashboard> {
    let service = config_service(config)?;
    Dashboard::open(service, &DashboardOptions::from(config))
        .map_err(|e| CliError::io(format!("Failed to open dashboard: {e:#}")))
}

/// Saves the current arrangement, reporting failures as I/O errors.
pub fn persist(dashboard: &mut Dashboard) -> CliResult<()> {
    dashboard
        .persist()
        .map(|_| ())
        .map_err(|e| CliError::io(format!("Failed to save dashboard: {e:#}")))
}

/// Checks that `index` addresses one of `len` widgets.
pub fn check_index(index: usize, len: usize) -> CliResult<()> {
    if index >= len {
        return Err(CliError::validation(format!(
            "Widget index {index} is out of range (dashboard has {len} widgets)"
        )));
    }
    Ok(())
}

/// One-line description of a widget: size and content tag.
#[must_use]
pub fn describe_widget(widget: &WidgetNode) -> String {
    let size = widget.size().unwrap_or_default();
    let content = widget
        .slots
        .first()
        .map_or("(empty)", |slot| slot.tag.as_str());
    format!("{content} [{size}]")
}

/// Parses a `--size` value.
pub fn parse_size(value: &str) -> CliResult<WidgetSize> {
    value
        .parse()
        .map_err(|e: anyhow::Error| CliError::validation(e.to_string()))
}
