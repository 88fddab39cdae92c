//! Configuration management CLI commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::common::{load_config, CliError, CliResult};
use crate::config::Config;

/// Configuration management commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Set configuration values
    Set(ConfigSetArgs),
}

/// Display current configuration
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set configuration values
#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Built-in configuration to start from
    #[arg(long, value_name = "ID")]
    config_id: Option<String>,

    /// Number of grid columns
    #[arg(long, value_name = "N")]
    columns: Option<usize>,

    /// Seconds between autosaves
    #[arg(long, value_name = "SECS")]
    autosave_interval: Option<u64>,

    /// Enable or disable autosave for `watch`
    #[arg(long, value_name = "BOOL")]
    autosave: Option<bool>,

    /// Catalog document replacing the bundled one
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Directory for the saved arrangement
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(),
            ConfigCommand::Set(args) => args.execute(),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;

        if self.json {
            let json = serde_json::to_string_pretty(&config)
                .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
            println!("{json}");
            return Ok(());
        }

        let path = Config::config_file_path()
            .map_err(|e| CliError::io(format!("{e:#}")))?;
        let origin = if Config::exists() { "" } else { " (not created, defaults)" };
        println!("Config file: {}{origin}", path.display());

        println!("\n[paths]");
        match &config.paths.catalog {
            Some(catalog) => println!("  catalog: {}", catalog.display()),
            None => println!("  catalog: (bundled)"),
        }
        match config.data_dir() {
            Ok(dir) => println!("  data_dir: {}", dir.display()),
            Err(e) => println!("  data_dir: (unavailable: {e})"),
        }

        println!("\n[autosave]");
        println!("  enabled: {}", config.autosave.enabled);
        println!("  interval_secs: {}", config.autosave.interval_secs);

        let grid = &config.grid;
        println!("\n[grid]");
        println!("  config_id: {}", grid.config_id);
        println!("  columns: {}", grid.columns);
        println!("  cell_size: {}", grid.cell_size);
        println!("  gap: {}", grid.gap);
        println!("  handle: {} (inset {})", grid.handle_size, grid.handle_inset);

        Ok(())
    }
}

impl ConfigSetArgs {
    fn is_empty(&self) -> bool {
        self.config_id.is_none()
            && self.columns.is_none()
            && self.autosave_interval.is_none()
            && self.autosave.is_none()
            && self.catalog.is_none()
            && self.data_dir.is_none()
    }

    /// Applies the given options to `config`.
    fn apply(&self, config: &mut Config) {
        if let Some(id) = &self.config_id {
            config.grid.config_id.clone_from(id);
        }
        if let Some(columns) = self.columns {
            config.grid.columns = columns;
        }
        if let Some(secs) = self.autosave_interval {
            config.autosave.interval_secs = secs;
        }
        if let Some(enabled) = self.autosave {
            config.autosave.enabled = enabled;
        }
        if let Some(catalog) = &self.catalog {
            config.paths.catalog = Some(catalog.clone());
        }
        if let Some(dir) = &self.data_dir {
            config.paths.data_dir = Some(dir.clone());
        }
    }

    /// Execute set command
    pub fn execute(&self) -> CliResult<()> {
        if self.is_empty() {
            return Err(CliError::validation(
                "At least one option must be specified: --config-id, --columns, \
                 --autosave-interval, --autosave, --catalog or --data-dir",
            ));
        }

        let mut config = load_config()?;
        self.apply(&mut config);
        config
            .validate()
            .map_err(|e| CliError::validation(format!("{e:#}")))?;
        config
            .save()
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

        println!("Configuration saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_args() -> ConfigSetArgs {
        ConfigSetArgs {
            config_id: None,
            columns: None,
            autosave_interval: None,
            autosave: None,
            catalog: None,
            data_dir: None,
        }
    }

    #[test]
    fn test_apply_touches_only_given_options() {
        let mut config = Config::new();
        let args = ConfigSetArgs {
            columns: Some(2),
            autosave: Some(false),
            ..set_args()
        };

        assert!(set_args().is_empty());
        assert!(!args.is_empty());
        args.apply(&mut config);

        assert_eq!(config.grid.columns, 2);
        assert!(!config.autosave.enabled);
        assert_eq!(config.grid.config_id, "standard");
        assert_eq!(config.autosave.interval_secs, 5);
    }
}
