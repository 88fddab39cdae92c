//! `dashgrid reset`: drop the custom arrangement.

use clap::Args;

use crate::cli::common::{config_service, load_config, CliError, CliResult};

/// Discard the saved arrangement and return to the built-in configuration
#[derive(Args, Debug)]
pub struct ResetArgs {}

impl ResetArgs {
    /// Execute reset command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let mut service = config_service(&config)?;
        service
            .reset_custom()
            .map_err(|e| CliError::io(format!("{e:#}")))?;

        println!(
            "Custom arrangement removed; next start uses '{}'",
            config.grid.config_id
        );
        Ok(())
    }
}
