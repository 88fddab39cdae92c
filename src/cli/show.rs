//! `dashgrid show`: print the current arrangement.

use clap::Args;
use serde::Serialize;

use crate::cli::common::{describe_widget, load_config, open_dashboard, CliError, CliResult};
use crate::constants::APP_NAME;
use crate::models::WidgetNode;

/// Display the current dashboard arrangement
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize, Debug)]
struct ShowOutput<'a> {
    id: &'a str,
    label: &'a str,
    grid: Vec<WidgetNode>,
}

impl ShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let dashboard = open_dashboard(&config)?;
        let widgets = dashboard.snapshot();

        if self.json {
            let output = ShowOutput {
                id: &dashboard.config().id,
                label: &dashboard.config().label,
                grid: widgets,
            };
            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
            println!("{json}");
            return Ok(());
        }

        println!(
            "{APP_NAME} dashboard: {} ({})",
            dashboard.config().label,
            dashboard.config().id
        );
        if widgets.is_empty() {
            println!("  (no widgets)");
        }

        for (index, (widget, item)) in widgets.iter().zip(dashboard.items()).enumerate() {
            let position = dashboard
                .document()
                .rect(item)
                .map(|rect| format!(" at ({}, {})", rect.x, rect.y))
                .unwrap_or_default();
            println!("  {index}: {}{position}", describe_widget(widget));
            for slot in widget.slots.iter().flat_map(|content| &content.slots) {
                if !slot.content.is_empty() {
                    println!("       {}: {}", slot.name, slot.content);
                }
            }
        }

        Ok(())
    }
}
