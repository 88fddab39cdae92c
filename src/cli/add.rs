//! `dashgrid add`: drop a widget type onto the grid and complete the wizard.

use clap::Args;
use tracing::debug;

use crate::cli::common::{
    load_config, open_dashboard, parse_size, persist, CliError, CliResult,
};
use crate::constants::APP_BINARY_NAME;
use crate::dom::Point;
use crate::engine::{DragPayload, Event, EventOutcome, ExternalDrop};

/// Add a widget of the given type at the end of the dashboard
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Widget type tag (see `dashgrid types`)
    #[arg(value_name = "TYPE")]
    widget_type: String,

    /// Wizard field value, as FIELD=VALUE (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    fields: Vec<String>,

    /// Size class overriding the type's default
    #[arg(long, value_name = "SIZE")]
    size: Option<String>,
}

/// Splits a `FIELD=VALUE` argument.
fn parse_assignment(raw: &str) -> CliResult<(&str, &str)> {
    match raw.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => Ok((field.trim(), value)),
        _ => Err(CliError::validation(format!(
            "Invalid field assignment '{raw}', expected FIELD=VALUE"
        ))),
    }
}

impl AddArgs {
    /// Execute add command
    pub fn execute(&self) -> CliResult<()> {
        let assignments = self
            .fields
            .iter()
            .map(|raw| parse_assignment(raw))
            .collect::<CliResult<Vec<_>>>()?;
        let size = self.size.as_deref().map(parse_size).transpose()?;

        let config = load_config()?;
        let mut dashboard = open_dashboard(&config)?;

        let grid_box = dashboard.document().rect(dashboard.grid()).unwrap_or_default();
        let point = Point::new(grid_box.x + 1.0, grid_box.y + 1.0);
        let outcome = dashboard.dispatch(Event::Drop {
            point,
            payload: DragPayload::widget_type(self.widget_type.as_str()),
        });
        debug!(?outcome, "Widget type dropped");

        match outcome {
            EventOutcome::External(ExternalDrop::WizardOpened(_)) => {}
            EventOutcome::External(ExternalDrop::Ignored(tag)) => {
                return Err(CliError::validation(format!(
                    "Unknown widget type '{tag}'. Run `{APP_BINARY_NAME} types` to list available types"
                )));
            }
            other => {
                return Err(CliError::validation(format!(
                    "Drop was not accepted by the grid: {other:?}"
                )));
            }
        }

        for (field, value) in assignments {
            dashboard
                .wizard_mut()
                .set(field, value)
                .map_err(|e| CliError::validation(format!("{e:#}")))?;
        }

        let mut fragment = dashboard
            .wizard()
            .build_fragment()
            .map_err(|e| CliError::validation(format!("{e:#}")))?;
        if let Some(size) = size {
            fragment.attributes.insert("class", size.as_class());
            fragment.attributes.insert("size", size.as_class());
        }

        match dashboard.dispatch(Event::FragmentSubmitted(fragment)) {
            EventOutcome::WidgetInserted(_) => {}
            other => {
                return Err(CliError::validation(format!(
                    "Widget was not inserted: {other:?}"
                )));
            }
        }

        // The dashboard only logs save failures; surface them here.
        persist(&mut dashboard)?;

        let position = dashboard.items().len().saturating_sub(1);
        println!("Added {} at position {position}", self.widget_type);
        Ok(())
    }
}
