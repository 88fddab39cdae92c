//! `dashgrid types`: list the widget types that can be added.

use clap::Args;
use serde::Serialize;

use crate::cli::common::{config_service, load_config, CliError, CliResult};
use crate::models::{FieldTarget, InputKind, WidgetType};

/// List widget types available to `add`
#[derive(Args, Debug)]
pub struct TypesArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize, Debug)]
struct TypeOutput<'a> {
    tag: &'a str,
    size: Option<&'a str>,
    fields: Vec<FieldOutput<'a>>,
}

#[derive(Serialize, Debug)]
struct FieldOutput<'a> {
    name: &'a str,
    label: &'a str,
    input: InputKind,
    target: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<&'a str>,
}

fn type_output(widget_type: &WidgetType) -> TypeOutput<'_> {
    let fields = widget_type
        .wizard
        .iter()
        .filter_map(|field| {
            let (name, target) = match field.target()? {
                FieldTarget::Attribute(name) => (name, "attribute"),
                FieldTarget::Slot(name) => (name, "slot"),
            };
            Some(FieldOutput {
                name,
                label: &field.label,
                input: field.input,
                target,
                default: field.value.as_deref(),
            })
        })
        .collect();

    TypeOutput {
        tag: &widget_type.tag,
        size: widget_type.card_attributes.get("class"),
        fields,
    }
}

impl TypesArgs {
    /// Execute types command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let service = config_service(&config)?;
        let registry = service
            .registry(&config.grid.config_id)
            .map_err(|e| CliError::validation(format!("{e:#}")))?;
        let types: Vec<TypeOutput<'_>> = registry.iter().map(type_output).collect();

        if self.json {
            let json = serde_json::to_string_pretty(&types)
                .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
            println!("{json}");
            return Ok(());
        }

        if types.is_empty() {
            println!("No widget types in configuration '{}'", config.grid.config_id);
            return Ok(());
        }

        for widget_type in &types {
            println!("{} [{}]", widget_type.tag, widget_type.size.unwrap_or("square-small"));
            for field in &widget_type.fields {
                let default = field
                    .default
                    .map(|value| format!(" (default: {value})"))
                    .unwrap_or_default();
                println!(
                    "  {:<12} {:<8} {:<10} {}{default}",
                    field.name,
                    format!("{:?}", field.input).to_lowercase(),
                    field.target,
                    field.label
                );
            }
        }

        Ok(())
    }
}
