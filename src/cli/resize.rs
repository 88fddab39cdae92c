//! `dashgrid resize`: change a widget's size class.

use clap::Args;

use crate::cli::common::{
    check_index, describe_widget, load_config, open_dashboard, parse_size, persist, CliError,
    CliResult,
};

/// Resize the widget at INDEX
#[derive(Args, Debug)]
pub struct ResizeArgs {
    /// Position of the widget to resize
    #[arg(value_name = "INDEX")]
    index: usize,

    /// New size (square-small, square-large, row-small, row-large,
    /// column-small, column-large)
    #[arg(value_name = "SIZE")]
    size: String,
}

impl ResizeArgs {
    /// Execute resize command
    pub fn execute(&self) -> CliResult<()> {
        let size = parse_size(&self.size)?;
        let config = load_config()?;
        let mut dashboard = open_dashboard(&config)?;
        check_index(self.index, dashboard.items().len())?;

        let available = dashboard.available_sizes();
        if !available.contains(&size) {
            let offered: Vec<&str> = available.iter().map(|size| size.as_class()).collect();
            return Err(CliError::validation(format!(
                "Size '{size}' does not fit a {}-column grid. Available: {}",
                config.grid.columns,
                offered.join(", ")
            )));
        }

        if dashboard.resize_widget(self.index, size).is_none() {
            return Err(CliError::validation(format!(
                "Widget {} could not be resized",
                self.index
            )));
        }
        persist(&mut dashboard)?;

        let widgets = dashboard.snapshot();
        println!(
            "Resized widget {}: {}",
            self.index,
            describe_widget(&widgets[self.index])
        );
        Ok(())
    }
}
