//! `dashgrid remove`: delete a widget.

use clap::Args;

use crate::cli::common::{
    check_index, describe_widget, load_config, open_dashboard, persist, CliError, CliResult,
};

/// Remove the widget at INDEX
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Position of the widget to remove
    #[arg(value_name = "INDEX")]
    index: usize,
}

impl RemoveArgs {
    /// Execute remove command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let mut dashboard = open_dashboard(&config)?;
        let widgets = dashboard.snapshot();
        check_index(self.index, widgets.len())?;

        if dashboard.remove_widget(self.index).is_none() {
            return Err(CliError::validation(format!(
                "Widget {} could not be removed",
                self.index
            )));
        }
        persist(&mut dashboard)?;

        println!(
            "Removed widget {}: {}",
            self.index,
            describe_widget(&widgets[self.index])
        );
        Ok(())
    }
}
