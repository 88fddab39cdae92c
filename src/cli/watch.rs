//! `dashgrid watch`: keep the dashboard open and autosave it.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use clap::Args;
use tokio::task::LocalSet;

use crate::cli::common::{load_config, open_dashboard, CliError, CliResult};
use crate::engine::AutosaveLoop;

/// Keep the dashboard open for a while, autosaving it periodically
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// How long to keep the dashboard open
    #[arg(long, value_name = "N", default_value = "10")]
    seconds: u64,

    /// Autosave interval in seconds (defaults to the configured one)
    #[arg(long, value_name = "SECS")]
    interval: Option<u64>,
}

impl WatchArgs {
    /// Execute watch command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        if !config.autosave.enabled {
            return Err(CliError::validation(
                "Autosave is disabled in the configuration ([autosave] enabled = false)",
            ));
        }

        let period = match self.interval {
            Some(0) => return Err(CliError::validation("Interval must be at least 1 second")),
            Some(secs) => Duration::from_secs(secs),
            None => config.autosave_period(),
        };

        let dashboard = Rc::new(RefCell::new(open_dashboard(&config)?));
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| CliError::io(format!("Failed to start runtime: {e}")))?;

        println!(
            "Watching {} widgets for {}s, autosaving every {}s",
            dashboard.borrow().items().len(),
            self.seconds,
            period.as_secs()
        );

        let local = LocalSet::new();
        let saves = local.block_on(&runtime, async {
            let autosave = AutosaveLoop::start(&dashboard, period);
            tokio::time::sleep(Duration::from_secs(self.seconds)).await;
            autosave.stop();
            autosave.saves()
        });

        dashboard.borrow_mut().deactivate();
        println!("Stopped after {saves} autosaves");
        Ok(())
    }
}
