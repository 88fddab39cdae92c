//! CLI command handlers for Dashgrid.
//!
//! Each subcommand opens the dashboard headlessly, drives it through the
//! same events a pointer would produce, and saves the result.

pub mod add;
pub mod common;
pub mod config;
pub mod remove;
pub mod reorder;
pub mod reset;
pub mod resize;
pub mod show;
pub mod types;
pub mod watch;

// Re-export types used by main.rs and tests
pub use add::AddArgs;
pub use common::{CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use remove::RemoveArgs;
pub use reorder::MoveArgs;
pub use reset::ResetArgs;
pub use resize::ResizeArgs;
pub use show::ShowArgs;
pub use types::TypesArgs;
pub use watch::WatchArgs;
