//! Dashgrid - headless dashboard layout editor
//!
//! Opens the saved dashboard, applies one editing command (add, move,
//! resize, remove, reset) the way the pointer-driven view would, and saves it.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dashgrid::cli::{
    AddArgs, CliResult, ConfigArgs, MoveArgs, RemoveArgs, ResetArgs, ResizeArgs, ShowArgs,
    TypesArgs, WatchArgs,
};

/// Dashgrid - headless dashboard layout editor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Display the current dashboard arrangement
    Show(ShowArgs),
    /// List widget types available to `add`
    Types(TypesArgs),
    /// Add a widget through the wizard
    Add(AddArgs),
    /// Move a widget to another position
    Move(MoveArgs),
    /// Change a widget's size
    Resize(ResizeArgs),
    /// Remove a widget
    Remove(RemoveArgs),
    /// Discard the saved arrangement
    Reset(ResetArgs),
    /// Keep the dashboard open and autosave it
    Watch(WatchArgs),
    /// Show or change settings
    Config(ConfigArgs),
}

impl Commands {
    fn execute(&self) -> CliResult<()> {
        match self {
            Self::Show(args) => args.execute(),
            Self::Types(args) => args.execute(),
            Self::Add(args) => args.execute(),
            Self::Move(args) => args.execute(),
            Self::Resize(args) => args.execute(),
            Self::Remove(args) => args.execute(),
            Self::Reset(args) => args.execute(),
            Self::Watch(args) => args.execute(),
            Self::Config(args) => args.execute(),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable (`show --json`).
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = cli.command.execute() {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code().code());
    }
}
