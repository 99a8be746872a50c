//! Binary entry point: parse flags, set up file logging, pick the roster
//! source and drive the Ratatui event loop until the user exits.
use clap::Parser;
use student_roster::cli::Cli;
use student_roster::logging::init_logging;
use student_roster::{resolve_source, run_app, App};
use tracing::info;

/// Returning a `Result` bubbles up fatal start-up problems (an unwritable log
/// file, a terminal that refuses raw mode) instead of crashing silently. Roster
/// load failures are not fatal; the UI reports them and offers a retry.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some(path) = init_logging(cli.log_file.as_deref())? {
        info!(log_file = %path.display(), "logging initialized");
    }

    let source = resolve_source(cli.roster.as_deref(), cli.sample);
    let mut app = App::new(source);
    run_app(&mut app)
}
