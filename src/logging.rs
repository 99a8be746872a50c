//! File-backed `tracing` setup. The TUI owns the terminal, so log lines can
//! never go to stdout or stderr; they go to a file or nowhere.

use std::env;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::source::data_dir;

/// Log file name used inside the data directory when `RUST_LOG` is set.
const LOG_FILE_NAME: &str = "student-roster.log";
/// Filter applied when `RUST_LOG` is absent.
const DEFAULT_FILTER: &str = "info";

/// Decide where logs go: an explicit file always wins, `RUST_LOG` alone
/// selects the default file, otherwise logging stays off.
pub fn log_destination(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        return Ok(Some(path.to_path_buf()));
    }
    if env::var_os("RUST_LOG").is_some() {
        return Ok(Some(data_dir()?.join(LOG_FILE_NAME)));
    }
    Ok(None)
}

/// Install the global subscriber when a destination was chosen. Returns the
/// file that receives log lines, if any.
pub fn init_logging(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    let Some(path) = log_destination(explicit)? else {
        return Ok(None);
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("failed to create log directory")?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .context("failed to install log subscriber")?;

    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_log_file_wins() {
        let path = Path::new("/tmp/roster.log");
        assert_eq!(log_destination(Some(path)).unwrap(), Some(path.to_path_buf()));
    }
}
