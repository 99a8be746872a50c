use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use directories::BaseDirs;
use tracing::info;

use super::{JsonFileRoster, RosterSource, SampleRoster};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".student-roster";
/// Roster file picked up automatically when present in the data directory.
const ROSTER_FILE_NAME: &str = "students.json";

/// Resolve the per-user data directory (`~/.student-roster`).
pub fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

/// Resolve the roster file that is used when no path is given explicitly.
pub fn default_roster_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(ROSTER_FILE_NAME))
}

/// Pick the roster source for this run. An explicit path always wins. A
/// missing default file falls back to the sample, but a default file that
/// exists and is broken surfaces as a load failure later on.
pub fn resolve_source(explicit: Option<&Path>, force_sample: bool) -> Arc<dyn RosterSource> {
    let default_path = if explicit.is_none() && !force_sample {
        default_roster_path().ok()
    } else {
        None
    };
    choose_source(explicit, force_sample, default_path.as_deref())
}

fn choose_source(
    explicit: Option<&Path>,
    force_sample: bool,
    default_path: Option<&Path>,
) -> Arc<dyn RosterSource> {
    let source: Arc<dyn RosterSource> = match (explicit, force_sample, default_path) {
        (Some(path), _, _) => Arc::new(JsonFileRoster::new(path)),
        (None, true, _) => Arc::new(SampleRoster),
        (None, false, Some(path)) if path.is_file() => Arc::new(JsonFileRoster::new(path)),
        _ => Arc::new(SampleRoster),
    };
    info!(source = %source.describe(), "roster source selected");
    source
}
