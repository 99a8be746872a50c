//! Typed failures surfaced by the library. The TUI and `main.rs` wrap these in
//! `anyhow` with context, the same way they wrap terminal errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a roster source could not produce records.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read roster file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("roster file {} is not a valid student list: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("record #{index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: String },
    #[error("roster source unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by [`crate::roster::RosterQueryEngine`].
#[derive(Debug, Error)]
pub enum RosterError {
    /// A query operation ran before any roster was delivered.
    #[error("the roster has not been loaded yet")]
    NotLoaded,
    /// The data source failed. The engine keeps whatever state it had before.
    #[error("failed to load the roster")]
    LoadFailed(#[from] LoadError),
}
