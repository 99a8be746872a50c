//! Where rosters come from. Sources are read-only: they produce records once
//! and never write anything back.

mod file;
mod load;
mod location;
mod sample;

use crate::error::LoadError;
use crate::models::StudentRecord;

pub use file::JsonFileRoster;
pub use load::{LoadResult, PendingLoad};
pub use location::{data_dir, default_roster_path, resolve_source};
pub use sample::{sample_records, SampleRoster};

/// Anything that can hand the engine a full roster in one go.
pub trait RosterSource: Send + Sync {
    /// Short label shown in the status line and in logs.
    fn describe(&self) -> String;

    fn load(&self) -> Result<Vec<StudentRecord>, LoadError>;
}
