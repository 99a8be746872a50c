//! Core library surface for the student roster viewer.
//!
//! `roster` is the UI-independent query engine, `source` produces rosters,
//! and `ui` renders them in the terminal. The binary only wires these
//! together.
pub mod cli;
pub mod error;
pub mod logging;
pub mod models;
pub mod roster;
pub mod source;
pub mod ui;

/// Typed failures from loading and querying.
pub use error::{LoadError, RosterError};

/// The record type every layer passes around.
pub use models::{MarksTier, StudentRecord, HIGH_PERFORMER_THRESHOLD};

/// The query engine and the snapshot it produces.
pub use roster::{DerivedView, QueryState, RosterQueryEngine, SortMode};

/// Roster sources and the background load handle.
pub use source::{resolve_source, JsonFileRoster, PendingLoad, RosterSource, SampleRoster};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
