//! The roster query pipeline: filter by course, filter by performance, sort by
//! marks, plus whole-roster statistics. Nothing in here knows about terminals.

mod engine;
mod query;
mod view;

pub use engine::RosterQueryEngine;
pub use query::{QueryState, SortMode};
pub use view::DerivedView;
