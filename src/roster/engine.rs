use tracing::{debug, info, warn};

use crate::error::{LoadError, RosterError};
use crate::models::StudentRecord;

use super::query::QueryState;
use super::view::{self, DerivedView, RosterStats};

/// Roster plus everything derived from it. Only exists once a load finished.
#[derive(Debug)]
struct Loaded {
    roster: Vec<StudentRecord>,
    stats: RosterStats,
    view: DerivedView,
}

/// Owns one roster, the query applied to it, and the current [`DerivedView`].
///
/// Every mutator recomputes the view before returning, so
/// [`derived_view`](Self::derived_view) is always a plain read. Until a roster
/// arrives, query operations are rejected with [`RosterError::NotLoaded`].
#[derive(Debug, Default)]
pub struct RosterQueryEngine {
    loaded: Option<Loaded>,
    query: QueryState,
}

impl RosterQueryEngine {
    /// An engine that is still waiting for its roster.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roster(roster: Vec<StudentRecord>) -> Self {
        let mut engine = Self::new();
        engine.initialize(roster);
        engine
    }

    /// Store `roster` and reset the query to its defaults. Calling this again
    /// replaces the roster and drops the previous query.
    pub fn initialize(&mut self, roster: Vec<StudentRecord>) {
        let stats = RosterStats::compute(&roster);
        self.query = QueryState::default();
        let view = view::build(&roster, &stats, &self.query);
        info!(
            records = stats.total_count,
            courses = stats.distinct_course_count,
            "roster initialized"
        );
        self.loaded = Some(Loaded {
            roster,
            stats,
            view,
        });
    }

    /// Hand the outcome of a load to the engine. A failed load is reported as
    /// [`RosterError::LoadFailed`] and leaves the engine exactly as it was.
    pub fn complete_load(
        &mut self,
        result: Result<Vec<StudentRecord>, LoadError>,
    ) -> Result<(), RosterError> {
        match result {
            Ok(roster) => {
                self.initialize(roster);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "roster load failed");
                Err(RosterError::LoadFailed(err))
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    /// Restrict the view to one course. The name is not checked against the
    /// roster; an unknown course just matches nothing.
    pub fn set_course_filter(&mut self, course: Option<String>) -> Result<(), RosterError> {
        self.ensure_loaded()?;
        self.query.set_course_filter(course);
        debug!(course = ?self.query.course_filter(), "course filter changed");
        self.recompute()
    }

    pub fn toggle_high_performers_only(&mut self) -> Result<(), RosterError> {
        self.ensure_loaded()?;
        self.query.high_performers_only = !self.query.high_performers_only;
        debug!(enabled = self.query.high_performers_only, "high performer filter toggled");
        self.recompute()
    }

    pub fn cycle_sort(&mut self) -> Result<(), RosterError> {
        self.ensure_loaded()?;
        self.query.sort_mode = self.query.sort_mode.next();
        debug!(sort = ?self.query.sort_mode, "sort mode cycled");
        self.recompute()
    }

    pub fn clear_filters(&mut self) -> Result<(), RosterError> {
        self.ensure_loaded()?;
        self.query = QueryState::default();
        debug!("filters cleared");
        self.recompute()
    }

    pub fn derived_view(&self) -> Result<&DerivedView, RosterError> {
        self.loaded
            .as_ref()
            .map(|loaded| &loaded.view)
            .ok_or(RosterError::NotLoaded)
    }

    /// Every course in the roster, in first-seen order, for the course picker.
    pub fn distinct_courses(&self) -> Result<Vec<String>, RosterError> {
        self.loaded
            .as_ref()
            .map(|loaded| view::distinct_courses(&loaded.roster))
            .ok_or(RosterError::NotLoaded)
    }

    fn ensure_loaded(&self) -> Result<(), RosterError> {
        if self.loaded.is_some() {
            Ok(())
        } else {
            Err(RosterError::NotLoaded)
        }
    }

    fn recompute(&mut self) -> Result<(), RosterError> {
        let loaded = self.loaded.as_mut().ok_or(RosterError::NotLoaded)?;
        loaded.view = view::build(&loaded.roster, &loaded.stats, &self.query);
        Ok(())
    }
}
