use anyhow::Result;

use crate::models::StudentRecord;
use crate::roster::{DerivedView, RosterQueryEngine};
use crate::source::PendingLoad;

/// What the application is currently showing.
pub(crate) enum Screen {
    Loading(PendingLoad),
    LoadFailed { reason: String },
    Roster(RosterScreen),
}

/// A loaded roster plus the card selection the user is moving around.
pub(crate) struct RosterScreen {
    pub(crate) engine: RosterQueryEngine,
    /// Course picker options, in first-seen order. Fixed for the roster's
    /// lifetime so it is captured once.
    pub(crate) courses: Vec<String>,
    /// Selected index into the visible records.
    pub(crate) selected: usize,
}

impl RosterScreen {
    pub(crate) fn new(engine: RosterQueryEngine) -> Result<Self> {
        let courses = engine.distinct_courses()?;
        Ok(Self {
            engine,
            courses,
            selected: 0,
        })
    }

    pub(crate) fn view(&self) -> Result<&DerivedView> {
        Ok(self.engine.derived_view()?)
    }

    /// Move the course picker by `offset`, wrapping through "All Courses".
    pub(crate) fn step_course(&mut self, offset: isize) -> Result<()> {
        let next = step_course(self.engine.query().course_filter(), &self.courses, offset);
        self.engine.set_course_filter(next)?;
        self.ensure_in_bounds()
    }

    pub(crate) fn toggle_high_performers(&mut self) -> Result<()> {
        self.engine.toggle_high_performers_only()?;
        self.ensure_in_bounds()
    }

    pub(crate) fn cycle_sort(&mut self) -> Result<()> {
        self.engine.cycle_sort()?;
        self.ensure_in_bounds()
    }

    pub(crate) fn clear_filters(&mut self) -> Result<()> {
        self.engine.clear_filters()?;
        self.selected = 0;
        Ok(())
    }

    pub(crate) fn current_record(&self) -> Option<&StudentRecord> {
        self.view()
            .ok()
            .and_then(|view| view.visible_records.get(self.selected))
    }

    /// Move selection by `offset`, clamping to the visible list.
    pub(crate) fn move_selection(&mut self, offset: isize) -> Result<()> {
        let len = self.view()?.visible_count as isize;
        if len == 0 {
            return Ok(());
        }
        self.selected = (self.selected as isize + offset).clamp(0, len - 1) as usize;
        Ok(())
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) -> Result<()> {
        self.selected = self.view()?.visible_count.saturating_sub(1);
        Ok(())
    }

    /// Keep the selection index within the visible list bounds.
    fn ensure_in_bounds(&mut self) -> Result<()> {
        let len = self.view()?.visible_count;
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
        Ok(())
    }
}

/// The course option `offset` steps away from `current`, where the options are
/// "All Courses" (`None`) followed by `courses`. A current course that is not
/// in the list is treated as "All Courses".
pub(crate) fn step_course(
    current: Option<&str>,
    courses: &[String],
    offset: isize,
) -> Option<String> {
    let options = courses.len() as isize + 1;
    let position = current
        .and_then(|c| courses.iter().position(|course| course == c))
        .map(|idx| idx as isize + 1)
        .unwrap_or(0);
    let next = (position + offset).rem_euclid(options);
    if next == 0 {
        None
    } else {
        courses.get(next as usize - 1).cloned()
    }
}
