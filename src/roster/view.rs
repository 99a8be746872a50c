use std::collections::HashSet;

use crate::models::StudentRecord;

use super::query::{QueryState, SortMode};

/// Snapshot handed to the renderer. Rebuilt from scratch after every query
/// change; nothing is patched incrementally.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DerivedView {
    pub visible_records: Vec<StudentRecord>,
    pub total_count: usize,
    pub visible_count: usize,
    pub high_performer_count: usize,
    pub average_marks: i64,
    pub distinct_course_count: usize,
}

/// Whole-roster statistics. They ignore the query entirely, so the engine
/// computes them once per roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct RosterStats {
    pub(crate) total_count: usize,
    pub(crate) high_performer_count: usize,
    pub(crate) average_marks: i64,
    pub(crate) distinct_course_count: usize,
}

impl RosterStats {
    pub(crate) fn compute(roster: &[StudentRecord]) -> Self {
        let courses: HashSet<&str> = roster.iter().map(|s| s.course.as_str()).collect();
        Self {
            total_count: roster.len(),
            high_performer_count: roster.iter().filter(|s| s.is_high_performer()).count(),
            average_marks: rounded_mean(roster.iter().map(|s| s.marks)),
            distinct_course_count: courses.len(),
        }
    }
}

/// Mean rounded half-up (2.5 -> 3, -2.5 -> -2), or 0 for no values. Summed in
/// `i128` because marks are unbounded `i64`s.
pub(crate) fn rounded_mean(values: impl Iterator<Item = i64>) -> i64 {
    let (sum, count) = values.fold((0i128, 0i128), |(sum, count), v| {
        (sum + i128::from(v), count + 1)
    });
    if count == 0 {
        return 0;
    }
    let mean = (2 * sum + count).div_euclid(2 * count);
    // A rounded mean never leaves the range of its inputs.
    i64::try_from(mean).unwrap_or(if mean < 0 { i64::MIN } else { i64::MAX })
}

/// Course names in the order they first appear.
pub(crate) fn distinct_courses(roster: &[StudentRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    roster
        .iter()
        .filter(|s| seen.insert(s.course.as_str()))
        .map(|s| s.course.clone())
        .collect()
}

/// Run the course filter, then the performance filter, then the sort.
pub(crate) fn visible_records(roster: &[StudentRecord], query: &QueryState) -> Vec<StudentRecord> {
    let mut visible: Vec<StudentRecord> = roster
        .iter()
        .filter(|s| match &query.course_filter {
            Some(course) => s.course == *course,
            None => true,
        })
        .filter(|s| !query.high_performers_only || s.is_high_performer())
        .cloned()
        .collect();

    // `sort_by` is stable, so equal marks keep their roster order.
    match query.sort_mode {
        SortMode::None => {}
        SortMode::Descending => visible.sort_by(|a, b| b.marks.cmp(&a.marks)),
        SortMode::Ascending => visible.sort_by(|a, b| a.marks.cmp(&b.marks)),
    }

    visible
}

pub(crate) fn build(roster: &[StudentRecord], stats: &RosterStats, query: &QueryState) -> DerivedView {
    let visible_records = visible_records(roster, query);
    DerivedView {
        visible_count: visible_records.len(),
        visible_records,
        total_count: stats.total_count,
        high_performer_count: stats.high_performer_count,
        average_marks: stats.average_marks,
        distinct_course_count: stats.distinct_course_count,
    }
}
