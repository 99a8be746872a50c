//! Domain models shared by the query engine, the roster sources and the TUI.
//! These types stay plain data holders; filtering and aggregation live in
//! `roster`, drawing lives in `ui`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Marks strictly above this value make a student a high performer. Both the
/// "High Performer" badge and the performance filter read this constant so the
/// two can never disagree.
pub const HIGH_PERFORMER_THRESHOLD: i64 = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One row of the roster. Records are never mutated once loaded.
pub struct StudentRecord {
    /// Stable identity of the student. Unique and positive within a roster.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Course name, matched exactly (case-sensitive) by the course filter.
    pub course: String,
    /// Percentage score. Expected to sit in 0..=100, but nothing enforces it.
    pub marks: i64,
}

impl StudentRecord {
    pub fn new(id: i64, name: impl Into<String>, course: impl Into<String>, marks: i64) -> Self {
        Self {
            id,
            name: name.into(),
            course: course.into(),
            marks,
        }
    }

    pub fn is_high_performer(&self) -> bool {
        self.marks > HIGH_PERFORMER_THRESHOLD
    }

    /// Display band used to colour the marks badge and progress bar.
    pub fn tier(&self) -> MarksTier {
        MarksTier::for_marks(self.marks)
    }
}

impl fmt::Display for StudentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {}%)", self.name, self.course, self.marks)
    }
}

/// Coarse grading bands. Note the `Good` band starts at 80 inclusive, unlike
/// the high performer rule which is strictly above 80.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarksTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl MarksTier {
    pub fn for_marks(marks: i64) -> Self {
        if marks >= 90 {
            MarksTier::Excellent
        } else if marks >= 80 {
            MarksTier::Good
        } else if marks >= 70 {
            MarksTier::Fair
        } else {
            MarksTier::Poor
        }
    }
}
