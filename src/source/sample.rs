use crate::error::LoadError;
use crate::models::StudentRecord;

use super::RosterSource;

/// The twelve-student demo roster shipped with the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleRoster;

impl RosterSource for SampleRoster {
    fn describe(&self) -> String {
        "built-in sample roster".to_string()
    }

    fn load(&self) -> Result<Vec<StudentRecord>, LoadError> {
        Ok(sample_records())
    }
}

pub fn sample_records() -> Vec<StudentRecord> {
    [
        (1, "Anjali", "Python", 88),
        (2, "Ravi", "Java", 72),
        (3, "Reddy", "React", 91),
        (4, "Aman", "Python", 65),
        (5, "Priya", "Java", 85),
        (6, "Kiran", "React", 78),
        (7, "Sneha", "Python", 92),
        (8, "Arjun", "Java", 81),
        (9, "Meera", "React", 87),
        (10, "Vikram", "Python", 79),
        (11, "Kavya", "Java", 94),
        (12, "Rohit", "React", 83),
    ]
    .into_iter()
    .map(|(id, name, course, marks)| StudentRecord::new(id, name, course, marks))
    .collect()
}
