use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use crate::error::LoadError;
use crate::models::StudentRecord;

use super::RosterSource;

/// Read-only roster stored as a JSON array of
/// `{ "id", "name", "course", "marks" }` objects.
#[derive(Debug, Clone)]
pub struct JsonFileRoster {
    path: PathBuf,
}

impl JsonFileRoster {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RosterSource for JsonFileRoster {
    fn describe(&self) -> String {
        format!("roster file {}", self.path.display())
    }

    fn load(&self) -> Result<Vec<StudentRecord>, LoadError> {
        let text = fs::read_to_string(&self.path).map_err(|source| LoadError::Io {
            path: self.path.clone(),
            source,
        })?;
        let records: Vec<StudentRecord> =
            serde_json::from_str(&text).map_err(|source| LoadError::Parse {
                path: self.path.clone(),
                source,
            })?;
        validate_records(&records)?;
        Ok(records)
    }
}

/// Reject records that break the documented shape: positive unique ids and
/// non-blank names and courses. Marks are left alone.
pub(crate) fn validate_records(records: &[StudentRecord]) -> Result<(), LoadError> {
    let mut seen = HashSet::new();
    for (index, record) in records.iter().enumerate() {
        let reason = if record.id <= 0 {
            Some(format!("id {} is not positive", record.id))
        } else if !seen.insert(record.id) {
            Some(format!("id {} appears more than once", record.id))
        } else if record.name.trim().is_empty() {
            Some(format!("id {} has an empty name", record.id))
        } else if record.course.trim().is_empty() {
            Some(format!("id {} has an empty course", record.id))
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(LoadError::InvalidRecord { index, reason });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_out_of_range_marks() {
        let records = vec![StudentRecord::new(1, "Over", "Math", 120)];
        assert!(validate_records(&records).is_ok());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let records = vec![
            StudentRecord::new(1, "A", "Math", 50),
            StudentRecord::new(1, "B", "Math", 60),
        ];
        match validate_records(&records) {
            Err(LoadError::InvalidRecord { index, reason }) => {
                assert_eq!(index, 1);
                assert!(reason.contains("more than once"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn rejects_non_positive_ids_and_blank_text() {
        let zero = vec![StudentRecord::new(0, "A", "Math", 50)];
        assert!(matches!(
            validate_records(&zero),
            Err(LoadError::InvalidRecord { index: 0, .. })
        ));

        let blank_name = vec![StudentRecord::new(3, "  ", "Math", 50)];
        assert!(validate_records(&blank_name).is_err());

        let blank_course = vec![StudentRecord::new(3, "A", "", 50)];
        assert!(validate_records(&blank_course).is_err());
    }
}
