use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use student_roster::source::PendingLoad;
use student_roster::{
    JsonFileRoster, LoadError, RosterError, RosterQueryEngine, RosterSource, SampleRoster,
};

fn scratch(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "student-roster-load-{}-{name}",
        std::process::id()
    ));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn json_file_loads_in_order() {
    let path = scratch(
        "ok.json",
        r#"[
            { "id": 2, "name": "Ravi", "course": "Java", "marks": 72 },
            { "id": 1, "name": "Anjali", "course": "Python", "marks": 88 }
        ]"#,
    );
    let records = JsonFileRoster::new(&path).load().unwrap();
    let names: Vec<&str> = records.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Ravi", "Anjali"]);
    fs::remove_file(path).unwrap();
}

#[test]
fn malformed_json_is_a_parse_error() {
    let path = scratch("bad.json", r#"[{ "id": 1, "name": "A" }]"#);
    let err = JsonFileRoster::new(&path).load().unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }));
    fs::remove_file(path).unwrap();
}

#[test]
fn invalid_record_is_rejected() {
    let path = scratch(
        "dup.json",
        r#"[
            { "id": 1, "name": "A", "course": "Java", "marks": 50 },
            { "id": 2, "name": "", "course": "Java", "marks": 60 }
        ]"#,
    );
    let err = JsonFileRoster::new(&path).load().unwrap_err();
    assert!(matches!(err, LoadError::InvalidRecord { index: 1, .. }));
    fs::remove_file(path).unwrap();
}

#[test]
fn empty_file_roster_is_valid() {
    let path = scratch("empty.json", "[]");
    let mut engine = RosterQueryEngine::new();
    engine
        .complete_load(PendingLoad::spawn(Arc::new(JsonFileRoster::new(&path))).wait())
        .unwrap();
    let view = engine.derived_view().unwrap();
    assert_eq!(view.total_count, 0);
    assert_eq!(view.average_marks, 0);
    fs::remove_file(path).unwrap();
}

#[test]
fn missing_file_leaves_engine_unloaded() {
    let source = Arc::new(JsonFileRoster::new("/definitely/not/students.json"));
    let mut engine = RosterQueryEngine::new();
    let err = engine.complete_load(PendingLoad::spawn(source).wait()).unwrap_err();
    assert!(matches!(err, RosterError::LoadFailed(LoadError::Io { .. })));
    assert!(!engine.is_loaded());
    assert!(matches!(engine.cycle_sort(), Err(RosterError::NotLoaded)));
}

#[test]
fn background_sample_load_initializes_engine() {
    let mut engine = RosterQueryEngine::new();
    engine
        .complete_load(PendingLoad::spawn(Arc::new(SampleRoster)).wait())
        .unwrap();
    assert!(engine.is_loaded());
    assert_eq!(engine.derived_view().unwrap().total_count, 12);
    assert!(engine.query().is_default());
}

#[test]
fn huge_marks_load_without_overflow() {
    let path = scratch(
        "huge.json",
        r#"[
            { "id": 1, "name": "A", "course": "Java", "marks": 9000000000000000000 },
            { "id": 2, "name": "B", "course": "Java", "marks": 9000000000000000000 }
        ]"#,
    );
    let records = JsonFileRoster::new(&path).load().unwrap();
    let engine = RosterQueryEngine::with_roster(records);
    let view = engine.derived_view().unwrap();
    assert_eq!(view.average_marks, 9_000_000_000_000_000_000);
    assert_eq!(view.high_performer_count, 2);
    fs::remove_file(path).unwrap();
}
