use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PATIENT: &str = "org.example.Patient";

fn revtrail(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("revtrail").unwrap();
    cmd.env("REVTRAIL_DATA_DIR", dir.path()).env_remove("RUST_LOG");
    cmd
}

fn init_with_patient(dir: &TempDir) {
    revtrail(dir)
        .args(["init", "--type", PATIENT])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));
}

fn record(dir: &TempDir, kind: &str, id: &str, snapshot: &str) {
    revtrail(dir)
        .args(["rev", "record", PATIENT, id, snapshot, "--kind", kind, "--author", "10"])
        .assert()
        .success();
}

#[test]
fn test_init_lists_audited_types() {
    let dir = TempDir::new().unwrap();
    init_with_patient(&dir);

    assert!(dir.path().join("config.json").exists());
    revtrail(&dir)
        .arg("types")
        .assert()
        .success()
        .stdout(predicate::str::contains(PATIENT));
}

#[test]
fn test_types_names_logged_unaudited_types() {
    let dir = TempDir::new().unwrap();
    init_with_patient(&dir);

    revtrail(&dir)
        .args(["rev", "record", "org.example.Visit", "4", r#"{"room":"B"}"#])
        .assert()
        .success();

    revtrail(&dir)
        .arg("types")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged but not audited:"))
        .stdout(predicate::str::contains("  org.example.Visit"));
}

#[test]
fn test_record_and_list() {
    let dir = TempDir::new().unwrap();
    init_with_patient(&dir);

    revtrail(&dir)
        .args(["rev", "record", PATIENT, "1", r#"{"name":"Alice"}"#, "--kind", "add"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded ADD of org.example.Patient 1 as r1"));
    record(&dir, "modify", "1", r#"{"name":"Alicia"}"#);
    record(&dir, "add", "2", r#"{"name":"Bob"}"#);

    revtrail(&dir)
        .args(["rev", "count", PATIENT])
        .assert()
        .success()
        .stdout("3\n");

    revtrail(&dir)
        .args(["rev", "count", PATIENT, "--entity", "1"])
        .assert()
        .success()
        .stdout("2\n");

    revtrail(&dir)
        .args(["rev", "list", PATIENT, "--page-size", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("r3"))
        .stdout(predicate::str::contains("r2"))
        .stdout(predicate::str::contains("Page 1 of 2 (3 revisions total)"));
}

#[test]
fn test_unaudited_type_is_empty_not_an_error() {
    let dir = TempDir::new().unwrap();
    init_with_patient(&dir);

    revtrail(&dir)
        .args(["rev", "list", "non.existent.Type"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No revisions found for non.existent.Type"));

    revtrail(&dir)
        .args(["rev", "count", "non.existent.Type"])
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn test_show_missing_revision_fails() {
    let dir = TempDir::new().unwrap();
    init_with_patient(&dir);

    revtrail(&dir)
        .args(["rev", "show", PATIENT, "1", "r7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_show_resolves_author() {
    let dir = TempDir::new().unwrap();
    init_with_patient(&dir);

    revtrail(&dir)
        .args(["user", "add", "10", "--username", "testuser"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shown as testuser"));
    record(&dir, "add", "1", r#"{"name":"Alice"}"#);

    revtrail(&dir)
        .args(["rev", "show", PATIENT, "1", "r1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Author:    testuser"))
        .stdout(predicate::str::contains("\"name\": \"Alice\""));
}

#[test]
fn test_unknown_author_shows_unknown() {
    let dir = TempDir::new().unwrap();
    init_with_patient(&dir);
    record(&dir, "add", "1", r#"{"name":"Alice"}"#);

    revtrail(&dir)
        .args(["rev", "show", PATIENT, "1", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Author:    Unknown"));
}

#[test]
fn test_diff_marks_changed_fields() {
    let dir = TempDir::new().unwrap();
    init_with_patient(&dir);
    record(&dir, "add", "1", r#"{"name":"Alice","city":"Lima"}"#);
    record(&dir, "modify", "1", r#"{"name":"Alicia","city":"Lima"}"#);

    revtrail(&dir)
        .args(["rev", "diff", PATIENT, "1", "r2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("compared with r1"))
        .stdout(predicate::str::contains("* name"))
        .stdout(predicate::str::contains("1 of 2 fields changed"))
        .stdout(predicate::str::contains("Changes: name: Alice -> Alicia"));
}

#[test]
fn test_record_rejects_invalid_json() {
    let dir = TempDir::new().unwrap();
    init_with_patient(&dir);

    revtrail(&dir)
        .args(["rev", "record", PATIENT, "1", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Snapshot is not valid JSON"));
}

#[test]
fn test_export_yaml() {
    let dir = TempDir::new().unwrap();
    init_with_patient(&dir);
    record(&dir, "add", "1", r#"{"name":"Alice"}"#);

    let output = dir.path().join("patients.yaml");
    revtrail(&dir)
        .args(["export", PATIENT, "--format", "yaml", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 revisions"));

    let contents = std::fs::read_to_string(&output).unwrap();
    assert!(contents.starts_with("# revtrail revision history export"));
    assert!(contents.contains("Alice"));
}
