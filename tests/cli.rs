use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

fn cmd(logs: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("univ_report").unwrap();
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"))
        .env("LOG_FILE_PATH", logs.path().join("test.log"))
        .env_remove("UNIV_REPORT_DIR");
    cmd
}

#[test]
fn prints_both_tables() {
    let logs = TempDir::new().unwrap();
    cmd(&logs)
        .arg("tests/fixtures/university")
        .assert()
        .success()
        .stdout(contains("Student Table"))
        .stdout(contains("Instructor Table"))
        .stdout(contains("['SSW 540']"))
        .stdout(contains("Completed Courses"));
}

#[test]
fn json_format() {
    let logs = TempDir::new().unwrap();
    let out = cmd(&logs)
        .args(["tests/fixtures/university", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&out).expect("valid json output");
    assert_eq!(value["students"].as_array().unwrap().len(), 5);
    assert_eq!(value["diagnostics"].as_array().unwrap().len(), 2);
}

#[test]
fn missing_file_prints_message_and_no_tables() {
    let logs = TempDir::new().unwrap();
    let empty = TempDir::new().unwrap();
    cmd(&logs)
        .arg(empty.path())
        .assert()
        .success()
        .stdout(contains("students.txt"))
        .stdout(contains("Student Table").not());
}

#[test]
fn malformed_line_prints_message_and_no_tables() {
    let logs = TempDir::new().unwrap();
    cmd(&logs)
        .arg("tests/fixtures/malformed")
        .assert()
        .success()
        .stdout(contains("on line 2 but expected 3"))
        .stdout(contains("Instructor Table").not());
}

#[test]
fn no_tables_with_csv_export() {
    let logs = TempDir::new().unwrap();
    let export = TempDir::new().unwrap();
    cmd(&logs)
        .arg("tests/fixtures/university")
        .arg("--no-tables")
        .arg("--csv-dir")
        .arg(export.path())
        .assert()
        .success()
        .stdout(contains("Student Table").not());

    let students = std::fs::read_to_string(export.path().join("student_summary.csv")).unwrap();
    assert!(students.starts_with("CWID,Name,Completed Courses"));
    assert!(export.path().join("instructor_summary.csv").exists());
}
