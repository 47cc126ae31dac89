//! End-to-end tests for the runmany binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn runmany() -> Command {
    Command::cargo_bin("runmany").unwrap()
}

#[test]
fn test_help_lists_arguments() {
    runmany()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("<input-file>"))
        .stdout(predicate::str::contains("--settings"))
        .stdout(predicate::str::contains("--outfile"));
}

#[test]
fn test_missing_input_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    runmany()
        .arg(temp_dir.path().join("missing.many"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read input file"));
}

#[test]
fn test_missing_settings_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("doc.many");
    fs::write(&input, "").unwrap();
    runmany()
        .arg(&input)
        .arg("--settings")
        .arg(temp_dir.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read settings file"));
}

#[test]
fn test_empty_document_prints_footer() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("empty.many");
    fs::write(&input, "Nothing to run here.\n").unwrap();
    runmany()
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("0/0 programs successfully run!"))
        .stdout(predicate::str::contains("0/0 had the exact same stdout!"));
}

#[cfg(unix)]
#[test]
fn test_runs_document_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("hello.many");
    fs::write(&input, "Print: hello\nAlso: hello\n").unwrap();
    runmany()
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Print"))
        .stdout(predicate::str::contains("2. Print"))
        .stdout(predicate::str::contains(" output from line 1 "))
        .stdout(predicate::str::contains("2/2 programs successfully run!"))
        .stdout(predicate::str::contains("2/2 had the exact same stdout!"));
}

#[cfg(unix)]
#[test]
fn test_failed_runs_do_not_fail_the_binary() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("fail.many");
    let settings = temp_dir.path().join("settings.json");
    fs::write(&input, "Fail: anything\n").unwrap();
    fs::write(
        &settings,
        r#"{"languages": [{"name": "Fail", "command": "sh -c 'exit 4'"}]}"#,
    )
    .unwrap();
    runmany()
        .arg(&input)
        .arg("-s")
        .arg(&settings)
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Fail [exit code 4]"))
        .stdout(predicate::str::contains(
            "0/1 program successfully run. 1 failed due to non-zero exit code or timeout.",
        ));
}

#[cfg(unix)]
#[test]
fn test_outfile_receives_report() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("hello.many");
    let output = temp_dir.path().join("out.txt");
    fs::write(&input, "Print: hi\n").unwrap();
    runmany()
        .arg(&input)
        .arg("--outfile")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    let report = fs::read_to_string(&output).unwrap();
    assert!(report.contains("1. Print"));
    assert!(report.contains("\nhi\n"));
}

#[cfg(unix)]
#[test]
fn test_settings_file_overrides_embedded_settings() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("doc.many");
    let settings = temp_dir.path().join("settings.json");
    fs::write(&input, "Settings: {\"show_stats\": false}\nPrint: hi\n").unwrap();
    fs::write(&settings, r#"{"show_equal": false}"#).unwrap();
    runmany()
        .arg(&input)
        .arg("--settings")
        .arg(&settings)
        .assert()
        .success()
        .stdout(predicate::str::contains("1/1 program successfully run!"))
        .stdout(predicate::str::contains("exact same stdout").not());
}

#[test]
fn test_errors_go_to_stderr() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("doc.many");
    fs::write(&input, "Brainfork: +\n").unwrap();
    runmany()
        .arg(&input)
        .assert()
        .success()
        .stderr(predicate::str::contains("%%% RunMany Error: Language \"Brainfork\""))
        .stderr(predicate::str::contains(
            "on line 1 not found in settings. Skipping language. %%%",
        ))
        .stdout(predicate::str::contains("0/0 programs successfully run!"));
}
