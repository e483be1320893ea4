//! Integration tests for the `run` command.

mod common;

use common::TestFixture;
use predicates::prelude::*;

const COUNT_AND_VALUES: &str = r#"
[[check]]
name = "arrival_count"
kind = "count"
table = "arrival"
file = "arrival_count.txt"

[[check]]
name = "arrival_values"
kind = "select"
table = "arrival"
file = "arrival_values.txt"
fields = ["VAL"]
order_by = ["ID"]
tolerance = 0.05
depends_on = "arrival_count"
"#;

// =============================================================================
// Bootstrap and Pass
// =============================================================================

#[test]
fn first_run_promotes_then_second_run_passes() {
    let fixture = TestFixture::new();
    fixture.create_config(COUNT_AND_VALUES);
    fixture.create_table("arrival", r#"{"ID": [2, 1], "VAL": [3.0, 1.5]}"#);

    snapcheck!()
        .current_dir(fixture.path())
        .args(["run", "--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PROMOTED: arrival_count (count)"))
        .stdout(predicate::str::contains("0 passed, 2 promoted, 0 skipped, 0 failed"));

    assert_eq!(
        fixture.read(&fixture.target("arrival_count.txt")),
        "arrival\n1 | COUNT(*): 2\n"
    );
    assert_eq!(
        fixture.read(&fixture.target("arrival_values.txt")),
        "arrival\n1 | VAL: 1.5\n2 | VAL: 3.0\n"
    );

    snapcheck!()
        .current_dir(fixture.path())
        .args(["run", "--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 passed, 0 promoted, 0 skipped, 0 failed"));
}

#[test]
fn values_within_tolerance_pass() {
    let fixture = TestFixture::new();
    fixture.create_config(COUNT_AND_VALUES);
    fixture.create_table("arrival", r#"{"ID": [7], "VAL": [3.0]}"#);
    snapcheck!().current_dir(fixture.path()).arg("run").assert().success();

    fixture.create_table("arrival", r#"{"ID": [7], "VAL": [3.1]}"#);
    snapcheck!()
        .current_dir(fixture.path())
        .args(["run", "--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 passed"));
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn changed_count_fails_and_skips_dependent() {
    let fixture = TestFixture::new();
    fixture.create_config(COUNT_AND_VALUES);
    fixture.create_table("arrival", r#"{"ID": [1, 2], "VAL": [1.0, 2.0]}"#);
    snapcheck!().current_dir(fixture.path()).arg("run").assert().success();

    fixture.create_table("arrival", r#"{"ID": [1], "VAL": [1.0]}"#);
    snapcheck!()
        .current_dir(fixture.path())
        .args(["run", "--color", "never"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAILED: arrival_count (count)"))
        .stdout(predicate::str::contains("< 1 | COUNT(*): 2"))
        .stdout(predicate::str::contains("SKIPPED: arrival_values (select)"))
        .stdout(predicate::str::contains("dependency 'arrival_count' failed"));

    // Target untouched, result kept for inspection.
    assert!(fixture.read(&fixture.target("arrival_count.txt")).contains("COUNT(*): 2"));
    assert!(fixture.read(&fixture.result("arrival_count.txt")).contains("COUNT(*): 1"));
    assert!(fixture.path().join("snapshots/diff.txt").is_file());
}

#[test]
fn value_outside_tolerance_names_both_values() {
    let fixture = TestFixture::new();
    fixture.create_config(COUNT_AND_VALUES);
    fixture.create_table("arrival", r#"{"ID": [7], "VAL": [3.0]}"#);
    snapcheck!().current_dir(fixture.path()).arg("run").assert().success();

    fixture.create_table("arrival", r#"{"ID": [7], "VAL": [3.5]}"#);
    snapcheck!()
        .current_dir(fixture.path())
        .args(["run", "--color", "never"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("target 3.0 != result 3.5"));
}

#[test]
fn missing_table_fails_check_not_run() {
    let fixture = TestFixture::new();
    fixture.create_config(COUNT_AND_VALUES);

    snapcheck!()
        .current_dir(fixture.path())
        .args(["run", "--color", "never"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Query failed"))
        .stdout(predicate::str::contains("0 passed, 0 promoted, 1 skipped, 1 failed"));
}

// =============================================================================
// Grep
// =============================================================================

#[test]
fn grep_check_records_matching_lines() {
    let fixture = TestFixture::new();
    fixture.create_config(
        r#"
[[check]]
name = "errors"
kind = "grep"
input = "logs/app.log"
file = "errors.txt"
substring = "error"
"#,
    );
    fixture.create_file("logs/app.log", "start\nERROR: disk\nok\nanother Error\n");

    snapcheck!().current_dir(fixture.path()).arg("run").assert().success();
    assert_eq!(
        fixture.read(&fixture.target("errors.txt")),
        "app.log\n1 | LINE: 'ERROR: disk'\n2 | LINE: 'another Error'\n"
    );

    fixture.create_file("logs/app.log", "start\nERROR: disk\n");
    snapcheck!()
        .current_dir(fixture.path())
        .args(["run", "--color", "never"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("< 2 | LINE: 'another Error'"));
}

// =============================================================================
// Options
// =============================================================================

#[test]
fn only_runs_selected_checks() {
    let fixture = TestFixture::new();
    fixture.create_config(COUNT_AND_VALUES);
    fixture.create_table("arrival", r#"{"ID": [1], "VAL": [1.0]}"#);

    snapcheck!()
        .current_dir(fixture.path())
        .args(["run", "--only", "arrival_values", "--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains("arrival_values"))
        .stdout(predicate::str::contains("arrival_count").not());

    assert!(!fixture.target("arrival_count.txt").exists());
}

#[test]
fn only_with_unknown_name_is_config_error() {
    let fixture = TestFixture::new();
    fixture.create_config(COUNT_AND_VALUES);

    snapcheck!()
        .current_dir(fixture.path())
        .args(["run", "--only", "ghost"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown check 'ghost'"));
}

#[test]
fn json_report_written_to_file() {
    let fixture = TestFixture::new();
    fixture.create_config(COUNT_AND_VALUES);
    fixture.create_table("arrival", r#"{"ID": [1], "VAL": [1.0]}"#);
    let report = fixture.path().join("out/report.json");

    snapcheck!()
        .current_dir(fixture.path())
        .args(["run", "--format", "json", "--output", report.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let parsed: serde_json::Value = serde_json::from_str(&fixture.read(&report)).unwrap();
    assert_eq!(parsed["summary"]["promoted"], 2);
    assert_eq!(parsed["checks"][1]["name"], "arrival_values");
}

#[test]
fn explicit_config_path_resolves_relative_to_file() {
    let fixture = TestFixture::new();
    fixture.create_file(
        "conf/ci.toml",
        &format!(
            "{}\n[[check]]\nname = \"c\"\nkind = \"count\"\ntable = \"t\"\nfile = \"c.txt\"\n",
            common::FIXTURE_SOURCE
        ),
    );
    fixture.create_file("conf/fixtures/t.json", r#"{"ID": [1, 2, 3]}"#);

    snapcheck!()
        .current_dir(fixture.path())
        .args(["--config", "conf/ci.toml", "run"])
        .assert()
        .success();

    assert!(fixture.path().join("conf/snapshots/target/c.txt").is_file());
}

#[test]
fn invalid_config_is_config_error() {
    let fixture = TestFixture::new();
    fixture.create_config("[[check]]\nname = \"a\"\nkind = \"count\"\nfile = \"a.txt\"\n");

    snapcheck!()
        .current_dir(fixture.path())
        .arg("run")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("require 'table'"));
}

#[test]
fn shared_artifact_file_is_config_error() {
    let fixture = TestFixture::new();
    fixture.create_config(
        r#"
[[check]]
name = "ca"
kind = "count"
table = "a"
file = "same.txt"

[[check]]
name = "cb"
kind = "count"
table = "b"
file = "same.txt"
"#,
    );

    snapcheck!()
        .current_dir(fixture.path())
        .arg("run")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already written by check 'ca'"));
    assert!(!fixture.target("same.txt").exists());
}

#[test]
fn mirror_transport_shares_targets() {
    let fixture = TestFixture::new();
    fixture.create_config(
        r#"
[transport]
kind = "mirror"
dir = "shared"

[[check]]
name = "c"
kind = "count"
table = "t"
file = "c.txt"
"#,
    );
    fixture.create_id_table("t", 3);

    snapcheck!().current_dir(fixture.path()).arg("run").assert().success();
    assert_eq!(
        fixture.read(&fixture.path().join("shared/c.txt")),
        "t\n1 | COUNT(*): 3\n"
    );

    // A fresh checkout pulls the shared target and compares against it.
    std::fs::remove_dir_all(fixture.path().join("snapshots")).unwrap();
    fixture.create_id_table("t", 4);
    snapcheck!()
        .current_dir(fixture.path())
        .arg("run")
        .assert()
        .code(1);
}
