use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use super::*;
use crate::config::SourceConfig;

fn config(dir: &TempDir, checks: &str) -> Config {
    let text = format!("[source]\nkind = \"fixtures\"\ndir = \"fixtures\"\n{checks}");
    let config: Config = toml::from_str(&text).unwrap();
    config.rebase(dir.path())
}

const CHECKS: &str = r#"
[[check]]
name = "count"
kind = "count"
table = "t"
file = "count.txt"

[[check]]
name = "values"
kind = "select"
table = "t"
file = "values.txt"
fields = ["VAL"]
order_by = ["ID"]
depends_on = "count"
"#;

fn fixture(dir: &TempDir, json: &str) {
    fs::create_dir_all(dir.path().join("fixtures")).unwrap();
    fs::write(dir.path().join("fixtures/t.json"), json).unwrap();
}

#[test]
fn select_checks_keeps_config_order() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, CHECKS);

    let all = select_checks(&config, &[]).unwrap();
    assert_eq!(all.len(), 2);

    let only = select_checks(&config, &["values".to_string()]).unwrap();
    assert_eq!(only.len(), 1);
    assert_eq!(only[0].name, "values");
}

#[test]
fn select_checks_rejects_unknown_name() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, CHECKS);
    assert!(matches!(
        select_checks(&config, &["ghost".to_string()]),
        Err(SnapcheckError::Config(ref msg)) if msg.contains("ghost")
    ));
}

#[test]
fn run_checks_reports_promotions_then_passes() {
    let dir = TempDir::new().unwrap();
    fixture(&dir, r#"{"ID": [2, 1], "VAL": [0.5, 1.5]}"#);
    let config = config(&dir, CHECKS);
    let checks = select_checks(&config, &[]).unwrap();

    let first = run_checks(&mut build_harness(&config), &checks);
    assert!(first.iter().all(|r| r.status == CheckStatus::Promoted));

    let second = run_checks(&mut build_harness(&config), &checks);
    assert!(second.iter().all(|r| r.status == CheckStatus::Passed));
}

#[test]
fn failed_dependency_skips_dependent() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, CHECKS);
    let checks = select_checks(&config, &[]).unwrap();

    let reports = run_checks(&mut build_harness(&config), &checks);
    assert_eq!(reports[0].status, CheckStatus::Failed);
    assert_eq!(reports[1].status, CheckStatus::Skipped);
}

#[test]
fn unselected_dependency_is_ignored() {
    let dir = TempDir::new().unwrap();
    fixture(&dir, r#"{"ID": [1], "VAL": [1.0]}"#);
    let config = config(&dir, CHECKS);
    let checks = select_checks(&config, &["values".to_string()]).unwrap();

    let reports = run_checks(&mut build_harness(&config), &checks);
    assert_eq!(reports[0].status, CheckStatus::Promoted);
}

#[test]
fn grep_check_dispatches_with_input() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("app.log"), "ok\nERROR x\n").unwrap();
    let config = config(
        &dir,
        "[[check]]\nname = \"g\"\nkind = \"grep\"\nfile = \"g.txt\"\ninput = \"app.log\"\nsubstring = \"error\"\n",
    );
    assert_eq!(
        config.source,
        SourceConfig::Fixtures {
            dir: dir.path().join("fixtures")
        }
    );

    let mut harness = build_harness(&config);
    let outcome = run_check(&mut harness, &config.checks[0], None).unwrap();
    assert_eq!(outcome, CheckOutcome::Promoted);
    assert!(
        PathBuf::from(dir.path())
            .join("snapshots/target/g.txt")
            .is_file()
    );
}
