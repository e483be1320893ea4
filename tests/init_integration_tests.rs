//! Integration tests for the `init` command.

mod common;

use common::TestFixture;
use predicates::prelude::*;

#[test]
fn init_creates_default_config_file() {
    let fixture = TestFixture::new();

    snapcheck!()
        .current_dir(fixture.path())
        .args(["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    let content = fixture.read(&fixture.path().join(".snapcheck.toml"));
    assert!(content.contains("[[check]]"));
    assert!(content.contains("target_dir"));
}

#[test]
fn init_creates_config_at_custom_path() {
    let fixture = TestFixture::new();
    let custom_path = fixture.path().join("custom-config.toml");

    snapcheck!()
        .current_dir(fixture.path())
        .args(["init", "--output", custom_path.to_str().unwrap()])
        .assert()
        .success();

    assert!(custom_path.exists());
}

#[test]
fn init_fails_if_config_exists() {
    let fixture = TestFixture::new();
    fixture.create_file(".snapcheck.toml", "# existing config\n");

    snapcheck!()
        .current_dir(fixture.path())
        .args(["init"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(
        fixture.read(&fixture.path().join(".snapcheck.toml")),
        "# existing config\n"
    );
}

#[test]
fn init_force_overwrites() {
    let fixture = TestFixture::new();
    fixture.create_file(".snapcheck.toml", "# existing config\n");

    snapcheck!()
        .current_dir(fixture.path())
        .args(["init", "--force"])
        .assert()
        .success();

    assert!(
        fixture
            .read(&fixture.path().join(".snapcheck.toml"))
            .contains("[source]")
    );
}

#[test]
fn generated_config_lists_its_check() {
    let fixture = TestFixture::new();
    snapcheck!().current_dir(fixture.path()).arg("init").assert().success();

    snapcheck!()
        .current_dir(fixture.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("arrival_count  count   arrival_count.txt"));
}
