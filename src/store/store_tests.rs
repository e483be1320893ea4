use std::fs;

use tempfile::TempDir;

use super::*;

fn store(dir: &TempDir) -> SnapshotStore {
    SnapshotStore::new(
        dir.path().join("target"),
        dir.path().join("result"),
        dir.path().join("diff.txt"),
    )
}

#[test]
fn paths_are_joined_under_their_directories() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);

    assert_eq!(
        store.target_path("a.txt").unwrap(),
        dir.path().join("target").join("a.txt")
    );
    assert_eq!(
        store.result_path("b.txt").unwrap(),
        dir.path().join("result").join("b.txt")
    );
}

#[test]
fn non_plain_names_are_rejected() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);

    for bad in [
        "",
        "../x.txt",
        "/etc/passwd",
        "a/../../b",
        "nested/x.txt",
        "x.txt/",
        ".hidden.txt",
        "./x.txt",
    ] {
        assert!(
            matches!(store.target_path(bad), Err(SnapcheckError::Config(_))),
            "accepted {bad:?}"
        );
    }
}

#[test]
fn write_result_creates_result_dir() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);

    let path = store.write_result("x.txt", "hello\n").unwrap();
    assert_eq!(fs::read_to_string(path).unwrap(), "hello\n");
    assert_eq!(store.read_result("x.txt").unwrap(), "hello\n");
}

#[test]
fn artifact_names_are_single_file_names() {
    check_artifact_name("arrival_count.txt").unwrap();
    check_artifact_name("values.v2.txt").unwrap();
    assert!(matches!(
        check_artifact_name("reports/values.txt"),
        Err(SnapcheckError::Config(ref msg)) if msg.contains("reports/values.txt")
    ));
}

#[test]
fn remove_result_tolerates_missing_file() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);

    store.remove_result("x.txt").unwrap();
    store.write_result("x.txt", "1").unwrap();
    store.remove_result("x.txt").unwrap();
    assert!(!store.result_path("x.txt").unwrap().exists());
}

#[test]
fn remove_result_never_touches_target() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    store.write_result("x.txt", "1").unwrap();
    store.promote("x.txt").unwrap();

    store.remove_result("x.txt").unwrap();
    assert!(store.target_exists("x.txt").unwrap());
}

#[test]
fn promote_copies_result_to_target() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    assert!(!store.target_exists("x.txt").unwrap());

    store.write_result("x.txt", "label\n1 | A: 1\n").unwrap();
    let target = store.promote("x.txt").unwrap();

    assert!(store.target_exists("x.txt").unwrap());
    assert_eq!(fs::read_to_string(target).unwrap(), "label\n1 | A: 1\n");
    assert!(store.result_path("x.txt").unwrap().exists());
}

#[test]
fn promote_without_result_is_missing_artifact() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);

    assert!(matches!(
        store.promote("x.txt"),
        Err(SnapcheckError::MissingArtifact { .. })
    ));
    assert!(!store.target_exists("x.txt").unwrap());
}

#[test]
fn read_target_missing_is_missing_artifact() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    assert!(matches!(
        store.read_target("x.txt"),
        Err(SnapcheckError::MissingArtifact { .. })
    ));
}

// =============================================================================
// Atomic Write Tests
// =============================================================================

#[test]
fn atomic_write_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a").join("b").join("c.txt");

    atomic_write(&path, b"nested").unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"nested");
}

#[test]
fn atomic_write_overwrites_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("c.txt");
    fs::write(&path, "old").unwrap();

    atomic_write(&path, b"new").unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"new");
}

#[test]
fn atomic_write_cleans_up_temp_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("c.txt");

    atomic_write(&path, b"content").unwrap();

    let entries: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(std::result::Result::ok)
        .collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].file_name(), "c.txt");
}
