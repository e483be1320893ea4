use tempfile::TempDir;

use super::*;

#[test]
fn pull_copies_new_and_changed_files() {
    let mirror = TempDir::new().unwrap();
    let local = TempDir::new().unwrap();
    fs::write(mirror.path().join("a.txt"), "shared a").unwrap();
    fs::create_dir(mirror.path().join("nested")).unwrap();
    fs::write(mirror.path().join("nested/b.txt"), "shared b").unwrap();
    fs::write(local.path().join("a.txt"), "stale a").unwrap();

    MirrorTransport::new(mirror.path()).pull(local.path()).unwrap();

    assert_eq!(fs::read_to_string(local.path().join("a.txt")).unwrap(), "shared a");
    assert_eq!(
        fs::read_to_string(local.path().join("nested/b.txt")).unwrap(),
        "shared b"
    );
}

#[test]
fn pull_keeps_local_only_files() {
    let mirror = TempDir::new().unwrap();
    let local = TempDir::new().unwrap();
    fs::write(local.path().join("mine.txt"), "local").unwrap();

    MirrorTransport::new(mirror.path()).pull(local.path()).unwrap();

    assert_eq!(fs::read_to_string(local.path().join("mine.txt")).unwrap(), "local");
}

#[test]
fn pull_from_missing_mirror_starts_from_zero() {
    let local = TempDir::new().unwrap();
    let transport = MirrorTransport::new(local.path().join("nowhere"));
    transport.pull(local.path()).unwrap();
    assert_eq!(fs::read_dir(local.path()).unwrap().count(), 0);
}

#[test]
fn publish_writes_into_mirror() {
    let mirror = TempDir::new().unwrap();
    let local = TempDir::new().unwrap();
    let target = local.path().join("count.txt");
    fs::write(&target, "count\n1 | COUNT(*): 42\n").unwrap();

    MirrorTransport::new(mirror.path())
        .publish("count.txt", &target)
        .unwrap();

    assert_eq!(
        fs::read_to_string(mirror.path().join("count.txt")).unwrap(),
        "count\n1 | COUNT(*): 42\n"
    );
}

#[test]
fn publish_missing_local_file_is_transport_error() {
    let mirror = TempDir::new().unwrap();
    let err = MirrorTransport::new(mirror.path())
        .publish("x.txt", &mirror.path().join("absent.txt"))
        .unwrap_err();
    assert!(matches!(err, SnapcheckError::Transport(_)));
}

#[test]
fn pull_skips_hidden_entries() {
    let mirror = TempDir::new().unwrap();
    let local = TempDir::new().unwrap();
    fs::write(mirror.path().join(".a.txt.123.tmp"), "partial").unwrap();
    fs::create_dir(mirror.path().join(".git")).unwrap();
    fs::write(mirror.path().join(".git/HEAD"), "ref").unwrap();
    fs::write(mirror.path().join("a.txt"), "shared a").unwrap();

    MirrorTransport::new(mirror.path()).pull(local.path()).unwrap();

    let names: Vec<_> = fs::read_dir(local.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.txt".to_string()]);
}

#[test]
fn pull_from_hidden_mirror_directory() {
    let root = TempDir::new().unwrap();
    let mirror = root.path().join(".mirror");
    fs::create_dir(&mirror).unwrap();
    fs::write(mirror.join("a.txt"), "shared a").unwrap();
    let local = root.path().join("target");

    MirrorTransport::new(&mirror).pull(&local).unwrap();

    assert_eq!(fs::read_to_string(local.join("a.txt")).unwrap(), "shared a");
}

#[test]
fn listing_is_sorted_and_relative() {
    let mirror = TempDir::new().unwrap();
    fs::write(mirror.path().join("b.txt"), "b").unwrap();
    fs::create_dir(mirror.path().join("sub")).unwrap();
    fs::write(mirror.path().join("sub/c.txt"), "c").unwrap();
    fs::write(mirror.path().join("a.txt"), "a").unwrap();

    assert_eq!(
        list_files(mirror.path()).unwrap(),
        vec![
            PathBuf::from("a.txt"),
            PathBuf::from("b.txt"),
            PathBuf::from("sub/c.txt"),
        ]
    );
}
