#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Creates an `assert_cmd` Command for the snapcheck binary.
#[macro_export]
macro_rules! snapcheck {
    () => {
        assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("snapcheck"))
    };
}

/// Config header pointing the fixture source at `fixtures/`.
pub const FIXTURE_SOURCE: &str = "[source]\nkind = \"fixtures\"\ndir = \"fixtures\"\n";

/// A temporary project directory with a config, fixture tables and logs.
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Creates a file with the given content in the temp directory.
    pub fn create_file(&self, relative_path: &str, content: &str) {
        let path = self.dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `.snapcheck.toml` with the fixture source and `checks`.
    pub fn create_config(&self, checks: &str) {
        self.create_file(".snapcheck.toml", &format!("{FIXTURE_SOURCE}{checks}"));
    }

    /// Writes `fixtures/<name>.json`.
    pub fn create_table(&self, name: &str, json: &str) {
        self.create_file(&format!("fixtures/{name}.json"), json);
    }

    /// A table with a single `ID` column holding `1..=rows`.
    pub fn create_id_table(&self, name: &str, rows: usize) {
        let ids: Vec<String> = (1..=rows).map(|i| i.to_string()).collect();
        self.create_table(name, &format!("{{\"ID\": [{}]}}", ids.join(", ")));
    }

    pub fn target(&self, file: &str) -> PathBuf {
        self.path().join("snapshots/target").join(file)
    }

    pub fn result(&self, file: &str) -> PathBuf {
        self.path().join("snapshots/result").join(file)
    }

    pub fn read(&self, path: &Path) -> String {
        fs::read_to_string(path).expect("Failed to read file")
    }
}
