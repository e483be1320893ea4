use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;

use crate::dataset::{Dataset, Value};
use crate::{Result, SnapcheckError};

use super::{Connector, DataSource};

/// Opens [`FixtureSource`]s over a directory of JSON tables.
#[derive(Debug, Clone)]
pub struct FixtureConnector {
    dir: PathBuf,
}

impl FixtureConnector {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Connector for FixtureConnector {
    fn connect(&self) -> Result<Box<dyn DataSource>> {
        Ok(Box::new(FixtureSource::new(&self.dir)))
    }
}

/// Serves `SELECT * FROM <table>` from `<dir>/<table>.json`.
///
/// Each file is a JSON object mapping column names to arrays of scalars:
///
/// ```json
/// { "ID": [7, 8], "VAL": [3.0, null], "NAME": ["a", "b"] }
/// ```
#[derive(Debug)]
pub struct FixtureSource {
    dir: PathBuf,
    table_pattern: Regex,
}

impl FixtureSource {
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            table_pattern: Regex::new(
                r"(?i)^\s*select\s+\*\s+from\s+([a-z_][a-z0-9_.]*)\s*;?\s*$",
            )
            .expect("Invalid regex"),
        }
    }
}

impl DataSource for FixtureSource {
    fn execute_query(&mut self, sql: &str) -> Result<Dataset> {
        let Some(table) = self
            .table_pattern
            .captures(sql)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
        else {
            return Err(SnapcheckError::query(
                sql,
                "fixture sources only support SELECT * FROM <table>",
            ));
        };

        let path = self.dir.join(format!("{table}.json"));
        debug!(table, path = %path.display(), "loading fixture table");
        let text = fs::read_to_string(&path).map_err(|e| SnapcheckError::query(sql, e))?;
        let columns: IndexMap<String, Vec<Value>> =
            serde_json::from_str(&text).map_err(|e| SnapcheckError::query(sql, e))?;
        Dataset::new(table, columns)
    }
}

#[cfg(test)]
#[path = "fixture_tests.rs"]
mod tests;
