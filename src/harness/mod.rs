//! The three exposed checks and their shared lifecycle.
//!
//! Every check runs the same steps: register the name and consult its
//! dependency, delete the stale result, record a fresh result, then either
//! compare it against the target or promote it when no target exists yet.
//! A failure in any step after registration marks the check as failed so
//! later dependents are skipped.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::artifact::Artifact;
use crate::cache::TabularCache;
use crate::compare::{Comparator, Tolerance, compare_fields, compare_lines};
use crate::dataset::{Dataset, Value};
use crate::recorder;
use crate::source::{Connector, table_query};
use crate::store::SnapshotStore;
use crate::tracker::{DependencyTracker, Gate};
use crate::transport::Transport;
use crate::{Result, SnapcheckError};

/// Column written by [`Harness::count_rows`].
pub const COUNT_COLUMN: &str = "COUNT(*)";
/// Column written by [`Harness::grep_and_compare`].
pub const LINE_COLUMN: &str = "LINE";

/// Non-failing end state of a check. Failures travel through `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// The result matched the target.
    Passed,
    /// No target existed; the result became the new target.
    Promoted,
    /// Not run because `dependency` failed earlier in the run.
    Skipped { dependency: String },
}

/// Columns recorded by [`Harness::select_fields`] and how they are compared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    pub fields: Vec<String>,
    pub order_by: Vec<String>,
    pub tolerance: Tolerance,
}

pub struct Harness {
    tracker: DependencyTracker,
    cache: TabularCache,
    store: SnapshotStore,
    connector: Box<dyn Connector>,
    transport: Box<dyn Transport>,
    /// Artifact file name to the check that claimed it.
    artifacts: HashMap<String, String>,
}

impl Harness {
    #[must_use]
    pub fn new(
        store: SnapshotStore,
        connector: Box<dyn Connector>,
        transport: Box<dyn Transport>,
    ) -> Self {
        Self {
            tracker: DependencyTracker::new(),
            cache: TabularCache::new(),
            store,
            connector,
            transport,
            artifacts: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn tracker(&self) -> &DependencyTracker {
        &self.tracker
    }

    #[must_use]
    pub const fn cache(&self) -> &TabularCache {
        &self.cache
    }

    #[must_use]
    pub const fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Refresh the local target directory from the transport.
    ///
    /// # Errors
    /// Propagates unrecoverable transport errors.
    pub fn pull(&self) -> Result<()> {
        self.transport.pull(self.store.target_dir())
    }

    /// Record the row count of `table` and compare it by line diff.
    ///
    /// # Errors
    /// Returns `DuplicateName` or `UnknownDependency` without recording an
    /// outcome. `DuplicateArtifact`, when `file` already belongs to another
    /// check, and any later error are recorded as a failure of `name`.
    pub fn count_rows(
        &mut self,
        name: &str,
        table: &str,
        file: &str,
        depends_on: Option<&str>,
    ) -> Result<CheckOutcome> {
        if let Some(skipped) = self.admit(name, file, depends_on)? {
            return Ok(skipped);
        }
        let outcome = self.count_steps(table, file);
        self.settle(name, outcome)
    }

    /// Record a sorted projection of `table` and compare it cell by cell.
    ///
    /// # Errors
    /// Same contract as [`Harness::count_rows`]; unknown columns surface as
    /// `UnknownColumn`.
    pub fn select_fields(
        &mut self,
        name: &str,
        table: &str,
        file: &str,
        projection: &Projection,
        depends_on: Option<&str>,
    ) -> Result<CheckOutcome> {
        if let Some(skipped) = self.admit(name, file, depends_on)? {
            return Ok(skipped);
        }
        let outcome = self.select_steps(table, file, projection);
        self.settle(name, outcome)
    }

    /// Record the lines of `input` containing `substring`, ignoring case,
    /// and compare them by line diff.
    ///
    /// # Errors
    /// Same contract as [`Harness::count_rows`]; an unreadable input is a
    /// `FileAccess` error.
    pub fn grep_and_compare(
        &mut self,
        name: &str,
        input: &Path,
        file: &str,
        substring: &str,
        depends_on: Option<&str>,
    ) -> Result<CheckOutcome> {
        if let Some(skipped) = self.admit(name, file, depends_on)? {
            return Ok(skipped);
        }
        let outcome = self.grep_steps(input, file, substring);
        self.settle(name, outcome)
    }

    /// Promote an existing result to target and publish it, regardless of
    /// whether a target already exists.
    ///
    /// # Errors
    /// Returns `MissingArtifact` if there is no result to accept.
    pub fn accept(&self, file: &str) -> Result<PathBuf> {
        let target = self.store.promote(file)?;
        self.transport.publish(file, &target)?;
        Ok(target)
    }

    fn admit(
        &mut self,
        name: &str,
        file: &str,
        depends_on: Option<&str>,
    ) -> Result<Option<CheckOutcome>> {
        self.tracker.register(name)?;
        if let Some(owner) = self.artifacts.get(file) {
            let err = SnapcheckError::DuplicateArtifact {
                file: file.to_string(),
                name: name.to_string(),
                owner: owner.clone(),
            };
            return self.settle(name, Err(err)).map(Some);
        }
        self.artifacts.insert(file.to_string(), name.to_string());
        match self.tracker.check_dependency(name, depends_on)? {
            Gate::Run => Ok(None),
            Gate::Skip { dependency } => {
                info!(check = name, %dependency, "skipped, dependency failed");
                Ok(Some(CheckOutcome::Skipped { dependency }))
            }
        }
    }

    fn settle(&mut self, name: &str, outcome: Result<CheckOutcome>) -> Result<CheckOutcome> {
        match outcome {
            Ok(outcome) => {
                info!(check = name, ?outcome, "check finished");
                Ok(outcome)
            }
            Err(e) => {
                if e.is_comparison_failure() {
                    info!(check = name, "check failed: {e}");
                } else {
                    warn!(check = name, "check failed: {e}");
                }
                self.tracker.record_failure(name);
                Err(e)
            }
        }
    }

    fn count_steps(&mut self, table: &str, file: &str) -> Result<CheckOutcome> {
        self.store.remove_result(file)?;
        let rows = load_table(&mut self.cache, self.connector.as_ref(), table)?.row_count();
        let count = i64::try_from(rows).unwrap_or(i64::MAX);
        let dataset = Dataset::single_column(table, COUNT_COLUMN, vec![Value::Int(count)]);
        recorder::record(
            &self.store,
            file,
            table,
            &dataset,
            &[COUNT_COLUMN.to_string()],
            &[],
        )?;
        self.conclude(file, Comparator::Lines)
    }

    fn select_steps(
        &mut self,
        table: &str,
        file: &str,
        projection: &Projection,
    ) -> Result<CheckOutcome> {
        self.store.remove_result(file)?;
        let dataset = load_table(&mut self.cache, self.connector.as_ref(), table)?;
        recorder::record(
            &self.store,
            file,
            table,
            dataset,
            &projection.fields,
            &projection.order_by,
        )?;
        self.conclude(file, Comparator::Fields(projection.tolerance))
    }

    fn grep_steps(&mut self, input: &Path, file: &str, substring: &str) -> Result<CheckOutcome> {
        self.store.remove_result(file)?;
        let bytes = fs::read(input).map_err(|e| SnapcheckError::FileAccess {
            path: input.to_path_buf(),
            source: e,
        })?;
        // Log extracts may hold stray bytes; those decode as U+FFFD.
        let text = String::from_utf8_lossy(&bytes);
        let needle = substring.to_lowercase();
        let lines: Vec<Value> = text
            .lines()
            .filter(|line| line.to_lowercase().contains(&needle))
            .map(Value::from)
            .collect();
        debug!(input = %input.display(), matched = lines.len(), "filtered input");

        let label = input
            .file_name()
            .map_or_else(|| input.display().to_string(), |n| n.to_string_lossy().into_owned());
        let dataset = Dataset::single_column(label.as_str(), LINE_COLUMN, lines);
        recorder::record(
            &self.store,
            file,
            &label,
            &dataset,
            &[LINE_COLUMN.to_string()],
            &[],
        )?;
        self.conclude(file, Comparator::Lines)
    }

    fn conclude(&self, file: &str, comparator: Comparator) -> Result<CheckOutcome> {
        if !self.store.target_exists(file)? {
            let target = self.store.promote(file)?;
            self.transport.publish(file, &target)?;
            return Ok(CheckOutcome::Promoted);
        }

        match comparator {
            Comparator::Lines => compare_lines(
                &self.store.read_target(file)?,
                &self.store.read_result(file)?,
                self.store.diff_path(),
            )?,
            Comparator::Fields(tolerance) => {
                let result_path = self.store.result_path(file)?;
                let target = Artifact::load(&self.store.target_path(file)?)?;
                let result = Artifact::load(&result_path)?;
                compare_fields(&target, &result, tolerance, &result_path)?;
            }
        }
        Ok(CheckOutcome::Passed)
    }
}

/// Fetch `table` through the cache, connecting only on a miss. The
/// connection is dropped before this returns.
fn load_table<'a>(
    cache: &'a mut TabularCache,
    connector: &dyn Connector,
    table: &str,
) -> Result<&'a Dataset> {
    cache.fetch(table, || {
        let mut source = connector.connect()?;
        source.execute_query(&table_query(table))
    })
}

#[cfg(test)]
#[path = "harness_tests.rs"]
mod tests;
