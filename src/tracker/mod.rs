//! Run-scoped registry of test outcomes.
//!
//! Every check registers its name before doing any work. A registered test is
//! optimistically recorded as passed and flipped to failed only by an explicit
//! failure record, so dependents see a failure even when it surfaces deep
//! inside the check.

use indexmap::IndexMap;
use tracing::debug;

use crate::{Result, SnapcheckError};

/// Outcome of one registered test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub name: String,
    pub passed: bool,
}

/// Decision returned by [`DependencyTracker::check_dependency`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// Run the check.
    Run,
    /// Do not run the check; `dependency` failed earlier in the run.
    Skip { dependency: String },
}

#[derive(Debug, Default)]
pub struct DependencyTracker {
    outcomes: IndexMap<String, bool>,
}

impl DependencyTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a test name for this run.
    ///
    /// # Errors
    /// Returns `DuplicateName` if the name was already registered.
    pub fn register(&mut self, name: &str) -> Result<()> {
        if self.outcomes.contains_key(name) {
            return Err(SnapcheckError::DuplicateName(name.to_string()));
        }
        debug!(test = name, "registered");
        self.outcomes.insert(name.to_string(), true);
        Ok(())
    }

    /// Decide whether `name` may run given its declared dependency.
    ///
    /// # Errors
    /// Returns `UnknownDependency` if `depends_on` was never registered.
    pub fn check_dependency(&self, name: &str, depends_on: Option<&str>) -> Result<Gate> {
        let Some(dependency) = depends_on.filter(|d| !d.is_empty()) else {
            return Ok(Gate::Run);
        };
        match self.outcomes.get(dependency) {
            None => Err(SnapcheckError::UnknownDependency {
                name: name.to_string(),
                dependency: dependency.to_string(),
            }),
            Some(true) => Ok(Gate::Run),
            Some(false) => Ok(Gate::Skip {
                dependency: dependency.to_string(),
            }),
        }
    }

    /// Record the outcome of a registered test.
    ///
    /// Recording against an unregistered name registers it.
    pub fn record_outcome(&mut self, name: &str, passed: bool) {
        debug!(test = name, passed, "outcome recorded");
        self.outcomes.insert(name.to_string(), passed);
    }

    pub fn record_failure(&mut self, name: &str) {
        self.record_outcome(name, false);
    }

    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<TestOutcome> {
        self.outcomes.get(name).map(|&passed| TestOutcome {
            name: name.to_string(),
            passed,
        })
    }

    /// Names of failed tests, in registration order.
    pub fn failed(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|(_, passed)| !**passed)
            .map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
