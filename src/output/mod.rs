mod json;
mod text;

pub use json::JsonFormatter;
pub use text::{ColorMode, TextFormatter};

use serde::Serialize;

use crate::config::CheckKind;
use crate::error::Result;
use crate::harness::CheckOutcome;

/// Final state of one check in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Passed,
    Promoted,
    Skipped,
    Failed,
}

impl CheckStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Passed => "PASSED",
            Self::Promoted => "PROMOTED",
            Self::Skipped => "SKIPPED",
            Self::Failed => "FAILED",
        }
    }
}

/// What a formatter shows for one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub name: String,
    pub kind: CheckKind,
    pub status: CheckStatus,
    /// Failure message, or the failed dependency of a skipped check.
    pub detail: Option<String>,
}

impl CheckReport {
    #[must_use]
    pub fn from_result(name: &str, kind: CheckKind, result: &Result<CheckOutcome>) -> Self {
        let (status, detail) = match result {
            Ok(CheckOutcome::Passed) => (CheckStatus::Passed, None),
            Ok(CheckOutcome::Promoted) => (CheckStatus::Promoted, None),
            Ok(CheckOutcome::Skipped { dependency }) => (
                CheckStatus::Skipped,
                Some(format!("dependency '{dependency}' failed")),
            ),
            Err(e) => (CheckStatus::Failed, Some(e.to_string())),
        };
        Self {
            name: name.to_string(),
            kind,
            status,
            detail,
        }
    }
}

/// Per-status counts over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub promoted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Summary {
    #[must_use]
    pub fn of(reports: &[CheckReport]) -> Self {
        reports.iter().fold(
            Self {
                total: reports.len(),
                ..Self::default()
            },
            |mut s, r| {
                match r.status {
                    CheckStatus::Passed => s.passed += 1,
                    CheckStatus::Promoted => s.promoted += 1,
                    CheckStatus::Skipped => s.skipped += 1,
                    CheckStatus::Failed => s.failed += 1,
                }
                s
            },
        )
    }
}

/// Trait for formatting run reports into various output formats.
pub trait OutputFormatter {
    /// # Errors
    /// Returns an error if the formatting fails.
    fn format(&self, reports: &[CheckReport]) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
