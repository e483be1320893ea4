use std::path::PathBuf;

use thiserror::Error;

/// Which side of a comparison an artifact came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Target,
    Result,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Target => write!(f, "target"),
            Self::Result => write!(f, "result"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SnapcheckError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to access file: {path}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Test name '{0}' is already registered in this run")]
    DuplicateName(String),

    #[error("Test '{name}' writes artifact '{file}', already claimed by '{owner}'")]
    DuplicateArtifact {
        file: String,
        name: String,
        owner: String,
    },

    #[error("Test '{name}' depends on '{dependency}', which has not run yet")]
    UnknownDependency { name: String, dependency: String },

    #[error("Unknown column '{column}' in dataset '{dataset}'")]
    UnknownColumn { column: String, dataset: String },

    #[error("Dataset '{dataset}' has ragged columns: '{column}' has {actual} values, expected {expected}")]
    RaggedDataset {
        dataset: String,
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Query failed ({query}): {source}")]
    Query {
        query: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{missing} is missing a row: {present} row '{row}' has no counterpart")]
    RowCountMismatch {
        missing: Side,
        present: Side,
        row: String,
    },

    #[error("Row {row} changed shape: target '{target}', result '{result}'")]
    RowShapeChanged {
        row: usize,
        target: String,
        result: String,
    },

    #[error("Row {row}, column {column}: type changed from {target} to {result}")]
    TypeMismatch {
        row: usize,
        column: String,
        target: String,
        result: String,
    },

    #[error("Row {row}, column {column}: target {target} != result {result} (in {artifact})")]
    ValueMismatch {
        row: usize,
        column: String,
        target: String,
        result: String,
        artifact: PathBuf,
    },

    #[error("Result differs from target:\n{0}")]
    DiffMismatch(String),

    #[error("Artifact not readable: {path}")]
    MissingArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed artifact {path} at line {line}: {reason}")]
    MalformedArtifact {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Transport error: {0}")]
    Transport(String),
}

impl SnapcheckError {
    /// Wraps any data source failure, keeping the original error as the source.
    pub fn query(
        query: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Query {
            query: query.into(),
            source: source.into(),
        }
    }

    /// Returns true for failures raised by a comparator.
    #[must_use]
    pub const fn is_comparison_failure(&self) -> bool {
        matches!(
            self,
            Self::RowCountMismatch { .. }
                | Self::RowShapeChanged { .. }
                | Self::TypeMismatch { .. }
                | Self::ValueMismatch { .. }
                | Self::DiffMismatch(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SnapcheckError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
