use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compare::Tolerance;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub transport: TransportConfig,

    /// Checks in execution order [[check]].
    #[serde(default, rename = "check")]
    pub checks: Vec<CheckConfig>,
}

impl Config {
    /// Make every relative path absolute against `base`, the directory of
    /// the config file.
    #[must_use]
    pub fn rebase(mut self, base: &Path) -> Self {
        let join = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        join(&mut self.paths.target_dir);
        join(&mut self.paths.result_dir);
        join(&mut self.paths.diff_file);
        if let SourceConfig::Fixtures { dir } = &mut self.source {
            join(dir);
        }
        if let TransportConfig::Mirror { dir } = &mut self.transport {
            join(dir);
        }
        for check in &mut self.checks {
            if let Some(input) = &mut check.input {
                join(input);
            }
        }
        self
    }

    #[must_use]
    pub fn check(&self, name: &str) -> Option<&CheckConfig> {
        self.checks.iter().find(|c| c.name == name)
    }
}

/// Where targets, results and the diff scratch file live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathsConfig {
    #[serde(default = "default_target_dir")]
    pub target_dir: PathBuf,

    #[serde(default = "default_result_dir")]
    pub result_dir: PathBuf,

    #[serde(default = "default_diff_file")]
    pub diff_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            target_dir: default_target_dir(),
            result_dir: default_result_dir(),
            diff_file: default_diff_file(),
        }
    }
}

fn default_target_dir() -> PathBuf {
    PathBuf::from("snapshots/target")
}

fn default_result_dir() -> PathBuf {
    PathBuf::from("snapshots/result")
}

fn default_diff_file() -> PathBuf {
    PathBuf::from("snapshots/diff.txt")
}

/// Data source that tables are read from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    /// A Postgres server. Without `url`, `$SNAPCHECK_DATABASE_URL` is used.
    Postgres {
        #[serde(default)]
        url: Option<String>,
    },
    /// A directory of `<table>.json` column maps.
    Fixtures { dir: PathBuf },
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Postgres { url: None }
    }
}

/// How accepted targets are shared.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TransportConfig {
    #[default]
    None,
    Mirror {
        dir: PathBuf,
    },
    Scp {
        host: String,
        remote_dir: String,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    Count,
    Select,
    Grep,
}

impl CheckKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Select => "select",
            Self::Grep => "grep",
        }
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One [[check]] entry. Which optional fields are required depends on `kind`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckConfig {
    pub name: String,

    pub kind: CheckKind,

    /// Artifact file name, relative to the target and result directories.
    pub file: String,

    /// Table read by `count` and `select`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    /// Projected columns for `select`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,

    /// Sort key columns for `select`; not written to the artifact.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<String>,

    /// Relative tolerance for numeric cells in `select`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,

    /// Compare `select` numbers with the default tolerance.
    #[serde(default)]
    pub float: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<String>,

    /// File filtered by `grep`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,

    /// Case-insensitive needle for `grep`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substring: Option<String>,
}

impl CheckConfig {
    /// Numeric comparison mode: an explicit `tolerance` wins over `float`.
    #[must_use]
    pub fn comparison_tolerance(&self) -> Tolerance {
        match (self.tolerance, self.float) {
            (Some(bound), _) => Tolerance::Relative(bound),
            (None, true) => Tolerance::Relative(Tolerance::DEFAULT_RELATIVE),
            (None, false) => Tolerance::Exact,
        }
    }

    #[must_use]
    pub fn depends_on(&self) -> Option<&str> {
        self.depends_on.as_deref().filter(|d| !d.is_empty())
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
