//! Semantic checks run after a config parses.

use std::collections::{HashMap, HashSet};

use crate::config::{CheckConfig, CheckKind, Config};
use crate::store::check_artifact_name;
use crate::{Result, SnapcheckError};

/// Validate the check list.
///
/// # Errors
/// Returns a `Config` error naming the first offending check.
pub fn validate_config(config: &Config) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut files: HashMap<&str, &str> = HashMap::new();
    for check in &config.checks {
        if check.name.is_empty() {
            return Err(SnapcheckError::Config(
                "Every [[check]] needs a non-empty name".to_string(),
            ));
        }
        if let Some(dependency) = check.depends_on()
            && !seen.contains(dependency)
        {
            return Err(SnapcheckError::Config(format!(
                "check '{}': depends_on '{dependency}' must name an earlier check",
                check.name
            )));
        }
        if !seen.insert(check.name.as_str()) {
            return Err(SnapcheckError::Config(format!(
                "Duplicate check name '{}'",
                check.name
            )));
        }
        validate_check(check)?;
        if let Some(owner) = files.insert(check.file.as_str(), check.name.as_str()) {
            return Err(SnapcheckError::Config(format!(
                "check '{}': file '{}' is already written by check '{owner}'",
                check.name, check.file
            )));
        }
    }
    Ok(())
}

fn validate_check(check: &CheckConfig) -> Result<()> {
    let fail = |msg: &str| -> Result<()> {
        Err(SnapcheckError::Config(format!("check '{}': {msg}", check.name)))
    };

    if check.file.is_empty() {
        return fail("'file' must not be empty");
    }
    if let Err(SnapcheckError::Config(msg)) = check_artifact_name(&check.file) {
        return fail(&msg);
    }
    match check.kind {
        CheckKind::Count => {
            if check.table.is_none() {
                return fail("count checks require 'table'");
            }
        }
        CheckKind::Select => {
            if check.table.is_none() {
                return fail("select checks require 'table'");
            }
            if check.fields.is_empty() {
                return fail("select checks require at least one entry in 'fields'");
            }
            if let Some(tolerance) = check.tolerance
                && !(tolerance.is_finite() && tolerance >= 0.0)
            {
                return fail(&format!(
                    "'tolerance' must be a finite number >= 0, got {tolerance}"
                ));
            }
        }
        CheckKind::Grep => {
            if check.input.is_none() {
                return fail("grep checks require 'input'");
            }
            if check.substring.is_none() {
                return fail("grep checks require 'substring'");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
