use std::collections::HashSet;

use tracing::{info, warn};

use crate::cli::{Cli, RunArgs};
use crate::config::{CheckConfig, CheckKind, Config};
use crate::harness::{CheckOutcome, Harness, Projection};
use crate::output::{CheckReport, CheckStatus, JsonFormatter, OutputFormat, OutputFormatter, TextFormatter};
use crate::{EXIT_CHECK_FAILED, EXIT_CONFIG_ERROR, EXIT_SUCCESS, Result, SnapcheckError};

use super::context::{build_harness, color_choice_to_mode, load_config, write_output};

#[must_use]
pub fn run_run(args: &RunArgs, cli: &Cli) -> i32 {
    match run_run_impl(args, cli) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_CONFIG_ERROR
        }
    }
}

/// Pull targets, run the selected checks in order and write the report.
///
/// # Errors
/// Returns an error if the configuration is invalid, `--only` names an
/// unknown check, the pull fails, or the report cannot be written. Check
/// failures are reported, not returned.
pub fn run_run_impl(args: &RunArgs, cli: &Cli) -> Result<i32> {
    let loaded = load_config(cli.config.as_deref())?;
    let config = loaded.config;
    let selected = select_checks(&config, &args.only)?;

    let mut harness = build_harness(&config);
    harness.pull()?;

    let reports = run_checks(&mut harness, &selected);

    let output = match args.format {
        OutputFormat::Text => TextFormatter::new(color_choice_to_mode(cli.color)).format(&reports)?,
        OutputFormat::Json => JsonFormatter.format(&reports)?,
    };
    write_output(args.output.as_deref(), &output, cli.quiet)?;

    if reports.iter().any(|r| r.status == CheckStatus::Failed) {
        Ok(EXIT_CHECK_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Checks to run, in configuration order.
///
/// # Errors
/// Returns a `Config` error if `only` names a check that does not exist.
pub fn select_checks<'a>(config: &'a Config, only: &[String]) -> Result<Vec<&'a CheckConfig>> {
    if let Some(unknown) = only.iter().find(|name| config.check(name).is_none()) {
        return Err(SnapcheckError::Config(format!("Unknown check '{unknown}'")));
    }
    Ok(config
        .checks
        .iter()
        .filter(|c| only.is_empty() || only.contains(&c.name))
        .collect())
}

/// Run `checks` in order. A dependency that was not selected is ignored.
pub fn run_checks(harness: &mut Harness, checks: &[&CheckConfig]) -> Vec<CheckReport> {
    let selected: HashSet<&str> = checks.iter().map(|c| c.name.as_str()).collect();
    checks
        .iter()
        .map(|check| {
            let depends_on = check.depends_on().filter(|d| {
                let present = selected.contains(d);
                if !present {
                    warn!(check = %check.name, dependency = %d, "dependency not selected, ignoring");
                }
                present
            });
            let result = run_check(harness, check, depends_on);
            CheckReport::from_result(&check.name, check.kind, &result)
        })
        .inspect(|report| info!(check = %report.name, status = report.status.label(), "reported"))
        .collect()
}

/// Dispatch one configured check to the harness.
///
/// # Errors
/// Returns the check's failure, or a `Config` error if a field required by
/// its kind is missing.
pub fn run_check(
    harness: &mut Harness,
    check: &CheckConfig,
    depends_on: Option<&str>,
) -> Result<CheckOutcome> {
    match check.kind {
        CheckKind::Count => {
            let table = required(check, "table", check.table.as_deref())?;
            harness.count_rows(&check.name, table, &check.file, depends_on)
        }
        CheckKind::Select => {
            let table = required(check, "table", check.table.as_deref())?;
            let projection = Projection {
                fields: check.fields.clone(),
                order_by: check.order_by.clone(),
                tolerance: check.comparison_tolerance(),
            };
            harness.select_fields(&check.name, table, &check.file, &projection, depends_on)
        }
        CheckKind::Grep => {
            let input = required(check, "input", check.input.as_deref())?;
            let substring = required(check, "substring", check.substring.as_deref())?;
            harness.grep_and_compare(&check.name, input, &check.file, substring, depends_on)
        }
    }
}

fn required<'a, T: ?Sized>(check: &CheckConfig, field: &str, value: Option<&'a T>) -> Result<&'a T> {
    value.ok_or_else(|| {
        SnapcheckError::Config(format!("check '{}': missing '{field}'", check.name))
    })
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
