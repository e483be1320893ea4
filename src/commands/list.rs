use std::fmt::Write;

use crate::cli::Cli;
use crate::config::Config;
use crate::{EXIT_CONFIG_ERROR, EXIT_SUCCESS, Result};

use super::context::load_config;

#[must_use]
pub fn run_list(cli: &Cli) -> i32 {
    match run_list_impl(cli) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_CONFIG_ERROR
        }
    }
}

/// Print configured checks.
///
/// # Errors
/// Returns an error if the configuration cannot be loaded.
pub fn run_list_impl(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?.config;
    print!("{}", format_check_list(&config));
    Ok(())
}

/// One line per check: name, kind, artifact file and dependency.
#[must_use]
pub fn format_check_list(config: &Config) -> String {
    let width = config.checks.iter().map(|c| c.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for check in &config.checks {
        write!(out, "{:<width$}  {:<6}  {}", check.name, check.kind.as_str(), check.file).ok();
        if let Some(dependency) = check.depends_on() {
            write!(out, "  (after {dependency})").ok();
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
