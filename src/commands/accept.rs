use crate::cli::{AcceptArgs, Cli};
use crate::{EXIT_CONFIG_ERROR, EXIT_SUCCESS, Result, SnapcheckError};

use super::context::{build_harness, load_config};

#[must_use]
pub fn run_accept(args: &AcceptArgs, cli: &Cli) -> i32 {
    match run_accept_impl(args, cli) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_CONFIG_ERROR
        }
    }
}

/// Promote the latest result of each named check to target.
///
/// All names are resolved before anything is promoted.
///
/// # Errors
/// Returns a `Config` error for an unknown name, `MissingArtifact` if a check
/// has no result yet, or a `Transport` error if publishing fails.
pub fn run_accept_impl(args: &AcceptArgs, cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?.config;
    let checks = args
        .names
        .iter()
        .map(|name| {
            config
                .check(name)
                .ok_or_else(|| SnapcheckError::Config(format!("Unknown check '{name}'")))
        })
        .collect::<Result<Vec<_>>>()?;

    let harness = build_harness(&config);
    for check in checks {
        let target = harness.accept(&check.file)?;
        if !cli.quiet {
            println!("Accepted {}: {}", check.name, target.display());
        }
    }
    Ok(())
}
