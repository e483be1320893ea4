use std::fs;

use crate::cli::InitArgs;
use crate::{EXIT_CONFIG_ERROR, EXIT_SUCCESS, Result, SnapcheckError};

#[must_use]
pub fn run_init(args: &InitArgs) -> i32 {
    match run_init_impl(args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_CONFIG_ERROR
        }
    }
}

/// Initializes a new configuration file.
///
/// # Errors
/// Returns an error if the file already exists (without --force) or cannot be written.
pub fn run_init_impl(args: &InitArgs) -> Result<()> {
    let output_path = &args.output;

    if output_path.exists() && !args.force {
        return Err(SnapcheckError::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            output_path.display()
        )));
    }

    fs::write(output_path, generate_config_template())?;

    println!("Created configuration file: {}", output_path.display());
    Ok(())
}

#[must_use]
pub fn generate_config_template() -> String {
    r#"# snapcheck configuration file
# Relative paths are resolved against the directory of this file.

[paths]
# Accepted targets, kept between runs
target_dir = "snapshots/target"
# Fresh results, rewritten by every run
result_dir = "snapshots/result"
# Full diff of the most recent failed line comparison
diff_file = "snapshots/diff.txt"

[source]
# "postgres" or "fixtures"
kind = "postgres"
# Falls back to $SNAPCHECK_DATABASE_URL when omitted
# url = "postgres://user@localhost/db"

# Fixtures read <dir>/<table>.json column maps instead of a database
# kind = "fixtures"
# dir = "fixtures"

[transport]
# "none", "mirror" (dir = "...") or "scp" (host = "...", remote_dir = "...")
kind = "none"

# Row count of a table, compared line by line
[[check]]
name = "arrival_count"
kind = "count"
table = "arrival"
file = "arrival_count.txt"

# Sorted projection of a table, compared cell by cell
# [[check]]
# name = "arrival_values"
# kind = "select"
# table = "arrival"
# file = "arrival_values.txt"
# fields = ["ID", "VAL"]
# order_by = ["ID"]
# tolerance = 0.05      # or: float = true for the default 0.001
# depends_on = "arrival_count"

# Lines of a file containing a substring, ignoring case
# [[check]]
# name = "errors"
# kind = "grep"
# input = "logs/app.log"
# file = "errors.txt"
# substring = "error"
"#
    .to_string()
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
