use std::fs;
use std::path::Path;

use crate::cli::ColorChoice;
use crate::config::{Config, ConfigLoader, FileConfigLoader, LoadResult, SourceConfig, TransportConfig};
use crate::harness::Harness;
use crate::output::ColorMode;
use crate::source::{Connector, FixtureConnector, PostgresConnector};
use crate::store::SnapshotStore;
use crate::transport::{MirrorTransport, NoTransport, ScpTransport, Transport};

pub(crate) const fn color_choice_to_mode(choice: ColorChoice) -> ColorMode {
    match choice {
        ColorChoice::Auto => ColorMode::Auto,
        ColorChoice::Always => ColorMode::Always,
        ColorChoice::Never => ColorMode::Never,
    }
}

/// Load configuration from `config_path`, or search the default locations.
///
/// # Errors
/// Returns an error if the configuration cannot be read, parsed or validated.
pub(crate) fn load_config(config_path: Option<&Path>) -> crate::Result<LoadResult> {
    let loader = FileConfigLoader::new();
    config_path.map_or_else(|| loader.load(), |path| loader.load_from_path(path))
}

/// Wire a harness from a loaded configuration.
#[must_use]
pub fn build_harness(config: &Config) -> Harness {
    let store = SnapshotStore::new(
        &config.paths.target_dir,
        &config.paths.result_dir,
        &config.paths.diff_file,
    );
    Harness::new(store, build_connector(&config.source), build_transport(&config.transport))
}

fn build_connector(source: &SourceConfig) -> Box<dyn Connector> {
    match source {
        SourceConfig::Postgres { url } => Box::new(PostgresConnector::new(url.clone())),
        SourceConfig::Fixtures { dir } => Box::new(FixtureConnector::new(dir)),
    }
}

fn build_transport(transport: &TransportConfig) -> Box<dyn Transport> {
    match transport {
        TransportConfig::None => Box::new(NoTransport),
        TransportConfig::Mirror { dir } => Box::new(MirrorTransport::new(dir)),
        TransportConfig::Scp { host, remote_dir } => {
            Box::new(ScpTransport::new(host.as_str(), remote_dir.as_str()))
        }
    }
}

pub(crate) fn write_output(
    output_path: Option<&Path>,
    content: &str,
    quiet: bool,
) -> crate::Result<()> {
    if let Some(path) = output_path {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
    } else if !quiet {
        print!("{content}");
    }
    Ok(())
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
