use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use tracing::{info, warn};

use crate::{Result, SnapcheckError};

use super::Transport;

/// Shares targets with a remote host through `scp`.
#[derive(Debug, Clone)]
pub struct ScpTransport {
    host: String,
    remote_dir: String,
    program: String,
}

impl ScpTransport {
    #[must_use]
    pub fn new(host: impl Into<String>, remote_dir: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            remote_dir: remote_dir.into(),
            program: "scp".to_string(),
        }
    }

    /// Use a different copy program with scp-compatible arguments.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn remote(&self, file: &str) -> String {
        format!(
            "{}:{}/{file}",
            self.host,
            self.remote_dir.trim_end_matches('/')
        )
    }

    pub(crate) fn pull_args(&self, target_dir: &Path) -> Vec<OsString> {
        let mut dest = target_dir.as_os_str().to_os_string();
        dest.push("/");
        vec!["-q".into(), self.remote("*").into(), dest]
    }

    pub(crate) fn publish_args(&self, file: &str, local_target: &Path) -> Vec<OsString> {
        vec![
            "-q".into(),
            local_target.as_os_str().to_os_string(),
            self.remote(file).into(),
        ]
    }

    fn run(&self, args: &[OsString]) -> std::result::Result<(), String> {
        let status = Command::new(&self.program)
            .args(args)
            .status()
            .map_err(|e| format!("failed to start {}: {e}", self.program))?;
        if status.success() {
            Ok(())
        } else {
            Err(format!("{} exited with {status}", self.program))
        }
    }
}

impl Transport for ScpTransport {
    fn pull(&self, target_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(target_dir).map_err(|e| SnapcheckError::FileAccess {
            path: target_dir.to_path_buf(),
            source: e,
        })?;
        match self.run(&self.pull_args(target_dir)) {
            Ok(()) => info!(host = %self.host, "pulled targets"),
            Err(reason) => warn!(host = %self.host, "{reason}; starting from zero"),
        }
        Ok(())
    }

    fn publish(&self, file: &str, local_target: &Path) -> Result<()> {
        self.run(&self.publish_args(file, local_target))
            .map_err(|reason| {
                SnapcheckError::Transport(format!(
                    "could not publish '{file}' to {}: {reason}",
                    self.host
                ))
            })?;
        info!(file, host = %self.host, "published target");
        Ok(())
    }
}

#[cfg(test)]
#[path = "scp_tests.rs"]
mod tests;
