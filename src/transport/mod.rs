//! Sharing accepted targets between machines.
//!
//! A [`Transport`] refreshes the local target directory before a run and
//! publishes each newly promoted target afterwards. The local working copy is
//! what checks compare against; transports only move files around it.

mod mirror;
mod scp;

pub use mirror::MirrorTransport;
pub use scp::ScpTransport;

use std::path::Path;

use crate::Result;

pub trait Transport {
    /// Bring the shared targets into `target_dir`.
    ///
    /// # Errors
    /// Returns a `Transport` error if the refresh fails in a way the run
    /// cannot recover from. Unreachable remotes are logged and tolerated.
    fn pull(&self, target_dir: &Path) -> Result<()>;

    /// Publish the promoted target at `local_target` under `file`.
    ///
    /// # Errors
    /// Returns a `Transport` error if the file could not be published.
    fn publish(&self, file: &str, local_target: &Path) -> Result<()>;
}

/// The local target directory is authoritative; nothing is shared.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransport;

impl Transport for NoTransport {
    fn pull(&self, _target_dir: &Path) -> Result<()> {
        Ok(())
    }

    fn publish(&self, _file: &str, _local_target: &Path) -> Result<()> {
        Ok(())
    }
}
