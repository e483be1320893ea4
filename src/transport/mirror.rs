use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::store::atomic_write;
use crate::{Result, SnapcheckError};

use super::Transport;

/// Shares targets through a directory, typically a network mount.
#[derive(Debug, Clone)]
pub struct MirrorTransport {
    dir: PathBuf,
}

impl MirrorTransport {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Transport for MirrorTransport {
    fn pull(&self, target_dir: &Path) -> Result<()> {
        if !self.dir.is_dir() {
            warn!(
                mirror = %self.dir.display(),
                "Mirror directory not found, starting from zero"
            );
            return Ok(());
        }

        let mut copied = 0usize;
        for relative in list_files(&self.dir).map_err(transport_err(&self.dir))? {
            let source = self.dir.join(&relative);
            let dest = target_dir.join(&relative);
            let bytes = fs::read(&source).map_err(transport_err(&source))?;
            if digest_of_file(&dest).as_deref() == Some(digest(&bytes).as_str()) {
                continue;
            }
            atomic_write(&dest, &bytes).map_err(transport_err(&dest))?;
            debug!(file = %relative.display(), "pulled target");
            copied += 1;
        }
        info!(copied, mirror = %self.dir.display(), "pulled targets from mirror");
        Ok(())
    }

    fn publish(&self, file: &str, local_target: &Path) -> Result<()> {
        let bytes = fs::read(local_target).map_err(transport_err(local_target))?;
        let dest = self.dir.join(file);
        atomic_write(&dest, &bytes).map_err(transport_err(&dest))?;
        info!(file, mirror = %self.dir.display(), "published target");
        Ok(())
    }
}

fn transport_err(path: &Path) -> impl Fn(io::Error) -> SnapcheckError + '_ {
    move |e| SnapcheckError::Transport(format!("{}: {e}", path.display()))
}

fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn digest_of_file(path: &Path) -> Option<String> {
    fs::read(path).ok().map(|bytes| digest(&bytes))
}

/// Files under `root`, relative to it, skipping hidden entries such as
/// in-flight temp files.
fn list_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            files.push(relative.to_path_buf());
        }
    }
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

#[cfg(test)]
#[path = "mirror_tests.rs"]
mod tests;
