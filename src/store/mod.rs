//! Target and result artifact locations.
//!
//! Targets live in the target directory and survive across runs; results are
//! scratch files in the result directory, removed at the start of every check.
//! Both are addressed by the same logical file name.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use crate::{Result, SnapcheckError};

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    target_dir: PathBuf,
    result_dir: PathBuf,
    diff_path: PathBuf,
}

impl SnapshotStore {
    #[must_use]
    pub fn new(
        target_dir: impl Into<PathBuf>,
        result_dir: impl Into<PathBuf>,
        diff_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            target_dir: target_dir.into(),
            result_dir: result_dir.into(),
            diff_path: diff_path.into(),
        }
    }

    #[must_use]
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    #[must_use]
    pub fn result_dir(&self) -> &Path {
        &self.result_dir
    }

    /// Shared scratch file holding the most recent line diff.
    #[must_use]
    pub fn diff_path(&self) -> &Path {
        &self.diff_path
    }

    /// # Errors
    /// Returns a `Config` error if `file` is not a plain file name.
    pub fn target_path(&self, file: &str) -> Result<PathBuf> {
        resolve(&self.target_dir, file)
    }

    /// # Errors
    /// Returns a `Config` error if `file` is not a plain file name.
    pub fn result_path(&self, file: &str) -> Result<PathBuf> {
        resolve(&self.result_dir, file)
    }

    /// # Errors
    /// Returns a `Config` error if `file` is not a plain file name.
    pub fn target_exists(&self, file: &str) -> Result<bool> {
        Ok(self.target_path(file)?.is_file())
    }

    /// Delete a stale result artifact. A missing file is not an error.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed.
    pub fn remove_result(&self, file: &str) -> Result<()> {
        let path = self.result_path(file)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed stale result");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SnapcheckError::FileAccess { path, source: e }),
        }
    }

    /// Write a result artifact. The file is flushed and closed on return.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn write_result(&self, file: &str, contents: &str) -> Result<PathBuf> {
        let path = self.result_path(file)?;
        write_file(&path, contents.as_bytes())?;
        debug!(path = %path.display(), bytes = contents.len(), "wrote result");
        Ok(path)
    }

    /// # Errors
    /// Returns `MissingArtifact` if the target cannot be read.
    pub fn read_target(&self, file: &str) -> Result<String> {
        read_artifact(&self.target_path(file)?)
    }

    /// # Errors
    /// Returns `MissingArtifact` if the result cannot be read.
    pub fn read_result(&self, file: &str) -> Result<String> {
        read_artifact(&self.result_path(file)?)
    }

    /// Copy the result artifact into the target slot.
    ///
    /// The copy is atomic: the target is either the old file or the complete
    /// new one, never a partial write.
    ///
    /// # Errors
    /// Returns `MissingArtifact` if there is no result, or an I/O error if the
    /// target cannot be written.
    pub fn promote(&self, file: &str) -> Result<PathBuf> {
        let contents = self.read_result(file)?;
        let target = self.target_path(file)?;
        atomic_write(&target, contents.as_bytes()).map_err(|e| SnapcheckError::FileAccess {
            path: target.clone(),
            source: e,
        })?;
        info!(target = %target.display(), "promoted result to target");
        Ok(target)
    }
}

/// Reject artifact names that are not a single visible file name.
///
/// Nested names are refused because the scp transport copies one flat
/// remote directory; dot-files are reserved for in-flight temp files.
///
/// # Errors
/// Returns a `Config` error describing the offending name.
pub fn check_artifact_name(file: &str) -> Result<()> {
    let mut components = Path::new(file).components();
    let plain = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !file.starts_with('.')
        && !file.ends_with('/');
    if plain {
        Ok(())
    } else {
        Err(SnapcheckError::Config(format!(
            "Artifact name must be a plain file name without directories: '{file}'"
        )))
    }
}

fn resolve(dir: &Path, file: &str) -> Result<PathBuf> {
    check_artifact_name(file)?;
    Ok(dir.join(file))
}

fn read_artifact(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| SnapcheckError::MissingArtifact {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let to_err = |e| SnapcheckError::FileAccess {
        path: path.to_path_buf(),
        source: e,
    };
    ensure_parent_dir(path).map_err(to_err)?;
    let mut file = File::create(path).map_err(to_err)?;
    file.write_all(bytes).map_err(to_err)?;
    file.flush().map_err(to_err)
}

/// Ensure the parent directory exists for a given path.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Write `bytes` to `path` via a temporary sibling file and a rename.
///
/// The temporary file is removed if anything fails before the rename.
///
/// # Errors
/// Returns an error if the file cannot be written or renamed.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let mut temp_name = std::ffi::OsString::from(".");
    temp_name.push(file_name);
    temp_name.push(format!(".{}.tmp", std::process::id()));
    let temp_path = path.with_file_name(temp_name);

    let result = (|| {
        let mut file = File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&temp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
