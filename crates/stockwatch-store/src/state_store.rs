use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use stockwatch_core::PersistedState;

use crate::StoreError;

/// Reads and writes [`PersistedState`] as a single JSON document.
///
/// Runs are assumed to be serialized by the scheduler, so there is no file
/// locking. Writes go through a sibling temp file and a rename, so a crash
/// mid-write leaves either the old document or the new one on disk.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted state.
    ///
    /// A missing file is not an error: it means no run has completed yet, and
    /// the default state (no baseline, zero failures) is returned.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Io`] if the file exists but cannot be read.
    /// - [`StoreError::Corrupt`] if the contents are not a valid state document.
    pub fn load(&self) -> Result<PersistedState, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no state file yet, using defaults");
                return Ok(PersistedState::default());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Atomically replaces the state file with `state`.
    ///
    /// Parent directories are created as needed. The temp file is removed if
    /// any step after its creation fails.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Encode`] if the state cannot be serialized.
    /// - [`StoreError::Io`] on any filesystem failure.
    pub fn save(&self, state: &PersistedState) -> Result<(), StoreError> {
        let mut json = serde_json::to_string_pretty(state).map_err(StoreError::Encode)?;
        json.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let temp_path = self.temp_path();
        let cleanup = |source: io::Error| {
            let _ = fs::remove_file(&temp_path);
            StoreError::Io {
                path: temp_path.clone(),
                source,
            }
        };

        let mut file = fs::File::create(&temp_path).map_err(|source| StoreError::Io {
            path: temp_path.clone(),
            source,
        })?;
        file.write_all(json.as_bytes()).map_err(cleanup)?;
        file.sync_all().map_err(cleanup)?;
        drop(file);

        fs::rename(&temp_path, &self.path).map_err(cleanup)?;

        tracing::debug!(
            path = %self.path.display(),
            consecutive_failures = state.consecutive_failures,
            has_baseline = state.last_snapshot.is_some(),
            "state saved"
        );
        Ok(())
    }

    /// Deletes the state file so the next run starts from scratch.
    ///
    /// Returns `true` if a file was removed, `false` if there was none.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be removed.
    pub fn reset(&self) -> Result<bool, StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// `<path>.tmp`, next to the target so the rename stays on one filesystem.
    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[cfg(test)]
#[path = "state_store_test.rs"]
mod tests;
