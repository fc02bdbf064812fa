//! File-backed persistence for the state carried between scheduled runs.

pub mod state_store;

pub use state_store::StateStore;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state file I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but does not hold a valid state document.
    #[error("state file {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode state: {0}")]
    Encode(#[source] serde_json::Error),
}
