//! One (URL, destination) fetch and its result.

use std::path::PathBuf;

/// A single file to GET from `source_url` and save at `destination`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTask {
    pub source_url: String,
    pub destination: PathBuf,
}

impl FetchTask {
    pub fn new(source_url: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source_url: source_url.into(),
            destination: destination.into(),
        }
    }
}

/// Result of one `ResilientFetcher::fetch`; produced exactly once per task.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Body written to the destination; carries the byte count.
    Saved(u64),
    /// Server answered 404; nothing was written.
    SkippedNotFound,
    Failed(FetchError),
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP {status} is not retryable")]
    FatalStatus { status: u32 },

    #[error("HTTP {status} after {attempts} attempt(s)")]
    RetriesExhausted { status: u32, attempts: u32 },

    #[error("network error after {attempts} attempt(s): {source}")]
    Network {
        #[source]
        source: curl::Error,
        attempts: u32,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Last HTTP status seen, when the failure came from a response.
    pub fn status(&self) -> Option<u32> {
        match self {
            FetchError::FatalStatus { status } | FetchError::RetriesExhausted { status, .. } => {
                Some(*status)
            }
            FetchError::Network { .. } | FetchError::Storage { .. } => None,
        }
    }
}
