//! Sequential batch runner.
//!
//! Resolves each `FileRequest` in order. A file that cannot be saved is
//! recorded and the batch moves on; nothing short of a panic stops a batch.

use serde::Serialize;
use std::path::PathBuf;

use crate::checksum;
use crate::fallback::{self, ChainOutcome, FileRequest};
use crate::fetcher::ResilientFetcher;
use crate::retry::Sleeper;
use crate::task::FetchOutcome;
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Saved,
    SkippedNotFound,
    Failed,
}

/// What happened to one logical file.
#[derive(Debug, Clone, Serialize)]
pub struct EntryReport {
    pub label: String,
    pub destination: PathBuf,
    pub status: EntryStatus,
    /// Source that produced the file, when saved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    /// Last error, when failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub entries: Vec<EntryReport>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn saved(&self) -> usize {
        self.count(EntryStatus::Saved)
    }

    pub fn skipped(&self) -> usize {
        self.count(EntryStatus::SkippedNotFound)
    }

    pub fn failed(&self) -> usize {
        self.count(EntryStatus::Failed)
    }

    fn count(&self, status: EntryStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    /// Whether the run counts as successful. With `allow_missing`, files that
    /// were 404 everywhere do not count against it; failures always do.
    pub fn is_success(&self, allow_missing: bool) -> bool {
        self.failed() == 0 && (allow_missing || self.skipped() == 0)
    }

    /// Fill `sha256` for every saved entry from the file on disk.
    pub fn compute_checksums(&mut self) {
        for entry in self
            .entries
            .iter_mut()
            .filter(|e| e.status == EntryStatus::Saved)
        {
            match checksum::sha256_path(&entry.destination) {
                Ok(digest) => entry.sha256 = Some(digest),
                Err(e) => tracing::warn!(path = %entry.destination.display(), "checksum failed: {:#}", e),
            }
        }
    }
}

/// Run every request in order, calling `on_entry` as each one resolves.
pub fn run_batch<T, S, F>(
    fetcher: &mut ResilientFetcher<T, S>,
    requests: &[FileRequest],
    mut on_entry: F,
) -> BatchReport
where
    T: Transport,
    S: Sleeper,
    F: FnMut(&EntryReport),
{
    let mut report = BatchReport {
        entries: Vec::with_capacity(requests.len()),
    };
    for (i, request) in requests.iter().enumerate() {
        tracing::debug!(index = i + 1, total = requests.len(), label = %request.label, "resolving");
        let outcome = fallback::resolve(fetcher, request);
        let entry = entry_report(request, outcome);
        on_entry(&entry);
        report.entries.push(entry);
    }
    tracing::info!(
        saved = report.saved(),
        skipped = report.skipped(),
        failed = report.failed(),
        total = report.total(),
        "batch finished"
    );
    report
}

fn entry_report(request: &FileRequest, outcome: ChainOutcome) -> EntryReport {
    let mut entry = EntryReport {
        label: request.label.clone(),
        destination: request.destination.clone(),
        status: EntryStatus::Failed,
        source: None,
        bytes: None,
        error: None,
        sha256: None,
    };
    if outcome.all_not_found() {
        entry.status = EntryStatus::SkippedNotFound;
        return entry;
    }
    match outcome {
        ChainOutcome::Saved {
            source_index,
            bytes,
        } => {
            entry.status = EntryStatus::Saved;
            entry.source = request.sources.get(source_index).map(|s| s.describe());
            entry.bytes = Some(bytes);
        }
        ChainOutcome::Missing { attempts } => {
            let last_failure = attempts.iter().rev().find_map(|o| match o {
                FetchOutcome::Failed(err) => Some(err.to_string()),
                _ => None,
            });
            entry.error = Some(match last_failure {
                Some(msg) => msg,
                None if attempts.is_empty() => "no sources".to_string(),
                None => "not found".to_string(),
            });
        }
    }
    entry
}
