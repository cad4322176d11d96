//! Fallback chains: one logical file, several places to get it from.

use std::fs;
use std::path::PathBuf;

use crate::fetcher::ResilientFetcher;
use crate::retry::Sleeper;
use crate::storage;
use crate::task::{FetchError, FetchOutcome, FetchTask};
use crate::transport::Transport;

/// Where one copy of a logical file can come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Remote URL, fetched with the full retry contract.
    Url(String),
    /// Static payload bundled with the request.
    Inline(Vec<u8>),
    /// Static payload read from a local file.
    LocalFile(PathBuf),
}

impl Source {
    /// Short human-readable form for logs and reports.
    pub fn describe(&self) -> String {
        match self {
            Source::Url(url) => url.clone(),
            Source::Inline(bytes) => format!("inline payload ({} bytes)", bytes.len()),
            Source::LocalFile(path) => format!("file:{}", path.display()),
        }
    }
}

/// A destination plus its ordered sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRequest {
    pub label: String,
    pub destination: PathBuf,
    pub sources: Vec<Source>,
}

impl FileRequest {
    /// Request with a single remote source; the label is the URL.
    pub fn single(url: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        let url = url.into();
        Self {
            label: url.clone(),
            destination: destination.into(),
            sources: vec![Source::Url(url)],
        }
    }

    pub fn with_fallback(mut self, source: Source) -> Self {
        self.sources.push(source);
        self
    }
}

#[derive(Debug)]
pub enum ChainOutcome {
    /// `sources[source_index]` produced the file.
    Saved { source_index: usize, bytes: u64 },
    /// Every source was tried; one outcome per source, in order.
    Missing { attempts: Vec<FetchOutcome> },
}

impl ChainOutcome {
    /// True when every source answered 404 (and there was at least one).
    pub fn all_not_found(&self) -> bool {
        match self {
            ChainOutcome::Saved { .. } => false,
            ChainOutcome::Missing { attempts } => {
                !attempts.is_empty()
                    && attempts
                        .iter()
                        .all(|o| matches!(o, FetchOutcome::SkippedNotFound))
            }
        }
    }
}

/// Try each source of `request` in order, stopping at the first save.
pub fn resolve<T: Transport, S: Sleeper>(
    fetcher: &mut ResilientFetcher<T, S>,
    request: &FileRequest,
) -> ChainOutcome {
    let mut attempts = Vec::with_capacity(request.sources.len());
    for (source_index, source) in request.sources.iter().enumerate() {
        if source_index > 0 {
            tracing::info!(
                label = %request.label,
                source = %source.describe(),
                "trying fallback source"
            );
        }
        let outcome = match source {
            Source::Url(url) => fetcher.fetch(&FetchTask::new(url.as_str(), &request.destination)),
            Source::Inline(bytes) => write_static(request, bytes),
            Source::LocalFile(path) => match fs::read(path) {
                Ok(bytes) => write_static(request, &bytes),
                Err(source) => FetchOutcome::Failed(FetchError::Storage {
                    path: path.clone(),
                    source,
                }),
            },
        };
        if let FetchOutcome::Saved(bytes) = outcome {
            return ChainOutcome::Saved {
                source_index,
                bytes,
            };
        }
        attempts.push(outcome);
    }
    tracing::warn!(label = %request.label, tried = attempts.len(), "all sources exhausted");
    ChainOutcome::Missing { attempts }
}

fn write_static(request: &FileRequest, bytes: &[u8]) -> FetchOutcome {
    match storage::write_atomic(&request.destination, bytes) {
        Ok(n) => FetchOutcome::Saved(n),
        Err(source) => FetchOutcome::Failed(FetchError::Storage {
            path: request.destination.clone(),
            source,
        }),
    }
}
