//! Resilient single-file fetch.
//!
//! GET with bounded retries and linear backoff, status classification, and
//! an atomic write of the body on 200. Every task resolves to exactly one
//! `FetchOutcome`; nothing here panics or aborts the caller's batch.

use crate::retry::{self, AttemptError, GaveUp, RetryPolicy, Sleeper, StatusClass, ThreadSleeper};
use crate::storage;
use crate::task::{FetchError, FetchOutcome, FetchTask};
use crate::transport::Transport;

pub struct ResilientFetcher<T, S = ThreadSleeper> {
    transport: T,
    sleeper: S,
    policy: RetryPolicy,
}

impl<T: Transport> ResilientFetcher<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self::with_sleeper(transport, ThreadSleeper, policy)
    }
}

impl<T: Transport, S: Sleeper> ResilientFetcher<T, S> {
    pub fn with_sleeper(transport: T, sleeper: S, policy: RetryPolicy) -> Self {
        Self {
            transport,
            sleeper,
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Fetch `task.source_url` and save it at `task.destination`.
    ///
    /// - 200: parent directories are created and the body replaces the destination.
    /// - 404: returns `SkippedNotFound` at once; the destination is untouched.
    /// - 429/403/500/502/503/504 and network errors: retried with linear backoff
    ///   until `max_attempts`, then `Failed`.
    /// - any other status: `Failed` without retrying.
    pub fn fetch(&mut self, task: &FetchTask) -> FetchOutcome {
        let url = task.source_url.as_str();
        let timeout = self.policy.timeout;
        let transport = &mut self.transport;

        let result = retry::run_with_retry(&self.policy, &mut self.sleeper, |attempt| {
            tracing::debug!(url, attempt, "GET");
            let resp = transport.get(url, timeout).map_err(AttemptError::Curl)?;
            match retry::classify_status(resp.status) {
                StatusClass::Success => Ok(Some(resp.body)),
                StatusClass::NotFound => Ok(None),
                StatusClass::Failure(_) => Err(AttemptError::Http(resp.status)),
            }
        });

        let body = match result {
            Ok(Some(body)) => body,
            Ok(None) => {
                tracing::warn!(url, "404 not found; skipping");
                return FetchOutcome::SkippedNotFound;
            }
            Err(gave_up) => {
                let err = fetch_error(gave_up);
                tracing::error!(url, "fetch failed: {}", err);
                return FetchOutcome::Failed(err);
            }
        };

        match storage::write_atomic(&task.destination, &body) {
            Ok(bytes) => {
                tracing::info!(url, path = %task.destination.display(), bytes, "saved");
                FetchOutcome::Saved(bytes)
            }
            Err(source) => FetchOutcome::Failed(FetchError::Storage {
                path: task.destination.clone(),
                source,
            }),
        }
    }
}

fn fetch_error(gave_up: GaveUp) -> FetchError {
    let GaveUp { last, attempts } = gave_up;
    match last {
        AttemptError::Http(status) if retry::classify_http_status(status).is_retryable() => {
            FetchError::RetriesExhausted { status, attempts }
        }
        AttemptError::Http(status) => FetchError::FatalStatus { status },
        AttemptError::Curl(source) => FetchError::Network { source, attempts },
    }
}
