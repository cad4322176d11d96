//! Retry and backoff policy.
//!
//! This module encapsulates status and transport-error classification and
//! the linear backoff decision so the fetcher and any other caller share one
//! policy.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status, classify_status, StatusClass};
pub use error::{AttemptError, GaveUp};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::{run_with_retry, Sleeper, ThreadSleeper};
