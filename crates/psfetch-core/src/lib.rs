pub mod config;
pub mod logging;

pub mod batch;
pub mod catalog;
pub mod checksum;
pub mod fallback;
pub mod fetcher;
pub mod manifest;
pub mod retry;
pub mod storage;
pub mod task;
pub mod transport;
pub mod url_model;

#[cfg(test)]
mod test_support;

pub use fetcher::ResilientFetcher;
pub use task::{FetchError, FetchOutcome, FetchTask};
