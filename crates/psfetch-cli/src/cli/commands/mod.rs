//! CLI command handlers. Each command is in its own file; `batch` holds the
//! runner and output they share.

mod batch;
mod catalog;
mod get;
mod manifest;

pub use catalog::run_catalog;
pub use get::run_get;
pub use manifest::run_manifest;
