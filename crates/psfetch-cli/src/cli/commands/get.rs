//! `psfetch get`: fetch one URL.

use anyhow::Result;
use psfetch_core::config::FetchConfig;
use psfetch_core::fallback::FileRequest;
use psfetch_core::url_model;
use std::path::{Path, PathBuf};

use super::batch::run_requests;
use crate::cli::{BatchArgs, RunStatus};

pub fn run_get(cfg: &FetchConfig, url: &str, output: Option<&Path>) -> Result<RunStatus> {
    let url = url_model::parse_remote_url(url)?.to_string();
    let destination = default_destination(cfg, &url, output);
    run_requests(cfg, &[FileRequest::single(url, destination)], &BatchArgs::default())
}

fn default_destination(cfg: &FetchConfig, url: &str, output: Option<&Path>) -> PathBuf {
    match output {
        Some(path) => path.to_path_buf(),
        None => cfg.out_dir.join(url_model::derive_filename(url)),
    }
}
