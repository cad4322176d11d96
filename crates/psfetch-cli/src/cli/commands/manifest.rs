//! `psfetch manifest`: fetch the files listed in a TOML manifest.

use anyhow::Result;
use psfetch_core::config::FetchConfig;
use psfetch_core::manifest::Manifest;
use std::path::Path;

use super::batch::run_requests;
use crate::cli::{BatchArgs, RunStatus};

pub fn run_manifest(cfg: &FetchConfig, path: &Path, args: &BatchArgs) -> Result<RunStatus> {
    let manifest = Manifest::load(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let requests = manifest.into_requests(&cfg.out_dir, base_dir)?;
    run_requests(cfg, &requests, args)
}
