//! `psfetch cdn|sources|all`: the built-in Pokémon Showdown download sets.

use anyhow::Result;
use psfetch_core::catalog::{self, CatalogSet};
use psfetch_core::config::FetchConfig;

use super::batch::run_requests;
use crate::cli::{BatchArgs, RunStatus};

pub fn run_catalog(cfg: &FetchConfig, set: CatalogSet, args: &BatchArgs) -> Result<RunStatus> {
    let requests = catalog::requests(set, &cfg.showdown, &cfg.out_dir)?;
    tracing::info!(?set, git_ref = %cfg.showdown.git_ref, "catalog run");
    run_requests(cfg, &requests, args)
}
