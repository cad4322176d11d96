//! CLI for psfetch.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use psfetch_core::catalog::CatalogSet;
use psfetch_core::config::{self, FetchConfig};
use std::path::PathBuf;

use commands::{run_catalog, run_get, run_manifest};

/// Top-level CLI for psfetch.
#[derive(Debug, Parser)]
#[command(name = "psfetch")]
#[command(about = "psfetch: resilient downloader for game-data files", long_about = None)]
pub struct Cli {
    /// Config file to use instead of $XDG_CONFIG_HOME/psfetch/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Root directory for downloaded files (overrides `out_dir` from config).
    #[arg(long, global = true, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Options shared by every multi-file command.
#[derive(Debug, Clone, Default, Args)]
pub struct BatchArgs {
    /// Write a JSON report (with SHA-256 of saved files) to FILE.
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Exit 0 even if some files were 404 at every source.
    #[arg(long)]
    pub allow_missing: bool,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch a single URL.
    Get {
        /// Direct HTTP/HTTPS URL to download.
        url: String,

        /// Destination path (default: last URL path segment under the output dir).
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// CDN data files into <out>/cdn and base server sources into <out>/github.
    Cdn {
        /// Git branch, tag, or commit for the server sources.
        #[arg(long = "ref", value_name = "REF")]
        git_ref: Option<String>,

        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Server data sources (base + gen9 overrides) at a git ref into <out>.
    Sources {
        /// Git branch, tag, or commit.
        #[arg(long = "ref", value_name = "REF")]
        git_ref: Option<String>,

        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Both the cdn and sources sets.
    All {
        /// Git branch, tag, or commit for the server sources.
        #[arg(long = "ref", value_name = "REF")]
        git_ref: Option<String>,

        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Files listed in a TOML manifest, with optional fallback sources.
    Manifest {
        /// Path to the manifest.
        path: PathBuf,

        #[command(flatten)]
        batch: BatchArgs,
    },
}

/// How a run ended, for the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every file was saved (or only tolerated 404s remain).
    Complete,
    /// At least one file was not saved.
    Incomplete,
}

impl RunStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Complete => 0,
            RunStatus::Incomplete => 2,
        }
    }
}

impl Cli {
    /// Load the config file and apply command-line overrides.
    fn load_config(&self) -> Result<FetchConfig> {
        let mut cfg = match &self.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        if let Some(dir) = &self.out_dir {
            cfg.out_dir = dir.clone();
        }
        Ok(cfg)
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<RunStatus> {
        let cli = Cli::parse();
        let mut cfg = cli.load_config()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Get { url, output } => run_get(&cfg, &url, output.as_deref()),
            CliCommand::Cdn { git_ref, batch } => {
                apply_ref(&mut cfg, git_ref);
                run_catalog(&cfg, CatalogSet::Cdn, &batch)
            }
            CliCommand::Sources { git_ref, batch } => {
                apply_ref(&mut cfg, git_ref);
                run_catalog(&cfg, CatalogSet::Sources, &batch)
            }
            CliCommand::All { git_ref, batch } => {
                apply_ref(&mut cfg, git_ref);
                run_catalog(&cfg, CatalogSet::All, &batch)
            }
            CliCommand::Manifest { path, batch } => run_manifest(&cfg, &path, &batch),
        }
    }
}

fn apply_ref(cfg: &mut FetchConfig, git_ref: Option<String>) {
    if let Some(r) = git_ref {
        cfg.showdown.git_ref = r;
    }
}

#[cfg(test)]
mod tests;
