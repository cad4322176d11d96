//! Shared batch runner: build the fetcher, print one line per file, summarize.

use anyhow::{Context, Result};
use psfetch_core::batch::{self, BatchReport, EntryReport, EntryStatus};
use psfetch_core::config::FetchConfig;
use psfetch_core::fallback::FileRequest;
use psfetch_core::transport::CurlTransport;
use psfetch_core::ResilientFetcher;
use std::fs;
use std::path::Path;

use crate::cli::{BatchArgs, RunStatus};

/// Run `requests` sequentially with the configured retry policy.
pub(crate) fn run_requests(
    cfg: &FetchConfig,
    requests: &[FileRequest],
    args: &BatchArgs,
) -> Result<RunStatus> {
    fs::create_dir_all(&cfg.out_dir)
        .with_context(|| format!("create output dir {}", cfg.out_dir.display()))?;

    let transport = CurlTransport::new(&cfg.user_agent)?;
    let mut fetcher = ResilientFetcher::new(transport, cfg.retry_policy()?);
    let policy = fetcher.policy();
    tracing::info!(
        files = requests.len(),
        out_dir = %cfg.out_dir.display(),
        max_attempts = policy.max_attempts,
        timeout_secs = policy.timeout.as_secs(),
        "starting batch"
    );

    let mut report = batch::run_batch(&mut fetcher, requests, |entry| {
        println!("{}", format_entry(entry));
    });

    let out_dir = fs::canonicalize(&cfg.out_dir).unwrap_or_else(|_| cfg.out_dir.clone());
    println!(
        "\nDone. Fetched {}/{} files into {}.",
        report.saved(),
        report.total(),
        out_dir.display()
    );

    if let Some(path) = &args.report {
        write_report(&mut report, path)?;
    }

    Ok(if report.is_success(args.allow_missing) {
        RunStatus::Complete
    } else {
        RunStatus::Incomplete
    })
}

/// One progress line for a resolved file.
fn format_entry(entry: &EntryReport) -> String {
    match entry.status {
        EntryStatus::Saved => format!(
            "[OK]   {} -> {}",
            entry.source.as_deref().unwrap_or(&entry.label),
            entry.destination.display()
        ),
        EntryStatus::SkippedNotFound => format!("[WARN] 404: {}; skipping.", entry.label),
        EntryStatus::Failed => format!(
            "[FAIL] {}: {}",
            entry.label,
            entry.error.as_deref().unwrap_or("unknown error")
        ),
    }
}

fn write_report(report: &mut BatchReport, path: &Path) -> Result<()> {
    report.compute_checksums();
    let json = serde_json::to_string_pretty(report)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json).with_context(|| format!("write report {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote report");
    Ok(())
}
