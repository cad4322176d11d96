//! Integration tests: real curl transport against a local scripted HTTP server.

mod common;

use common::status_server::{refused_url, StatusServer};
use psfetch_core::batch::{run_batch, EntryStatus};
use psfetch_core::catalog::{self, CatalogSet, CDN_FILES};
use psfetch_core::config::ShowdownConfig;
use psfetch_core::manifest::Manifest;
use psfetch_core::retry::RetryPolicy;
use psfetch_core::transport::CurlTransport;
use psfetch_core::{FetchError, FetchOutcome, FetchTask, ResilientFetcher};
use std::time::Duration;
use tempfile::tempdir;

fn quick_policy() -> RetryPolicy {
    RetryPolicy {
        base_delay: Duration::from_millis(10),
        timeout: Duration::from_secs(5),
        ..RetryPolicy::default()
    }
}

fn fetcher() -> ResilientFetcher<CurlTransport> {
    let transport = CurlTransport::new("psfetch-tests/1.0").unwrap();
    ResilientFetcher::new(transport, quick_policy())
}

#[test]
fn ok_response_is_saved_byte_for_byte() {
    let server = StatusServer::start();
    let body: Vec<u8> = (0u8..=255).cycle().take(48 * 1024).collect();
    server.route_bytes("/data/learnsets.json", 200, &body);
    let dir = tempdir().unwrap();
    let dest = dir.path().join("cdn").join("learnsets.json");

    let out = fetcher().fetch(&FetchTask::new(server.url("/data/learnsets.json"), &dest));

    assert!(matches!(out, FetchOutcome::Saved(n) if n == body.len() as u64));
    assert_eq!(std::fs::read(&dest).unwrap(), body);
}

#[test]
fn not_found_is_skipped_without_retry() {
    let server = StatusServer::start();
    let dir = tempdir().unwrap();
    let dest = dir.path().join("missing.ts");

    let out = fetcher().fetch(&FetchTask::new(server.url("/data/missing.ts"), &dest));

    assert!(matches!(out, FetchOutcome::SkippedNotFound));
    assert_eq!(server.hits("/data/missing.ts"), 1);
    assert!(!dest.exists());
}

#[test]
fn transient_statuses_are_retried_until_ok() {
    let server = StatusServer::start();
    server.route(
        "/data/moves.json",
        &[(503, "busy"), (429, "slow down"), (200, "{\"tackle\":{}}")],
    );
    let dir = tempdir().unwrap();
    let dest = dir.path().join("moves.json");

    let out = fetcher().fetch(&FetchTask::new(server.url("/data/moves.json"), &dest));

    assert!(matches!(out, FetchOutcome::Saved(13)));
    assert_eq!(server.hits("/data/moves.json"), 3);
    assert_eq!(std::fs::read(&dest).unwrap(), b"{\"tackle\":{}}");
}

#[test]
fn persistent_503_fails_after_attempt_budget() {
    let server = StatusServer::start();
    server.route("/data/items.js", &[(503, "busy")]);
    let dir = tempdir().unwrap();
    let dest = dir.path().join("items.js");

    let out = fetcher().fetch(&FetchTask::new(server.url("/data/items.js"), &dest));

    assert!(matches!(
        out,
        FetchOutcome::Failed(FetchError::RetriesExhausted {
            status: 503,
            attempts: 4
        })
    ));
    assert_eq!(server.hits("/data/items.js"), 4);
    assert!(!dest.exists());
}

#[test]
fn fatal_status_is_not_retried() {
    let server = StatusServer::start();
    server.route("/data/formats.js", &[(410, "gone"), (200, "late")]);
    let dir = tempdir().unwrap();

    let out = fetcher().fetch(&FetchTask::new(
        server.url("/data/formats.js"),
        dir.path().join("formats.js"),
    ));

    assert!(matches!(
        out,
        FetchOutcome::Failed(FetchError::FatalStatus { status: 410 })
    ));
    assert_eq!(server.hits("/data/formats.js"), 1);
}

#[test]
fn refused_connection_is_retried_then_fails() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("gone");

    let out = fetcher().fetch(&FetchTask::new(refused_url(), &dest));

    assert!(matches!(
        out,
        FetchOutcome::Failed(FetchError::Network { attempts: 4, .. })
    ));
    assert!(!dest.exists());
}

#[test]
fn slow_but_steady_body_outlasts_the_timeout() {
    let server = StatusServer::start();
    server.route_trickle("/data/learnsets.json", b"{\"a\":1}", Duration::from_millis(300));
    let dir = tempdir().unwrap();
    let dest = dir.path().join("learnsets.json");
    let policy = RetryPolicy {
        max_attempts: 1,
        timeout: Duration::from_secs(1),
        ..quick_policy()
    };
    let transport = CurlTransport::new("psfetch-tests/1.0").unwrap();

    // About 2.1 s in total, but data never stops for a whole second.
    let out = ResilientFetcher::new(transport, policy)
        .fetch(&FetchTask::new(server.url("/data/learnsets.json"), &dest));

    assert!(matches!(out, FetchOutcome::Saved(7)));
    assert_eq!(std::fs::read(&dest).unwrap(), b"{\"a\":1}");
}

#[test]
fn stalled_body_times_out() {
    let server = StatusServer::start();
    server.route_trickle("/data/stalled.json", b"{}", Duration::from_secs(4));
    let dir = tempdir().unwrap();
    let dest = dir.path().join("stalled.json");
    let policy = RetryPolicy {
        max_attempts: 1,
        timeout: Duration::from_secs(1),
        ..quick_policy()
    };
    let transport = CurlTransport::new("psfetch-tests/1.0").unwrap();

    let out = ResilientFetcher::new(transport, policy)
        .fetch(&FetchTask::new(server.url("/data/stalled.json"), &dest));

    match out {
        FetchOutcome::Failed(FetchError::Network { source, attempts: 1 }) => {
            assert!(source.is_operation_timedout());
        }
        other => panic!("expected timeout, got {:?}", other),
    }
    assert!(!dest.exists());
}

#[test]
fn catalog_batch_continues_past_missing_file() {
    let server = StatusServer::start();
    let showdown = ShowdownConfig {
        cdn_base: server.url("/data"),
        github_raw_base: server.url("/gh"),
        git_ref: "master".to_string(),
    };
    for file in CDN_FILES.iter().filter(|f| **f != "formats.js") {
        server.route(&format!("/data/{}", file), &[(200, *file)]);
    }
    for path in catalog::BASE_SOURCES {
        server.route(&format!("/gh/master/{}", path), &[(200, *path)]);
    }
    let out_dir = tempdir().unwrap();
    let requests = catalog::requests(CatalogSet::Cdn, &showdown, out_dir.path()).unwrap();

    let mut lines = 0;
    let report = run_batch(&mut fetcher(), &requests, |_| lines += 1);

    assert_eq!(lines, requests.len());
    assert_eq!(report.total(), 14);
    assert_eq!(report.saved(), 13);
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.failed(), 0);
    assert_eq!(
        std::fs::read(out_dir.path().join("github/data/pokedex.ts")).unwrap(),
        b"data/pokedex.ts"
    );
    assert!(!out_dir.path().join("cdn/formats.js").exists());
}

#[test]
fn manifest_fallback_uses_mirror_then_inline() {
    let server = StatusServer::start();
    server.route("/mirror/abilities.js", &[(200, "mirror copy")]);
    let manifest = format!(
        r#"
        [[file]]
        label = "abilities"
        destination = "cdn/abilities.js"
        sources = ["{primary}", "{mirror}"]

        [[file]]
        label = "typechart"
        destination = "cdn/typechart.js"
        sources = ["{missing}"]
        fallback_inline = "exports.BattleTypeChart = {{}};"
        "#,
        primary = server.url("/primary/abilities.js"),
        mirror = server.url("/mirror/abilities.js"),
        missing = server.url("/primary/typechart.js"),
    );
    let out_dir = tempdir().unwrap();
    let requests = Manifest::from_toml_str(&manifest)
        .unwrap()
        .into_requests(out_dir.path(), out_dir.path())
        .unwrap();

    let report = run_batch(&mut fetcher(), &requests, |_| {});

    assert!(report.is_success(false));
    assert_eq!(report.entries[0].status, EntryStatus::Saved);
    assert_eq!(
        report.entries[0].source.as_deref(),
        Some(server.url("/mirror/abilities.js").as_str())
    );
    assert_eq!(
        std::fs::read(out_dir.path().join("cdn/abilities.js")).unwrap(),
        b"mirror copy"
    );
    assert_eq!(
        std::fs::read_to_string(out_dir.path().join("cdn/typechart.js")).unwrap(),
        "exports.BattleTypeChart = {};"
    );
    assert!(server.base().starts_with("http://127.0.0.1:"));
}
