//! URL handling and local path derivation.
//!
//! Builds catalog URLs from a base and a relative path, validates URLs coming
//! from manifests, and turns URLs or manifest entries into paths that stay
//! inside the output directory.

mod path;
mod sanitize;

pub use path::{filename_from_url_path, relative_destination};
pub use sanitize::sanitize_filename;

use anyhow::{bail, Context, Result};
use url::Url;

/// Filename used by `derive_filename` when the URL path yields nothing usable.
const DEFAULT_FILENAME: &str = "download.bin";

/// Parse `raw` and require an `http` or `https` scheme.
pub fn parse_remote_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("invalid URL: {}", raw))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!("unsupported URL scheme {:?} in {}", other, raw),
    }
}

/// Append `rel` to `base` as path segments.
///
/// Unlike `Url::join`, the last segment of `base` is kept whether or not it
/// ends with `/`: `join_url("https://h/data", "moves.json")` is
/// `https://h/data/moves.json`.
pub fn join_url(base: &str, rel: &str) -> Result<String> {
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        rel.trim_start_matches('/')
    );
    Ok(parse_remote_url(&joined)?.to_string())
}

/// Safe local filename for a URL: its last path segment, sanitized.
pub fn derive_filename(url: &str) -> String {
    let sanitized = filename_from_url_path(url)
        .map(|s| sanitize_filename(&s))
        .unwrap_or_default();
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}
