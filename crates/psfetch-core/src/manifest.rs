//! Task manifests: a TOML list of files and where to get them.
//!
//! ```toml
//! [[file]]
//! label = "pokedex"
//! destination = "cdn/pokedex.json"
//! sources = ["https://a.example/pokedex.json", "https://b.example/pokedex.json"]
//! fallback_inline = "{}"
//! ```
//!
//! Destinations are relative to the output directory; `fallback_file` is
//! relative to the manifest's own directory.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::fallback::{FileRequest, Source};
use crate::url_model;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default, rename = "file")]
    pub files: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestEntry {
    #[serde(default)]
    pub label: Option<String>,
    pub destination: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub fallback_inline: Option<String>,
    #[serde(default)]
    pub fallback_file: Option<PathBuf>,
}

impl Manifest {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(s).context("parse manifest")?;
        if manifest.files.is_empty() {
            bail!("manifest lists no [[file]] entries");
        }
        Ok(manifest)
    }

    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let data =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_toml_str(&data).with_context(|| format!("in {}", path.display()))
    }

    /// Validate every entry and turn it into a request under `out_dir`.
    /// `base_dir` anchors relative `fallback_file` paths.
    pub fn into_requests(self, out_dir: &Path, base_dir: &Path) -> Result<Vec<FileRequest>> {
        self.files
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                entry
                    .into_request(out_dir, base_dir)
                    .with_context(|| format!("manifest entry #{}", i + 1))
            })
            .collect()
    }
}

impl ManifestEntry {
    fn into_request(self, out_dir: &Path, base_dir: &Path) -> Result<FileRequest> {
        let destination = url_model::relative_destination(out_dir, &self.destination)?;

        let mut sources = Vec::with_capacity(self.sources.len() + 2);
        for raw in &self.sources {
            sources.push(Source::Url(url_model::parse_remote_url(raw)?.to_string()));
        }
        if let Some(inline) = self.fallback_inline {
            sources.push(Source::Inline(inline.into_bytes()));
        }
        if let Some(file) = self.fallback_file {
            sources.push(Source::LocalFile(base_dir.join(file)));
        }
        if sources.is_empty() {
            bail!("{:?} has no sources", self.destination);
        }

        Ok(FileRequest {
            label: self.label.unwrap_or(self.destination),
            destination,
            sources,
        })
    }
}
