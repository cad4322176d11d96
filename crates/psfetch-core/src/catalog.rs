//! Built-in download sets for the Pokémon Showdown data files.
//!
//! `cdn` mirrors the compiled client data plus the base server sources;
//! `sources` pulls the server sources at a git ref, including the gen9 mod
//! overrides. Both are expressed as `FileRequest`s rooted at the output dir.

use anyhow::Result;
use std::path::Path;

use crate::config::ShowdownConfig;
use crate::fallback::FileRequest;
use crate::url_model;

/// Compiled data served by the client CDN.
pub const CDN_FILES: &[&str] = &[
    "pokedex.json",
    "moves.json",
    "learnsets.json",
    "items.js",
    "abilities.js",
    "typechart.js",
    "formats-data.js",
    "formats.js",
];

/// Base server data sources.
pub const BASE_SOURCES: &[&str] = &[
    "data/pokedex.ts",
    "data/moves.ts",
    "data/abilities.ts",
    "data/items.ts",
    "data/typechart.ts",
    "data/conditions.ts",
];

/// Generation 9 overrides of the base sources.
pub const GEN9_SOURCES: &[&str] = &[
    "data/mods/gen9/pokedex.ts",
    "data/mods/gen9/moves.ts",
    "data/mods/gen9/abilities.ts",
    "data/mods/gen9/items.ts",
    "data/mods/gen9/typechart.ts",
    "data/mods/gen9/conditions.ts",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSet {
    /// CDN data into `<out>/cdn`, base sources into `<out>/github`.
    Cdn,
    /// Base and gen9 sources at the git ref into `<out>`.
    Sources,
    /// Both of the above.
    All,
}

/// Build the requests for `set`, writing under `out_dir`.
pub fn requests(set: CatalogSet, showdown: &ShowdownConfig, out_dir: &Path) -> Result<Vec<FileRequest>> {
    match set {
        CatalogSet::Cdn => cdn_bundle(showdown, out_dir),
        CatalogSet::Sources => server_sources(showdown, out_dir),
        CatalogSet::All => {
            let mut all = cdn_bundle(showdown, out_dir)?;
            all.extend(server_sources(showdown, out_dir)?);
            Ok(all)
        }
    }
}

fn cdn_bundle(showdown: &ShowdownConfig, out_dir: &Path) -> Result<Vec<FileRequest>> {
    let mut requests = Vec::with_capacity(CDN_FILES.len() + BASE_SOURCES.len());
    let cdn_dir = out_dir.join("cdn");
    for file in CDN_FILES {
        let url = url_model::join_url(&showdown.cdn_base, file)?;
        requests.push(FileRequest::single(url, url_model::relative_destination(&cdn_dir, file)?));
    }
    let github_dir = out_dir.join("github");
    for path in BASE_SOURCES {
        requests.push(raw_request(showdown, path, &github_dir)?);
    }
    Ok(requests)
}

fn server_sources(showdown: &ShowdownConfig, out_dir: &Path) -> Result<Vec<FileRequest>> {
    BASE_SOURCES
        .iter()
        .chain(GEN9_SOURCES)
        .map(|path| raw_request(showdown, path, out_dir))
        .collect()
}

fn raw_request(showdown: &ShowdownConfig, path: &str, root: &Path) -> Result<FileRequest> {
    let base = url_model::join_url(&showdown.github_raw_base, &showdown.git_ref)?;
    let url = url_model::join_url(&base, path)?;
    let mut request = FileRequest::single(url, url_model::relative_destination(root, path)?);
    request.label = format!("{} @ {}", path, showdown.git_ref);
    Ok(request)
}
