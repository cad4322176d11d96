//! Filename extraction from URL path and containment of relative destinations.

use anyhow::{bail, Result};
use std::path::{Component, Path, PathBuf};

/// Extracts the last path segment from a URL for use as a filename hint.
///
/// Returns `None` if the URL cannot be parsed or the path is empty/root.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

/// Join `rel` under `root`, refusing anything that could land outside it:
/// absolute paths, drive prefixes and `..` components. `.` components are
/// dropped.
pub fn relative_destination(root: &Path, rel: &str) -> Result<PathBuf> {
    let rel_path = Path::new(rel);
    let mut out = root.to_path_buf();
    let mut pushed = false;
    for component in rel_path.components() {
        match component {
            Component::Normal(part) => {
                out.push(part);
                pushed = true;
            }
            Component::CurDir => {}
            Component::ParentDir => bail!("destination {:?} must not contain '..'", rel),
            Component::RootDir | Component::Prefix(_) => {
                bail!("destination {:?} must be relative", rel)
            }
        }
    }
    if !pushed {
        bail!("destination {:?} names no file", rel);
    }
    Ok(out)
}
