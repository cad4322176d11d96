//! Disk side of a fetch.
//!
//! A body is written to a temp file in the destination directory, synced,
//! then renamed over the destination. A failed write never leaves a truncated
//! destination behind and an existing file is only replaced by a complete one.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Create missing parent directories of `dest`, then atomically replace
/// `dest` with `body`. Returns the number of bytes written.
pub fn write_atomic(dest: &Path, body: &[u8]) -> io::Result<u64> {
    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".psfetch-")
        .suffix(".part")
        .tempfile_in(parent)?;
    tmp.write_all(body)?;
    tmp.as_file().sync_all()?;
    tmp.persist(dest).map_err(|e| e.error)?;

    tracing::debug!(path = %dest.display(), bytes = body.len(), "wrote file");
    Ok(body.len() as u64)
}
