//! Deterministic file enumeration over the governed source tree.

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::engine::ScanError;

/// Infrastructure directories never scanned: version control, build output,
/// dependency caches.
pub const SKIPPED_DIRS: &[&str] = &[".git", ".hg", "target", "node_modules"];

/// Enumerates files with the given extension under `root`, in sorted
/// depth-first order.
///
/// A missing root is not an error: it yields an empty list, so rules bound
/// to not-yet-extracted parts of the tree silently contribute nothing.
///
/// # Errors
///
/// Returns [`ScanError::Walk`] if directory traversal itself fails; this is
/// an unexpected fault and aborts the scan.
pub fn files_with_extension(root: &Path, extension: &str) -> Result<Vec<PathBuf>, ScanError> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e.path()));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) == Some(extension) {
            files.push(entry.path().to_path_buf());
        }
    }

    Ok(files)
}

/// Reads a file as text, replacing malformed byte sequences.
///
/// Returns `None` on read failure; the caller skips the file and the scan
/// continues.
#[must_use]
pub fn read_lossy(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            warn!("skipping unreadable file {}: {e}", path.display());
            None
        }
    }
}

fn is_skipped_dir(path: &Path) -> bool {
    path.is_dir()
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}
