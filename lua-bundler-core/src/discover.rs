//! Discovery of eligible source files under an input root.
//!
//! The walk visits every subdirectory (directory-local entries in name order),
//! keeps non-directory entries whose file name ends with the configured
//! extension, and finally sorts the relative paths globally. Only that final
//! order is observable: `a/bar.lua` < `a/foo.lua` < `b.lua`.

use crate::contract::BundleError;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use walkdir::WalkDir;

/// Returns every eligible file below `root`, relative to `root`, sorted by the
/// raw path string. An empty result is not an error.
pub fn discover(root: &Path, extension: &str) -> Result<Vec<PathBuf>, BundleError> {
    info!(root = %root.display(), extension, "Discovering source files");

    let metadata = fs::metadata(root).map_err(|source| {
        error!(error = ?source, root = %root.display(), "Input root is not accessible");
        BundleError::InputRoot {
            path: root.to_path_buf(),
            source,
        }
    })?;
    if !metadata.is_dir() {
        error!(root = %root.display(), "Input root is not a directory");
        return Err(BundleError::InputRoot {
            path: root.to_path_buf(),
            source: io::Error::other("not a directory"),
        });
    }

    let mut files = Vec::new();
    for entry_res in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry_res.map_err(|source| {
            let path = source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf());
            error!(error = %source, path = %path.display(), "Directory walk failed");
            BundleError::Walk { path, source }
        })?;

        if entry.file_type().is_dir() || !is_eligible(entry.file_name(), extension) {
            continue;
        }
        // Links to directories are never descended into or bundled.
        if entry.path_is_symlink() && entry.path().is_dir() {
            debug!(path = %entry.path().display(), "Skipping symlink to directory");
            continue;
        }

        let relative = entry.path().strip_prefix(root).map_err(|_| {
            error!(path = %entry.path().display(), "Walked entry lies outside the input root");
            BundleError::InputRoot {
                path: root.to_path_buf(),
                source: io::Error::other(format!(
                    "walked entry {} lies outside the input root",
                    entry.path().display()
                )),
            }
        })?;
        debug!(path = %relative.display(), "Discovered source file");
        files.push(relative.to_path_buf());
    }

    files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

    info!(count = files.len(), "Completed source discovery");
    Ok(files)
}

/// Plain suffix match on the file name, case-sensitive.
pub fn is_eligible(file_name: &OsStr, extension: &str) -> bool {
    file_name
        .as_encoded_bytes()
        .ends_with(extension.as_bytes())
}
