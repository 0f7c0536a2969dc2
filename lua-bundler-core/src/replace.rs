//! Replacement of the output file.
//!
//! [`ReplaceStrategy::DeleteThenWrite`] removes any old output before the
//! build starts and then streams straight into the final path.
//! [`ReplaceStrategy::Atomic`] streams into a `tempfile::NamedTempFile` in the
//! same directory and renames it over the final path in [`OutputSink::finish`];
//! if the build fails first, the temp file is dropped and the old output stays.

use crate::config::ReplaceStrategy;
use crate::contract::BundleError;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, error, info};

/// Deletes the file at `path` if there is one. Returns whether something was removed.
pub fn remove_existing(path: &Path) -> Result<bool, BundleError> {
    match fs::remove_file(path) {
        Ok(()) => {
            info!(path = %path.display(), "Removed previous output");
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => {
            error!(error = ?source, path = %path.display(), "Failed to remove previous output");
            Err(BundleError::RemoveExisting {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

enum Sink {
    Direct(BufWriter<File>),
    Staged(BufWriter<NamedTempFile>),
}

/// Sequential writer for one output document.
pub struct OutputSink {
    path: PathBuf,
    sink: Sink,
}

impl OutputSink {
    pub fn create(path: &Path, strategy: ReplaceStrategy) -> Result<Self, BundleError> {
        let sink = match strategy {
            ReplaceStrategy::DeleteThenWrite => {
                File::create(path).map(|f| Sink::Direct(BufWriter::new(f)))
            }
            ReplaceStrategy::Atomic => NamedTempFile::new_in(staging_dir(path))
                .map(|t| Sink::Staged(BufWriter::new(t))),
        }
        .map_err(|source| write_error(path, source))?;

        debug!(path = %path.display(), ?strategy, "Opened output");
        Ok(Self {
            path: path.to_path_buf(),
            sink,
        })
    }

    pub fn write_str(&mut self, text: &str) -> Result<(), BundleError> {
        let result = match &mut self.sink {
            Sink::Direct(w) => w.write_all(text.as_bytes()),
            Sink::Staged(w) => w.write_all(text.as_bytes()),
        };
        result.map_err(|source| write_error(&self.path, source))
    }

    /// Flushes and closes the output; for a staged output, renames it into place.
    pub fn finish(self) -> Result<(), BundleError> {
        match self.sink {
            Sink::Direct(w) => {
                w.into_inner()
                    .map_err(|e| write_error(&self.path, e.into_error()))?;
            }
            Sink::Staged(w) => {
                let staged = w
                    .into_inner()
                    .map_err(|e| write_error(&self.path, e.into_error()))?;
                staged.persist(&self.path).map_err(|e| {
                    error!(error = ?e.error, path = %self.path.display(), "Failed to persist staged output");
                    BundleError::Persist {
                        path: self.path.clone(),
                        source: e.error,
                    }
                })?;
            }
        }
        debug!(path = %self.path.display(), "Closed output");
        Ok(())
    }
}

fn staging_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn write_error(path: &Path, source: io::Error) -> BundleError {
    error!(error = ?source, path = %path.display(), "Failed to write output");
    BundleError::Write {
        path: path.to_path_buf(),
        source,
    }
}
