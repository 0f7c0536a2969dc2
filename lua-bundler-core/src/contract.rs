//! # contract: shared error type and the clock seam
//!
//! Every fallible operation in this crate returns [`BundleError`]. Each variant
//! names the path involved and keeps the underlying I/O error as its source,
//! so the CLI can print the whole chain.
//!
//! The build timestamp comes from a [`Clock`]. Production code uses
//! [`SystemClock`]; tests use the `mockall`-generated `MockClock` to pin the
//! header line.

use chrono::NaiveDateTime;
use std::io;
use std::path::PathBuf;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// Errors raised while building a bundle. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("input root {} is not an accessible directory", .path.display())]
    InputRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to walk directory tree at {}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read source file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove existing output {}", .path.display())]
    RemoveExisting {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write output {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to move staged output into place at {}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Source of the local date-time written into the bundle header.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}
