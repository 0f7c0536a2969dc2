//! Coordinating module for the replace-discover-render-write pipeline.

use crate::config::{BundleConfig, ReplaceStrategy};
use crate::contract::{BundleError, Clock, SystemClock};
use crate::discover::discover;
use crate::render::{render_entry, render_header};
use crate::replace::{remove_existing, OutputSink};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Builds the bundle described by `config`, stamped with the local wall-clock time.
pub fn build(config: &BundleConfig) -> Result<(), BundleError> {
    build_with_clock(config, &SystemClock)
}

/// Same as [`build`] with an explicit timestamp source.
///
/// Stops at the first error. With [`ReplaceStrategy::DeleteThenWrite`] the old
/// output is already gone by then and a partial document may be left behind.
pub fn build_with_clock(config: &BundleConfig, clock: &dyn Clock) -> Result<(), BundleError> {
    info!(
        input_root = %config.input_root.display(),
        output_path = %config.output_path.display(),
        extension = %config.source_extension,
        replace = ?config.replace,
        "Starting bundle build"
    );

    if config.replace == ReplaceStrategy::DeleteThenWrite {
        remove_existing(&config.output_path)?;
    }

    let mut files = discover(&config.input_root, &config.source_extension)?;
    if config.replace == ReplaceStrategy::Atomic {
        // The previous bundle is still on disk and may sit inside the input root.
        drop_previous_output(&mut files, &config.input_root, &config.output_path);
    }

    let mut output = OutputSink::create(&config.output_path, config.replace)?;
    output.write_str(&render_header(clock.now()))?;
    for relative in &files {
        let entry = render_entry(&config.input_root.join(relative))?;
        output.write_str(&entry)?;
        debug!(path = %relative.display(), "Appended entry");
    }
    output.finish()?;

    info!(
        count = files.len(),
        output_path = %config.output_path.display(),
        "Bundle build complete"
    );
    Ok(())
}

fn drop_previous_output(files: &mut Vec<PathBuf>, input_root: &Path, output_path: &Path) {
    let Ok(previous) = fs::canonicalize(output_path) else {
        return;
    };
    files.retain(|relative| {
        let keep = fs::canonicalize(input_root.join(relative)).ok().as_ref() != Some(&previous);
        if !keep {
            debug!(path = %relative.display(), "Skipping previous output inside input root");
        }
        keep
    });
}
