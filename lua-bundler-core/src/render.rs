use crate::contract::BundleError;
use chrono::NaiveDateTime;
use std::fs;
use std::path::Path;
use tracing::{debug, error};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// First line of every bundle, followed by one blank line.
pub fn render_header(timestamp: NaiveDateTime) -> String {
    format!(
        "-- Build Date and Time: {} --\n\n",
        timestamp.format(TIMESTAMP_FORMAT)
    )
}

/// Reads one source file and wraps it in start/end markers naming its base name.
/// The content is copied unmodified.
pub fn render_entry(path: &Path) -> Result<String, BundleError> {
    let content = fs::read_to_string(path).map_err(|source| {
        error!(error = ?source, path = %path.display(), "Failed to read source file");
        BundleError::Read {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    debug!(name = %name, size = content.len(), "Rendered entry");
    Ok(format_entry(&name, &content))
}

fn format_entry(name: &str, content: &str) -> String {
    format!("-- Start of {name} --\n{content}\n-- End of {name} --\n\n")
}
