use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Suffix a file name must end with to be bundled when nothing else is configured.
pub const DEFAULT_EXTENSION: &str = ".lua";

/// How an existing file at the output path gets replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplaceStrategy {
    /// Delete the old output, then write the new one in place.
    /// A failure part-way leaves no output or a truncated one.
    #[default]
    DeleteThenWrite,
    /// Write into a temp file next to the output and rename it over the old one.
    Atomic,
}

/// Fully resolved input for one bundle build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleConfig {
    pub input_root: PathBuf,
    pub output_path: PathBuf,
    /// Always stored with its leading dot, e.g. `.lua`.
    pub source_extension: String,
    pub replace: ReplaceStrategy,
}

impl BundleConfig {
    pub fn new(input_root: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            output_path: output_path.into(),
            source_extension: DEFAULT_EXTENSION.to_string(),
            replace: ReplaceStrategy::default(),
        }
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.source_extension = normalize_extension(extension);
        self
    }

    pub fn with_replace(mut self, replace: ReplaceStrategy) -> Self {
        self.replace = replace;
        self
    }

    pub fn trace_loaded(&self) {
        info!(
            input_root = %self.input_root.display(),
            output_path = %self.output_path.display(),
            extension = %self.source_extension,
            replace = ?self.replace,
            "Loaded BundleConfig"
        );
        debug!(?self, "BundleConfig loaded (full debug)");
    }
}

/// Prefixes a dot unless one is already there. An empty extension stays empty,
/// which makes every file eligible.
pub fn normalize_extension(extension: &str) -> String {
    if extension.is_empty() || extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{extension}")
    }
}
