/// `load_config` module: turns an optional YAML file, CLI flags and the
/// install-location convention into one `BundleConfig`.
///
/// This is the only place that parses user-supplied YAML or looks at where the
/// executable lives. Precedence, highest first: CLI flags, YAML file, defaults.
///
/// # Defaults
/// - input root: `<dir of executable>/../scripts`
/// - output: `<input root>/../build/_mission.lua`
/// - extension: `.lua`
///
/// # Errors
/// All errors use `anyhow::Error` and are surfaced at the CLI boundary.
use crate::cli::Cli;
use anyhow::{Context, Result};
use lua_bundler_core::config::{BundleConfig, ReplaceStrategy, DEFAULT_EXTENSION};
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{error, info};

pub const SCRIPTS_DIR: &str = "scripts";
pub const BUILD_DIR: &str = "build";
pub const BUNDLE_FILE_NAME: &str = "_mission.lua";

/// Everything a YAML config may set. All keys are optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub input_root: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub source_extension: Option<String>,
    pub replace: Option<ReplaceStrategy>,
}

/// Loads a YAML config file. Relative paths inside it are resolved against the
/// directory the file lives in.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    // An empty file is a valid config that sets nothing.
    let mut config: FileConfig = if config_content.trim().is_empty() {
        FileConfig::default()
    } else {
        match serde_yaml::from_str(&config_content) {
            Ok(conf) => {
                info!(config_path = ?path_ref, "Parsed config YAML successfully");
                conf
            }
            Err(e) => {
                error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
                return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
            }
        }
    };

    let base = path_ref.parent().unwrap_or(Path::new(""));
    config.input_root = config.input_root.map(|p| resolve_against(base, &p));
    config.output_path = config.output_path.map(|p| resolve_against(base, &p));
    Ok(config)
}

/// Merges flags, the optional YAML file and the install-location defaults.
pub fn resolve_config(cli: &Cli) -> Result<BundleConfig> {
    let file = match &cli.config {
        Some(path) => load_config(path)?,
        None => FileConfig::default(),
    };

    let input_root = match cli.input_root.clone().or(file.input_root) {
        Some(root) => root,
        None => default_input_root(&install_dir()?),
    };
    let output_path = cli
        .output
        .clone()
        .or(file.output_path)
        .unwrap_or_else(|| default_output_path(&input_root));

    let extension = cli
        .extension
        .clone()
        .or(file.source_extension)
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    if extension.trim().is_empty() {
        error!("Source extension is empty");
        anyhow::bail!("Source extension must not be empty");
    }

    let replace = if cli.atomic {
        ReplaceStrategy::Atomic
    } else {
        file.replace.unwrap_or_default()
    };

    let config = BundleConfig::new(input_root, output_path)
        .with_extension(&extension)
        .with_replace(replace);
    config.trace_loaded();
    Ok(config)
}

pub fn default_input_root(install_dir: &Path) -> PathBuf {
    lexical_normalize(&install_dir.join("..").join(SCRIPTS_DIR))
}

pub fn default_output_path(input_root: &Path) -> PathBuf {
    lexical_normalize(&input_root.join("..").join(BUILD_DIR)).join(BUNDLE_FILE_NAME)
}

fn install_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the running executable")?;
    exe.parent()
        .map(Path::to_path_buf)
        .context("Executable path has no parent directory")
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        lexical_normalize(&base.join(path))
    }
}

/// Collapses `.` and `..` without touching the filesystem.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last = out.components().next_back();
                let below_normal = matches!(last, Some(Component::Normal(_)));
                let at_root = matches!(last, Some(Component::RootDir | Component::Prefix(_)));
                if below_normal {
                    out.pop();
                } else if !at_root {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
