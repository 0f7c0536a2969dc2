//! CLI glue for lua-bundler: argument parsing, config resolution and the
//! user-visible confirmation line. All bundling logic lives in
//! `lua-bundler-core`.
//!
//! Run without arguments, the tool bundles `<install dir>/../scripts` into
//! `<install dir>/../build/_mission.lua`. Every flag below overrides one piece
//! of that convention, and so does a YAML file passed with `--config`.

use crate::load_config::resolve_config;
use anyhow::{Context, Result};
use clap::Parser;
use lua_bundler_core::bundle::build;
use std::path::PathBuf;

/// CLI for lua-bundler: concatenate a script tree into one bundle file.
#[derive(Parser, Debug, Default)]
#[command(
    name = "lua-bundler",
    version,
    about = "Concatenate a directory tree of Lua scripts into a single timestamped bundle"
)]
pub struct Cli {
    /// Path to an optional YAML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory scanned for source files
    #[arg(long)]
    pub input_root: Option<PathBuf>,

    /// Bundle file to (re)create
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// File name suffix of eligible sources, with or without the leading dot
    #[arg(long)]
    pub extension: Option<String>,

    /// Stage the bundle in a temp file and rename it into place
    #[arg(long)]
    pub atomic: bool,
}

/// Extracted CLI logic entrypoint for integration tests and main()
pub fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    let config = resolve_config(&cli)?;
    build(&config)
        .with_context(|| format!("Bundle build failed for {}", config.output_path.display()))?;

    println!(
        "All {} files have been concatenated into {}",
        config.source_extension,
        config.output_path.display()
    );
    Ok(())
}
