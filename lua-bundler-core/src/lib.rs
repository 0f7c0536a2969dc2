#![doc = "lua-bundler-core: core logic library for lua-bundler."]

//! This crate holds everything needed to turn a directory tree of script
//! files into a single bundle: configuration, discovery, entry rendering,
//! output replacement and the build pipeline itself.
//! It never reads the environment or the executable location; callers hand it
//! a fully resolved [`config::BundleConfig`].
//!
//! # Usage
//! ```no_run
//! use lua_bundler_core::config::BundleConfig;
//!
//! let config = BundleConfig::new("scripts", "build/_mission.lua");
//! lua_bundler_core::bundle::build(&config)?;
//! # Ok::<(), lua_bundler_core::contract::BundleError>(())
//! ```

pub mod bundle;
pub mod config;
pub mod contract;
pub mod discover;
pub mod render;
pub mod replace;

pub use bundle::{build, build_with_clock};
pub use config::{BundleConfig, ReplaceStrategy};
pub use contract::{BundleError, Clock, SystemClock};
