//! Configuration schema for stage0
//!
//! Configuration is read from `config.toml` in the current directory, or from
//! the path given with `--config`.

use serde::Deserialize;
use std::path::PathBuf;

/// Default host serving the `dist/` and `cargo-dist/` trees
pub const DEFAULT_DIST_SERVER: &str = "https://static.rust-lang.org";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,
}

/// The `[build]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildConfig {
    /// Build triple, skips host detection when set
    pub build: Option<String>,

    /// Compiler to use instead of the seed download
    pub rustc: Option<PathBuf>,

    /// Package manager to use instead of the seed download
    pub cargo: Option<PathBuf>,

    /// Source root, skips discovery when set
    pub src: Option<PathBuf>,

    /// Base URL of the distribution server
    pub dist_server: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            build: None,
            rustc: None,
            cargo: None,
            src: None,
            dist_server: DEFAULT_DIST_SERVER.to_string(),
        }
    }
}
