//! Configuration management for stage0
//!
//! Both `config.toml` and the legacy `config.mk` are optional. They are read
//! once and merged into [`Overrides`]; nothing else in the crate sees raw
//! configuration text.

pub mod mk;
pub mod schema;

pub use mk::MakeConfig;
pub use schema::Config;

use crate::error::{Stage0Error, Stage0Result};
use std::env::consts::EXE_SUFFIX;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Typed options resolved from configuration files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overrides {
    /// Build triple, if pinned by configuration
    pub triple: Option<String>,
    /// Externally provided compiler
    pub rustc: Option<PathBuf>,
    /// Externally provided package manager
    pub cargo: Option<PathBuf>,
    /// Explicit source root
    pub src_root: Option<PathBuf>,
    /// Base URL of the distribution server
    pub dist_server: String,
}

impl Overrides {
    /// Merge the TOML config with the legacy make config. TOML values win.
    pub fn merge(config: Config, make: MakeConfig) -> Self {
        let build = config.build;
        let rustc = build.rustc.or_else(|| {
            make.local_rust
                .map(|prefix| prefix.join("bin").join(format!("rustc{}", EXE_SUFFIX)))
        });

        Self {
            triple: build.build.or(make.build),
            rustc,
            cargo: build.cargo,
            src_root: build.src,
            dist_server: build.dist_server.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for Overrides {
    fn default() -> Self {
        Self::merge(Config::default(), MakeConfig::default())
    }
}

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
    mk_path: PathBuf,
}

impl ConfigManager {
    /// Create a config manager reading `config.toml` and `config.mk` from `dir`
    pub fn new(dir: &Path) -> Self {
        Self {
            config_path: dir.join("config.toml"),
            mk_path: dir.join("config.mk"),
        }
    }

    /// Use a custom TOML config path
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.config_path = path;
        self
    }

    /// Load both files and merge them
    pub fn load_merged(&self) -> Stage0Result<Overrides> {
        let config = self.load()?;
        let make = self.load_mk()?;
        Ok(Overrides::merge(config, make))
    }

    /// Load the TOML configuration, falling back to defaults when absent
    pub fn load(&self) -> Stage0Result<Config> {
        let Some(content) = read_optional(&self.config_path)? else {
            debug!("Config file {} not found, using defaults", self.config_path.display());
            return Ok(Config::default());
        };

        toml::from_str(&content).map_err(|e| Stage0Error::ConfigInvalid {
            path: self.config_path.clone(),
            reason: e.to_string(),
        })
    }

    /// Load the legacy make configuration, empty when absent
    pub fn load_mk(&self) -> Stage0Result<MakeConfig> {
        match read_optional(&self.mk_path)? {
            Some(content) => {
                debug!("Reading legacy config {}", self.mk_path.display());
                Ok(MakeConfig::parse(&content))
            }
            None => Ok(MakeConfig::default()),
        }
    }

    /// Get the TOML config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

fn read_optional(path: &Path) -> Stage0Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Stage0Error::io(
            format!("reading config from {}", path.display()),
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::DEFAULT_DIST_SERVER;
    use tempfile::TempDir;

    #[test]
    fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let overrides = ConfigManager::new(temp.path()).load_merged().unwrap();

        assert_eq!(overrides, Overrides::default());
        assert_eq!(overrides.dist_server, DEFAULT_DIST_SERVER);
    }

    #[test]
    fn toml_wins_over_make() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("config.toml"),
            "[build]\nbuild = \"i686-unknown-linux-gnu\"\n",
        )
        .unwrap();
        fs::write(
            temp.path().join("config.mk"),
            "CFG_BUILD := x86_64-unknown-linux-gnu\nCFG_LOCAL_RUST := /usr/local\n",
        )
        .unwrap();

        let overrides = ConfigManager::new(temp.path()).load_merged().unwrap();

        assert_eq!(overrides.triple.as_deref(), Some("i686-unknown-linux-gnu"));
        let expected = PathBuf::from("/usr/local")
            .join("bin")
            .join(format!("rustc{}", EXE_SUFFIX));
        assert_eq!(overrides.rustc, Some(expected));
        assert!(overrides.cargo.is_none());
    }

    #[test]
    fn custom_path() {
        let temp = TempDir::new().unwrap();
        let custom = temp.path().join("my.toml");
        fs::write(&custom, "[build]\ncargo = \"/bin/cargo\"\n").unwrap();

        let manager = ConfigManager::new(temp.path()).with_path(custom.clone());
        assert_eq!(manager.path(), custom.as_path());

        let overrides = manager.load_merged().unwrap();
        assert_eq!(overrides.cargo, Some(PathBuf::from("/bin/cargo")));
    }

    #[test]
    fn invalid_toml_reports_path() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.toml"), "[build\n").unwrap();

        let err = ConfigManager::new(temp.path()).load_merged().unwrap_err();
        match err {
            Stage0Error::ConfigInvalid { path, .. } => {
                assert_eq!(path, temp.path().join("config.toml"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn dist_server_trailing_slash_trimmed() {
        let mut config = Config::default();
        config.build.dist_server = "https://mirror.example.com/".to_string();
        let overrides = Overrides::merge(config, MakeConfig::default());
        assert_eq!(overrides.dist_server, "https://mirror.example.com");
    }
}
