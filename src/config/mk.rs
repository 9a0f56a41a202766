//! Legacy `config.mk` support
//!
//! `./configure` writes `KEY := value` lines. Only the two keys that affect
//! the seed toolchain are read.

use std::path::PathBuf;

/// Values picked out of a `config.mk` file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MakeConfig {
    /// `CFG_BUILD`: build triple
    pub build: Option<String>,
    /// `CFG_LOCAL_RUST`: prefix of a local toolchain
    pub local_rust: Option<PathBuf>,
}

impl MakeConfig {
    /// Parse `config.mk` contents. Unknown keys and malformed lines are ignored.
    pub fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let Some((key, value)) = line.split_once(":=") else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.trim() {
                "CFG_BUILD" => config.build = Some(value.to_string()),
                "CFG_LOCAL_RUST" => config.local_rust = Some(PathBuf::from(value)),
                _ => {}
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_keys() {
        let config = MakeConfig::parse(
            "CFG_SRC_DIR := /src/\nCFG_BUILD := x86_64-unknown-linux-gnu\nCFG_LOCAL_RUST := /usr/local\n",
        );
        assert_eq!(config.build.as_deref(), Some("x86_64-unknown-linux-gnu"));
        assert_eq!(config.local_rust, Some(PathBuf::from("/usr/local")));
    }

    #[test]
    fn ignores_noise() {
        let config = MakeConfig::parse("# comment\nCFG_BUILD :=\nnot a setting\n");
        assert_eq!(config, MakeConfig::default());
    }
}
