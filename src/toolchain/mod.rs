//! Seed toolchain components and where they live
//!
//! The seed is made of two independently pinned components: the compiler
//! (shipped as two archives, the standard library and `rustc` itself) and
//! the package manager.
//!
//! # Layout
//!
//! | Path | Contents |
//! |------|----------|
//! | `build/cache/<date>/` | downloaded archives |
//! | `build/<triple>/stage0/{bin,lib}` | installed toolchain |
//! | `build/<triple>/stage0/.rustc-stamp` | date of the installed compiler |
//! | `build/<triple>/stage0/.cargo-stamp` | date of the installed package manager |

pub mod cache;

pub use cache::{ComponentStatus, InstallReport, ToolchainCache};

use crate::triple::TargetTriple;
use std::env::consts::EXE_SUFFIX;
use std::fmt;
use std::path::{Path, PathBuf};

/// A separately pinned part of the seed toolchain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// Compiler and standard library
    Rustc,
    /// Package manager
    Cargo,
}

impl Component {
    /// Components in install order
    pub fn all() -> &'static [Self] {
        &[Self::Rustc, Self::Cargo]
    }

    /// Name of the component's executable, without suffix
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rustc => "rustc",
            Self::Cargo => "cargo",
        }
    }

    /// File name of the stamp in the install root
    pub fn stamp_file(&self) -> &'static str {
        match self {
            Self::Rustc => ".rustc-stamp",
            Self::Cargo => ".cargo-stamp",
        }
    }

    /// Directory on the distribution server holding this component's releases
    pub fn dist_dir(&self) -> &'static str {
        match self {
            Self::Rustc => "dist",
            Self::Cargo => "cargo-dist",
        }
    }

    /// Archives making up this component, in unpack order
    pub fn archives(&self, triple: &TargetTriple) -> Vec<ArchiveSpec> {
        match self {
            Self::Rustc => vec![
                ArchiveSpec::new("rust-std", triple, format!("rust-std-{}", triple)),
                ArchiveSpec::new("rustc", triple, "rustc".to_string()),
            ],
            Self::Cargo => vec![ArchiveSpec::new("cargo", triple, "cargo".to_string())],
        }
    }

    /// Where the executable lands when self-installed
    pub fn managed_path(&self, bin_root: &Path) -> PathBuf {
        bin_root
            .join("bin")
            .join(format!("{}{}", self.name(), EXE_SUFFIX))
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One release archive and the subtree to take from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSpec {
    /// `<package>-nightly-<triple>.tar.gz`
    pub filename: String,
    /// Directory inside the archive holding the installable files
    pub filter: String,
}

impl ArchiveSpec {
    fn new(package: &str, triple: &TargetTriple, filter: String) -> Self {
        Self {
            filename: format!("{}-nightly-{}.tar.gz", package, triple),
            filter,
        }
    }
}

/// Location of a toolchain executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolPath {
    /// Provided from outside; never downloaded or checked
    Override(PathBuf),
    /// Installed and kept fresh under the install root
    Managed(PathBuf),
}

impl ToolPath {
    /// Choose between a configured path and the self-installed one.
    ///
    /// A configured path inside `bin_root` still points at the managed
    /// install and is kept fresh.
    pub fn resolve(configured: Option<&Path>, component: Component, bin_root: &Path) -> Self {
        match configured {
            Some(path) if !path.starts_with(bin_root) => Self::Override(path.to_path_buf()),
            Some(path) => Self::Managed(path.to_path_buf()),
            None => Self::Managed(component.managed_path(bin_root)),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Override(path) | Self::Managed(path) => path,
        }
    }
}
