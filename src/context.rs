//! Everything the bootstrap knows about this invocation
//!
//! Built once in `main` and passed by reference to every component.

use crate::config::Overrides;
use crate::error::{Stage0Error, Stage0Result};
use crate::manifest::{ReleaseDates, MANIFEST_PATH};
use crate::toolchain::{Component, ToolPath};
use crate::triple::{self, PlatformProbe, TargetTriple};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Resolved inputs of one bootstrap run
#[derive(Debug, Clone)]
pub struct BootstrapContext {
    /// Root of the source tree (contains `src/nightlies.txt`)
    pub src_root: PathBuf,
    /// Build output directory
    pub build_dir: PathBuf,
    pub triple: TargetTriple,
    pub dates: ReleaseDates,
    pub verbose: bool,
    /// Base URL of the distribution server, without trailing slash
    pub dist_server: String,
    /// Externally provided compiler
    pub rustc_override: Option<PathBuf>,
    /// Externally provided package manager
    pub cargo_override: Option<PathBuf>,
}

impl BootstrapContext {
    /// Resolve the context for a run started in `cwd`
    pub fn resolve(
        cwd: &Path,
        overrides: Overrides,
        probe: &dyn PlatformProbe,
        verbose: bool,
    ) -> Stage0Result<Self> {
        let src_root = match overrides.src_root {
            Some(src) => cwd.join(src),
            None => find_source_root(cwd)
                .ok_or_else(|| Stage0Error::SourceRootNotFound(cwd.to_path_buf()))?,
        };
        debug!("Source root: {}", src_root.display());

        let triple = match overrides.triple {
            Some(triple) => TargetTriple::new(triple),
            None => triple::detect(probe)?,
        };
        info!("Build triple: {}", triple);

        let dates = ReleaseDates::load(&src_root)?;
        info!("Pinned dates: rustc {} / cargo {}", dates.rustc, dates.cargo);

        Ok(Self {
            src_root,
            build_dir: cwd.join("build"),
            triple,
            dates,
            verbose,
            dist_server: overrides.dist_server,
            rustc_override: overrides.rustc,
            cargo_override: overrides.cargo,
        })
    }

    /// Install root of the seed toolchain: `<build>/<triple>/stage0`
    pub fn bin_root(&self) -> PathBuf {
        self.build_dir.join(self.triple.as_str()).join("stage0")
    }

    /// Root of the date-partitioned download cache
    pub fn cache_root(&self) -> PathBuf {
        self.build_dir.join("cache")
    }

    /// Pinned release date of `component`
    pub fn date(&self, component: Component) -> &str {
        match component {
            Component::Rustc => &self.dates.rustc,
            Component::Cargo => &self.dates.cargo,
        }
    }

    /// Where `component` comes from for this run
    pub fn tool(&self, component: Component) -> ToolPath {
        let configured = match component {
            Component::Rustc => self.rustc_override.as_deref(),
            Component::Cargo => self.cargo_override.as_deref(),
        };
        ToolPath::resolve(configured, component, &self.bin_root())
    }
}

/// First directory at or above `start` containing the release manifest
pub fn find_source_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(MANIFEST_PATH).is_file())
        .map(Path::to_path_buf)
}
