//! Keeping the seed toolchain installed and current
//!
//! A component is reinstalled when its executable is missing or its stamp
//! does not hold the pinned date. Archives are kept in a cache partitioned by
//! release date, so reinstalling a date that was downloaded before does not
//! touch the network.
//!
//! There is no locking: two runs installing into the same build directory at
//! the same time can corrupt each other's install.

use super::{Component, ToolPath};
use crate::context::BootstrapContext;
use crate::error::{Stage0Error, Stage0Result};
use crate::fetch::Fetcher;
use crate::stamp::Stamp;
use crate::unpack::Unpacker;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What happened to a component during [`ToolchainCache::ensure`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentStatus {
    /// Provided from outside, left alone
    Overridden(PathBuf),
    /// Already installed at the pinned date
    Fresh,
    /// (Re)installed; `downloaded` archives came from the network
    Installed { downloaded: usize },
}

/// Outcome of ensuring both components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub rustc: ComponentStatus,
    pub cargo: ComponentStatus,
}

/// Download cache and install root manager
pub struct ToolchainCache<'a> {
    ctx: &'a BootstrapContext,
    fetcher: &'a dyn Fetcher,
    unpacker: &'a dyn Unpacker,
}

impl<'a> ToolchainCache<'a> {
    pub fn new(
        ctx: &'a BootstrapContext,
        fetcher: &'a dyn Fetcher,
        unpacker: &'a dyn Unpacker,
    ) -> Self {
        Self {
            ctx,
            fetcher,
            unpacker,
        }
    }

    /// Make sure the compiler, then the package manager, are installed at
    /// their pinned dates
    pub fn ensure(&self) -> Stage0Result<InstallReport> {
        let rustc = self.ensure_component(Component::Rustc)?;
        let cargo = self.ensure_component(Component::Cargo)?;
        Ok(InstallReport { rustc, cargo })
    }

    /// Stamp tracking `component` in the install root
    pub fn stamp(&self, component: Component) -> Stamp {
        Stamp::new(self.ctx.bin_root().join(component.stamp_file()))
    }

    /// Whether `component` needs (re)installing at the install location `binary`
    pub fn is_stale(&self, component: Component, binary: &Path) -> Stage0Result<bool> {
        if !binary.exists() {
            debug!("{} not found at {}", component, binary.display());
            return Ok(true);
        }
        Ok(!self.stamp(component).is_current(self.ctx.date(component))?)
    }

    fn ensure_component(&self, component: Component) -> Stage0Result<ComponentStatus> {
        let binary = match self.ctx.tool(component) {
            ToolPath::Override(path) => {
                info!("Using configured {} at {}", component, path.display());
                return Ok(ComponentStatus::Overridden(path));
            }
            ToolPath::Managed(path) => path,
        };

        if !self.is_stale(component, &binary)? {
            debug!("{} {} is up to date", component, self.ctx.date(component));
            return Ok(ComponentStatus::Fresh);
        }

        let date = self.ctx.date(component);
        info!("Installing {} {} into {}", component, date, self.ctx.bin_root().display());

        let cache_dir = self.ctx.cache_root().join(date);
        fs::create_dir_all(&cache_dir)
            .map_err(|e| Stage0Error::io(format!("creating {}", cache_dir.display()), e))?;

        let mut downloaded = 0;
        for archive in component.archives(&self.ctx.triple) {
            let tarball = cache_dir.join(&archive.filename);
            if tarball.exists() {
                debug!("Using cached {}", tarball.display());
            } else {
                let url = format!(
                    "{}/{}/{}/{}",
                    self.ctx.dist_server,
                    component.dist_dir(),
                    date,
                    archive.filename
                );
                self.fetcher.fetch(&url, &tarball)?;
                downloaded += 1;
            }
            self.unpacker
                .unpack(&tarball, &self.ctx.bin_root(), Some(&archive.filter))?;
        }

        // Last write of the install: anything failing above leaves it stale
        self.stamp(component).write(date)?;
        Ok(ComponentStatus::Installed { downloaded })
    }
}
