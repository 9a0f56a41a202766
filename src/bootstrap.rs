//! Building and handing off to the build driver
//!
//! Once the seed toolchain is in place, the driver crate at
//! `src/bootstrap/Cargo.toml` is compiled with it and then run with the
//! caller's arguments.

use crate::context::BootstrapContext;
use crate::error::Stage0Result;
use crate::fetch::Fetcher;
use crate::process::{Invocation, Launcher};
use crate::toolchain::{Component, ToolchainCache};
use crate::unpack::Unpacker;
use std::env::consts::EXE_SUFFIX;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::info;

/// Orchestrates the compile-and-run steps after the toolchain is ready
pub struct Bootstrap<'a> {
    ctx: &'a BootstrapContext,
    launcher: &'a dyn Launcher,
}

impl<'a> Bootstrap<'a> {
    pub fn new(ctx: &'a BootstrapContext, launcher: &'a dyn Launcher) -> Self {
        Self { ctx, launcher }
    }

    /// Cargo target directory the driver is built into
    pub fn target_dir(&self) -> PathBuf {
        self.ctx.build_dir.join("bootstrap")
    }

    /// Path of the compiled driver
    pub fn driver_path(&self) -> PathBuf {
        self.target_dir()
            .join("debug")
            .join(format!("bootstrap{}", EXE_SUFFIX))
    }

    /// Command compiling the driver with the seed toolchain
    pub fn build_invocation(&self) -> Stage0Result<Invocation> {
        let bin_root = self.ctx.bin_root();
        let manifest = self.ctx.src_root.join("src").join("bootstrap").join("Cargo.toml");

        Invocation::new(self.ctx.tool(Component::Cargo).path())
            .inherit_env()
            .args([
                OsString::from("build"),
                OsString::from("--manifest-path"),
                manifest.into_os_string(),
            ])
            .env("CARGO_TARGET_DIR", self.target_dir())
            .env("RUSTC", self.ctx.tool(Component::Rustc).path())
            .env("LD_LIBRARY_PATH", bin_root.join("lib"))
            .env("DYLD_LIBRARY_PATH", bin_root.join("lib"))
            .prepend_path("PATH", &bin_root.join("bin"))
    }

    /// Command running the driver with the caller's `args`
    pub fn driver_invocation(&self, args: &[OsString]) -> Invocation {
        let lib = self.ctx.bin_root().join("lib");

        Invocation::new(self.driver_path())
            .inherit_env()
            .args(args)
            .arg("--src")
            .arg(&self.ctx.src_root)
            .arg("--build")
            .arg(self.ctx.triple.as_str())
            .env("RUSTC", self.ctx.tool(Component::Rustc).path())
            .env("LD_LIBRARY_PATH", &lib)
            .env("DYLD_LIBRARY_PATH", &lib)
            .env("BOOTSTRAP_PARENT_ID", std::process::id().to_string())
    }

    /// Compile the driver; any failure aborts the bootstrap
    pub fn build_driver(&self) -> Stage0Result<()> {
        info!("Compiling build driver into {}", self.target_dir().display());
        self.launcher.run_checked(&self.build_invocation()?)
    }

    /// Run the driver and return its exit code unchanged
    pub fn hand_off(&self, args: &[OsString]) -> Stage0Result<i32> {
        info!("Handing off to {}", self.driver_path().display());
        self.launcher.run_forwarding(&self.driver_invocation(args))
    }
}

/// Full bootstrap: ensure the toolchain, compile the driver, run it.
///
/// Returns the driver's exit code; errors are failures of the bootstrap
/// itself.
pub fn run(
    ctx: &BootstrapContext,
    fetcher: &dyn Fetcher,
    unpacker: &dyn Unpacker,
    launcher: &dyn Launcher,
    args: &[OsString],
) -> Stage0Result<i32> {
    let report = ToolchainCache::new(ctx, fetcher, unpacker).ensure()?;
    info!("Toolchain ready: rustc {:?}, cargo {:?}", report.rustc, report.cargo);

    let bootstrap = Bootstrap::new(ctx, launcher);
    bootstrap.build_driver()?;
    bootstrap.hand_off(args)
}
