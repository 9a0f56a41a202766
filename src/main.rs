//! stage0 - seed toolchain bootstrap
//!
//! CLI entry point: resolves the context, prepares the toolchain and exits
//! with the build driver's exit code.

use clap::Parser;
use console::style;
use stage0::bootstrap;
use stage0::cli::Cli;
use stage0::config::ConfigManager;
use stage0::context::BootstrapContext;
use stage0::error::{Stage0Error, Stage0Result};
use stage0::fetch::HttpFetcher;
use stage0::process::SystemLauncher;
use stage0::triple::UnameProbe;
use stage0::ui::UiContext;
use stage0::unpack::TarballUnpacker;
use std::ffi::OsString;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            1
        }
    };
    std::process::exit(code);
}

fn run() -> Stage0Result<i32> {
    let cli = Cli::parse();
    let verbosity = cli.verbosity();

    // RUST_LOG wins; otherwise 0 = warn, 1 = info, 2+ = debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbosity {
        0 => EnvFilter::new("stage0=warn"),
        1 => EnvFilter::new("stage0=info"),
        _ => EnvFilter::new("stage0=debug"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let cwd = std::env::current_dir()
        .map_err(|e| Stage0Error::io("getting current directory", e))?;

    let config_manager = match cli.config_path() {
        Some(path) => ConfigManager::new(&cwd).with_path(cwd.join(path)),
        None => ConfigManager::new(&cwd),
    };
    debug!("Config file: {}", config_manager.path().display());
    let overrides = config_manager.load_merged()?;

    let ctx = BootstrapContext::resolve(&cwd, overrides, &UnameProbe, verbosity > 0)?;

    let ui = UiContext::detect(ctx.verbose);
    let fetcher = HttpFetcher::new(ui.clone());
    let unpacker = TarballUnpacker::new(ui.clone());
    let launcher = SystemLauncher::new(ui);

    // The driver parses the same command line, so pass it on untouched
    let args: Vec<OsString> = std::env::args_os().skip(1).collect();

    bootstrap::run(&ctx, &fetcher, &unpacker, &launcher, &args)
}
