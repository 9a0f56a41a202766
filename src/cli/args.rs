//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// stage0 - fetch the pinned seed toolchain and run the build driver
///
/// Every argument, including the ones stage0 understands itself, is passed
/// on to the build driver.
#[derive(Parser, Debug)]
#[command(name = "stage0")]
#[command(author, version, about, long_about = None)]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path (defaults to ./config.toml)
    #[arg(long, env = "STAGE0_CONFIG")]
    pub config: Option<PathBuf>,

    /// Arguments for the build driver
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<OsString>,
}

impl Cli {
    /// Verbosity level, counting `-v` flags given after the driver command too
    pub fn verbosity(&self) -> u8 {
        let trailing = self
            .args
            .iter()
            .map(|arg| match arg.to_str() {
                Some("-v" | "--verbose") => 1,
                Some(short) if is_verbose_cluster(short) => short.len() - 1,
                _ => 0,
            })
            .sum::<usize>();
        self.verbose
            .saturating_add(u8::try_from(trailing).unwrap_or(u8::MAX))
    }

    /// Config path, also honouring `--config` given after the driver command
    pub fn config_path(&self) -> Option<PathBuf> {
        if self.config.is_some() {
            return self.config.clone();
        }

        let mut args = self.args.iter();
        while let Some(arg) = args.next() {
            let Some(arg) = arg.to_str() else {
                continue;
            };
            if arg == "--config" {
                return args.next().map(PathBuf::from);
            }
            if let Some(path) = arg.strip_prefix("--config=") {
                return Some(PathBuf::from(path));
            }
        }
        None
    }
}

/// `-vv`, `-vvv`, ...
fn is_verbose_cluster(arg: &str) -> bool {
    arg.len() > 2
        && arg.starts_with('-')
        && !arg.starts_with("--")
        && arg[1..].chars().all(|c| c == 'v')
}
