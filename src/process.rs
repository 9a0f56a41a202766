//! Launching external commands
//!
//! Every command gets an explicitly built environment so that the freshly
//! installed toolchain, not whatever is on the system, is what runs.

use crate::error::{Stage0Error, Stage0Result};
use crate::ui::{self, UiContext};
use std::collections::BTreeMap;
use std::env;
use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// A command line together with the complete environment it runs in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub env: BTreeMap<OsString, OsString>,
    /// Working directory; ours when `None`
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    /// Invocation with an empty environment
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            cwd: None,
        }
    }

    /// Start the environment from a copy of our own
    pub fn inherit_env(mut self) -> Self {
        self.env.extend(env::vars_os());
        self
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.env
            .insert(key.as_ref().to_os_string(), value.as_ref().to_os_string());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Put `dir` in front of the search-path variable `key`
    pub fn prepend_path(mut self, key: &str, dir: &Path) -> Stage0Result<Self> {
        let mut dirs = vec![dir.to_path_buf()];
        if let Some(existing) = self.env.get(OsStr::new(key)) {
            dirs.extend(env::split_paths(existing));
        }
        let joined = env::join_paths(dirs).map_err(|e| {
            Stage0Error::io(
                format!("adding {} to {}", dir.display(), key),
                std::io::Error::new(std::io::ErrorKind::InvalidInput, e),
            )
        })?;
        self.env.insert(OsString::from(key), joined);
        Ok(self)
    }

    /// Look up a variable of the constructed environment
    pub fn get_env(&self, key: &str) -> Option<&OsStr> {
        self.env.get(OsStr::new(key)).map(OsString::as_os_str)
    }

    /// Human-readable command line for logs and errors
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|s| s.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Runs invocations to completion
pub trait Launcher {
    /// Run `invocation` and return its exit code
    fn status(&self, invocation: &Invocation) -> Stage0Result<i32>;

    /// Run as a bootstrap step: a non-zero exit is an error
    fn run_checked(&self, invocation: &Invocation) -> Stage0Result<()> {
        match self.status(invocation)? {
            0 => Ok(()),
            code => Err(Stage0Error::SubprocessFailure {
                command: invocation.command_line(),
                code,
            }),
        }
    }

    /// Run as the final handoff: the exit code is the caller's to forward
    fn run_forwarding(&self, invocation: &Invocation) -> Stage0Result<i32> {
        self.status(invocation)
    }
}

/// Launcher spawning real processes
pub struct SystemLauncher {
    ui: UiContext,
}

impl SystemLauncher {
    pub fn new(ui: UiContext) -> Self {
        Self { ui }
    }
}

impl Launcher for SystemLauncher {
    fn status(&self, invocation: &Invocation) -> Stage0Result<i32> {
        let command_line = invocation.command_line();
        ui::running(&self.ui, &command_line);
        debug!("Executing: {}", command_line);

        // Keep our output ahead of the child's
        let _ = std::io::stdout().flush();

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .env_clear()
            .envs(&invocation.env)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(ref cwd) = invocation.cwd {
            command.current_dir(cwd);
        }

        let status = command
            .status()
            .map_err(|e| Stage0Error::command_failed(command_line.clone(), e))?;

        match status.code() {
            Some(code) => {
                if code != 0 {
                    warn!("{} exited with {}", command_line, code);
                }
                Ok(code)
            }
            None => Err(Stage0Error::ProcessSignaled(command_line)),
        }
    }
}
