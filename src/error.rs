//! Error types for stage0
//!
//! All modules use `Stage0Result<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for stage0 operations
pub type Stage0Result<T> = Result<T, Stage0Error>;

/// All errors that can occur while bootstrapping the seed toolchain
#[derive(Error, Debug)]
pub enum Stage0Error {
    // Platform errors
    #[error("Unsupported platform: unknown {probe} `{value}`")]
    UnsupportedPlatform { probe: &'static str, value: String },

    // Acquisition errors
    #[error("Failed to download {url}: {reason}")]
    TransferFailure { url: String, reason: String },

    #[error("Failed to extract {archive}: {reason}")]
    ExtractionFailure { archive: PathBuf, reason: String },

    // Input errors
    #[error("Invalid release manifest at {path}: {reason}")]
    ManifestInvalid { path: PathBuf, reason: String },

    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Could not find src/nightlies.txt in {0} or any parent directory")]
    SourceRootNotFound(PathBuf),

    // Process errors
    #[error("Command failed: {command}, exit code: {code}")]
    SubprocessFailure { command: String, code: i32 },

    #[error("Failed to run: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Process terminated by signal: {0}")]
    ProcessSignaled(String),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl Stage0Error {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a transfer failure for `url`
    pub fn transfer(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::TransferFailure {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an extraction failure for `archive`
    pub fn extraction(archive: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ExtractionFailure {
            archive: archive.into(),
            reason: reason.to_string(),
        }
    }

    /// Check if re-running the bootstrap can be expected to get past this error.
    ///
    /// Stamps are only written after a complete install, so a failed fetch or
    /// unpack leaves the component stale and the next run starts it over.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::TransferFailure { .. } | Self::ExtractionFailure { .. }
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::UnsupportedPlatform { .. } => {
                Some("Set `build = \"<triple>\"` under [build] in config.toml")
            }
            Self::TransferFailure { .. } => Some("Check your network connection and run again"),
            Self::ExtractionFailure { .. } => {
                Some("Delete the cached archive under build/cache and run again")
            }
            Self::SourceRootNotFound(_) => {
                Some("Run from inside the source tree or set `src` under [build] in config.toml")
            }
            _ => None,
        }
    }
}
