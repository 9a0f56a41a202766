//! Stamp files recording which release is installed
//!
//! A stamp holds the release date of the last complete install of a
//! component. A missing stamp means the same as an outdated one.

use crate::error::{Stage0Error, Stage0Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A marker file next to an installed component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    path: PathBuf,
}

impl Stamp {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Date recorded by the last successful install, if any
    pub fn read(&self) -> Stage0Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content.trim_end().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Stage0Error::io(
                format!("reading stamp {}", self.path.display()),
                e,
            )),
        }
    }

    /// Whether the stamp records exactly `date`
    pub fn is_current(&self, date: &str) -> Stage0Result<bool> {
        let recorded = self.read()?;
        debug!(
            "Stamp {}: recorded={:?} pinned={}",
            self.path.display(),
            recorded,
            date
        );
        Ok(recorded.as_deref() == Some(date))
    }

    /// Record `date`. Only call once the install it describes is complete.
    pub fn write(&self, date: &str) -> Stage0Result<()> {
        fs::write(&self.path, date)
            .map_err(|e| Stage0Error::io(format!("writing stamp {}", self.path.display()), e))
    }
}
