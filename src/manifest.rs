//! Pinned release dates
//!
//! `src/nightlies.txt` names the upstream nightly that seeds each component:
//!
//! ```text
//! rustc: 2016-01-01
//! cargo: 2016-01-01
//! ```

use crate::error::{Stage0Error, Stage0Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// Location of the manifest relative to the source root
pub const MANIFEST_PATH: &str = "src/nightlies.txt";

/// Release dates for the two seed components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDates {
    pub rustc: String,
    pub cargo: String,
}

impl ReleaseDates {
    /// Read the manifest below `src_root`
    pub fn load(src_root: &Path) -> Stage0Result<Self> {
        let path = src_root.join(MANIFEST_PATH);
        let content = fs::read_to_string(&path)
            .map_err(|e| Stage0Error::io(format!("reading {}", path.display()), e))?;
        Self::parse(&content, &path)
    }

    /// Parse manifest contents; `path` is only used in error messages
    pub fn parse(content: &str, path: &Path) -> Stage0Result<Self> {
        let mut lines = content.lines();
        let rustc = date_line(lines.next(), "rustc", path)?;
        let cargo = date_line(lines.next(), "cargo", path)?;
        Ok(Self { rustc, cargo })
    }
}

fn date_line(line: Option<&str>, component: &str, path: &Path) -> Stage0Result<String> {
    let invalid = |reason: String| Stage0Error::ManifestInvalid {
        path: PathBuf::from(path),
        reason,
    };

    let line = line.ok_or_else(|| invalid(format!("missing `{component}:` line")))?;
    let prefix = format!("{component}: ");
    let date = line
        .trim_end_matches('\r')
        .strip_prefix(&prefix)
        .ok_or_else(|| invalid(format!("expected `{prefix}<date>`, found `{line}`")))?;

    if date.is_empty() {
        return Err(invalid(format!("empty {component} date")));
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| invalid(format!("bad {component} date `{date}`: {e}")))?;

    Ok(date.to_string())
}
