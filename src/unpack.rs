//! Relocating extraction of release tarballs
//!
//! Release archives wrap everything in one top-level directory, with one
//! subdirectory per installable component:
//!
//! ```text
//! rustc-nightly-x86_64-unknown-linux-gnu/
//!     rustc/bin/rustc
//!     rustc/lib/...
//!     install.sh
//! ```
//!
//! Unpacking with filter `rustc` lands `bin/rustc` and `lib/...` directly in
//! the destination. Entries are staged at their archive path under the
//! destination first and then moved into place.

use crate::error::{Stage0Error, Stage0Result};
use crate::ui::{self, UiContext};
use flate2::read::GzDecoder;
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Component, Path, PathBuf};
use tar::Archive;
use tracing::debug;

/// Extracts a component subtree of an archive into a directory
pub trait Unpacker {
    /// Extract the entries of `archive` below `filter` (or all entries when
    /// `None`) into `dst`, with the top-level directory and `filter` stripped.
    fn unpack(&self, archive: &Path, dst: &Path, filter: Option<&str>) -> Stage0Result<()>;
}

/// Unpacker for `.tar.gz` archives
pub struct TarballUnpacker {
    ui: UiContext,
}

impl TarballUnpacker {
    pub fn new(ui: UiContext) -> Self {
        Self { ui }
    }
}

impl Unpacker for TarballUnpacker {
    fn unpack(&self, archive: &Path, dst: &Path, filter: Option<&str>) -> Stage0Result<()> {
        ui::step(&format!("extracting {}", archive.display()));

        let fail = |reason: std::io::Error| Stage0Error::extraction(archive, reason);

        fs::create_dir_all(dst).map_err(fail)?;
        let file = File::open(archive).map_err(fail)?;
        let mut tar = Archive::new(GzDecoder::new(file));

        let mut staging_roots = BTreeSet::new();
        let mut moved = 0usize;

        for entry in tar.entries().map_err(fail)? {
            let mut entry = entry.map_err(fail)?;
            let path = entry.path().map_err(fail)?.into_owned();

            let Some(relative) = relocate(&path, filter) else {
                continue;
            };

            ui::detail(&self.ui, &format!("extracting {}", path.display()));
            if !entry.unpack_in(dst).map_err(fail)? {
                debug!("Skipped entry outside destination: {}", path.display());
                continue;
            }
            if let Some(Component::Normal(root)) = path.components().next() {
                staging_roots.insert(OsString::from(root));
            }

            let staged = dst.join(&path);
            let target = dst.join(&relative);

            // Directories merge into what is already there; files replace it
            let staged_is_dir = fs::symlink_metadata(&staged).is_ok_and(|m| m.is_dir());
            if staged_is_dir && fs::symlink_metadata(&target).is_ok() {
                continue;
            }
            move_entry(&staged, &target).map_err(fail)?;
            moved += 1;
        }

        for root in staging_roots {
            let staging = dst.join(root);
            if staging.exists() {
                fs::remove_dir_all(&staging).map_err(fail)?;
            }
        }

        debug!(
            "Moved {} entries from {} into {}",
            moved,
            archive.display(),
            dst.display()
        );
        Ok(())
    }
}

/// Destination of an archive entry relative to the unpack directory, or
/// `None` when the entry is not extracted.
///
/// The archive's top-level directory is always stripped, and `filter` as
/// well when given. The top-level directory entry itself is never extracted.
pub fn relocate(path: &Path, filter: Option<&str>) -> Option<PathBuf> {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(_)) => {}
        _ => return None,
    }
    let rest = components.as_path();
    if rest.as_os_str().is_empty() {
        return None;
    }

    match filter {
        Some(prefix) => rest.strip_prefix(prefix).ok().map(Path::to_path_buf),
        None => Some(rest.to_path_buf()),
    }
}

fn move_entry(staged: &Path, target: &Path) -> std::io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    if let Ok(meta) = fs::symlink_metadata(target) {
        if !meta.is_dir() {
            fs::remove_file(target)?;
        }
    }
    fs::rename(staged, target)
}
