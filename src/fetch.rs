//! Downloading release archives

use crate::error::{Stage0Error, Stage0Result};
use crate::ui::{self, DownloadProgress, UiContext};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Retrieves a remote resource into a local file
pub trait Fetcher {
    /// Download `url` to `dest`. `dest` only appears once the whole body has
    /// been received.
    fn fetch(&self, url: &str, dest: &Path) -> Stage0Result<()>;
}

/// HTTP(S) fetcher
pub struct HttpFetcher {
    ui: UiContext,
}

impl HttpFetcher {
    pub fn new(ui: UiContext) -> Self {
        Self { ui }
    }

    fn download(&self, url: &str, to: &Path) -> Stage0Result<u64> {
        let response = ureq::get(url)
            .call()
            .map_err(|e| Stage0Error::transfer(url, e))?;

        let len = response
            .headers()
            .get(ureq::http::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let progress = DownloadProgress::new(&self.ui, len);
        let mut reader = progress.wrap(response.into_body().into_reader());
        let mut file = File::create(to)
            .map_err(|e| Stage0Error::io(format!("creating {}", to.display()), e))?;
        let written = io::copy(&mut reader, &mut file).map_err(|e| Stage0Error::transfer(url, e))?;
        file.sync_all()
            .map_err(|e| Stage0Error::io(format!("flushing {}", to.display()), e))?;
        progress.finish();

        Ok(written)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Stage0Result<()> {
        ui::step(&format!("downloading {}", url));

        let partial = partial_path(dest);
        match self.download(url, &partial) {
            Ok(bytes) => debug!("Received {} bytes from {}", bytes, url),
            Err(e) => {
                let _ = fs::remove_file(&partial);
                return Err(e);
            }
        }

        fs::rename(&partial, dest).map_err(|e| {
            Stage0Error::io(
                format!("moving {} to {}", partial.display(), dest.display()),
                e,
            )
        })
    }
}

/// Where a download is written before it is complete
pub fn partial_path(dest: &Path) -> PathBuf {
    let mut name = OsString::from(dest.file_name().unwrap_or_default());
    name.push(".partial");
    dest.with_file_name(name)
}
