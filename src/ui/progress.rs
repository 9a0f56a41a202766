//! Download progress with CI fallback

use super::context::UiContext;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Read;

/// Progress bar for archive downloads.
///
/// Shows an indicatif byte counter in interactive mode and nothing in CI,
/// where the preceding "downloading" line is enough.
pub struct DownloadProgress {
    bar: Option<ProgressBar>,
}

impl DownloadProgress {
    /// Create a progress indicator for a transfer of `len` bytes, if known
    pub fn new(ctx: &UiContext, len: Option<u64>) -> Self {
        if !ctx.use_fancy_output() {
            return Self { bar: None };
        }

        let bar = match len {
            Some(len) => {
                let bar = ProgressBar::new(len);
                if let Ok(style) = ProgressStyle::default_bar().template(
                    "  {spinner:.cyan} {bar:30.cyan/dim} {bytes}/{total_bytes} {bytes_per_sec:.dim} {eta:.dim}",
                ) {
                    bar.set_style(style.progress_chars("━╸─"));
                }
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                if let Ok(style) =
                    ProgressStyle::default_spinner().template("  {spinner:.cyan} {bytes} {bytes_per_sec:.dim}")
                {
                    bar.set_style(style);
                }
                bar
            }
        };

        Self { bar: Some(bar) }
    }

    /// Wrap a reader so that bytes read advance the bar
    pub fn wrap<'a, R: Read + 'a>(&self, reader: R) -> Box<dyn Read + 'a> {
        match self.bar {
            Some(ref bar) => Box::new(bar.clone().wrap_read(reader)),
            None => Box::new(reader),
        }
    }

    /// Remove the bar once the transfer is over
    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}
