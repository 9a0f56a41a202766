//! Terminal output for the bootstrap
//!
//! Progress bars are drawn only on interactive terminals; CI logs get the
//! plain "downloading"/"extracting" lines.

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{detail, running, step};
pub use progress::DownloadProgress;
