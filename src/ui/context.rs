//! UI context for detecting interactive vs CI environments

use std::io::IsTerminal;

/// UI context that determines output behavior
#[derive(Debug, Clone)]
pub struct UiContext {
    /// Whether progress can be drawn on a terminal
    interactive: bool,
    /// Whether -v was passed
    verbose: bool,
}

impl UiContext {
    /// Detect the current environment
    pub fn detect(verbose: bool) -> Self {
        Self {
            interactive: Self::detect_interactive(),
            verbose,
        }
    }

    /// Create a non-interactive context (for testing or explicit CI mode)
    pub fn non_interactive() -> Self {
        Self {
            interactive: false,
            verbose: false,
        }
    }

    /// Set verbose mode
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Check if we should draw progress bars
    pub fn use_fancy_output(&self) -> bool {
        self.interactive
    }

    /// Check if per-entry detail should be printed
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Detect if running in an interactive environment
    fn detect_interactive() -> bool {
        // Progress bars draw on stderr
        if !std::io::stderr().is_terminal() {
            return false;
        }

        if std::env::var("CI").is_ok() {
            return false;
        }

        // Common CI environment indicators
        let ci_vars = [
            "GITHUB_ACTIONS",
            "GITLAB_CI",
            "BUILDKITE",
            "TF_BUILD",
            "JENKINS_URL",
        ];

        !ci_vars.iter().any(|var| std::env::var(var).is_ok())
    }
}
