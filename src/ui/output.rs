//! Output functions for consistent CLI formatting

use super::context::UiContext;
use console::style;

/// Announce a step of the bootstrap (always shown)
pub fn step(message: &str) {
    println!("{}", message);
}

/// Show per-item detail in verbose mode
pub fn detail(ctx: &UiContext, message: &str) {
    if ctx.is_verbose() {
        println!("  {}", style(message).dim());
    }
}

/// Announce a command about to run in verbose mode
pub fn running(ctx: &UiContext, command: &str) {
    if ctx.is_verbose() {
        println!("{} {}", style("running:").dim(), command);
    }
}
