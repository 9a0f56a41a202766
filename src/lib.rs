//! stage0 - seed toolchain bootstrap
//!
//! Detects the host triple, installs the pinned compiler and package
//! manager into the build directory, compiles the build driver with them
//! and hands off to it.

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod fetch;
pub mod manifest;
pub mod process;
pub mod stamp;
pub mod toolchain;
pub mod triple;
pub mod ui;
pub mod unpack;

#[cfg(test)]
mod testing;

pub use error::{Stage0Error, Stage0Result};
