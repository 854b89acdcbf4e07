//! Tooling & Integration Layer
//!
//! Command-line access to the virtual filesystem.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
