//! Command-line interface for license-report
//!
//! This module provides the main CLI structure and command handling.
//! It uses clap for argument parsing and console for styled output.

pub mod commands;
mod output;

pub use commands::Cli;
pub use output::Output;
