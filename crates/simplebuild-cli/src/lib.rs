//! # simplebuild-cli
//!
//! Command tree for the `simplebuild` binary: build commands, target and
//! hook listings, and configuration checks, with table or JSON output.

pub mod commands;
pub mod output;

pub use commands::Cli;
pub use output::OutputFormat;
