//! # Command-Line Interface
//!
//! Thin wrappers over the library core.
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `name` | template + date → filename |
//! | `extract` | template + filename → embedded date |
//! | `match` | does a filename conform to a template |
//! | `list` | sorted matching files in a directory, with range filters |
//! | `has` | live existence check for one date's file |
//! | `daily-since` | one filename per day from a start date forward |
//!
//! All commands support `--format text|json` and `--verbose`. Call
//! [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod commands;
mod output;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
