//! Core date-naming logic
//!
//! Contains the forgiving date-ish parser, the template engine, and the
//! dated-file value type. Nothing in here performs I/O; directories live in
//! the storage layer.

pub mod dateish;
mod template;
mod dated_file;

pub use dateish::{Dateish, DateishError};
pub use template::{DailyRange, FieldKind, Template, TemplateError};
pub use dated_file::DatedFile;
