//! datefile - name, match, and enumerate files with embedded dates
//!
//! Log- and data-rotation workflows name files from a date template like
//! `daily_update_%Y-%m-%d.txt`. This crate compiles such templates into a
//! generator (date → filename) and a matcher (filename → embedded date),
//! and builds directory views on top: list the conforming files in a
//! directory, oldest first, and query them by date range.
//!
//! ```no_run
//! use datefile::{DirectoryView, Template};
//!
//! # fn main() -> anyhow::Result<()> {
//! let template = Template::compile("daily_update_%Y-%m-%d.txt")?;
//! assert_eq!(
//!     template.filename_for("20230615")?,
//!     "daily_update_2023-06-15.txt"
//! );
//!
//! let view = DirectoryView::open(&template, "/var/updates")?;
//! for file in view.since("2023-06-01")? {
//!     println!("{}", file.path().display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{DailyRange, DatedFile, Dateish, DateishError, Template, TemplateError};
pub use storage::{DirectoryError, DirectoryView, FileSystem, OsFileSystem};
