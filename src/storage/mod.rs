//! Filesystem layer
//!
//! The narrow collaborator interface the core needs from the filesystem,
//! its `std::fs` implementation, and the directory view built on top of it.
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`FileSystem`] / [`OsFileSystem`] | list children, existence check, resolve real directory |
//! | [`DirectoryView`] | sorted snapshot of template-matching files plus range queries |

mod fs;
mod directory;

pub use fs::{DirectoryError, FileSystem, OsFileSystem};
pub use directory::DirectoryView;
