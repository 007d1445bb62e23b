//! File stores backing the loader.
//!
//! A store only has to enumerate files under a root and read them:
//!
//! - `OsStore` - the local filesystem, walked with `jwalk`
//! - `MemoryStore` - an in-memory map, for embedding and tests

mod memory;
mod os;

use std::io;
use std::path::{Path, PathBuf};

pub use memory::MemoryStore;
pub use os::OsStore;

/// Read-only access to template sources.
pub trait FileStore: Send + Sync {
    /// List files under `root` (recursively) whose name ends with `extension`.
    ///
    /// Returned paths start with `root`.
    fn list(&self, root: &Path, extension: &str) -> io::Result<Vec<PathBuf>>;

    /// Read a file as UTF-8 text.
    fn read(&self, path: &Path) -> io::Result<String>;
}

/// Whether `path` names a file with the given extension suffix.
///
/// Matches on the whole file name, so multi-dot extensions like
/// `.tmpl.html` work.
pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(extension))
}
