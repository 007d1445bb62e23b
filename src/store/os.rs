//! Local filesystem store.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use super::{FileStore, has_extension};

const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Store over the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsStore;

impl FileStore for OsStore {
    fn list(&self, root: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
        // A missing root is an error, not an empty tree
        fs::metadata(root)?;

        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort(true).skip_hidden(false) {
            let entry = entry.map_err(io::Error::other)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_str().unwrap_or_default();
            if IGNORED_FILES.contains(&name) {
                continue;
            }
            let path = entry.path();
            if has_extension(&path, extension) {
                files.push(path);
            }
        }
        Ok(files)
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}
