use crate::models::{ Listing, ListingTree };
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{ Path, PathBuf };
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot read '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("'{}' is a hidden file", .0.display())]
    Hidden(PathBuf),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ScanError + '_ {
    move |source| ScanError::Io { path: path.to_path_buf(), source }
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Builds the listing tree for `path`. Symlinks are followed. Hidden files
/// are left out, hidden directories are not. Entries that are neither files
/// nor directories, or whose names are not UTF-8, are skipped with a warning.
pub fn scan_directory(path: &Path) -> Result<ListingTree, ScanError> {
    let meta = fs::metadata(path).map_err(io_error(path))?;
    if meta.is_file() {
        if path.file_name().is_some_and(is_hidden) {
            return Err(ScanError::Hidden(path.to_path_buf()));
        }
        return Ok(ListingTree::File);
    }
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory(path.to_path_buf()));
    }
    let mut ancestors = Vec::new();
    scan_dir(path, &mut ancestors).map(ListingTree::Directory)
}

/// Like [`scan_directory`], but the root must be a directory.
pub fn scan_listing(path: &Path) -> Result<Listing, ScanError> {
    match scan_directory(path)? {
        ListingTree::Directory(entries) => Ok(Listing::new(entries)),
        ListingTree::File => Err(ScanError::NotADirectory(path.to_path_buf())),
    }
}

fn scan_dir(
    dir: &Path,
    ancestors: &mut Vec<PathBuf>
) -> Result<HashMap<String, ListingTree>, ScanError> {
    let canonical = fs::canonicalize(dir).map_err(io_error(dir))?;
    ancestors.push(canonical);

    let mut entries = HashMap::new();
    for entry in fs::read_dir(dir).map_err(io_error(dir))? {
        let entry = entry.map_err(io_error(dir))?;
        let path = entry.path();
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => {
                warn!(path = %path.display(), "skipping non-UTF-8 name");
                continue;
            }
        };

        let meta = match fs::metadata(&path) {
            Ok(meta) => meta,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable entry");
                continue;
            }
        };

        if meta.is_file() {
            if !name.starts_with('.') {
                entries.insert(name, ListingTree::File);
            }
        } else if meta.is_dir() {
            let target = fs::canonicalize(&path).map_err(io_error(&path))?;
            if ancestors.contains(&target) {
                warn!(path = %path.display(), "skipping directory cycle");
                continue;
            }
            entries.insert(name, ListingTree::Directory(scan_dir(&path, ancestors)?));
        } else {
            warn!(path = %path.display(), "skipping entry that is neither file nor directory");
        }
    }

    ancestors.pop();
    Ok(entries)
}
