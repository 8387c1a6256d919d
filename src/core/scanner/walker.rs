//! Directory walking implementation using walkdir.

use super::filter::ImageFilter;
use crate::error::ScanError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, FilterEntry, WalkDir};

type Prune<'a> = Box<dyn FnMut(&DirEntry) -> bool + Send + 'a>;

/// Collects candidate photos under a root directory
#[derive(Default)]
pub struct WalkDirCollector {
    filter: ImageFilter,
}

impl WalkDirCollector {
    /// Create a collector with the default filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Start collecting photos under `root`.
    ///
    /// Without `recursive` only the direct children of `root` are
    /// considered. The returned iterator is lazy and single-use; call
    /// `collect` again for a fresh pass. Paths are absolute. Their order
    /// is whatever the filesystem returns.
    pub fn collect(&self, root: &Path, recursive: bool) -> Result<ImageFiles<'_>, ScanError> {
        let invalid = || ScanError::InvalidRoot {
            path: root.to_path_buf(),
        };
        let root = fs::canonicalize(root).map_err(|_| invalid())?;
        if !root.is_dir() {
            return Err(invalid());
        }

        debug!(root = %root.display(), recursive, "Collecting photos");

        let mut walker = WalkDir::new(&root).min_depth(1).follow_links(false);
        if !recursive {
            walker = walker.max_depth(1);
        }

        let filter = &self.filter;
        let prune: Prune<'_> = Box::new(move |entry: &DirEntry| {
            !(entry.file_type().is_dir() && filter.is_excluded_dir(entry.path()))
        });

        Ok(ImageFiles {
            inner: walker.into_iter().filter_entry(prune),
            filter,
        })
    }
}

/// Lazy stream of photo paths produced by [`WalkDirCollector::collect`]
pub struct ImageFiles<'a> {
    inner: FilterEntry<walkdir::IntoIter, Prune<'a>>,
    filter: &'a ImageFilter,
}

impl Iterator for ImageFiles<'_> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            match self.inner.next()? {
                Ok(entry) => {
                    let path = entry.path();
                    // Symlinks are not followed for directories, but a link to a photo counts
                    let is_file = entry.file_type().is_file()
                        || (entry.path_is_symlink() && path.is_file());
                    if is_file && self.filter.should_include(path) {
                        return Some(entry.into_path());
                    }
                }
                Err(e) => {
                    let path = e.path().map(|p| p.display().to_string()).unwrap_or_default();
                    warn!(%path, error = %e, "Skipping unreadable entry");
                }
            }
        }
    }
}
