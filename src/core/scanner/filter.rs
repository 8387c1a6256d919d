//! File and directory filtering logic for the collector.

use std::collections::HashSet;
use std::path::Path;

/// Extensions the collector picks up, compared case-insensitively
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

/// Directory names NAS appliances use for thumbnail and metadata caches.
///
/// They are full of small JPEGs that are not the user's photos, so a
/// recursive walk never enters them.
pub const EXCLUDED_DIRECTORIES: [&str; 5] =
    ["@eaDir", "@__thumb", ".@__thumb", "#recycle", "#snapshot"];

/// Decides which entries the collector yields and which directories it prunes
pub struct ImageFilter {
    /// File extensions to include (lowercase)
    extensions: HashSet<String>,
    /// Directory names never descended into
    excluded_dirs: HashSet<String>,
}

impl ImageFilter {
    /// Create a new filter with the default extensions and exclusions
    pub fn new() -> Self {
        Self {
            extensions: SUPPORTED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            excluded_dirs: EXCLUDED_DIRECTORIES.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// Check if a file has a supported image extension
    pub fn should_include(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }

    /// Check if a directory must be skipped along with everything below it
    pub fn is_excluded_dir(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|name| self.excluded_dirs.contains(name))
            .unwrap_or(false)
    }
}

impl Default for ImageFilter {
    fn default() -> Self {
        Self::new()
    }
}
