//! Types for the scan results table.

use crate::core::discrepancy::Discrepancy;
use crate::core::metadata::{DateFields, DateTag};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Lifecycle of a [`ScanSession`](super::ScanSession)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No scan has been started
    Idle,
    /// A worker is producing results
    Scanning,
    /// The latest scan has finished or was cancelled
    Done,
}

/// One row of the results table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Absolute path, the record's identity
    pub path: PathBuf,
    /// Date values read from the photo
    pub fields: DateFields,
    /// The photo could not be opened for reading
    pub problematic: bool,
    /// Widest disagreement between dates, if any exceeds the threshold
    pub discrepancy: Option<Discrepancy>,
}

impl ImageRecord {
    /// A record with no fields yet
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            fields: DateFields::new(),
            problematic: false,
            discrepancy: None,
        }
    }

    /// File name for display
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// True when `tag` has no value
    pub fn is_missing(&self, tag: DateTag) -> bool {
        self.fields.is_missing(tag)
    }

    /// Path of the photo
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_missing_every_tag() {
        let record = ImageRecord::new(PathBuf::from("/photos/a.jpg"));
        assert!(DateTag::ALL.iter().all(|tag| record.is_missing(*tag)));
        assert!(!record.problematic);
        assert_eq!(record.discrepancy, None);
    }

    #[test]
    fn file_name_drops_directories() {
        let record = ImageRecord::new(PathBuf::from("/photos/2020/beach.jpg"));
        assert_eq!(record.file_name(), "beach.jpg");
    }
}
