//! Event type definitions for scan streaming.

use crate::core::session::ImageRecord;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Events emitted by a scan worker.
///
/// Every event carries the generation of the scan that produced it so a
/// consumer can drop leftovers from a scan that has been superseded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// The worker has started on a freshly collected file list
    Started {
        generation: u64,
        root: PathBuf,
        total_files: usize,
    },
    /// One photo has been read and analyzed
    FileProcessed(FileProcessed),
    /// No more events will follow for this generation
    Completed {
        generation: u64,
        summary: ScanSummary,
    },
}

impl ScanEvent {
    /// Generation of the scan that emitted this event
    pub fn generation(&self) -> u64 {
        match self {
            ScanEvent::Started { generation, .. } => *generation,
            ScanEvent::FileProcessed(processed) => processed.generation,
            ScanEvent::Completed { generation, .. } => *generation,
        }
    }
}

/// Result for a single photo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileProcessed {
    /// Scan generation
    pub generation: u64,
    /// Position in discovery order, starting at 0
    pub index: usize,
    /// Fields, problematic flag and discrepancy for the photo
    pub record: ImageRecord,
}

/// Totals reported when a scan ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Photos read
    pub processed: usize,
    /// Photos that could not be opened
    pub problematic: usize,
    /// Photos whose dates disagree beyond the threshold
    pub with_discrepancy: usize,
    /// The scan stopped early on request
    pub cancelled: bool,
}
