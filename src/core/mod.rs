//! # Core Module
//!
//! The GUI-agnostic scan-and-reconcile engine.
//!
//! ## Modules
//! - `scanner` - Discovers photos in a directory
//! - `metadata` - Reads and writes date fields
//! - `discrepancy` - Finds date fields that disagree
//! - `session` - Runs scans in the background and owns the results table

pub mod discrepancy;
pub mod metadata;
pub mod scanner;
pub mod session;

// Re-export commonly used types
pub use discrepancy::Discrepancy;
pub use metadata::{DateFields, DateTag};
pub use scanner::WalkDirCollector;
pub use session::{ImageRecord, ScanConfiguration, ScanSession, SessionState};
