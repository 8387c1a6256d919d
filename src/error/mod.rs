//! # Error Module
//!
//! User-facing error types for the EXIF date auditor.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, values, what went wrong
//! - **Per-file problems are not errors** - an unreadable photo is
//!   flagged as problematic on its record, the scan carries on
//! - Low-level I/O and metadata-library failures are translated at the
//!   reader/writer boundary and never reach the presentation layer raw

use crate::core::metadata::DateTag;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Edit error: {0}")]
    Edit(#[from] EditError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Errors that abort a scan before it starts
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Not a readable directory: {path}")]
    InvalidRoot { path: PathBuf },

    #[error("Failed to start the background scan worker: {source}")]
    WorkerSpawn {
        #[source]
        source: std::io::Error,
    },
}

/// Errors from writing a date back into a photo
#[derive(Error, Debug)]
pub enum EditError {
    /// The new value is malformed. No I/O was performed.
    #[error("Invalid date '{value}': expected YYYY:MM:DD HH:MM:SS")]
    Validation { value: String },

    /// The tag lives in the filesystem, not in embedded metadata. No I/O was performed.
    #[error("{tag} is derived from the filesystem and cannot be written into the photo")]
    UnsupportedTag { tag: DateTag },

    /// Persisting failed. The original file was left untouched.
    #[error("Failed to write metadata to {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

/// Errors from operations on the in-memory results table
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No scanned photo at {path}")]
    UnknownPath { path: PathBuf },

    #[error("A scan is still running. Wait for it to finish or cancel it first.")]
    ScanInProgress,
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, AuditError>;
