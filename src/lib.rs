//! # EXIF Date Auditor
//!
//! Finds photos whose dates are missing or disagree, and fixes them.
//!
//! ## What it checks
//! - Which photos lack a given date tag (typically `DateTimeOriginal`)
//! - Which photos carry dates that are further apart than a threshold,
//!   comparing embedded EXIF dates with filesystem timestamps
//! - Which files cannot be opened at all
//!
//! ## Architecture
//! The library is split into a core engine (GUI-agnostic) and presentation layers:
//! - `core` - Collection, reading, analysis, writing and the scan session
//! - `events` - Streaming of per-photo results (GUI-ready)
//! - `error` - User-friendly error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{AuditError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point (CLI or GUI).
/// `default_filter` applies when `RUST_LOG` is not set. Calling it a
/// second time keeps the first subscriber.
pub fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
