//! # Scanner Module
//!
//! Discovers photo files in a directory.
//!
//! ## Supported Formats
//! - JPEG (.jpg, .jpeg)
//! - PNG (.png)
//! - GIF (.gif)
//! - BMP (.bmp)
//!
//! Extensions are matched case-insensitively. A recursive walk skips the
//! cache directories NAS appliances scatter through photo shares
//! (`@eaDir`, `@__thumb`, ...) entirely.
//!
//! ## Example
//! ```rust,ignore
//! use exif_date_auditor::core::scanner::WalkDirCollector;
//!
//! let collector = WalkDirCollector::new();
//! for path in collector.collect("/Users/photos".as_ref(), true)? {
//!     println!("{}", path.display());
//! }
//! ```

mod filter;
mod walker;

pub use filter::{ImageFilter, EXCLUDED_DIRECTORIES, SUPPORTED_EXTENSIONS};
pub use walker::{ImageFiles, WalkDirCollector};
