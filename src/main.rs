//! # exif-audit CLI
//!
//! Command-line interface for the EXIF date auditor.
//!
//! ## Usage
//! ```bash
//! exif-audit scan ~/Photos --recursive --threshold 30
//! exif-audit scan ~/Photos --missing-only --output json
//! exif-audit set-date ~/Photos/IMG_0001.jpg "2020:01:01 12:00:00"
//! ```

mod cli;

use exif_date_auditor::Result;

fn main() -> Result<()> {
    cli::run()
}
