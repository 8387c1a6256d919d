//! Per-scan configuration snapshot.

use crate::core::metadata::DateTag;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Threshold used whenever the supplied one is not a positive integer
pub const DEFAULT_THRESHOLD_DAYS: u32 = 30;

/// Turn free-form threshold text into a number of days.
///
/// Anything that is not a positive integer ("", "-5", "abc", "0", "1.5")
/// falls back to [`DEFAULT_THRESHOLD_DAYS`]. This never fails.
pub fn parse_threshold(text: &str) -> u32 {
    match text.trim().parse::<u32>() {
        Ok(days) if days > 0 => days,
        _ => {
            warn!(
                threshold = text,
                default = DEFAULT_THRESHOLD_DAYS,
                "Invalid discrepancy threshold, using default"
            );
            DEFAULT_THRESHOLD_DAYS
        }
    }
}

/// Everything a scan needs, fixed at the moment it starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfiguration {
    root: PathBuf,
    recursive: bool,
    threshold_days: u32,
    filter_tag: DateTag,
}

impl ScanConfiguration {
    /// Start building a configuration for `root`
    pub fn builder(root: impl Into<PathBuf>) -> ScanConfigurationBuilder {
        ScanConfigurationBuilder::new(root)
    }

    /// Directory to scan
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether subdirectories are scanned
    pub fn recursive(&self) -> bool {
        self.recursive
    }

    /// Gap in days above which two dates disagree; always positive
    pub fn threshold_days(&self) -> u32 {
        self.threshold_days
    }

    /// Tag checked by the missing-tag view
    pub fn filter_tag(&self) -> DateTag {
        self.filter_tag
    }
}

/// Builder for [`ScanConfiguration`]
#[derive(Debug, Clone)]
pub struct ScanConfigurationBuilder {
    config: ScanConfiguration,
}

impl ScanConfigurationBuilder {
    /// Create a builder with defaults: non-recursive, 30 days, `DateTimeOriginal`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            config: ScanConfiguration {
                root: root.into(),
                recursive: false,
                threshold_days: DEFAULT_THRESHOLD_DAYS,
                filter_tag: DateTag::DateTimeOriginal,
            },
        }
    }

    /// Scan subdirectories too
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.config.recursive = recursive;
        self
    }

    /// Set the threshold in days. Zero falls back to the default.
    pub fn threshold_days(mut self, days: u32) -> Self {
        self.config.threshold_days = if days == 0 {
            DEFAULT_THRESHOLD_DAYS
        } else {
            days
        };
        self
    }

    /// Set the threshold from user-entered text, see [`parse_threshold`]
    pub fn threshold_text(mut self, text: &str) -> Self {
        self.config.threshold_days = parse_threshold(text);
        self
    }

    /// Set the tag checked by the missing-tag view
    pub fn filter_tag(mut self, tag: DateTag) -> Self {
        self.config.filter_tag = tag;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ScanConfiguration {
        self.config
    }
}
