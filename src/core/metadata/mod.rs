//! # Metadata Module
//!
//! Reads and writes the date fields of a photo.
//!
//! ## Fields
//! Three come from the embedded EXIF block:
//! - `DateTimeOriginal` - when the shutter fired
//! - `DateTimeDigitized` - when the image was stored digitally
//! - `DateTime` - when the file was last changed by software
//!
//! Two are derived from the filesystem and are always present for a
//! readable photo:
//! - `FileCreateDate`
//! - `FileModifyDate`
//!
//! Every value uses the EXIF textual convention `YYYY:MM:DD HH:MM:SS`
//! so embedded and derived dates compare directly.

mod reader;
mod writer;

pub use reader::{read_metadata, MetadataOutcome};
pub use writer::write_date;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The EXIF date-time format, shared by reader, writer and analyzer.
pub const DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// One of the date fields tracked per photo.
///
/// Declaration order is the display order and the order pairs are
/// visited in when looking for discrepancies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DateTag {
    DateTimeOriginal,
    DateTimeDigitized,
    DateTime,
    FileCreateDate,
    FileModifyDate,
}

impl DateTag {
    /// All tags in display order
    pub const ALL: [DateTag; 5] = [
        DateTag::DateTimeOriginal,
        DateTag::DateTimeDigitized,
        DateTag::DateTime,
        DateTag::FileCreateDate,
        DateTag::FileModifyDate,
    ];

    /// EXIF-style name, as shown in table headers
    pub fn name(&self) -> &'static str {
        match self {
            DateTag::DateTimeOriginal => "DateTimeOriginal",
            DateTag::DateTimeDigitized => "DateTimeDigitized",
            DateTag::DateTime => "DateTime",
            DateTag::FileCreateDate => "FileCreateDate",
            DateTag::FileModifyDate => "FileModifyDate",
        }
    }

    /// Whether the value is stored inside the image file
    pub fn is_embedded(&self) -> bool {
        !matches!(self, DateTag::FileCreateDate | DateTag::FileModifyDate)
    }

    /// Whether the writer accepts this tag.
    pub fn is_writable(&self) -> bool {
        self.is_embedded()
    }
}

impl fmt::Display for DateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a tag name is not recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag(pub String);

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown date tag '{}'", self.0)
    }
}

impl std::error::Error for UnknownTag {}

impl FromStr for DateTag {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        DateTag::ALL
            .into_iter()
            .find(|tag| tag.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

/// Raw date values of one photo, keyed by tag.
///
/// A tag that is absent reads as the empty string, just like a tag
/// whose metadata entry was empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateFields {
    values: BTreeMap<DateTag, String>,
}

impl DateFields {
    /// Create an empty set of fields
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value of a tag, empty when missing
    pub fn get(&self, tag: DateTag) -> &str {
        self.values.get(&tag).map(String::as_str).unwrap_or("")
    }

    /// Set a tag. Empty values clear it.
    pub fn set(&mut self, tag: DateTag, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.values.remove(&tag);
        } else {
            self.values.insert(tag, value);
        }
    }

    /// True when the tag has no value
    pub fn is_missing(&self, tag: DateTag) -> bool {
        self.get(tag).is_empty()
    }

    /// True when no tag has a value
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Every tag in display order with its value (possibly empty)
    pub fn iter(&self) -> impl Iterator<Item = (DateTag, &str)> + '_ {
        DateTag::ALL.into_iter().map(move |tag| (tag, self.get(tag)))
    }
}

/// Parse a value in EXIF date-time format.
///
/// Strict: the value must be exactly what [`format_date`] would produce,
/// so `2020:1:1 0:0:0` and trailing garbage are rejected.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let parsed = NaiveDateTime::parse_from_str(value, DATE_FORMAT).ok()?;
    (format_date(&parsed) == value).then_some(parsed)
}

/// Format a timestamp in EXIF date-time format
pub fn format_date(value: &NaiveDateTime) -> String {
    value.format(DATE_FORMAT).to_string()
}
