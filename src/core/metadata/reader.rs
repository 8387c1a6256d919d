//! Date extraction from embedded EXIF plus filesystem timestamps.

use super::{format_date, DateFields, DateTag};
use chrono::{DateTime, Local};
use exif::{In, Reader, Tag, Value};
use image::ImageReader;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use std::time::SystemTime;
use tracing::{debug, warn};

/// What the reader found for one photo
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataOutcome {
    /// Date values, empty where nothing was found
    pub fields: DateFields,
    /// The file could not be opened as an image
    pub problematic: bool,
}

impl MetadataOutcome {
    fn problematic() -> Self {
        Self {
            fields: DateFields::new(),
            problematic: true,
        }
    }
}

/// Read every tracked date field of a photo.
///
/// Never fails: a file that cannot be decoded comes back flagged as
/// problematic with all fields empty. A decodable image without an EXIF
/// block simply has empty embedded fields. The file is never modified.
pub fn read_metadata(path: &Path) -> MetadataOutcome {
    if let Err(reason) = probe_image(path) {
        warn!(path = %path.display(), %reason, "Cannot open as image");
        return MetadataOutcome::problematic();
    }

    let mut fields = read_embedded_dates(path);

    match fs::metadata(path) {
        Ok(meta) => {
            let modified = meta.modified().ok();
            // Not every filesystem records a birth time
            let created = meta.created().ok().or(modified);
            if let Some(created) = created {
                fields.set(DateTag::FileCreateDate, format_system_time(created));
            }
            if let Some(modified) = modified {
                fields.set(DateTag::FileModifyDate, format_system_time(modified));
            }
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cannot stat file");
            return MetadataOutcome::problematic();
        }
    }

    MetadataOutcome {
        fields,
        problematic: false,
    }
}

/// Check the file is an image we can decode, reading only its header
fn probe_image(path: &Path) -> Result<(), String> {
    let reader = ImageReader::open(path)
        .map_err(|e| e.to_string())?
        .with_guessed_format()
        .map_err(|e| e.to_string())?;
    reader.into_dimensions().map_err(|e| e.to_string())?;
    Ok(())
}

/// Map an embedded tag onto its EXIF tag id
pub(super) fn exif_tag_for(tag: DateTag) -> Option<Tag> {
    match tag {
        DateTag::DateTimeOriginal => Some(Tag::DateTimeOriginal),
        DateTag::DateTimeDigitized => Some(Tag::DateTimeDigitized),
        DateTag::DateTime => Some(Tag::DateTime),
        DateTag::FileCreateDate | DateTag::FileModifyDate => None,
    }
}

/// The embedded date tags of a file, straight from its EXIF block
pub(super) fn read_embedded_dates(path: &Path) -> DateFields {
    let mut fields = DateFields::new();
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return fields,
    };

    let mut bufreader = BufReader::new(&file);
    let exif = match Reader::new().read_from_container(&mut bufreader) {
        Ok(exif) => exif,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "No readable EXIF block");
            return fields;
        }
    };

    for tag in DateTag::ALL {
        let Some(exif_tag) = exif_tag_for(tag) else {
            continue;
        };
        if let Some(field) = exif.get_field(exif_tag, In::PRIMARY) {
            if let Some(value) = get_string_value(&field.value) {
                fields.set(tag, value);
            }
        }
    }
    fields
}

/// Whether the file carries an EXIF block at all.
///
/// Only a container with no EXIF segment counts as `false`. A block that
/// is present but fails to parse still counts as present.
pub(super) fn has_exif_block(path: &Path) -> std::io::Result<bool> {
    let file = File::open(path)?;
    let mut bufreader = BufReader::new(&file);
    match Reader::new().read_from_container(&mut bufreader) {
        Ok(_) => Ok(true),
        Err(exif::Error::NotFound(_)) => Ok(false),
        Err(exif::Error::Io(e)) => Err(e),
        Err(_) => Ok(true),
    }
}

/// Helper to extract string from EXIF ASCII value
fn get_string_value(value: &Value) -> Option<String> {
    if let Value::Ascii(ref vec) = value {
        if let Some(bytes) = vec.first() {
            if let Ok(s) = std::str::from_utf8(bytes) {
                let trimmed = s.trim_end_matches('\0').trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
    }
    None
}

fn format_system_time(time: SystemTime) -> String {
    let local: DateTime<Local> = time.into();
    format_date(&local.naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::parse_date;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn zero_byte_jpeg_is_problematic() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.jpg");
        File::create(&path).unwrap();

        let outcome = read_metadata(&path);

        assert!(outcome.problematic);
        assert!(outcome.fields.is_empty());
    }

    #[test]
    fn text_file_with_image_extension_is_problematic() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fake.png");
        File::create(&path)
            .unwrap()
            .write_all(b"this is not a valid image file")
            .unwrap();

        assert!(read_metadata(&path).problematic);
    }

    #[test]
    fn nonexistent_file_is_problematic() {
        let outcome = read_metadata(Path::new("/nonexistent/file.jpg"));
        assert!(outcome.problematic);
        assert!(outcome.fields.is_empty());
    }

    #[test]
    fn image_without_exif_gets_filesystem_dates_only() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plain.png");
        image::RgbImage::new(2, 2).save(&path).unwrap();

        let outcome = read_metadata(&path);

        assert!(!outcome.problematic);
        assert!(outcome.fields.is_missing(DateTag::DateTimeOriginal));
        assert!(outcome.fields.is_missing(DateTag::DateTimeDigitized));
        assert!(outcome.fields.is_missing(DateTag::DateTime));
        assert!(parse_date(outcome.fields.get(DateTag::FileCreateDate)).is_some());
        assert!(parse_date(outcome.fields.get(DateTag::FileModifyDate)).is_some());
    }

    #[test]
    fn reading_does_not_modify_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plain.jpg");
        image::RgbImage::new(4, 4).save(&path).unwrap();
        let before = fs::read(&path).unwrap();

        read_metadata(&path);

        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn fresh_jpeg_has_no_exif_block() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plain.jpg");
        image::RgbImage::new(4, 4).save(&path).unwrap();

        assert!(!has_exif_block(&path).unwrap());
        assert!(read_embedded_dates(&path).is_empty());
    }

    #[test]
    fn unparseable_container_counts_as_having_exif() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.jpg");
        fs::write(&path, b"not a jpeg at all").unwrap();

        assert!(has_exif_block(&path).unwrap());
    }

    #[test]
    fn has_exif_block_reports_missing_file() {
        assert!(has_exif_block(Path::new("/nonexistent/file.jpg")).is_err());
    }

    #[test]
    fn only_embedded_tags_map_to_exif() {
        assert_eq!(exif_tag_for(DateTag::DateTime), Some(Tag::DateTime));
        assert_eq!(exif_tag_for(DateTag::FileCreateDate), None);
    }
}
