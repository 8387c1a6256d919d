//! Writing a single date back into a photo's EXIF block.
//!
//! The update is made on a temporary sibling copy which only replaces
//! the original once the new value reads back correctly. Any failure
//! leaves the original file exactly as it was.

use super::reader::{has_exif_block, read_embedded_dates};
use super::{parse_date, DateTag};
use crate::error::EditError;
use little_exif::exif_tag::ExifTag;
use little_exif::metadata::Metadata;
use std::fs;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info, warn};

/// Write `value` into `tag` of the photo at `path`.
///
/// The value must be in `YYYY:MM:DD HH:MM:SS` form and the tag must be
/// an embedded one; both are checked before the file is touched. All
/// other metadata is carried over unchanged. A photo whose existing EXIF
/// cannot be decoded is refused rather than rewritten from scratch.
pub fn write_date(path: &Path, tag: DateTag, value: &str) -> Result<(), EditError> {
    if !tag.is_writable() {
        return Err(EditError::UnsupportedTag { tag });
    }
    if parse_date(value).is_none() {
        return Err(EditError::Validation {
            value: value.to_string(),
        });
    }

    let write_error = |reason: String| EditError::Write {
        path: path.to_path_buf(),
        reason,
    };

    let staged = stage_copy(path).map_err(|e| write_error(e.to_string()))?;
    let before = read_embedded_dates(staged.path());

    let mut metadata = load_existing(staged.path()).map_err(|reason| {
        warn!(path = %path.display(), %reason, "Refusing to rewrite EXIF");
        write_error(reason)
    })?;
    metadata.set_tag(exif_tag(tag, value));

    match quietly(|| metadata.write_to_file(staged.path())) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(write_error(e.to_string())),
        Err(_) => return Err(write_error("metadata encoder panicked".to_string())),
    }

    let after = read_embedded_dates(staged.path());
    // Containers the reader cannot see into would silently lose the edit
    if after.get(tag) != value {
        warn!(path = %path.display(), %tag, "Written value did not read back");
        return Err(write_error(format!("{tag} could not be stored in this file format")));
    }
    if let Some(lost) = DateTag::ALL
        .into_iter()
        .filter(|t| t.is_embedded() && *t != tag)
        .find(|t| before.get(*t) != after.get(*t))
    {
        warn!(path = %path.display(), %lost, "Edit would have changed another date");
        return Err(write_error(format!("{lost} would not survive the edit")));
    }

    staged
        .persist(path)
        .map_err(|e| write_error(e.error.to_string()))?;

    info!(path = %path.display(), %tag, value, "Updated date");
    Ok(())
}

/// Copy the photo to a temporary file in the same directory.
///
/// Same directory keeps the final rename atomic, same extension lets the
/// metadata library pick the right container.
fn stage_copy(path: &Path) -> std::io::Result<NamedTempFile> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let suffix = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let bytes = fs::read(path)?;
    let mut staged = Builder::new()
        .prefix(".exif-audit-")
        .suffix(&suffix)
        .tempfile_in(dir)?;
    staged.write_all(&bytes)?;
    staged.flush()?;

    fs::set_permissions(staged.path(), fs::metadata(path)?.permissions())?;
    Ok(staged)
}

/// Existing EXIF of the staged copy, or an empty block if it has none.
///
/// Fails when a block is present but the encoder cannot decode it, since
/// starting from an empty block would drop every tag in it.
fn load_existing(path: &Path) -> Result<Metadata, String> {
    let failure = match quietly(|| Metadata::new_from_path(path)) {
        Ok(Ok(metadata)) => return Ok(metadata),
        Ok(Err(e)) => e.to_string(),
        Err(_) => "metadata parser panicked".to_string(),
    };

    if has_exif_block(path).map_err(|e| e.to_string())? {
        return Err(format!("existing EXIF could not be decoded: {failure}"));
    }
    debug!(error = %failure, "No existing EXIF, starting from an empty block");
    Ok(Metadata::new())
}

/// Run a metadata library call, turning a panic into an `Err` without
/// printing it to stderr.
fn quietly<T>(f: impl FnOnce() -> T) -> std::thread::Result<T> {
    let prev_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    panic::set_hook(prev_hook);
    result
}

fn exif_tag(tag: DateTag, value: &str) -> ExifTag {
    let value = value.to_string();
    match tag {
        DateTag::DateTimeDigitized => ExifTag::CreateDate(value),
        DateTag::DateTime => ExifTag::ModifyDate(value),
        _ => ExifTag::DateTimeOriginal(value),
    }
}
