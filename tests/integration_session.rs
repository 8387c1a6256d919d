//! Integration tests for the scan session.
//!
//! These tests verify end-to-end session behavior including:
//! - Streaming results in discovery order
//! - Problematic files not aborting a scan
//! - Editing a photo and refreshing its row
//! - Threshold fallback

use exif_date_auditor::core::metadata::{write_date, DateTag};
use exif_date_auditor::core::session::{ScanConfiguration, ScanSession, SessionState};
use exif_date_auditor::error::{AuditError, EditError, ScanError};
use exif_date_auditor::events::ScanEvent;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

fn create_test_jpeg(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    image::RgbImage::new(8, 8).save(&path).unwrap();
    path
}

fn scan(root: &Path) -> ScanSession {
    let mut session = ScanSession::new();
    session
        .start(ScanConfiguration::builder(root).recursive(true).build())
        .unwrap();
    session.wait();
    session
}

#[test]
fn session_handles_empty_directory() {
    let temp_dir = TempDir::new().unwrap();

    let session = scan(temp_dir.path());

    assert_eq!(session.state(), SessionState::Done);
    assert!(session.records().is_empty());
    assert_eq!(session.summary().unwrap().processed, 0);
}

#[test]
fn session_rejects_nonexistent_root() {
    let mut session = ScanSession::new();
    let config = ScanConfiguration::builder("/nonexistent/path/that/does/not/exist").build();
    let result = session.start(config);

    assert!(matches!(result, Err(ScanError::InvalidRoot { .. })));
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn corrupt_file_is_listed_not_fatal() {
    let temp_dir = TempDir::new().unwrap();
    create_test_jpeg(temp_dir.path(), "good.jpg");
    File::create(temp_dir.path().join("corrupt.jpg"))
        .unwrap()
        .write_all(b"this is not a valid image file")
        .unwrap();
    File::create(temp_dir.path().join("empty.jpg")).unwrap();

    let session = scan(temp_dir.path());

    assert_eq!(session.records().len(), 3);
    assert_eq!(session.problematic_files().len(), 2);
    let summary = session.summary().unwrap();
    assert_eq!(summary.problematic, 2);
    assert!(!summary.cancelled);
}

#[test]
fn streamed_rows_match_the_table_order() {
    let temp_dir = TempDir::new().unwrap();
    for name in ["a.jpg", "b.jpg", "c.jpg", "d.jpg"] {
        create_test_jpeg(temp_dir.path(), name);
    }

    let mut session = ScanSession::new();
    let generation = session
        .start(ScanConfiguration::builder(temp_dir.path()).build())
        .unwrap();

    let mut streamed = Vec::new();
    let mut completions = 0;
    while !session.is_done() {
        for event in session.poll_timeout(Duration::from_millis(20)) {
            assert_eq!(event.generation(), generation);
            match event {
                ScanEvent::FileProcessed(p) => {
                    assert_eq!(p.index, streamed.len());
                    streamed.push(p.record.path);
                }
                ScanEvent::Completed { .. } => completions += 1,
                ScanEvent::Started { .. } => {}
            }
        }
    }

    let table: Vec<_> = session.records().iter().map(|r| r.path.clone()).collect();
    assert_eq!(streamed, table);
    assert_eq!(completions, 1);
    assert_eq!(session.processed(), 4);
}

#[test]
fn discrepancy_is_reported_for_conflicting_dates() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_test_jpeg(temp_dir.path(), "photo.jpg");
    write_date(&path, DateTag::DateTimeOriginal, "2020:01:01 00:00:00").unwrap();
    write_date(&path, DateTag::DateTimeDigitized, "2020:03:15 00:00:00").unwrap();

    let session = scan(temp_dir.path());

    let record = &session.records()[0];
    assert_eq!(record.fields.get(DateTag::DateTimeOriginal), "2020:01:01 00:00:00");
    let discrepancy = record.discrepancy.unwrap();
    assert_eq!(discrepancy.first, DateTag::DateTimeOriginal);
    assert!(discrepancy.gap_days > 74);
}

#[test]
fn apply_edit_updates_row_and_file() {
    let temp_dir = TempDir::new().unwrap();
    create_test_jpeg(temp_dir.path(), "photo.jpg");

    let mut session = scan(temp_dir.path());
    let path = session.records()[0].path.clone();
    assert!(session.records()[0].is_missing(DateTag::DateTimeOriginal));
    let file_date = session.records()[0]
        .fields
        .get(DateTag::FileModifyDate)
        .to_string();

    let far = session
        .apply_edit(&path, DateTag::DateTimeOriginal, "1990:01:01 00:00:00")
        .unwrap();
    assert_eq!(far.map(|d| d.first), Some(DateTag::DateTimeOriginal));

    let near = session
        .apply_edit(&path, DateTag::DateTimeOriginal, &file_date)
        .unwrap();
    assert_eq!(near, None);

    let record = session.record(&path).unwrap();
    assert_eq!(record.fields.get(DateTag::DateTimeOriginal), file_date);
    assert!(session.visible_rows(true, DateTag::DateTimeOriginal).is_empty());
}

#[test]
fn rejected_edit_changes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    create_test_jpeg(temp_dir.path(), "photo.jpg");

    let mut session = scan(temp_dir.path());
    let path = session.records()[0].path.clone();
    let before_file = fs::read(&path).unwrap();
    let before_row = session.records()[0].clone();

    let result = session.apply_edit(&path, DateTag::DateTimeOriginal, "2020-01-01");

    assert!(matches!(
        result,
        Err(AuditError::Edit(EditError::Validation { .. }))
    ));
    assert_eq!(fs::read(&path).unwrap(), before_file);
    assert_eq!(session.records()[0], before_row);
}

#[test]
fn invalid_threshold_text_behaves_like_default() {
    let temp_dir = TempDir::new().unwrap();
    let default = ScanConfiguration::builder(temp_dir.path())
        .threshold_text("30")
        .build();

    for text in ["", "-5", "abc"] {
        let config = ScanConfiguration::builder(temp_dir.path())
            .threshold_text(text)
            .build();
        assert_eq!(config, default);
    }
}

#[test]
fn cancelled_scan_still_completes() {
    let temp_dir = TempDir::new().unwrap();
    for i in 0..20 {
        create_test_jpeg(temp_dir.path(), &format!("photo_{i}.jpg"));
    }

    let mut session = ScanSession::new();
    session
        .start(ScanConfiguration::builder(temp_dir.path()).build())
        .unwrap();
    session.cancel();
    session.wait();

    let summary = session.summary().unwrap();
    assert!(session.is_done());
    assert_eq!(summary.processed, session.records().len());
    assert!(summary.processed <= 20);
}
