//! Background worker that reads and analyzes one scan's photos.

use super::ImageRecord;
use crate::core::discrepancy::analyze;
use crate::core::metadata::read_metadata;
use crate::events::{EventSender, FileProcessed, ScanEvent, ScanSummary};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{info, warn};

/// Work handed to the background thread
pub(super) struct ScanJob {
    pub generation: u64,
    pub root: PathBuf,
    pub paths: Vec<PathBuf>,
    pub threshold_days: u32,
    pub cancel: Arc<AtomicBool>,
    pub events: EventSender,
}

/// Run a scan job on its own thread
pub(super) fn spawn(job: ScanJob) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("exif-scan-{}", job.generation))
        .spawn(move || run(job))
}

fn run(job: ScanJob) {
    let ScanJob {
        generation,
        root,
        paths,
        threshold_days,
        cancel,
        events,
    } = job;

    info!(generation, root = %root.display(), files = paths.len(), "Scan started");
    events.send(ScanEvent::Started {
        generation,
        root,
        total_files: paths.len(),
    });

    let mut summary = ScanSummary::default();

    for (index, path) in paths.into_iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            summary.cancelled = true;
            break;
        }

        let record = inspect(path, threshold_days);
        summary.processed += 1;
        if record.problematic {
            summary.problematic += 1;
        }
        if record.discrepancy.is_some() {
            summary.with_discrepancy += 1;
        }

        events.send(ScanEvent::FileProcessed(FileProcessed {
            generation,
            index,
            record,
        }));
    }

    info!(
        generation,
        processed = summary.processed,
        cancelled = summary.cancelled,
        "Scan finished"
    );
    events.send(ScanEvent::Completed {
        generation,
        summary,
    });
}

/// Read one photo and analyze its dates.
///
/// A decoder panic on a malformed file counts as a problematic photo.
pub fn inspect(path: PathBuf, threshold_days: u32) -> ImageRecord {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| read_metadata(&path)));
    let mut record = ImageRecord::new(path);

    match outcome {
        Ok(outcome) => {
            record.discrepancy = analyze(&outcome.fields, threshold_days);
            record.fields = outcome.fields;
            record.problematic = outcome.problematic;
        }
        Err(_) => {
            warn!(path = %record.path.display(), "Reader panicked");
            record.problematic = true;
        }
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventChannel;
    use std::fs::File;
    use tempfile::TempDir;

    fn job(paths: Vec<PathBuf>, cancel: Arc<AtomicBool>, events: EventSender) -> ScanJob {
        ScanJob {
            generation: 4,
            root: PathBuf::from("/photos"),
            paths,
            threshold_days: 30,
            cancel,
            events,
        }
    }

    #[test]
    fn worker_streams_in_order_and_terminates() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.jpg");
        let b = temp_dir.path().join("b.png");
        File::create(&a).unwrap();
        image::RgbImage::new(2, 2).save(&b).unwrap();

        let (sender, receiver) = EventChannel::new();
        run(job(
            vec![a.clone(), b.clone()],
            Arc::new(AtomicBool::new(false)),
            sender,
        ));

        let events = receiver.drain();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], ScanEvent::Started { total_files: 2, .. }));
        match (&events[1], &events[2]) {
            (ScanEvent::FileProcessed(first), ScanEvent::FileProcessed(second)) => {
                assert_eq!(first.record.path, a);
                assert!(first.record.problematic);
                assert_eq!(second.record.path, b);
                assert!(!second.record.problematic);
            }
            _ => panic!("Expected two processed files"),
        }
        match &events[3] {
            ScanEvent::Completed { generation, summary } => {
                assert_eq!(*generation, 4);
                assert_eq!(summary.processed, 2);
                assert_eq!(summary.problematic, 1);
                assert!(!summary.cancelled);
            }
            _ => panic!("Expected completion"),
        }
    }

    #[test]
    fn cancelled_worker_stops_before_reading() {
        let (sender, receiver) = EventChannel::new();
        run(job(
            vec![PathBuf::from("/nonexistent/a.jpg")],
            Arc::new(AtomicBool::new(true)),
            sender,
        ));

        let events = receiver.drain();
        assert_eq!(events.len(), 2);
        match &events[1] {
            ScanEvent::Completed { summary, .. } => {
                assert!(summary.cancelled);
                assert_eq!(summary.processed, 0);
            }
            _ => panic!("Expected completion"),
        }
    }
}
