//! # Session Module
//!
//! Orchestrates a scan and owns its results table.
//!
//! ## Lifecycle
//! `Idle -> Scanning -> Done`. Starting a new scan from any state
//! cancels the previous worker and clears the table.
//!
//! ## Streaming
//! A background worker reads photos one at a time in discovery order and
//! pushes a [`ScanEvent`] per photo into a channel shared by every scan
//! of the session. Each event carries a generation number; [`poll`]
//! applies events from the current scan and drops the rest, so a slow
//! superseded worker can never leak rows into a newer table.
//!
//! [`poll`]: ScanSession::poll
//!
//! ## Example
//! ```rust,ignore
//! let mut session = ScanSession::new();
//! session.start(ScanConfiguration::builder("/photos").recursive(true).build())?;
//! while !session.is_done() {
//!     for event in session.poll_timeout(Duration::from_millis(100)) {
//!         // render rows as they arrive
//!     }
//! }
//! ```

mod config;
mod types;
mod worker;

pub use config::{
    parse_threshold, ScanConfiguration, ScanConfigurationBuilder, DEFAULT_THRESHOLD_DAYS,
};
pub use types::{ImageRecord, SessionState};
pub use worker::inspect;

use crate::core::discrepancy::{analyze, Discrepancy};
use crate::core::metadata::{write_date, DateTag};
use crate::core::scanner::WalkDirCollector;
use crate::error::{AuditError, ScanError, SessionError};
use crate::events::{EventChannel, EventReceiver, EventSender, ScanEvent, ScanSummary};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error, info};

/// A scan in progress or finished, plus its results table
pub struct ScanSession {
    collector: WalkDirCollector,
    state: SessionState,
    config: Option<ScanConfiguration>,
    generation: u64,
    records: Vec<ImageRecord>,
    index: HashMap<PathBuf, usize>,
    total: usize,
    processed: usize,
    summary: Option<ScanSummary>,
    sender: EventSender,
    receiver: EventReceiver,
    cancel: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl ScanSession {
    /// Create an idle session
    pub fn new() -> Self {
        let (sender, receiver) = EventChannel::new();
        Self {
            collector: WalkDirCollector::new(),
            state: SessionState::Idle,
            config: None,
            generation: 0,
            records: Vec::new(),
            index: HashMap::new(),
            total: 0,
            processed: 0,
            summary: None,
            sender,
            receiver,
            cancel: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Start scanning with `config`, superseding any earlier scan.
    ///
    /// The file list is collected before this returns, so an invalid root
    /// fails here and leaves the session exactly as it was. Returns the
    /// generation number of the new scan.
    pub fn start(&mut self, config: ScanConfiguration) -> Result<u64, ScanError> {
        let paths: Vec<PathBuf> = self
            .collector
            .collect(config.root(), config.recursive())?
            .collect();

        self.cancel.store(true, Ordering::Relaxed);
        self.worker = None;

        self.generation += 1;
        self.records.clear();
        self.index.clear();
        self.total = paths.len();
        self.processed = 0;
        self.summary = None;
        self.cancel = Arc::new(AtomicBool::new(false));

        let job = worker::ScanJob {
            generation: self.generation,
            root: config.root().to_path_buf(),
            paths,
            threshold_days: config.threshold_days(),
            cancel: Arc::clone(&self.cancel),
            events: self.sender.clone(),
        };
        self.config = Some(config);

        match worker::spawn(job) {
            Ok(handle) => {
                self.worker = Some(handle);
                self.state = SessionState::Scanning;
                debug!(generation = self.generation, total = self.total, "Scan worker spawned");
                Ok(self.generation)
            }
            Err(source) => {
                self.state = SessionState::Idle;
                Err(ScanError::WorkerSpawn { source })
            }
        }
    }

    /// Ask the running scan to stop after the current photo.
    ///
    /// The scan still ends with a completion event, flagged as cancelled.
    pub fn cancel(&self) {
        if self.state == SessionState::Scanning {
            info!(generation = self.generation, "Cancelling scan");
            self.cancel.store(true, Ordering::Relaxed);
        }
    }

    /// Apply every queued event without blocking.
    ///
    /// Returns the events that belonged to the current scan, in order.
    pub fn poll(&mut self) -> Vec<ScanEvent> {
        let worker_finished = self.worker.as_ref().is_some_and(|h| h.is_finished());
        let applied = self.apply_all(self.receiver.drain());
        self.check_worker(worker_finished);
        applied
    }

    /// Wait at most `timeout` for the next event, then drain like [`poll`](Self::poll)
    pub fn poll_timeout(&mut self, timeout: Duration) -> Vec<ScanEvent> {
        let worker_finished = self.worker.as_ref().is_some_and(|h| h.is_finished());
        let mut events = Vec::new();
        if self.state == SessionState::Scanning && !worker_finished {
            events.extend(self.receiver.recv_timeout(timeout));
        }
        events.extend(self.receiver.drain());
        let applied = self.apply_all(events);
        self.check_worker(worker_finished);
        applied
    }

    /// Block until the current scan is done
    pub fn wait(&mut self) {
        while self.state == SessionState::Scanning {
            self.poll_timeout(Duration::from_millis(50));
        }
    }

    fn apply_all(&mut self, events: Vec<ScanEvent>) -> Vec<ScanEvent> {
        events
            .into_iter()
            .filter(|event| self.apply(event))
            .collect()
    }

    /// Apply one event. Returns false for events of a superseded scan.
    fn apply(&mut self, event: &ScanEvent) -> bool {
        if event.generation() != self.generation {
            debug!(
                stale = event.generation(),
                current = self.generation,
                "Dropping event from superseded scan"
            );
            return false;
        }

        match event {
            ScanEvent::Started { total_files, .. } => {
                self.total = *total_files;
            }
            ScanEvent::FileProcessed(processed) => {
                self.insert(processed.record.clone());
                self.processed += 1;
            }
            ScanEvent::Completed { summary, .. } => {
                self.summary = Some(*summary);
                self.state = SessionState::Done;
                self.worker = None;
            }
        }
        true
    }

    /// A worker that exited without a completion event died mid-scan
    fn check_worker(&mut self, worker_finished: bool) {
        if worker_finished && self.state == SessionState::Scanning {
            error!(generation = self.generation, "Scan worker stopped unexpectedly");
            let problematic = self.records.iter().filter(|r| r.problematic).count();
            let with_discrepancy = self.records.iter().filter(|r| r.discrepancy.is_some()).count();
            self.summary = Some(ScanSummary {
                processed: self.processed,
                problematic,
                with_discrepancy,
                cancelled: true,
            });
            self.state = SessionState::Done;
            self.worker = None;
        }
    }

    fn insert(&mut self, record: ImageRecord) {
        match self.index.get(&record.path) {
            Some(&position) => self.records[position] = record,
            None => {
                self.index.insert(record.path.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    /// Re-run the analyzer on the stored fields of one photo.
    ///
    /// Nothing is read from disk. The stored discrepancy is replaced and
    /// returned.
    pub fn recompute_one(&mut self, path: &Path) -> Result<Option<Discrepancy>, SessionError> {
        let threshold = self
            .config
            .as_ref()
            .map(ScanConfiguration::threshold_days)
            .unwrap_or(DEFAULT_THRESHOLD_DAYS);
        let record = self.record_mut(path)?;
        record.discrepancy = analyze(&record.fields, threshold);
        Ok(record.discrepancy)
    }

    /// Write a date into a scanned photo and refresh its row.
    ///
    /// Refused while a scan is running. On success the stored field is
    /// updated and the discrepancy recomputed; on failure the table and
    /// the file are unchanged.
    pub fn apply_edit(
        &mut self,
        path: &Path,
        tag: DateTag,
        value: &str,
    ) -> Result<Option<Discrepancy>, AuditError> {
        if self.state == SessionState::Scanning {
            return Err(SessionError::ScanInProgress.into());
        }
        self.record(path).ok_or_else(|| SessionError::UnknownPath {
            path: path.to_path_buf(),
        })?;

        write_date(path, tag, value)?;

        self.record_mut(path)?.fields.set(tag, value);
        Ok(self.recompute_one(path)?)
    }

    /// Rows to display.
    ///
    /// With the filter on, only photos missing `filter_tag` are returned.
    /// Never changes the session.
    pub fn visible_rows(&self, filter_enabled: bool, filter_tag: DateTag) -> Vec<&ImageRecord> {
        self.records
            .iter()
            .filter(|record| !filter_enabled || record.is_missing(filter_tag))
            .collect()
    }

    /// All rows in discovery order
    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    /// Row for one photo
    pub fn record(&self, path: &Path) -> Option<&ImageRecord> {
        self.index.get(path).map(|&i| &self.records[i])
    }

    fn record_mut(&mut self, path: &Path) -> Result<&mut ImageRecord, SessionError> {
        match self.index.get(path) {
            Some(&i) => Ok(&mut self.records[i]),
            None => Err(SessionError::UnknownPath {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Photos that could not be opened
    pub fn problematic_files(&self) -> Vec<&Path> {
        self.records
            .iter()
            .filter(|r| r.problematic)
            .map(ImageRecord::path)
            .collect()
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True once the latest scan has finished
    pub fn is_done(&self) -> bool {
        self.state == SessionState::Done
    }

    /// Generation of the latest scan, 0 before the first
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Configuration of the latest scan
    pub fn config(&self) -> Option<&ScanConfiguration> {
        self.config.as_ref()
    }

    /// Photos applied so far
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Photos the latest scan will process
    pub fn total(&self) -> usize {
        self.total
    }

    /// Totals of the latest scan, once done
    pub fn summary(&self) -> Option<ScanSummary> {
        self.summary
    }
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}
