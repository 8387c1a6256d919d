//! # Events Module
//!
//! Streams scan results from the background worker to any UI.
//!
//! ## Design
//! A scan worker pushes one [`ScanEvent`] per photo, in discovery order,
//! and finishes with [`ScanEvent::Completed`]. The consumer drains the
//! channel without blocking (a GUI timer, a CLI polling loop) so the
//! presentation layer stays responsive.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! // Poll every 100ms from the UI loop
//! for event in receiver.drain() {
//!     match event {
//!         ScanEvent::FileProcessed(p) => table.insert(p.record),
//!         ScanEvent::Completed { summary, .. } => status.set("Done"),
//!         _ => {}
//!     }
//! }
//! ```

mod channel;
mod types;

pub use channel::{EventChannel, EventReceiver, EventSender};
pub use types::*;
