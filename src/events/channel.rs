//! Event channel between a scan worker and the session that owns it.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::time::Duration;

use super::ScanEvent;

/// Worker side of the channel. Cloned once per scan.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<ScanEvent>,
}

impl EventSender {
    /// Queue an event; discarded if the session is gone
    pub fn send(&self, event: ScanEvent) {
        let _ = self.inner.send(event);
    }
}

/// Session side of the channel
pub struct EventReceiver {
    inner: Receiver<ScanEvent>,
}

impl EventReceiver {
    /// Wait at most `timeout` for the next event
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ScanEvent> {
        self.inner.recv_timeout(timeout).ok()
    }

    /// Take every event already queued, without blocking
    pub fn drain(&self) -> Vec<ScanEvent> {
        self.inner.try_iter().collect()
    }
}

/// Constructor for the unbounded channel a session shares across its scans
pub struct EventChannel;

impl EventChannel {
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}
