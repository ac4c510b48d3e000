//! # Session Observer
//!
//! Notifications for whatever presents the session to a user: a button
//! label, a status line, a log. Every method has a no-op default.

use std::cell::RefCell;
use std::rc::Rc;

use roomscan_export::ExportedArtifact;

use crate::error::CaptureError;
use crate::host::{Capability, SessionId};

/// Receives session lifecycle notifications.
pub trait SessionObserver {
    /// The session became active. `degraded` lists optional capabilities
    /// that were not granted.
    fn session_started(&mut self, _session: SessionId, _degraded: &[Capability]) {}

    /// The session request was refused or setup failed.
    fn session_rejected(&mut self, _error: &CaptureError) {}

    /// An artifact was handed to the sink.
    fn artifact_exported(&mut self, _artifact: &ExportedArtifact) {}

    /// The session is back to inactive.
    fn session_ended(&mut self, _session: SessionId) {}
}

/// Ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

/// A notification as recorded by [`EventLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Started {
        session: SessionId,
        degraded: Vec<Capability>,
    },
    Rejected {
        message: String,
    },
    Exported {
        filename: String,
        bytes: usize,
    },
    Ended {
        session: SessionId,
    },
}

/// Observer that records every notification. Clones share one log.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<SessionEvent>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far.
    pub fn events(&self) -> Vec<SessionEvent> {
        self.0.borrow().clone()
    }

    fn push(&self, event: SessionEvent) {
        self.0.borrow_mut().push(event);
    }
}

impl SessionObserver for EventLog {
    fn session_started(&mut self, session: SessionId, degraded: &[Capability]) {
        self.push(SessionEvent::Started {
            session,
            degraded: degraded.to_vec(),
        });
    }

    fn session_rejected(&mut self, error: &CaptureError) {
        self.push(SessionEvent::Rejected {
            message: error.to_string(),
        });
    }

    fn artifact_exported(&mut self, artifact: &ExportedArtifact) {
        self.push(SessionEvent::Exported {
            filename: artifact.filename.clone(),
            bytes: artifact.len(),
        });
    }

    fn session_ended(&mut self, session: SessionId) {
        self.push(SessionEvent::Ended { session });
    }
}
