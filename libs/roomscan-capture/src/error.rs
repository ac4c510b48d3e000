//! # Capture Errors
//!
//! Error taxonomy for a capture session.
//!
//! ## Propagation Policy
//!
//! - Negotiation failures (`NotSupported`, `NotAllowed`) and host failures
//!   abort the session
//! - Per-record failures (`PoseUnresolved`, `GeometryValidation`) never abort
//!   a frame; they are collected as [`CaptureIssue`]s
//! - `ExportIo` is returned after the session is already back to `Inactive`

use roomscan_export::ExportError;
use roomscan_mesh::{GeometryError, SurfaceKind};
use thiserror::Error;

use crate::host::Capability;
use crate::session::SessionState;
use crate::settings::ConfigError;

/// Errors that can occur during a capture session.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The host lacks a required capability.
    #[error("AR not supported: {0}")]
    NotSupported(String),

    /// The host refused the session for permission or policy reasons.
    #[error("AR not allowed: {0}")]
    NotAllowed(String),

    /// An optional capability is unavailable; capture continues without it.
    #[error("Optional capability unavailable: {capability}")]
    CapabilityDegraded { capability: Capability },

    /// A record's pose could not be resolved against the reference space.
    #[error("Frame {frame}: pose of {kind} could not be resolved")]
    PoseUnresolved { kind: SurfaceKind, frame: u64 },

    /// A record carried malformed geometry.
    #[error("Frame {frame}: invalid {kind} geometry: {source}")]
    GeometryValidation {
        kind: SurfaceKind,
        frame: u64,
        #[source]
        source: GeometryError,
    },

    /// Serialization or artifact delivery failed.
    #[error("Export failed: {0}")]
    ExportIo(#[from] ExportError),

    /// Unrecoverable host failure.
    #[error("Host error: {0}")]
    Host(String),

    /// Operation not valid in the current session state.
    #[error("Invalid session state: expected {expected}, found {actual}")]
    InvalidState {
        expected: SessionState,
        actual: SessionState,
    },

    /// Append attempted after export began.
    #[error("Accumulation buffer is frozen")]
    BufferFrozen,

    /// Invalid capture configuration.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for capture operations.
pub type CaptureResult<T> = Result<T, CaptureError>;

/// A non-fatal problem met while capturing, with the frame it happened in.
#[derive(Debug)]
pub struct CaptureIssue {
    /// `None` for session-level issues such as degraded capabilities.
    pub frame: Option<u64>,
    pub error: CaptureError,
}

impl CaptureIssue {
    pub fn in_frame(frame: u64, error: CaptureError) -> Self {
        Self {
            frame: Some(frame),
            error,
        }
    }

    pub fn session(error: CaptureError) -> Self {
        Self { frame: None, error }
    }

    /// Kind of the surface the issue concerns, if any.
    pub fn kind(&self) -> Option<SurfaceKind> {
        match &self.error {
            CaptureError::PoseUnresolved { kind, .. }
            | CaptureError::GeometryValidation { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
