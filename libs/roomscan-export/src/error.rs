//! # Export Errors
//!
//! Failures while serializing a scene or delivering the artifact.

use std::path::PathBuf;

use roomscan_mesh::{GeometryError, SurfaceKind};
use thiserror::Error;

/// Errors that can occur during export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A surface could not be turned into exportable geometry.
    #[error("Cannot export {kind} at position {index}: {source}")]
    Geometry {
        kind: SurfaceKind,
        index: usize,
        #[source]
        source: GeometryError,
    },

    /// Text formatting failed.
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// JSON serialization failed.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The artifact could not be written.
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The suggested filename is empty or contains a path component.
    #[error("Invalid artifact filename: {0:?}")]
    InvalidFilename(String),

    /// Unknown export format name.
    #[error("Unknown export format: {0}")]
    UnknownFormat(String),
}

/// Result type alias for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
