//! # Room Scan Export
//!
//! Serializes the surfaces accumulated during a capture session into one
//! artifact ready to hand to a byte sink.
//!
//! ## Architecture
//!
//! ```text
//! &[DetectedSurface] → export(options) → ExportedArtifact → ArtifactSink
//! ```
//!
//! ## Contract
//!
//! - The surface slice is only read
//! - Output order follows the slice order
//! - Output is deterministic: no timestamps, no random names
//!
//! ## Usage
//!
//! ```rust
//! use roomscan_export::{export, ExportOptions};
//! use roomscan_mesh::{DetectedSurface, Transform};
//! use glam::DVec2;
//!
//! let plane = DetectedSurface::plane(
//!     None,
//!     vec![DVec2::new(0.0, 0.0), DVec2::new(2.0, 0.0), DVec2::new(2.0, 3.0)],
//!     Transform::IDENTITY,
//! );
//! let artifact = export(&[plane], &ExportOptions::default()).unwrap();
//! assert_eq!(artifact.filename, "scene.obj");
//! assert!(artifact.as_text().unwrap().contains("o plane_0"));
//! ```

pub mod error;
pub mod obj;
pub mod records;
pub mod sink;

use std::fmt;
use std::str::FromStr;

use config::constants::{
    DEFAULT_JSON_FILENAME, DEFAULT_OBJ_FILENAME, JSON_MIME_TYPE, OBJ_MIME_TYPE,
    PLANE_BOX_THICKNESS,
};
use roomscan_mesh::DetectedSurface;
use serde::{Deserialize, Serialize};

pub use error::{ExportError, ExportResult};
pub use sink::{ArtifactSink, FileSink, MemorySink};

/// Artifact format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// OBJ text mesh.
    #[default]
    Obj,
    /// JSON list of plane and hit-point records.
    Json,
}

impl ExportFormat {
    /// Default filename for this format.
    pub fn default_filename(self) -> &'static str {
        match self {
            ExportFormat::Obj => DEFAULT_OBJ_FILENAME,
            ExportFormat::Json => DEFAULT_JSON_FILENAME,
        }
    }

    /// MIME type attached to artifacts of this format.
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Obj => OBJ_MIME_TYPE,
            ExportFormat::Json => JSON_MIME_TYPE,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Obj => f.write_str("obj"),
            ExportFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "obj" => Ok(ExportFormat::Obj),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// Options controlling serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Write `vn` lines and `f v//vn` faces in OBJ output.
    pub include_normals: bool,
    /// Thickness of the box standing in for each plane in OBJ output.
    pub plane_thickness: f64,
    /// Overrides the format's default filename.
    pub filename: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Obj,
            include_normals: true,
            plane_thickness: PLANE_BOX_THICKNESS,
            filename: None,
        }
    }
}

impl ExportOptions {
    /// Returns the filename artifacts will be suggested under.
    pub fn filename(&self) -> &str {
        self.filename
            .as_deref()
            .unwrap_or_else(|| self.format.default_filename())
    }
}

/// Serialized scene plus the metadata a byte sink needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedArtifact {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub filename: String,
}

impl ExportedArtifact {
    /// Returns the artifact as text when it is valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    /// Artifact size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the artifact has no content.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Serializes surfaces into an artifact.
///
/// # Errors
///
/// Fails if a plane cannot be given box geometry or if JSON serialization
/// fails. The surfaces are never modified.
pub fn export(surfaces: &[DetectedSurface], options: &ExportOptions) -> ExportResult<ExportedArtifact> {
    let text = match options.format {
        ExportFormat::Obj => obj::write_obj(surfaces, options)?,
        ExportFormat::Json => records::write_records(surfaces)?,
    };

    Ok(ExportedArtifact {
        bytes: text.into_bytes(),
        mime_type: options.format.mime_type().to_string(),
        filename: options.filename().to_string(),
    })
}
