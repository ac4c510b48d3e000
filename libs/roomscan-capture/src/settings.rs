//! # Capture Settings
//!
//! Tunables for one capture session. Every field has a default taken from
//! `config::constants`, so a settings file only needs the values it changes.
//!
//! ```json
//! {
//!   "termination": { "rule": "window", "delay_ms": 3000 },
//!   "max_duration_ms": 60000,
//!   "redetection": "keep_first",
//!   "export": { "format": "obj", "include_normals": true }
//! }
//! ```

use std::time::Duration;

use config::constants::{DEFAULT_CAPTURE_WINDOW_MS, DEFAULT_MAX_CAPTURE_MS};
use roomscan_export::ExportOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::host::ReferenceSpaceKind;

/// When a capture is considered complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum TerminationRule {
    /// Complete as soon as anything has been captured.
    FirstDetection,
    /// Keep capturing for `delay_ms` after the first detection.
    Window { delay_ms: u64 },
}

impl Default for TerminationRule {
    fn default() -> Self {
        TerminationRule::Window {
            delay_ms: DEFAULT_CAPTURE_WINDOW_MS,
        }
    }
}

/// What to do when the host reports a surface it has reported before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedetectionPolicy {
    /// Append every detection, including repeats of the same surface.
    #[default]
    Duplicate,
    /// Skip records whose host surface id is already in the buffer.
    /// Records without an id are always appended.
    KeepFirst,
}

/// Errors raised by [`CaptureConfig::validate`] and settings parsing.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },

    #[error("plane thickness must be positive and finite: {0}")]
    InvalidThickness(f64),

    #[error("capture window ({window_ms} ms) must be shorter than the capture cap ({cap_ms} ms)")]
    WindowExceedsCap { window_ms: u64, cap_ms: u64 },

    #[error("export filename must not be empty")]
    EmptyFilename,

    #[error("settings file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings for a capture session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub termination: TerminationRule,
    /// Overall wall-clock cap from session start; `None` disables it.
    pub max_duration_ms: Option<u64>,
    /// Stop after this many frames; `None` disables it.
    pub max_frames: Option<u64>,
    pub redetection: RedetectionPolicy,
    pub reference_space: ReferenceSpaceKind,
    pub export: ExportOptions,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            termination: TerminationRule::default(),
            max_duration_ms: Some(DEFAULT_MAX_CAPTURE_MS),
            max_frames: None,
            redetection: RedetectionPolicy::default(),
            reference_space: ReferenceSpaceKind::default(),
            export: ExportOptions::default(),
        }
    }
}

impl CaptureConfig {
    /// Parses and validates settings from JSON.
    ///
    /// # Example
    ///
    /// ```rust
    /// use roomscan_capture::{CaptureConfig, TerminationRule};
    ///
    /// let config = CaptureConfig::from_json(r#"{"termination": {"rule": "first_detection"}}"#).unwrap();
    /// assert_eq!(config.termination, TerminationRule::FirstDetection);
    /// ```
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: CaptureConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the settings for values that could never complete a capture.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let TerminationRule::Window { delay_ms: 0 } = self.termination {
            return Err(ConfigError::NotPositive {
                field: "termination.delay_ms",
            });
        }
        if self.max_duration_ms == Some(0) {
            return Err(ConfigError::NotPositive {
                field: "max_duration_ms",
            });
        }
        if self.max_frames == Some(0) {
            return Err(ConfigError::NotPositive { field: "max_frames" });
        }
        if let (TerminationRule::Window { delay_ms }, Some(cap_ms)) =
            (self.termination, self.max_duration_ms)
        {
            if delay_ms >= cap_ms {
                return Err(ConfigError::WindowExceedsCap {
                    window_ms: delay_ms,
                    cap_ms,
                });
            }
        }

        let thickness = self.export.plane_thickness;
        if !(thickness.is_finite() && thickness > 0.0) {
            return Err(ConfigError::InvalidThickness(thickness));
        }
        if self.export.filename.as_deref() == Some("") {
            return Err(ConfigError::EmptyFilename);
        }
        Ok(())
    }

    /// The overall cap as a duration.
    pub fn max_duration(&self) -> Option<Duration> {
        self.max_duration_ms.map(Duration::from_millis)
    }
}
