//! # Configuration Constants
//!
//! Centralized constants for the room scan pipeline.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Capture**: Termination timing for a capture session
//! - **Export**: Artifact names, MIME types and number formatting
//! - **Limits**: Maximum values for safety bounds

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Smallest length treated as non-zero.
///
/// Accumulated vertex normals shorter than this stay the zero vector. A
/// normal sum is twice the face area, so micrometre slivers fall under it.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// let sliver_sum = 1e-6 * 1e-6;
/// assert!(sliver_sum < EPSILON);
/// ```
pub const EPSILON: f64 = 1e-10;

// =============================================================================
// CAPTURE CONSTANTS
// =============================================================================

/// Delay between the first qualifying detection and export when capturing
/// over a fixed window, in milliseconds.
///
/// Gives the host a few more frames to report surfaces it had not finished
/// scanning when the first one arrived.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_CAPTURE_WINDOW_MS;
/// assert_eq!(DEFAULT_CAPTURE_WINDOW_MS, 3_000);
/// ```
pub const DEFAULT_CAPTURE_WINDOW_MS: u64 = 3_000;

/// Overall wall-clock cap for one capture session, in milliseconds.
///
/// Guarantees forward progress when the host never reports a detection.
///
/// # Example
///
/// ```rust
/// use config::constants::{DEFAULT_CAPTURE_WINDOW_MS, DEFAULT_MAX_CAPTURE_MS};
/// assert!(DEFAULT_MAX_CAPTURE_MS > DEFAULT_CAPTURE_WINDOW_MS);
/// ```
pub const DEFAULT_MAX_CAPTURE_MS: u64 = 120_000;

// =============================================================================
// EXPORT CONSTANTS
// =============================================================================

/// Suggested filename for the text mesh (OBJ) artifact.
pub const DEFAULT_OBJ_FILENAME: &str = "scene.obj";

/// Suggested filename for the structured record (JSON) artifact.
pub const DEFAULT_JSON_FILENAME: &str = "scene.json";

/// MIME type attached to the text mesh artifact.
pub const OBJ_MIME_TYPE: &str = "text/plain";

/// MIME type attached to the structured record artifact.
pub const JSON_MIME_TYPE: &str = "application/json";

/// Number of decimal places written for every coordinate in the OBJ output.
///
/// Fixed precision keeps repeated exports byte-identical.
///
/// # Example
///
/// ```rust
/// use config::constants::OBJ_FLOAT_PRECISION;
///
/// let line = format!("v {:.*}", OBJ_FLOAT_PRECISION, 1.5_f64);
/// assert_eq!(line, "v 1.500000");
/// ```
pub const OBJ_FLOAT_PRECISION: usize = 6;

/// Thickness of the box emitted for a detected plane, in session length
/// units (metres for WebXR-style hosts).
///
/// # Example
///
/// ```rust
/// use config::constants::PLANE_BOX_THICKNESS;
/// assert!(PLANE_BOX_THICKNESS > 0.0 && PLANE_BOX_THICKNESS < 0.1);
/// ```
pub const PLANE_BOX_THICKNESS: f64 = 0.01;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Maximum number of vertices in a single detected mesh.
///
/// Safety limit to prevent memory exhaustion from malformed host buffers.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_VERTICES;
///
/// // A dense room scan from a phone-class depth sensor
/// let scanned = 250_000;
/// assert!(scanned < MAX_VERTICES);
/// ```
pub const MAX_VERTICES: usize = 10_000_000;

/// Maximum number of triangles in a single detected mesh.
pub const MAX_TRIANGLES: usize = 10_000_000;
