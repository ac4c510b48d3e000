//! # Config Crate
//!
//! Centralized configuration constants for the room scan pipeline.
//! Capture timing, export naming and geometry limits are defined here so
//! the capture, mesh and export crates agree on them.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{DEFAULT_CAPTURE_WINDOW_MS, DEFAULT_OBJ_FILENAME};
//!
//! let window = std::time::Duration::from_millis(DEFAULT_CAPTURE_WINDOW_MS);
//! assert_eq!(window.as_secs(), 3);
//! assert!(DEFAULT_OBJ_FILENAME.ends_with(".obj"));
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Deterministic Output**: Export formatting is fixed here, never derived
//!   from the environment

pub mod constants;
