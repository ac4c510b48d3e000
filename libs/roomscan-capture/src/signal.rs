//! # End Signal
//!
//! Shared cancellation flag checked by the frame poller at every frame
//! boundary. Raising it from a host callback or another thread ends the
//! capture at the next boundary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable, thread-safe "please stop" flag.
///
/// # Example
///
/// ```rust
/// use roomscan_capture::EndSignal;
///
/// let signal = EndSignal::new();
/// let host_side = signal.clone();
/// host_side.raise();
/// assert!(signal.is_raised());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EndSignal(Arc<AtomicBool>);

impl EndSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the end of the session. Raising twice is harmless.
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
