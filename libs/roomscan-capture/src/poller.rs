//! # Frame Poller
//!
//! Cooperative "process one frame, then request the next" loop.
//!
//! ```text
//! step():
//!   finished?        → Finished(reason)
//!   signal raised?   → Finished(Cancelled)
//!   frame cap hit?   → Finished(FrameLimit)
//!   next_frame()     → Ended      → Finished(HostEnded)
//!                    → Frame(f)   → handler(index, &f)
//!                                     Continue → Processed(index)
//!                                     Break(r) → Finished(r)
//! ```
//!
//! At most one frame is in flight: the next frame is only requested by the
//! following call to [`FramePoller::step`].

use std::fmt;
use std::ops::ControlFlow;

use serde::Serialize;

use crate::host::FrameDelivery;
use crate::signal::EndSignal;

/// Why polling stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The termination predicate held.
    Completed,
    /// The end signal was raised.
    Cancelled,
    /// The host stopped delivering frames.
    HostEnded,
    /// The configured frame cap was reached.
    FrameLimit,
    /// The overall capture cap elapsed.
    TimedOut,
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FinishReason::Completed => "completed",
            FinishReason::Cancelled => "cancelled",
            FinishReason::HostEnded => "host ended",
            FinishReason::FrameLimit => "frame limit",
            FinishReason::TimedOut => "timed out",
        };
        f.write_str(text)
    }
}

/// Anything that can hand out frames one at a time.
pub trait FrameSource {
    type Frame;

    /// Blocks until the next frame is available or the source is exhausted.
    fn next_frame(&mut self) -> FrameDelivery<Self::Frame>;
}

/// Result of one [`FramePoller::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStep {
    /// A frame was delivered and handled.
    Processed(u64),
    Finished(FinishReason),
}

/// Drives a [`FrameSource`] until a stop condition holds.
#[derive(Debug)]
pub struct FramePoller {
    signal: EndSignal,
    frame_limit: Option<u64>,
    frames: u64,
    finished: Option<FinishReason>,
}

impl FramePoller {
    pub fn new(signal: EndSignal, frame_limit: Option<u64>) -> Self {
        Self {
            signal,
            frame_limit,
            frames: 0,
            finished: None,
        }
    }

    /// Frames delivered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn finished(&self) -> Option<FinishReason> {
        self.finished
    }

    /// Processes at most one frame.
    ///
    /// Once finished, every further call returns the same reason without
    /// touching the source.
    pub fn step<S, F>(&mut self, source: &mut S, mut handler: F) -> PollStep
    where
        S: FrameSource,
        F: FnMut(u64, &S::Frame) -> ControlFlow<FinishReason>,
    {
        if let Some(reason) = self.finished {
            return PollStep::Finished(reason);
        }
        if self.signal.is_raised() {
            return self.finish(FinishReason::Cancelled);
        }
        if self.frame_limit.is_some_and(|limit| self.frames >= limit) {
            return self.finish(FinishReason::FrameLimit);
        }

        let frame = match source.next_frame() {
            FrameDelivery::Frame(frame) => frame,
            FrameDelivery::Ended => return self.finish(FinishReason::HostEnded),
        };

        let index = self.frames;
        self.frames += 1;

        match handler(index, &frame) {
            ControlFlow::Continue(()) => PollStep::Processed(index),
            ControlFlow::Break(reason) => self.finish(reason),
        }
    }

    /// Steps until finished.
    pub fn run<S, F>(&mut self, source: &mut S, mut handler: F) -> FinishReason
    where
        S: FrameSource,
        F: FnMut(u64, &S::Frame) -> ControlFlow<FinishReason>,
    {
        loop {
            if let PollStep::Finished(reason) = self.step(source, &mut handler) {
                return reason;
            }
        }
    }

    fn finish(&mut self, reason: FinishReason) -> PollStep {
        tracing::debug!(%reason, frames = self.frames, "Frame polling stopped");
        self.finished = Some(reason);
        PollStep::Finished(reason)
    }
}
