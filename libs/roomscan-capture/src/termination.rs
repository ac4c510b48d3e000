//! # Termination Predicate
//!
//! Decides after each frame whether the capture is complete. Only instants
//! taken at frame boundaries are compared; nothing here sleeps or schedules.

use std::time::{Duration, Instant};

use crate::poller::FinishReason;
use crate::settings::TerminationRule;

/// Completion state of one session.
#[derive(Debug, Clone)]
pub struct Termination {
    rule: TerminationRule,
    max_duration: Option<Duration>,
    started_at: Instant,
    first_detection_at: Option<Instant>,
}

impl Termination {
    pub fn new(rule: TerminationRule, max_duration: Option<Duration>, started_at: Instant) -> Self {
        Self {
            rule,
            max_duration,
            started_at,
            first_detection_at: None,
        }
    }

    /// When the buffer first became non-empty, if it has.
    pub fn first_detection_at(&self) -> Option<Instant> {
        self.first_detection_at
    }

    /// Evaluates the predicate for the buffer size after a frame.
    ///
    /// Completion wins over the overall cap when both hold at the same
    /// boundary.
    pub fn observe(&mut self, buffer_len: usize, now: Instant) -> Option<FinishReason> {
        if buffer_len > 0 && self.first_detection_at.is_none() {
            self.first_detection_at = Some(now);
        }

        if let Some(first) = self.first_detection_at {
            let complete = match self.rule {
                TerminationRule::FirstDetection => true,
                TerminationRule::Window { delay_ms } => {
                    now.saturating_duration_since(first) >= Duration::from_millis(delay_ms)
                }
            };
            if complete {
                return Some(FinishReason::Completed);
            }
        }

        match self.max_duration {
            Some(cap) if now.saturating_duration_since(self.started_at) >= cap => {
                Some(FinishReason::TimedOut)
            }
            _ => None,
        }
    }
}
