//! Scroll sample coalescing
//!
//! Trackpad flings and fast wheels deliver many scroll events per frame.
//! [`FrameThrottle`] decides when the scroll-spy actually evaluates, so
//! resolution cost stays bounded per rendered frame regardless of input
//! frequency.

use std::time::Instant;

use folio_core::Throttle;
use tracing::trace;

/// Coalesces scroll samples into evaluations
#[derive(Clone, Debug)]
pub struct FrameThrottle {
    mode: Throttle,
    pending: bool,
    last_evaluation: Option<Instant>,
    coalesced: u64,
}

impl FrameThrottle {
    pub fn new(mode: Throttle) -> Self {
        Self {
            mode,
            pending: false,
            last_evaluation: None,
            coalesced: 0,
        }
    }

    pub fn mode(&self) -> Throttle {
        self.mode
    }

    /// Is a sample waiting for the next frame?
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Samples absorbed without their own evaluation
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }

    /// Record a scroll sample
    ///
    /// Returns true if the caller should evaluate immediately. In frame mode
    /// this is never the case; the next [`on_frame`](Self::on_frame) picks it up.
    pub fn request(&mut self, now: Instant) -> bool {
        if self.pending {
            self.coalesced += 1;
            trace!(coalesced = self.coalesced, "scroll sample coalesced");
            return false;
        }

        if self.interval_elapsed(now) == Some(true) {
            self.mark_evaluated(now);
            return true;
        }

        self.pending = true;
        false
    }

    /// Frame boundary; returns true if a pending sample should be evaluated now
    pub fn on_frame(&mut self, now: Instant) -> bool {
        if !self.pending || self.interval_elapsed(now) == Some(false) {
            return false;
        }
        self.mark_evaluated(now);
        true
    }

    /// Note an evaluation that happened outside the throttle (mount, layout)
    pub fn mark_evaluated(&mut self, now: Instant) {
        self.pending = false;
        self.last_evaluation = Some(now);
    }

    /// Drop any pending sample
    pub fn cancel(&mut self) {
        self.pending = false;
    }

    /// `None` in frame mode; otherwise whether the interval since the last
    /// evaluation has passed
    fn interval_elapsed(&self, now: Instant) -> Option<bool> {
        let interval = self.mode.interval()?;
        Some(
            self.last_evaluation
                .map_or(true, |last| now.saturating_duration_since(last) >= interval),
        )
    }
}
