//! Host boundary: reading scroll position and geometry, writing scroll offsets
//!
//! The engine never touches a windowing or DOM system directly. The host
//! page implements [`PositionSampler`] (reads) and [`ScrollMedium`]
//! (writes) over whatever scroll container it owns.

use std::time::Duration;

use folio_core::{Geometry, RegionId};
use thiserror::Error;

/// Snapshot of the scroll container
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollState {
    /// Current scroll position from the top of the content
    pub offset: f32,
    /// Visible height of the container
    pub viewport_height: f32,
    /// Total height of the scrollable content
    pub content_height: f32,
}

impl ScrollState {
    pub fn new(offset: f32, viewport_height: f32, content_height: f32) -> Self {
        Self {
            offset,
            viewport_height,
            content_height,
        }
    }

    /// Largest reachable scroll offset
    pub fn max_offset(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    /// Clamp an offset into the reachable range
    pub fn clamp_offset(&self, offset: f32) -> f32 {
        offset.clamp(0.0, self.max_offset())
    }
}

/// Failure to reach the scroll container
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SampleError {
    #[error("scroll container is no longer attached")]
    Detached,
}

/// How a programmatic scroll should travel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Animate over roughly this duration
    Smooth(Duration),
    /// Jump straight to the offset
    Instant,
}

/// Read side of the scroll container
pub trait PositionSampler {
    /// Current scroll offset and viewport size
    fn scroll_state(&self) -> Result<ScrollState, SampleError>;

    /// Live geometry of a region; `None` if it is not laid out
    fn region_geometry(&self, id: &RegionId) -> Option<Geometry>;
}

/// Write side of the scroll container
pub trait ScrollMedium {
    /// Start scrolling to `offset`, replacing any scroll already in flight
    fn scroll_to(&mut self, offset: f32, behavior: ScrollBehavior) -> Result<(), SampleError>;

    /// Is a programmatic scroll still travelling?
    ///
    /// User input that interrupts the scroll must make this false. Hosts
    /// that cannot tell report false.
    fn is_scrolling(&self) -> bool {
        false
    }
}

/// A host that can both be sampled and scrolled
pub trait ScrollHost: PositionSampler + ScrollMedium {}

impl<T: PositionSampler + ScrollMedium> ScrollHost for T {}
