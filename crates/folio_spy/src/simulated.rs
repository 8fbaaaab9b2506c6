//! Headless page host
//!
//! [`SimulatedPage`] stands in for a real scroll container: it holds region
//! geometry, a viewport, and the current scroll offset, and animates
//! programmatic smooth scrolls with [`ScrollMotion`]. Tests and the replay
//! CLI drive it frame by frame.

use folio_animation::{Clock, Easing, MotionKind, ScrollMotion};
use folio_core::{Geometry, RegionId};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::controller::ScrollSpy;
use crate::sampler::{PositionSampler, SampleError, ScrollBehavior, ScrollMedium, ScrollState};

/// How the simulated page animates smooth scrolls
///
/// In TOML: `"tween"`, `{ tween_with = "linear" }` or
/// `{ spring = { stiffness = 400.0, damping = 40.0 } }`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulatedMotion {
    /// Ease over the requested duration
    #[default]
    Tween,
    /// Tween with a specific easing curve
    TweenWith(Easing),
    /// Spring physics; ignores the requested duration
    Spring(folio_animation::SpringConfig),
}

/// A scripted scroll container
#[derive(Debug)]
pub struct SimulatedPage<C> {
    clock: C,
    regions: IndexMap<RegionId, Geometry>,
    viewport_height: f32,
    /// Explicit content height; otherwise the lowest region bottom
    content_height: Option<f32>,
    offset: f32,
    motion: Option<ScrollMotion>,
    motion_style: SimulatedMotion,
    detached: bool,
    scroll_requests: u64,
}

impl<C: Clock> SimulatedPage<C> {
    pub fn new(clock: C, viewport_height: f32) -> Self {
        Self {
            clock,
            regions: IndexMap::new(),
            viewport_height,
            content_height: None,
            offset: 0.0,
            motion: None,
            motion_style: SimulatedMotion::default(),
            detached: false,
            scroll_requests: 0,
        }
    }

    // =========================================================================
    // Setup
    // =========================================================================

    /// Add (or move) a region
    pub fn with_region(mut self, id: impl Into<RegionId>, top: f32, height: f32) -> Self {
        self.set_region(id, top, height);
        self
    }

    pub fn with_content_height(mut self, height: f32) -> Self {
        self.content_height = Some(height);
        self
    }

    pub fn with_motion(mut self, style: SimulatedMotion) -> Self {
        self.motion_style = style;
        self
    }

    /// Insert or update a region's geometry (a reflow)
    pub fn set_region(&mut self, id: impl Into<RegionId>, top: f32, height: f32) {
        self.regions.insert(id.into(), Geometry::new(top, height));
    }

    /// Forget a region's geometry, as if it were not laid out
    pub fn unmeasure_region(&mut self, id: &str) {
        self.regions.shift_remove(id);
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height;
        self.offset = self.state().clamp_offset(self.offset);
    }

    pub fn set_content_height(&mut self, height: Option<f32>) {
        self.content_height = height;
    }

    /// Make every subsequent read or write fail
    pub fn detach(&mut self) {
        self.detached = true;
    }

    // =========================================================================
    // Scrolling
    // =========================================================================

    /// User-driven scroll; interrupts any programmatic smooth scroll
    pub fn user_scroll_to(&mut self, offset: f32) {
        self.motion = None;
        self.offset = self.state().clamp_offset(offset);
    }

    pub fn user_scroll_by(&mut self, delta: f32) {
        self.user_scroll_to(self.offset + delta);
    }

    /// Step the in-flight smooth scroll to the clock's current time
    ///
    /// Returns true if the offset moved.
    pub fn advance(&mut self) -> bool {
        let Some(motion) = self.motion.as_mut() else {
            return false;
        };
        let now = self.clock.now();
        let next = motion.sample(now);
        if motion.is_finished(now) {
            self.motion = None;
        }

        let moved = (next - self.offset).abs() > f32::EPSILON;
        self.offset = next;
        moved
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn is_animating(&self) -> bool {
        self.motion.is_some()
    }

    /// Number of programmatic scrolls requested
    pub fn scroll_requests(&self) -> u64 {
        self.scroll_requests
    }

    pub fn content_height(&self) -> f32 {
        self.content_height.unwrap_or_else(|| {
            self.regions
                .values()
                .map(Geometry::bottom)
                .fold(0.0, f32::max)
        })
    }

    fn state(&self) -> ScrollState {
        ScrollState::new(self.offset, self.viewport_height, self.content_height())
    }

    fn motion_kind(&self, duration: std::time::Duration) -> MotionKind {
        match self.motion_style {
            SimulatedMotion::Tween => MotionKind::tween(duration, Easing::default()),
            SimulatedMotion::TweenWith(easing) => MotionKind::tween(duration, easing),
            SimulatedMotion::Spring(config) => MotionKind::Spring(config),
        }
    }
}

impl<C: Clock> PositionSampler for SimulatedPage<C> {
    fn scroll_state(&self) -> Result<ScrollState, SampleError> {
        if self.detached {
            return Err(SampleError::Detached);
        }
        Ok(self.state())
    }

    fn region_geometry(&self, id: &RegionId) -> Option<Geometry> {
        if self.detached {
            return None;
        }
        self.regions.get(id).copied()
    }
}

impl<C: Clock> ScrollMedium for SimulatedPage<C> {
    fn scroll_to(&mut self, offset: f32, behavior: ScrollBehavior) -> Result<(), SampleError> {
        if self.detached {
            return Err(SampleError::Detached);
        }
        self.scroll_requests += 1;
        let target = self.state().clamp_offset(offset);
        let now = self.clock.now();

        match behavior {
            ScrollBehavior::Instant => {
                self.motion = None;
                self.offset = target;
            }
            ScrollBehavior::Smooth(duration) => {
                let spring = matches!(self.motion_style, SimulatedMotion::Spring(_));
                match self.motion.as_mut() {
                    // Springs bend toward the new target, keeping their momentum
                    Some(motion) if spring => motion.retarget(target, now),
                    _ => {
                        let kind = self.motion_kind(duration);
                        self.motion = Some(ScrollMotion::start(kind, self.offset, target, now));
                    }
                }
            }
        }
        Ok(())
    }

    fn is_scrolling(&self) -> bool {
        !self.detached && self.is_animating()
    }
}

impl<C: Clock> ScrollSpy<SimulatedPage<C>, C> {
    /// Run one frame against the simulated page
    ///
    /// Advances the page's smooth scroll, reports the scroll if the offset
    /// moved, then delivers the frame.
    pub fn step_frame(&mut self) {
        if self.host_mut().advance() {
            self.on_scroll();
        }
        self.on_frame();
    }

    /// User scroll followed by the scroll notification
    pub fn user_scroll_to(&mut self, offset: f32) {
        let before = self.host().offset();
        self.host_mut().user_scroll_to(offset);
        if (self.host().offset() - before).abs() > f32::EPSILON {
            self.on_scroll();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_animation::ManualClock;
    use std::time::Duration;

    fn page(clock: &ManualClock) -> SimulatedPage<ManualClock> {
        SimulatedPage::new(clock.clone(), 500.0)
            .with_region("a", 0.0, 400.0)
            .with_region("b", 400.0, 800.0)
            .with_region("c", 1200.0, 600.0)
    }

    #[test]
    fn test_content_height_from_regions() {
        let clock = ManualClock::new();
        let page = page(&clock);
        assert_eq!(page.content_height(), 1800.0);
        assert_eq!(page.scroll_state().unwrap().max_offset(), 1300.0);
    }

    #[test]
    fn test_user_scroll_clamps() {
        let clock = ManualClock::new();
        let mut page = page(&clock);
        page.user_scroll_to(5000.0);
        assert_eq!(page.offset(), 1300.0);
        page.user_scroll_by(-2000.0);
        assert_eq!(page.offset(), 0.0);
    }

    #[test]
    fn test_smooth_scroll_animates_over_duration() {
        let clock = ManualClock::new();
        let mut page = page(&clock);

        page.scroll_to(1000.0, ScrollBehavior::Smooth(Duration::from_millis(400)))
            .unwrap();
        assert_eq!(page.offset(), 0.0);
        assert!(page.is_animating());

        clock.advance_ms(200);
        assert!(page.advance());
        assert!(page.offset() > 0.0 && page.offset() < 1000.0);

        clock.advance_ms(200);
        page.advance();
        assert_eq!(page.offset(), 1000.0);
        assert!(!page.is_animating());
    }

    #[test]
    fn test_instant_scroll_jumps() {
        let clock = ManualClock::new();
        let mut page = page(&clock);
        page.scroll_to(400.0, ScrollBehavior::Instant).unwrap();
        assert_eq!(page.offset(), 400.0);
        assert!(!page.advance());
    }

    #[test]
    fn test_user_scroll_interrupts_motion() {
        let clock = ManualClock::new();
        let mut page = page(&clock);
        page.scroll_to(1000.0, ScrollBehavior::Smooth(Duration::from_millis(400)))
            .unwrap();
        page.user_scroll_to(50.0);
        assert!(!page.is_animating());
        assert_eq!(page.offset(), 50.0);
    }

    #[test]
    fn test_spring_motion_retargets() {
        let clock = ManualClock::new();
        let mut page = page(&clock).with_motion(SimulatedMotion::Spring(Default::default()));
        page.scroll_to(1200.0, ScrollBehavior::Smooth(Duration::from_millis(400)))
            .unwrap();
        clock.advance_ms(50);
        page.advance();
        page.scroll_to(300.0, ScrollBehavior::Smooth(Duration::from_millis(400)))
            .unwrap();

        for _ in 0..200 {
            clock.advance_ms(16);
            page.advance();
        }
        assert_eq!(page.offset(), 300.0);
    }

    #[test]
    fn test_detached_page_fails() {
        let clock = ManualClock::new();
        let mut page = page(&clock);
        page.detach();
        assert_eq!(page.scroll_state(), Err(SampleError::Detached));
        assert_eq!(page.region_geometry(&RegionId::from("a")), None);
        assert!(page.scroll_to(10.0, ScrollBehavior::Instant).is_err());
    }
}
