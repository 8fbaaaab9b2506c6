//! Navigation to a named region
//!
//! The navigator only plans: where to scroll, how, and for how long scroll
//! feedback should be ignored. The controller applies the plan to the
//! engine state and the scroll medium.

use std::time::Duration;

use folio_core::{RegionId, RegionRegistry, SpyConfig};
use tracing::{debug, warn};

use crate::sampler::{ScrollBehavior, ScrollState};

/// Resolved navigation request
#[derive(Clone, Debug, PartialEq)]
pub struct NavigationPlan {
    pub target: RegionId,
    /// Scroll offset the container should end up at
    pub landing_offset: f32,
    pub behavior: ScrollBehavior,
    /// How long scroll-driven updates stay suppressed
    pub suppress_for: Duration,
}

/// Plans `go_to` requests for one page layout
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Navigator {
    /// Sticky header height subtracted from the region's top
    pub header_offset: f32,
    pub animation_duration: Duration,
}

impl Navigator {
    pub fn new(header_offset: f32, animation_duration: Duration) -> Self {
        Self {
            header_offset,
            animation_duration,
        }
    }

    pub fn from_config(config: &SpyConfig) -> Self {
        Self::new(config.fixed_header_offset, config.animation_duration())
    }

    /// Plan a navigation to `id`
    ///
    /// Returns `None` for ids that are not registered or regions that have
    /// no measured position yet. `scroll` (if known) clamps the landing
    /// offset into the reachable range.
    pub fn plan(
        &self,
        registry: &RegionRegistry,
        id: &str,
        scroll: Option<ScrollState>,
    ) -> Option<NavigationPlan> {
        let Some(region) = registry.get(id) else {
            warn!(region = id, "navigation to unknown region ignored");
            return None;
        };
        let Some(geometry) = region.measured_geometry() else {
            debug!(region = id, "navigation to unmeasured region ignored");
            return None;
        };

        let raw = geometry.top - self.header_offset;
        let landing_offset = match scroll {
            Some(state) => state.clamp_offset(raw),
            None => raw.max(0.0),
        };

        let behavior = if self.animation_duration.is_zero() {
            ScrollBehavior::Instant
        } else {
            ScrollBehavior::Smooth(self.animation_duration)
        };

        Some(NavigationPlan {
            target: region.id.clone(),
            landing_offset,
            behavior,
            suppress_for: self.animation_duration,
        })
    }
}
