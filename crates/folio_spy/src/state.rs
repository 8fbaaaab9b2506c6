//! Engine state shared by scroll-driven resolution and navigation

use std::time::Instant;

use folio_core::{ActiveRegion, RegionId};

/// Scroll landing within this many pixels counts as "still at the landing offset"
pub const LANDING_TOLERANCE: f32 = 1.0;

/// Who currently decides the active region
#[derive(Clone, Debug, PartialEq)]
pub enum Authority {
    /// Scroll position drives resolution
    Scroll,
    /// A navigation request owns the active region
    Navigation(NavigationLock),
}

/// Hold placed on scroll-driven resolution by a navigation request
#[derive(Clone, Debug, PartialEq)]
pub struct NavigationLock {
    pub target: RegionId,
    /// Offset the smooth scroll is heading for
    pub landing_offset: f32,
    /// Scroll samples before this instant are ignored
    pub suppress_until: Instant,
    /// Set once the post-suppression resolution has run
    pub settled: bool,
}

impl NavigationLock {
    pub fn is_suppressing(&self, now: Instant) -> bool {
        now < self.suppress_until
    }

    /// Has the scroll stayed where the navigation put it?
    pub fn is_at_landing(&self, offset: f32) -> bool {
        (offset - self.landing_offset).abs() <= LANDING_TOLERANCE
    }
}

/// `activeRegionId` plus the authority over it
#[derive(Debug)]
pub struct EngineState {
    pub active: ActiveRegion,
    pub authority: Authority,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            active: ActiveRegion::new(),
            authority: Authority::Scroll,
        }
    }
}

impl EngineState {
    /// The lock, if a navigation is still in charge
    pub fn navigation(&self) -> Option<&NavigationLock> {
        match &self.authority {
            Authority::Navigation(lock) => Some(lock),
            Authority::Scroll => None,
        }
    }

    pub fn is_suppressing(&self, now: Instant) -> bool {
        self.navigation().is_some_and(|lock| lock.is_suppressing(now))
    }
}
