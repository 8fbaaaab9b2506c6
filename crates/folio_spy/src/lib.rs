//! Folio Scroll-Spy
//!
//! Keeps a page's navigation highlight in sync with its scroll position.
//!
//! - **Position Sampler / Scroll Medium**: the host boundary (read scroll and
//!   geometry, write scroll offsets)
//! - **Scroll-Spy Controller**: throttled, change-only active-region tracking
//! - **Navigator**: `go_to(id)` with optimistic activation and suppression of
//!   scroll feedback while the smooth scroll is in flight
//! - **Simulated Page**: headless host for tests and scripted replays

pub mod controller;
pub mod navigator;
pub mod sampler;
pub mod simulated;
pub mod state;

pub use controller::{ScrollSpy, SpyStats, SpyStatus};
pub use navigator::{NavigationPlan, Navigator};
pub use sampler::{
    PositionSampler, SampleError, ScrollBehavior, ScrollHost, ScrollMedium, ScrollState,
};
pub use simulated::{SimulatedMotion, SimulatedPage};
pub use state::{Authority, EngineState, NavigationLock, LANDING_TOLERANCE};

// Re-export the types hosts need alongside the controller
pub use folio_core::{
    ActiveChange, ChangeSource, Geometry, RegionId, RegionRegistry, RegionSpec, SpyConfig,
    SubscriptionId,
};
