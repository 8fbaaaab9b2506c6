//! Scroll-spy controller
//!
//! Owns the engine state for one page: samples the host on scroll, resolves
//! the active region at most once per frame, publishes only real changes,
//! and applies navigation requests optimistically.
//!
//! # Lifecycle
//!
//! ```text
//! Idle --start()--> Running --stop()--> Stopped
//!                      |
//!                      +--(container gone)--> Detached
//! ```
//!
//! Every call on a stopped or detached controller is a silent no-op.
//!
//! # Example
//!
//! ```rust
//! use folio_animation::ManualClock;
//! use folio_core::{RegionRegistry, SpyConfig};
//! use folio_spy::{ScrollSpy, SimulatedPage};
//!
//! let clock = ManualClock::new();
//! let page = SimulatedPage::new(clock.clone(), 800.0)
//!     .with_region("abstract", 0.0, 600.0)
//!     .with_region("method", 600.0, 1600.0)
//!     .with_region("results", 2200.0, 1200.0);
//! let registry = RegionRegistry::from_ids(["abstract", "method", "results"]).unwrap();
//!
//! let mut spy = ScrollSpy::mount(registry, page, clock.clone(), SpyConfig::default());
//! assert_eq!(spy.active().map(|id| id.as_str()), Some("abstract"));
//!
//! spy.go_to("results");
//! assert_eq!(spy.active().map(|id| id.as_str()), Some("results"));
//! ```

use folio_animation::{Clock, FrameThrottle};
use folio_core::{
    resolve, ActiveChange, ActivationLine, ChangeSource, RefreshReport, RegionId, RegionRegistry,
    SpyConfig, SubscriptionId,
};
use tracing::{debug, trace};

use crate::navigator::Navigator;
use crate::sampler::{SampleError, ScrollBehavior, ScrollHost};
use crate::state::{Authority, EngineState, NavigationLock};

/// Lifecycle status of a controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpyStatus {
    /// Created, not yet started
    Idle,
    Running,
    /// Released by the host
    Stopped,
    /// Scroll container went away
    Detached,
}

/// Counters for observing controller behavior
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpyStats {
    /// Scroll notifications received from the host
    pub scroll_events: u64,
    /// Resolver passes actually run
    pub resolutions: u64,
    /// Samples dropped while a navigation held authority
    pub suppressed: u64,
    /// Accepted navigation requests
    pub navigations: u64,
    /// Geometry refreshes
    pub layout_passes: u64,
}

/// Scroll-spy controller for one page
pub struct ScrollSpy<H, C> {
    registry: RegionRegistry,
    host: H,
    clock: C,
    config: SpyConfig,
    line: ActivationLine,
    navigator: Navigator,
    throttle: FrameThrottle,
    state: EngineState,
    status: SpyStatus,
    stats: SpyStats,
}

impl<H: ScrollHost, C: Clock> ScrollSpy<H, C> {
    /// Create a controller without starting it
    ///
    /// Subscribe before calling [`start`](Self::start) to observe the
    /// initial resolution.
    pub fn new(registry: RegionRegistry, host: H, clock: C, config: SpyConfig) -> Self {
        Self {
            registry,
            host,
            clock,
            line: config.activation_line(),
            navigator: Navigator::from_config(&config),
            throttle: FrameThrottle::new(config.throttle),
            config,
            state: EngineState::default(),
            status: SpyStatus::Idle,
            stats: SpyStats::default(),
        }
    }

    /// Create and immediately start a controller
    pub fn mount(registry: RegionRegistry, host: H, clock: C, config: SpyConfig) -> Self {
        let mut spy = Self::new(registry, host, clock, config);
        spy.start();
        spy
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Start observing: read geometry and resolve once, synchronously
    pub fn start(&mut self) {
        if self.status != SpyStatus::Idle {
            return;
        }
        self.status = SpyStatus::Running;
        debug!(regions = self.registry.len(), "scroll-spy started");

        self.refresh_geometry();
        let now = self.clock.now();
        self.throttle.mark_evaluated(now);
        self.evaluate(ChangeSource::Mount);
    }

    /// Stop observing; no further notifications are published
    pub fn stop(&mut self) {
        if self.status == SpyStatus::Running || self.status == SpyStatus::Idle {
            debug!("scroll-spy stopped");
            self.status = SpyStatus::Stopped;
            self.throttle.cancel();
        }
    }

    pub fn status(&self) -> SpyStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == SpyStatus::Running
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// The currently active region
    pub fn active(&self) -> Option<&RegionId> {
        self.state.active.get()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&ActiveChange) + 'static,
    {
        self.state.active.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.state.active.unsubscribe(id)
    }

    /// Number of change notifications published
    pub fn emissions(&self) -> u64 {
        self.state.active.emissions()
    }

    /// Is a navigation currently suppressing scroll-driven updates?
    pub fn is_suppressing(&self) -> bool {
        self.state.is_suppressing(self.clock.now())
    }

    /// The navigation lock, if navigation is still authoritative
    pub fn navigation(&self) -> Option<&NavigationLock> {
        self.state.navigation()
    }

    pub fn stats(&self) -> SpyStats {
        self.stats
    }

    pub fn config(&self) -> &SpyConfig {
        &self.config
    }

    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // =========================================================================
    // Host Events
    // =========================================================================

    /// The container scrolled
    ///
    /// In frame mode this only marks the sample dirty; in interval mode the
    /// leading sample resolves immediately.
    pub fn on_scroll(&mut self) {
        if !self.is_running() {
            return;
        }
        self.stats.scroll_events += 1;

        let now = self.clock.now();
        if !self.throttle.request(now) {
            return;
        }
        if self.state.is_suppressing(now) {
            self.stats.suppressed += 1;
            trace!("scroll sample suppressed by navigation");
            return;
        }
        self.evaluate(ChangeSource::Scroll);
    }

    /// A frame is about to render
    pub fn on_frame(&mut self) {
        if !self.is_running() {
            return;
        }
        let now = self.clock.now();

        if let Authority::Navigation(lock) = &mut self.state.authority {
            if lock.is_suppressing(now) {
                if self.throttle.on_frame(now) {
                    self.stats.suppressed += 1;
                    trace!("scroll sample suppressed by navigation");
                }
                return;
            }
            if !lock.settled {
                // Suppression just ended: resolve at the settled offset even
                // if no scroll event arrives.
                lock.settled = true;
                self.throttle.mark_evaluated(now);
                self.evaluate(ChangeSource::Scroll);
                return;
            }
        }

        if self.throttle.on_frame(now) {
            self.evaluate(ChangeSource::Scroll);
        }
    }

    /// Viewport resized or content reflowed: re-read every region's geometry
    pub fn on_layout_change(&mut self) -> Option<RefreshReport> {
        if !self.is_running() {
            return None;
        }
        let report = self.refresh_geometry();
        let now = self.clock.now();

        if let Some(lock) = self.state.navigation() {
            if lock.is_suppressing(now) {
                self.retarget_navigation(now);
                return Some(report);
            }
            if self.landing_unchanged(lock) {
                trace!(region = %lock.target, "layout changed, navigated region still at landing offset");
                self.throttle.mark_evaluated(now);
                return Some(report);
            }
            debug!(region = %lock.target, "layout moved navigation landing, scroll authority resumed");
            self.state.authority = Authority::Scroll;
        }

        self.throttle.mark_evaluated(now);
        self.evaluate(ChangeSource::Layout);
        Some(report)
    }

    /// Navigate to a region
    ///
    /// The active region switches immediately; scroll feedback is ignored
    /// until the smooth scroll has had time to land. Unknown ids are ignored.
    /// Returns true if the navigation was accepted.
    pub fn go_to(&mut self, id: &str) -> bool {
        if !self.is_running() {
            return false;
        }

        let scroll = match self.host.scroll_state() {
            Ok(state) => Some(state),
            Err(err) => {
                self.detach(err);
                return false;
            }
        };
        let Some(plan) = self.navigator.plan(&self.registry, id, scroll) else {
            return false;
        };

        let now = self.clock.now();
        debug!(
            region = %plan.target,
            landing = plan.landing_offset,
            suppress_ms = plan.suppress_for.as_millis() as u64,
            "navigating"
        );

        self.stats.navigations += 1;
        self.throttle.cancel();
        self.state
            .active
            .set(Some(plan.target.clone()), ChangeSource::Navigation);
        self.state.authority = Authority::Navigation(NavigationLock {
            target: plan.target,
            landing_offset: plan.landing_offset,
            suppress_until: now + plan.suppress_for,
            settled: plan.suppress_for.is_zero(),
        });

        if let Err(err) = self.host.scroll_to(plan.landing_offset, plan.behavior) {
            self.detach(err);
        }
        true
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn refresh_geometry(&mut self) -> RefreshReport {
        self.stats.layout_passes += 1;
        let host = &self.host;
        let report = self.registry.refresh(|id| host.region_geometry(id));
        trace!(
            measured = report.measured,
            unmeasured = report.unmeasured.len(),
            out_of_order = report.out_of_order.len(),
            "region geometry refreshed"
        );
        report
    }

    /// Point an in-flight navigation at its region's new position
    fn retarget_navigation(&mut self, now: std::time::Instant) {
        let Some(lock) = self.state.navigation() else {
            return;
        };
        let scroll = self.host.scroll_state().ok();
        let Some(plan) = self.navigator.plan(&self.registry, lock.target.as_str(), scroll) else {
            return;
        };
        if lock.is_at_landing(plan.landing_offset) {
            return;
        }

        let remaining = lock.suppress_until.saturating_duration_since(now);
        debug!(
            region = %plan.target,
            landing = plan.landing_offset,
            "navigation target moved, retargeting"
        );
        if let Authority::Navigation(lock) = &mut self.state.authority {
            lock.landing_offset = plan.landing_offset;
        }
        if let Err(err) = self
            .host
            .scroll_to(plan.landing_offset, ScrollBehavior::Smooth(remaining))
        {
            self.detach(err);
        }
    }

    /// Does the settled navigation still land where the scroll is now?
    fn landing_unchanged(&self, lock: &NavigationLock) -> bool {
        let Ok(scroll) = self.host.scroll_state() else {
            return false;
        };
        self.navigator
            .plan(&self.registry, lock.target.as_str(), Some(scroll))
            .is_some_and(|plan| {
                lock.is_at_landing(plan.landing_offset) && lock.is_at_landing(scroll.offset)
            })
    }

    /// Sample the host and run the resolver
    fn evaluate(&mut self, source: ChangeSource) {
        let scroll = match self.host.scroll_state() {
            Ok(state) => state,
            Err(err) => {
                self.detach(err);
                return;
            }
        };
        self.stats.resolutions += 1;

        if let Some(lock) = self.state.navigation() {
            if lock.is_at_landing(scroll.offset) {
                trace!(region = %lock.target, "holding navigated region at landing offset");
                return;
            }
            if self.host.is_scrolling() {
                trace!(region = %lock.target, offset = scroll.offset, "navigation scroll still in flight");
                return;
            }
            debug!(region = %lock.target, "scrolled away from navigation, scroll authority resumed");
            self.state.authority = Authority::Scroll;
        }

        let next = resolve(
            scroll.offset,
            scroll.viewport_height,
            self.registry.regions(),
            self.line,
        )
        .cloned();
        self.state.active.set(next, source);
    }

    fn detach(&mut self, err: SampleError) {
        debug!(error = %err, "scroll container unavailable, scroll-spy detached");
        self.status = SpyStatus::Detached;
        self.throttle.cancel();
    }
}

impl<H, C> std::fmt::Debug for ScrollSpy<H, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollSpy")
            .field("status", &self.status)
            .field("active", &self.state.active.get())
            .field("authority", &self.state.authority)
            .field("regions", &self.registry.len())
            .field("stats", &self.stats)
            .finish()
    }
}
