//! Scripted replay against the simulated page
//!
//! Script steps fire at the first frame boundary at or after their `at_ms`.
//! The replay keeps stepping frames until the last navigation could have
//! settled and the page has stopped scrolling, then reports every published
//! transition.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use folio_animation::ManualClock;
use folio_core::{ChangeSource, RegionId};
use folio_spy::{ScrollSpy, SimulatedPage, SpyStatus};
use serde::Serialize;
use tracing::{debug, warn};

use crate::page::{Action, PageFile};

type ReplaySpy = ScrollSpy<SimulatedPage<ManualClock>, ManualClock>;

/// Upper bound on waiting for a smooth scroll to come to rest
const MAX_SETTLE: Duration = Duration::from_secs(10);

/// One published change of the active region
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Transition {
    pub at_ms: u64,
    pub previous: Option<RegionId>,
    pub current: Option<RegionId>,
    pub source: ChangeSource,
}

#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub transitions: Vec<Transition>,
    pub frames: u64,
    pub final_offset: f32,
    pub final_active: Option<RegionId>,
    pub scroll_events: u64,
    pub resolutions: u64,
    pub suppressed: u64,
    pub navigations: u64,
    pub detached: bool,
}

/// Run the page's script with a fixed frame interval
pub fn replay(page: &PageFile, frame: Duration) -> Result<ReplayReport> {
    anyhow::ensure!(!frame.is_zero(), "frame interval must be positive");

    let timeline = page.timeline()?;
    let clock = ManualClock::new();
    let host = page.simulated(clock.clone());
    let mut spy = ScrollSpy::new(page.registry()?, host, clock.clone(), page.config);

    let transitions = Rc::new(RefCell::new(Vec::new()));
    spy.subscribe({
        let transitions = Rc::clone(&transitions);
        let clock = clock.clone();
        move |change| {
            transitions.borrow_mut().push(Transition {
                at_ms: clock.elapsed().as_millis() as u64,
                previous: change.previous.clone(),
                current: change.current.clone(),
                source: change.source,
            })
        }
    });
    spy.start();

    let last_step = timeline.last().map_or(0, |(at_ms, _)| *at_ms);
    let end = Duration::from_millis(last_step) + page.config.animation_duration() + frame;

    let mut steps = timeline.into_iter().peekable();
    let mut frames = 0;
    loop {
        let now = clock.elapsed();
        while let Some((at_ms, action)) =
            steps.next_if(|(at_ms, _)| Duration::from_millis(*at_ms) <= now)
        {
            debug!(at_ms, ?action, "script step");
            apply(&mut spy, action);
        }
        let settled = !spy.host().is_animating() || now >= end + MAX_SETTLE;
        if (now >= end && settled) || spy.status() != SpyStatus::Running {
            break;
        }
        clock.advance(frame);
        spy.step_frame();
        frames += 1;
    }

    let stats = spy.stats();
    let transitions = transitions.take();
    Ok(ReplayReport {
        transitions,
        frames,
        final_offset: spy.host().offset(),
        final_active: spy.active().cloned(),
        scroll_events: stats.scroll_events,
        resolutions: stats.resolutions,
        suppressed: stats.suppressed,
        navigations: stats.navigations,
        detached: spy.status() == SpyStatus::Detached,
    })
}

fn apply(spy: &mut ReplaySpy, action: Action) {
    match action {
        Action::Scroll(offset) => spy.user_scroll_to(offset),
        Action::GoTo(id) => {
            if !spy.go_to(&id) {
                warn!(region = %id, "navigation request not accepted");
            }
        }
        Action::Resize(height) => {
            spy.host_mut().set_viewport_height(height);
            spy.on_layout_change();
        }
        Action::Reflow { id, top, height } => {
            spy.host_mut().set_region(id, top, height);
            spy.on_layout_change();
        }
    }
}
