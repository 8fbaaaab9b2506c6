//! In-flight smooth scroll
//!
//! A [`ScrollMotion`] carries a scroll offset from where it was to a target,
//! either along a timed easing curve or driven by a spring. Hosts without a
//! native smooth-scroll (and the simulated page used in tests) sample it once
//! per frame.

use std::time::{Duration, Instant};

use crate::easing::Easing;
use crate::spring::{Spring, SpringConfig};

/// Longest physics step; longer frame gaps are split into substeps
const MAX_SPRING_STEP: f32 = 1.0 / 120.0;

/// How a smooth scroll travels
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotionKind {
    /// Timed animation along an easing curve
    Tween { duration_ms: u64, easing: Easing },
    /// Spring-driven; finishes when the spring settles
    Spring(SpringConfig),
}

impl MotionKind {
    pub fn tween(duration: Duration, easing: Easing) -> Self {
        MotionKind::Tween {
            duration_ms: duration.as_millis() as u64,
            easing,
        }
    }
}

impl Default for MotionKind {
    fn default() -> Self {
        MotionKind::Tween {
            duration_ms: folio_core::config::DEFAULT_ANIMATION_DURATION_MS,
            easing: Easing::default(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Drive {
    Tween {
        from: f32,
        started: Instant,
        duration: Duration,
        easing: Easing,
    },
    Spring {
        spring: Spring,
        last_step: Instant,
    },
}

/// A smooth scroll toward `target`
#[derive(Clone, Copy, Debug)]
pub struct ScrollMotion {
    target: f32,
    drive: Drive,
}

impl ScrollMotion {
    pub fn start(kind: MotionKind, from: f32, to: f32, now: Instant) -> Self {
        let drive = match kind {
            MotionKind::Tween {
                duration_ms,
                easing,
            } => Drive::Tween {
                from,
                started: now,
                duration: Duration::from_millis(duration_ms),
                easing,
            },
            MotionKind::Spring(config) => {
                let mut spring = Spring::new(config, from);
                spring.set_target(to);
                Drive::Spring {
                    spring,
                    last_step: now,
                }
            }
        };
        Self { target: to, drive }
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Offset at `now`, advancing spring physics as needed
    pub fn sample(&mut self, now: Instant) -> f32 {
        match &mut self.drive {
            Drive::Tween {
                from,
                started,
                duration,
                easing,
            } => {
                if duration.is_zero() {
                    return self.target;
                }
                let elapsed = now.saturating_duration_since(*started);
                let t = elapsed.as_secs_f32() / duration.as_secs_f32();
                *from + (self.target - *from) * easing.apply(t)
            }
            Drive::Spring { spring, last_step } => {
                let mut remaining = now.saturating_duration_since(*last_step).as_secs_f32();
                *last_step = now;
                while remaining > 0.0 && !spring.is_settled() {
                    let dt = remaining.min(MAX_SPRING_STEP);
                    spring.step(dt);
                    remaining -= dt;
                }
                if spring.is_settled() {
                    self.target
                } else {
                    spring.position()
                }
            }
        }
    }

    /// Whether the motion has reached its target at `now`
    pub fn is_finished(&self, now: Instant) -> bool {
        match &self.drive {
            Drive::Tween {
                started, duration, ..
            } => now.saturating_duration_since(*started) >= *duration,
            Drive::Spring { spring, .. } => spring.is_settled(),
        }
    }

    /// Point the motion at a new target without a visible jump
    ///
    /// Tweens restart from their current position; springs keep their velocity.
    pub fn retarget(&mut self, to: f32, now: Instant) {
        let current = self.sample(now);
        match &mut self.drive {
            Drive::Tween { from, started, .. } => {
                *from = current;
                *started = now;
            }
            Drive::Spring { spring, .. } => spring.set_target(to),
        }
        self.target = to;
    }
}
