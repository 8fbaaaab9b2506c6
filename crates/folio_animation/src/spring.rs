//! Spring physics for physics-driven smooth scrolling
//!
//! RK4-integrated damped spring pulling a scroll offset toward its target.
//! Retargeting mid-flight keeps the current velocity, so a second navigation
//! bends the motion instead of restarting it.

use serde::Deserialize;

/// Spring parameters; missing fields take the [`scroll`](Self::scroll) preset
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Critically damped, settles in about half a second over typical scroll distances
    pub fn scroll() -> Self {
        Self::new(400.0, 40.0, 1.0)
    }

    /// Slow, with a slight overshoot
    pub fn gentle() -> Self {
        Self::new(120.0, 14.0, 1.0)
    }

    /// Fast and crisp, slightly underdamped
    pub fn stiff() -> Self {
        Self::new(600.0, 40.0, 1.0)
    }

    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Will the spring oscillate around its target?
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::scroll()
    }
}

/// Position within 0.5px and velocity under 5px/s is visually at rest
const SETTLE_DISTANCE: f32 = 0.5;
const SETTLE_VELOCITY: f32 = 5.0;

/// A damped spring over a single scroll offset
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    position: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    /// Spring at rest at `position`
    pub fn new(config: SpringConfig, position: f32) -> Self {
        Self {
            config,
            position,
            velocity: 0.0,
            target: position,
        }
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    pub fn is_settled(&self) -> bool {
        (self.position - self.target).abs() < SETTLE_DISTANCE
            && self.velocity.abs() < SETTLE_VELOCITY
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// Snaps exactly onto the target once settled.
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        if self.is_settled() {
            self.position = self.target;
            self.velocity = 0.0;
            return;
        }

        let (x, v) = (self.position, self.velocity);
        let half = dt * 0.5;

        let (dx1, dv1) = (v, self.acceleration(x, v));
        let (dx2, dv2) = (
            v + dv1 * half,
            self.acceleration(x + dx1 * half, v + dv1 * half),
        );
        let (dx3, dv3) = (
            v + dv2 * half,
            self.acceleration(x + dx2 * half, v + dv2 * half),
        );
        let (dx4, dv4) = (v + dv3 * dt, self.acceleration(x + dx3 * dt, v + dv3 * dt));

        self.position = x + (dx1 + 2.0 * dx2 + 2.0 * dx3 + dx4) * dt / 6.0;
        self.velocity = v + (dv1 + 2.0 * dv2 + 2.0 * dv3 + dv4) * dt / 6.0;

        if self.is_settled() {
            self.position = self.target;
            self.velocity = 0.0;
        }
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let spring = -self.config.stiffness * (x - self.target);
        let damping = -self.config.damping * v;
        (spring + damping) / self.config.mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spring_settles_on_target() {
        let mut spring = Spring::new(SpringConfig::scroll(), 0.0);
        spring.set_target(1200.0);

        for _ in 0..120 {
            spring.step(1.0 / 60.0);
        }

        assert!(spring.is_settled());
        assert_eq!(spring.position(), 1200.0);
    }

    #[test]
    fn test_scroll_preset_does_not_overshoot() {
        let config = SpringConfig::scroll();
        assert!(!config.is_underdamped());

        let mut spring = Spring::new(config, 0.0);
        spring.set_target(800.0);
        for _ in 0..240 {
            spring.step(1.0 / 60.0);
            assert!(spring.position() <= 800.0 + SETTLE_DISTANCE);
        }
    }

    #[test]
    fn test_retarget_keeps_velocity() {
        let mut spring = Spring::new(SpringConfig::gentle(), 0.0);
        spring.set_target(500.0);
        for _ in 0..8 {
            spring.step(1.0 / 60.0);
        }
        let velocity = spring.velocity();
        assert!(velocity > 0.0);

        spring.set_target(100.0);
        assert_eq!(spring.velocity(), velocity);
    }

    #[test]
    fn test_large_steps_stay_bounded() {
        let mut spring = Spring::new(SpringConfig::stiff(), 0.0);
        spring.set_target(1000.0);
        for _ in 0..100 {
            spring.step(0.1);
            assert!(spring.position().is_finite());
            assert!(spring.position() < 2000.0 && spring.position() > -1000.0);
        }
    }

    #[test]
    fn test_new_spring_is_at_rest() {
        let spring = Spring::new(SpringConfig::default(), 42.0);
        assert!(spring.is_settled());
        assert_eq!(spring.target(), 42.0);
    }
}
