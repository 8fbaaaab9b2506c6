//! Folio Animation
//!
//! Timing primitives behind the scroll-spy engine.
//!
//! # Features
//!
//! - **Clocks**: wall-clock and manually advanced clocks behind one trait
//! - **Frame Throttle**: coalesces high-frequency scroll input to one evaluation per frame
//! - **Easing**: cubic/quadratic curves for timed smooth scrolls
//! - **Spring Physics**: RK4-integrated spring for physics-driven scrolls
//! - **Scroll Motion**: an in-flight smooth scroll from one offset to another

pub mod clock;
pub mod easing;
pub mod motion;
pub mod spring;
pub mod throttle;

pub use clock::{Clock, ManualClock, SystemClock};
pub use easing::Easing;
pub use motion::{MotionKind, ScrollMotion};
pub use spring::{Spring, SpringConfig};
pub use throttle::FrameThrottle;
