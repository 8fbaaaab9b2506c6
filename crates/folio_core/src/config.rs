//! Scroll-spy configuration
//!
//! Pages differ in how tall their sticky header is and where the reading
//! line should sit, so every numeric constant is page-supplied.
//!
//! ```toml
//! activation_margin = { pixels = 8.0 }   # or { viewport_fraction = 0.1 }
//! fixed_header_offset = 24.0
//! throttle = "frame"                     # or { interval_ms = 16 }
//! animation_duration_ms = 400
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::resolve::ActivationLine;

// ============================================================================
// Activation Margin
// ============================================================================

/// Offset of the activation line below the top of the visible content
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationMargin {
    /// Fixed distance in pixels
    Pixels(f32),
    /// Fraction of the viewport height (0.0 = top edge, 1.0 = bottom edge)
    ViewportFraction(f32),
}

impl Default for ActivationMargin {
    fn default() -> Self {
        ActivationMargin::Pixels(DEFAULT_ACTIVATION_MARGIN_PX)
    }
}

impl ActivationMargin {
    pub fn to_pixels(self, viewport_height: f32) -> f32 {
        match self {
            ActivationMargin::Pixels(px) => px,
            ActivationMargin::ViewportFraction(f) => f * viewport_height,
        }
    }
}

// ============================================================================
// Throttle
// ============================================================================

/// How scroll samples are coalesced before resolution
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Throttle {
    /// At most one resolution per rendered frame
    #[default]
    Frame,
    /// At most one resolution per interval; the first sample resolves immediately
    IntervalMs(u64),
}

impl Throttle {
    pub fn interval(self) -> Option<Duration> {
        match self {
            Throttle::Frame => None,
            Throttle::IntervalMs(ms) => Some(Duration::from_millis(ms)),
        }
    }
}

// ============================================================================
// SpyConfig
// ============================================================================

pub const DEFAULT_ACTIVATION_MARGIN_PX: f32 = 8.0;
pub const DEFAULT_ANIMATION_DURATION_MS: u64 = 400;

/// Configuration for one scroll-spy instance
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpyConfig {
    pub activation_margin: ActivationMargin,
    /// Height of the page's sticky header, in pixels
    pub fixed_header_offset: f32,
    pub throttle: Throttle,
    /// Smooth-scroll duration; scroll-driven updates are suppressed for this long
    /// after a navigation. Zero means navigations jump instantly.
    pub animation_duration_ms: u64,
}

impl Default for SpyConfig {
    fn default() -> Self {
        Self {
            activation_margin: ActivationMargin::default(),
            fixed_header_offset: 0.0,
            throttle: Throttle::Frame,
            animation_duration_ms: DEFAULT_ANIMATION_DURATION_MS,
        }
    }
}

impl SpyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: SpyConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn length(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidLength { field, value })
            }
        }

        match self.activation_margin {
            ActivationMargin::Pixels(px) => length("activation_margin.pixels", px)?,
            ActivationMargin::ViewportFraction(f) => {
                if !(0.0..=1.0).contains(&f) {
                    return Err(ConfigError::InvalidFraction(f));
                }
            }
        }
        length("fixed_header_offset", self.fixed_header_offset)
    }

    pub fn activation_margin(mut self, margin: ActivationMargin) -> Self {
        self.activation_margin = margin;
        self
    }

    pub fn activation_margin_px(self, px: f32) -> Self {
        self.activation_margin(ActivationMargin::Pixels(px))
    }

    pub fn fixed_header_offset(mut self, px: f32) -> Self {
        self.fixed_header_offset = px;
        self
    }

    pub fn throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn animation_duration_ms(mut self, ms: u64) -> Self {
        self.animation_duration_ms = ms;
        self
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    /// Activation line derived from the margin and header offset
    pub fn activation_line(&self) -> ActivationLine {
        ActivationLine {
            margin: self.activation_margin,
            header_offset: self.fixed_header_offset,
        }
    }
}
