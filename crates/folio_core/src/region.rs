//! Regions: named, positioned spans of a scrollable document
//!
//! A region is a section of a paper page ("abstract", "method", ...) or a
//! group on the landing page. The host supplies the identity and document
//! order of each region; geometry is measured by the host's layout and may
//! be missing (not laid out yet) or stale (after a reflow).

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Region Identifier
// ============================================================================

/// Stable, opaque identifier of a region
///
/// Unique within a [`RegionRegistry`](crate::registry::RegionRegistry).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RegionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RegionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RegionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for RegionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RegionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ============================================================================
// Geometry
// ============================================================================

/// Measured extent of a region in content coordinates (pixels)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Distance from the top of the scrollable content to the region's top edge
    pub top: f32,
    /// Rendered height; zero for empty placeholder regions
    pub height: f32,
}

impl Geometry {
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    /// Bottom edge (`top + height`)
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Whether the host actually measured this region
    ///
    /// NaN/infinite values or a negative height mean the layout has not
    /// produced a usable position for the region.
    pub fn is_measured(&self) -> bool {
        self.top.is_finite() && self.height.is_finite() && self.height >= 0.0
    }

    pub fn is_empty(&self) -> bool {
        self.height <= 0.0
    }

    /// Check if a content-space y coordinate falls inside `[top, bottom)`
    pub fn contains(&self, y: f32) -> bool {
        y >= self.top && y < self.bottom()
    }
}

// ============================================================================
// Region
// ============================================================================

/// Identity and document rank of a region, as supplied by the host page
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSpec {
    pub id: RegionId,
    /// Position in document order; unique within a registry
    pub order: u32,
}

impl RegionSpec {
    pub fn new(id: impl Into<RegionId>, order: u32) -> Self {
        Self {
            id: id.into(),
            order,
        }
    }
}

/// A registered region with its most recently sampled geometry
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub id: RegionId,
    pub order: u32,
    /// `None` until the host has laid the region out
    pub geometry: Option<Geometry>,
}

impl Region {
    pub fn new(id: impl Into<RegionId>, order: u32) -> Self {
        Self {
            id: id.into(),
            order,
            geometry: None,
        }
    }

    /// Create a region with known geometry
    pub fn measured(id: impl Into<RegionId>, order: u32, top: f32, height: f32) -> Self {
        Self {
            id: id.into(),
            order,
            geometry: Some(Geometry::new(top, height)),
        }
    }

    /// Geometry, but only if it is usable for resolution
    pub fn measured_geometry(&self) -> Option<Geometry> {
        self.geometry.filter(Geometry::is_measured)
    }

    pub fn top(&self) -> Option<f32> {
        self.measured_geometry().map(|g| g.top)
    }
}
