//! Active-section resolution
//!
//! Maps a scroll position onto the region that is currently "in view". The
//! rule is anchored to an *activation line* just below the top of the
//! viewport (after any sticky header):
//!
//! - the active region is the last region whose top edge is at or above the line
//! - above the first region the first region is active
//! - past the end of the content the last region stays active
//! - zero-height placeholders never take activation from real content
//! - regions without measured geometry are skipped
//!
//! The result is total (never `None` once one region is measured) and
//! monotonic: a larger scroll offset never resolves to an earlier region.

use crate::config::ActivationMargin;
use crate::region::{Region, RegionId};

/// Where the activation line sits relative to the scroll offset
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActivationLine {
    /// Distance below the header at which a region becomes active
    pub margin: ActivationMargin,
    /// Height of any sticky header obscuring the top of the viewport
    pub header_offset: f32,
}

impl Default for ActivationLine {
    fn default() -> Self {
        Self {
            margin: ActivationMargin::default(),
            header_offset: 0.0,
        }
    }
}

impl ActivationLine {
    /// Activation line with a pixel margin and no header
    pub fn pixels(margin: f32) -> Self {
        Self {
            margin: ActivationMargin::Pixels(margin),
            header_offset: 0.0,
        }
    }

    pub fn with_header_offset(mut self, header_offset: f32) -> Self {
        self.header_offset = header_offset;
        self
    }

    /// Content-space y coordinate of the line for a given scroll state
    pub fn position(&self, scroll_offset: f32, viewport_height: f32) -> f32 {
        scroll_offset + self.header_offset + self.margin.to_pixels(viewport_height)
    }
}

/// Resolve the active region id
///
/// `regions` must be in document order with non-decreasing tops, which
/// [`RegionRegistry::refresh`](crate::registry::RegionRegistry::refresh)
/// guarantees. Returns `None` only when no region has usable geometry.
pub fn resolve(
    scroll_offset: f32,
    viewport_height: f32,
    regions: &[Region],
    line: ActivationLine,
) -> Option<&RegionId> {
    resolve_index(scroll_offset, viewport_height, regions, line).map(|i| &regions[i].id)
}

/// Like [`resolve`], returning the region's index in `regions`
pub fn resolve_index(
    scroll_offset: f32,
    viewport_height: f32,
    regions: &[Region],
    line: ActivationLine,
) -> Option<usize> {
    resolve_at_line(line.position(scroll_offset, viewport_height), regions)
}

/// Core single-pass walk for an already computed activation line
pub fn resolve_at_line(line_y: f32, regions: &[Region]) -> Option<usize> {
    // Regions with content
    let mut first = None;
    let mut active = None;
    // Any measured region, used only when every region is a placeholder
    let mut first_any = None;
    let mut active_any = None;

    for (i, region) in regions.iter().enumerate() {
        let Some(geometry) = region.measured_geometry() else {
            continue;
        };
        let reached = geometry.top <= line_y;

        first_any.get_or_insert(i);
        if reached {
            active_any = Some(i);
        }

        if !geometry.is_empty() {
            first.get_or_insert(i);
            if reached {
                active = Some(i);
            }
        }

        if !reached && first.is_some() {
            break;
        }
    }

    if first.is_some() {
        active.or(first)
    } else {
        active_any.or(first_any)
    }
}
