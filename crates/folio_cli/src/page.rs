//! Page files
//!
//! A page file describes one scrollable document for the CLI: scroll-spy
//! settings, the viewport, region geometry in document order, and an
//! optional script of timed interactions.
//!
//! ```toml
//! [config]
//! fixed_header_offset = 64.0
//!
//! [viewport]
//! height = 800.0
//! motion = { spring = { stiffness = 400.0, damping = 40.0 } }
//!
//! [[regions]]
//! id = "abstract"
//! top = 0.0
//! height = 600.0
//!
//! [[script]]
//! at_ms = 100
//! go_to = "abstract"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use folio_animation::Clock;
use folio_core::{Geometry, RegionRegistry, SpyConfig};
use folio_spy::{SimulatedMotion, SimulatedPage};
use serde::Deserialize;

/// A parsed page file
#[derive(Debug, Deserialize)]
pub struct PageFile {
    #[serde(default)]
    pub config: SpyConfig,
    pub viewport: Viewport,
    #[serde(default)]
    pub regions: Vec<RegionEntry>,
    #[serde(default)]
    pub script: Vec<ScriptStep>,
}

#[derive(Debug, Deserialize)]
pub struct Viewport {
    pub height: f32,
    /// Total scrollable height; defaults to the lowest region bottom
    #[serde(default)]
    pub content_height: Option<f32>,
    /// How programmatic smooth scrolls travel
    #[serde(default)]
    pub motion: SimulatedMotion,
}

/// One region; `top`/`height` may be left out to model a region that has
/// not been laid out
#[derive(Debug, Deserialize)]
pub struct RegionEntry {
    pub id: String,
    #[serde(default)]
    pub top: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
}

impl RegionEntry {
    pub fn geometry(&self) -> Option<Geometry> {
        Some(Geometry::new(self.top?, self.height?))
    }
}

/// A timed interaction; exactly one action field must be set
#[derive(Debug, Deserialize)]
pub struct ScriptStep {
    pub at_ms: u64,
    #[serde(default)]
    pub scroll: Option<f32>,
    #[serde(default)]
    pub go_to: Option<String>,
    #[serde(default)]
    pub resize: Option<f32>,
    #[serde(default)]
    pub reflow: Option<Reflow>,
}

/// Move or resize one region, then report a layout change
#[derive(Clone, Debug, Deserialize)]
pub struct Reflow {
    pub id: String,
    pub top: f32,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// User scroll to an absolute offset
    Scroll(f32),
    /// Navigation request
    GoTo(String),
    /// New viewport height
    Resize(f32),
    Reflow { id: String, top: f32, height: f32 },
}

impl ScriptStep {
    pub fn action(&self) -> Result<Action> {
        let mut actions = Vec::with_capacity(1);
        if let Some(offset) = self.scroll {
            actions.push(Action::Scroll(offset));
        }
        if let Some(id) = &self.go_to {
            actions.push(Action::GoTo(id.clone()));
        }
        if let Some(height) = self.resize {
            actions.push(Action::Resize(height));
        }
        if let Some(reflow) = &self.reflow {
            actions.push(Action::Reflow {
                id: reflow.id.clone(),
                top: reflow.top,
                height: reflow.height,
            });
        }

        match actions.len() {
            1 => Ok(actions.remove(0)),
            0 => anyhow::bail!("script step at {}ms has no action", self.at_ms),
            _ => anyhow::bail!(
                "script step at {}ms has more than one action",
                self.at_ms
            ),
        }
    }
}

impl PageFile {
    /// Load and validate a page file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid page file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let page: PageFile = toml::from_str(content).context("Failed to parse page file")?;
        page.validate()?;
        Ok(page)
    }

    fn validate(&self) -> Result<()> {
        self.config.validate()?;
        if !(self.viewport.height.is_finite() && self.viewport.height > 0.0) {
            anyhow::bail!("viewport height must be positive, got {}", self.viewport.height);
        }
        for step in &self.script {
            step.action()?;
        }
        Ok(())
    }

    /// Regions in file order
    pub fn registry(&self) -> Result<RegionRegistry> {
        RegionRegistry::from_ids(self.regions.iter().map(|r| r.id.as_str()))
            .context("Invalid region list")
    }

    pub fn geometry(&self, id: &str) -> Option<Geometry> {
        self.regions
            .iter()
            .find(|r| r.id == id)
            .and_then(RegionEntry::geometry)
    }

    /// Headless host holding this page's geometry
    pub fn simulated<C: Clock>(&self, clock: C) -> SimulatedPage<C> {
        let mut page =
            SimulatedPage::new(clock, self.viewport.height).with_motion(self.viewport.motion);
        for region in &self.regions {
            if let Some(geometry) = region.geometry() {
                page.set_region(region.id.as_str(), geometry.top, geometry.height);
            }
        }
        page.set_content_height(self.viewport.content_height);
        page
    }

    /// Script steps ordered by time; steps sharing a time keep file order
    pub fn timeline(&self) -> Result<Vec<(u64, Action)>> {
        let mut steps = self
            .script
            .iter()
            .map(|step| step.action().map(|action| (step.at_ms, action)))
            .collect::<Result<Vec<_>>>()?;
        steps.sort_by_key(|(at_ms, _)| *at_ms);
        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_animation::{Easing, SpringConfig};
    use folio_core::Throttle;

    const PAGE: &str = r#"
        [config]
        fixed_header_offset = 64.0
        throttle = { interval_ms = 32 }

        [viewport]
        height = 800

        [[regions]]
        id = "abstract"
        top = 0
        height = 600

        [[regions]]
        id = "method"
        top = 600
        height = 1600

        [[regions]]
        id = "appendix"

        [[script]]
        at_ms = 500
        scroll = 1200.0

        [[script]]
        at_ms = 100
        go_to = "method"

        [[script]]
        at_ms = 900
        reflow = { id = "appendix", top = 2200, height = 400 }
    "#;

    #[test]
    fn test_parse_page() {
        let page = PageFile::parse(PAGE).unwrap();

        assert_eq!(page.config.fixed_header_offset, 64.0);
        assert_eq!(page.config.throttle, Throttle::IntervalMs(32));
        assert_eq!(page.viewport.height, 800.0);
        assert_eq!(page.viewport.content_height, None);
        assert_eq!(page.viewport.motion, SimulatedMotion::Tween);
        assert_eq!(page.regions.len(), 3);
        assert_eq!(page.geometry("method"), Some(Geometry::new(600.0, 1600.0)));
        assert_eq!(page.geometry("appendix"), None);
    }

    #[test]
    fn test_parse_motion() {
        let eased = PageFile::parse(
            "[viewport]\nheight = 600.0\nmotion = { tween_with = \"linear\" }\n",
        )
        .unwrap();
        assert_eq!(eased.viewport.motion, SimulatedMotion::TweenWith(Easing::Linear));

        let spring = PageFile::parse(
            "[viewport]\nheight = 600.0\nmotion = { spring = { stiffness = 120.0, damping = 14.0 } }\n",
        )
        .unwrap();
        assert_eq!(
            spring.viewport.motion,
            SimulatedMotion::Spring(SpringConfig::gentle())
        );

        assert!(PageFile::parse("[viewport]\nheight = 600.0\nmotion = \"bounce\"\n").is_err());
    }

    #[test]
    fn test_timeline_is_sorted() {
        let page = PageFile::parse(PAGE).unwrap();
        let timeline = page.timeline().unwrap();

        assert_eq!(
            timeline,
            vec![
                (100, Action::GoTo("method".into())),
                (500, Action::Scroll(1200.0)),
                (
                    900,
                    Action::Reflow {
                        id: "appendix".into(),
                        top: 2200.0,
                        height: 400.0,
                    }
                ),
            ]
        );
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let page = PageFile::parse("[viewport]\nheight = 600.0\n").unwrap();
        assert_eq!(page.config, SpyConfig::default());
        assert!(page.regions.is_empty());
        assert!(page.registry().unwrap().is_empty());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let page = PageFile::parse(
            r#"
            [viewport]
            height = 600.0
            [[regions]]
            id = "a"
            [[regions]]
            id = "a"
            "#,
        )
        .unwrap();
        assert!(page.registry().is_err());
    }

    #[test]
    fn test_rejects_ambiguous_step() {
        let result = PageFile::parse(
            r#"
            [viewport]
            height = 600.0
            [[script]]
            at_ms = 0
            scroll = 10.0
            go_to = "a"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_bad_viewport() {
        assert!(PageFile::parse("[viewport]\nheight = 0.0\n").is_err());
        assert!(PageFile::parse(
            "[config]\nfixed_header_offset = -1.0\n[viewport]\nheight = 10.0\n"
        )
        .is_err());
    }
}
