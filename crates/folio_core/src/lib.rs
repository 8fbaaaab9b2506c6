//! Folio Core
//!
//! Foundational pieces of the Folio scroll-spy engine:
//!
//! - **Regions**: named, positioned spans of a scrollable page
//! - **Region Registry**: ordered, id-indexed collection with geometry refresh
//! - **Resolver**: pure mapping from scroll position to the active region
//! - **Active Region**: change-only observable consumed by navigation UI
//! - **Configuration**: page-supplied margins, header offset, throttle, timing
//!
//! # Example
//!
//! ```rust
//! use folio_core::{resolve, Geometry, RegionRegistry, SpyConfig};
//!
//! let mut registry = RegionRegistry::from_ids(["abstract", "method", "experiments"]).unwrap();
//! registry.refresh(|id| match id.as_str() {
//!     "abstract" => Some(Geometry::new(0.0, 500.0)),
//!     "method" => Some(Geometry::new(500.0, 1400.0)),
//!     "experiments" => Some(Geometry::new(1900.0, 1100.0)),
//!     _ => None,
//! });
//!
//! let config = SpyConfig::default();
//! let active = resolve(600.0, 800.0, registry.regions(), config.activation_line());
//! assert_eq!(active.map(|id| id.as_str()), Some("method"));
//! ```

pub mod config;
pub mod error;
pub mod observable;
pub mod region;
pub mod registry;
pub mod resolve;

pub use config::{ActivationMargin, SpyConfig, Throttle};
pub use error::{ConfigError, RegistryError};
pub use observable::{ActiveChange, ActiveRegion, ChangeCallback, ChangeSource, SubscriptionId};
pub use region::{Geometry, Region, RegionId, RegionSpec};
pub use registry::{RefreshReport, RegionRegistry};
pub use resolve::{resolve, resolve_at_line, resolve_index, ActivationLine};
