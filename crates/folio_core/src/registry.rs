//! Region registry
//!
//! Ordered, read-only collection of the regions a page exposes to the
//! scroll-spy. The registry never creates or removes regions after it is
//! built; it only refreshes their geometry from the host's layout.
//!
//! # Example
//!
//! ```rust
//! use folio_core::{Geometry, RegionRegistry};
//!
//! let mut registry = RegionRegistry::from_ids(["abstract", "method", "results"]).unwrap();
//! let report = registry.refresh(|id| match id.as_str() {
//!     "abstract" => Some(Geometry::new(0.0, 400.0)),
//!     "method" => Some(Geometry::new(400.0, 900.0)),
//!     _ => None,
//! });
//!
//! assert_eq!(report.measured, 2);
//! assert_eq!(report.unmeasured.len(), 1);
//! ```

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::warn;

use crate::error::RegistryError;
use crate::region::{Geometry, Region, RegionId, RegionSpec};

/// Outcome of a geometry refresh pass
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RefreshReport {
    /// Number of regions with usable geometry after the pass
    pub measured: usize,
    /// Regions the host could not measure
    pub unmeasured: SmallVec<[RegionId; 4]>,
    /// Regions whose top edge lay above an earlier region's top; their
    /// geometry was discarded for this pass
    pub out_of_order: SmallVec<[RegionId; 4]>,
}

impl RefreshReport {
    /// True when every region was measured and in document order
    pub fn is_clean(&self) -> bool {
        self.unmeasured.is_empty() && self.out_of_order.is_empty()
    }
}

/// Ordered collection of named regions
#[derive(Clone, Debug, Default)]
pub struct RegionRegistry {
    /// Regions sorted by `order`
    regions: Vec<Region>,
    /// Region id -> index into `regions`
    index: FxHashMap<RegionId, usize>,
}

impl RegionRegistry {
    /// Build a registry from host-supplied specs
    ///
    /// Specs may arrive in any sequence; they are stored sorted by `order`.
    pub fn new(specs: impl IntoIterator<Item = RegionSpec>) -> Result<Self, RegistryError> {
        let mut specs: Vec<RegionSpec> = specs.into_iter().collect();
        specs.sort_by_key(|spec| spec.order);

        let mut regions = Vec::with_capacity(specs.len());
        let mut index = FxHashMap::default();

        for (position, spec) in specs.into_iter().enumerate() {
            if spec.id.is_empty() {
                return Err(RegistryError::EmptyId { order: spec.order });
            }
            if index.contains_key(&spec.id) {
                return Err(RegistryError::DuplicateId(spec.id));
            }
            if let Some(prev) = regions.last().filter(|r: &&Region| r.order == spec.order) {
                return Err(RegistryError::DuplicateOrder {
                    order: spec.order,
                    first: prev.id.clone(),
                    second: spec.id,
                });
            }

            index.insert(spec.id.clone(), position);
            regions.push(Region::new(spec.id, spec.order));
        }

        Ok(Self { regions, index })
    }

    /// Build a registry where document order is the iteration order of `ids`
    pub fn from_ids<I, S>(ids: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<RegionId>,
    {
        Self::new(
            ids.into_iter()
                .enumerate()
                .map(|(order, id)| RegionSpec::new(id, order as u32)),
        )
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// All regions in document order
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &RegionId> {
        self.regions.iter().map(|r| &r.id)
    }

    /// Look up a region by id
    pub fn get(&self, id: &str) -> Option<&Region> {
        self.index_of(id).map(|i| &self.regions[i])
    }

    /// Position of a region in document order
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of regions that currently have usable geometry
    pub fn measured_count(&self) -> usize {
        self.regions
            .iter()
            .filter(|r| r.measured_geometry().is_some())
            .count()
    }

    /// Re-read every region's geometry
    ///
    /// `sample` is asked for each region in document order and returns
    /// `None` for regions that are not laid out. Geometry that would break
    /// the non-decreasing `top` ordering is discarded for this pass.
    pub fn refresh<F>(&mut self, mut sample: F) -> RefreshReport
    where
        F: FnMut(&RegionId) -> Option<Geometry>,
    {
        let mut report = RefreshReport::default();
        let mut max_top = f32::NEG_INFINITY;

        for region in &mut self.regions {
            let geometry = sample(&region.id).filter(Geometry::is_measured);

            match geometry {
                None => {
                    region.geometry = None;
                    report.unmeasured.push(region.id.clone());
                }
                Some(g) if g.top < max_top => {
                    warn!(
                        region = %region.id,
                        top = g.top,
                        previous_top = max_top,
                        "region geometry out of document order, ignoring for this pass"
                    );
                    region.geometry = None;
                    report.out_of_order.push(region.id.clone());
                }
                Some(g) => {
                    max_top = g.top;
                    region.geometry = Some(g);
                    report.measured += 1;
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry_of<'a>(table: &'a [(&'a str, f32, f32)]) -> impl FnMut(&RegionId) -> Option<Geometry> + 'a {
        move |id| {
            table
                .iter()
                .find(|(name, _, _)| id == name)
                .map(|(_, top, height)| Geometry::new(*top, *height))
        }
    }

    #[test]
    fn test_registry_sorts_by_order() {
        let registry = RegionRegistry::new([
            RegionSpec::new("results", 2),
            RegionSpec::new("abstract", 0),
            RegionSpec::new("method", 1),
        ])
        .unwrap();

        let ids: Vec<&str> = registry.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, ["abstract", "method", "results"]);
        assert_eq!(registry.index_of("method"), Some(1));
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_registry_rejects_duplicate_id() {
        let err = RegionRegistry::from_ids(["a", "b", "a"]).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateId(RegionId::from("a")));
    }

    #[test]
    fn test_registry_rejects_duplicate_order() {
        let err = RegionRegistry::new([RegionSpec::new("a", 3), RegionSpec::new("b", 3)])
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateOrder { order: 3, .. }));
    }

    #[test]
    fn test_registry_rejects_empty_id() {
        let err = RegionRegistry::new([RegionSpec::new("", 0)]).unwrap_err();
        assert_eq!(err, RegistryError::EmptyId { order: 0 });
    }

    #[test]
    fn test_empty_registry() {
        let mut registry = RegionRegistry::from_ids(Vec::<&str>::new()).unwrap();
        assert!(registry.is_empty());
        let report = registry.refresh(|_| None);
        assert!(report.is_clean());
        assert_eq!(report.measured, 0);
    }

    #[test]
    fn test_refresh_reads_geometry() {
        let mut registry = RegionRegistry::from_ids(["a", "b", "c"]).unwrap();
        let report = registry.refresh(geometry_of(&[
            ("a", 0.0, 100.0),
            ("b", 100.0, 100.0),
            ("c", 200.0, 100.0),
        ]));

        assert!(report.is_clean());
        assert_eq!(report.measured, 3);
        assert_eq!(registry.get("b").and_then(|r| r.top()), Some(100.0));
    }

    #[test]
    fn test_refresh_marks_unmeasured() {
        let mut registry = RegionRegistry::from_ids(["a", "b", "c"]).unwrap();
        let report = registry.refresh(geometry_of(&[("a", 0.0, 100.0), ("c", f32::NAN, 50.0)]));

        assert_eq!(report.measured, 1);
        assert_eq!(report.unmeasured.as_slice(), &[RegionId::from("b"), RegionId::from("c")]);
        assert_eq!(registry.measured_count(), 1);
    }

    #[test]
    fn test_refresh_drops_out_of_order_geometry() {
        let mut registry = RegionRegistry::from_ids(["a", "b", "c"]).unwrap();
        let report = registry.refresh(geometry_of(&[
            ("a", 0.0, 100.0),
            ("b", 300.0, 100.0),
            ("c", 150.0, 100.0),
        ]));

        assert_eq!(report.out_of_order.as_slice(), &[RegionId::from("c")]);
        assert!(registry.get("c").unwrap().geometry.is_none());
        assert_eq!(registry.get("b").and_then(|r| r.top()), Some(300.0));
    }

    #[test]
    fn test_refresh_allows_colocated_tops() {
        let mut registry = RegionRegistry::from_ids(["placeholder", "group"]).unwrap();
        let report = registry.refresh(geometry_of(&[
            ("placeholder", 50.0, 0.0),
            ("group", 50.0, 80.0),
        ]));
        assert!(report.is_clean());
    }

    #[test]
    fn test_refresh_replaces_stale_geometry() {
        let mut registry = RegionRegistry::from_ids(["a", "b"]).unwrap();
        registry.refresh(geometry_of(&[("a", 0.0, 100.0), ("b", 100.0, 100.0)]));
        registry.refresh(geometry_of(&[("a", 0.0, 240.0), ("b", 240.0, 100.0)]));

        assert_eq!(registry.get("b").and_then(|r| r.top()), Some(240.0));
    }
}
