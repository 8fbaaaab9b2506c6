//! Change-only observable for the active region id
//!
//! Subscribers are notified when the value actually changes, never on a
//! redundant write, so navigation highlighting only re-renders on real
//! section transitions.

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use tracing::debug;

use crate::region::RegionId;

new_key_type! {
    /// Handle returned by [`ActiveRegion::subscribe`]
    pub struct SubscriptionId;
}

/// What caused the active region to change
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeSource {
    /// Initial resolution when the controller starts
    Mount,
    /// Scroll-driven resolution
    Scroll,
    /// Resolution after region geometry was re-read
    Layout,
    /// Optimistic update from a navigation request
    Navigation,
}

/// A published transition of the active region
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveChange {
    pub previous: Option<RegionId>,
    pub current: Option<RegionId>,
    pub source: ChangeSource,
}

pub type ChangeCallback = Box<dyn FnMut(&ActiveChange)>;

/// The single observable `activeRegionId` value
#[derive(Default)]
pub struct ActiveRegion {
    current: Option<RegionId>,
    subscribers: SlotMap<SubscriptionId, ChangeCallback>,
    emissions: u64,
}

impl ActiveRegion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value
    pub fn get(&self) -> Option<&RegionId> {
        self.current.as_ref()
    }

    /// Register a change callback
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&ActiveChange) + 'static,
    {
        self.subscribers.insert(Box::new(callback))
    }

    /// Remove a subscriber; returns false if the handle was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Number of change notifications published so far
    pub fn emissions(&self) -> u64 {
        self.emissions
    }

    /// Write a new value
    ///
    /// Returns true (and notifies subscribers) only if the value differs
    /// from the current one.
    pub fn set(&mut self, next: Option<RegionId>, source: ChangeSource) -> bool {
        if self.current == next {
            return false;
        }

        let change = ActiveChange {
            previous: self.current.take(),
            current: next,
            source,
        };
        debug!(
            previous = ?change.previous,
            current = ?change.current,
            source = ?change.source,
            "active region changed"
        );

        self.current.clone_from(&change.current);
        self.emissions += 1;
        for (_, callback) in self.subscribers.iter_mut() {
            callback(&change);
        }
        true
    }
}

impl std::fmt::Debug for ActiveRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveRegion")
            .field("current", &self.current)
            .field("subscribers", &self.subscribers.len())
            .field("emissions", &self.emissions)
            .finish()
    }
}
