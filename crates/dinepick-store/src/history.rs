//! History of past picks

use chrono::{DateTime, Local};
use dinepick_api::{HistoryEntry, Location, Restaurant};
use dinepick_util::RestaurantId;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::document::{read_document, write_document};
use crate::{KeyValueStore, StoreResult};

/// Key owned by the history store
pub const HISTORY_KEY: &str = "dinepick-history";

/// Default number of retained entries
pub const DEFAULT_HISTORY_CAP: usize = 50;

/// Default dedup window in hours
pub const DEFAULT_DEDUP_WINDOW_HOURS: u32 = 24;

/// Capped, newest-first log of selections.
///
/// A selection of a restaurant that was already selected within the dedup
/// window is not logged again.
pub struct HistoryStore {
    kv: Arc<dyn KeyValueStore>,
    max_entries: usize,
    dedup_window: chrono::Duration,
}

impl HistoryStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_limits(kv, DEFAULT_HISTORY_CAP, DEFAULT_DEDUP_WINDOW_HOURS)
    }

    pub fn with_limits(kv: Arc<dyn KeyValueStore>, max_entries: usize, dedup_window_hours: u32) -> Self {
        Self {
            kv,
            max_entries: max_entries.max(1),
            dedup_window: dinepick_util::hours(dedup_window_hours),
        }
    }

    /// All entries, newest first
    pub fn list(&self) -> Vec<HistoryEntry> {
        read_document(self.kv.as_ref(), HISTORY_KEY).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.list().is_empty()
    }

    /// Record a selection made now. Returns whether an entry was added.
    pub fn record(&self, restaurant: &Restaurant, location: &Location) -> StoreResult<bool> {
        self.record_at(restaurant, location, dinepick_util::now())
    }

    /// Record a selection made at `now`. Returns whether an entry was added.
    pub fn record_at(
        &self,
        restaurant: &Restaurant,
        location: &Location,
        now: DateTime<Local>,
    ) -> StoreResult<bool> {
        let mut history = self.list();

        let recently_logged = history.iter().any(|entry| {
            entry.restaurant.id == restaurant.id
                && now.signed_duration_since(entry.selected_at) < self.dedup_window
        });
        if recently_logged {
            debug!(restaurant_id = %restaurant.id, "Selection already in history window, skipping");
            return Ok(false);
        }

        let mut snapshot = restaurant.clone();
        snapshot.visited_at = Some(now);

        history.insert(
            0,
            HistoryEntry {
                restaurant: snapshot,
                selected_at: now,
                location: location.clone(),
            },
        );
        history.truncate(self.max_entries);

        write_document(self.kv.as_ref(), HISTORY_KEY, &history)?;
        debug!(restaurant_id = %restaurant.id, entries = history.len(), "History entry recorded");
        Ok(true)
    }

    /// Remove every entry
    pub fn clear(&self) -> StoreResult<()> {
        self.kv.remove(HISTORY_KEY)
    }

    /// Ids selected within the last `window_hours`
    pub fn recent_ids(&self, window_hours: u32) -> HashSet<RestaurantId> {
        self.recent_ids_at(window_hours, dinepick_util::now())
    }

    pub fn recent_ids_at(&self, window_hours: u32, now: DateTime<Local>) -> HashSet<RestaurantId> {
        let cutoff = now - dinepick_util::hours(window_hours);
        self.list()
            .into_iter()
            .filter(|entry| entry.selected_at > cutoff)
            .map(|entry| entry.restaurant.id)
            .collect()
    }

    /// Most recent snapshot of a restaurant, if it was ever picked
    pub fn find(&self, id: &RestaurantId) -> Option<Restaurant> {
        self.list()
            .into_iter()
            .find(|entry| &entry.restaurant.id == id)
            .map(|entry| entry.restaurant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryKv;
    use chrono::{Duration, TimeZone};

    fn store() -> HistoryStore {
        HistoryStore::new(Arc::new(MemoryKv::new()))
    }

    fn restaurant(id: &str) -> Restaurant {
        Restaurant::new(id, format!("Restaurant {}", id), 48.85, 2.35)
    }

    fn base_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn empty_history_lists_nothing() {
        let history = store();
        assert!(history.list().is_empty());
        assert!(history.recent_ids(24).is_empty());
    }

    #[test]
    fn dedup_within_window() {
        let history = store();
        let here = Location::new(48.85, 2.35);
        let t0 = base_time();

        assert!(history.record_at(&restaurant("a"), &here, t0).unwrap());
        assert!(!history
            .record_at(&restaurant("a"), &here, t0 + Duration::hours(23))
            .unwrap());
        assert_eq!(history.len(), 1);

        // After the window, a second entry is logged
        assert!(history
            .record_at(&restaurant("a"), &here, t0 + Duration::hours(25))
            .unwrap());
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn cap_keeps_newest_entries() {
        let history = store();
        let here = Location::new(0.0, 0.0);
        let t0 = base_time();

        for i in 0..60 {
            history
                .record_at(&restaurant(&i.to_string()), &here, t0 + Duration::minutes(i))
                .unwrap();
        }

        let entries = history.list();
        assert_eq!(entries.len(), 50);
        assert_eq!(entries[0].restaurant.id.as_str(), "59");
        assert_eq!(entries[49].restaurant.id.as_str(), "10");
        assert!(entries
            .windows(2)
            .all(|pair| pair[0].selected_at >= pair[1].selected_at));
    }

    #[test]
    fn snapshot_is_stamped_with_visit_time() {
        let history = store();
        let t0 = base_time();
        history
            .record_at(&restaurant("a"), &Location::new(0.0, 0.0), t0)
            .unwrap();

        let entry = &history.list()[0];
        assert_eq!(entry.selected_at, t0);
        assert_eq!(entry.restaurant.visited_at, Some(t0));
    }

    #[test]
    fn recent_ids_respects_window() {
        let history = store();
        let here = Location::new(0.0, 0.0);
        let t0 = base_time();

        history.record_at(&restaurant("old"), &here, t0).unwrap();
        history
            .record_at(&restaurant("new"), &here, t0 + Duration::hours(30))
            .unwrap();

        let recent = history.recent_ids_at(24, t0 + Duration::hours(31));
        assert!(recent.contains(&RestaurantId::new("new")));
        assert!(!recent.contains(&RestaurantId::new("old")));

        let wide = history.recent_ids_at(48, t0 + Duration::hours(31));
        assert_eq!(wide.len(), 2);
    }

    #[test]
    fn clear_empties_history() {
        let history = store();
        history
            .record_at(&restaurant("a"), &Location::new(0.0, 0.0), base_time())
            .unwrap();
        history.clear().unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn corrupt_document_reads_as_empty() {
        let kv = Arc::new(MemoryKv::new());
        kv.set(HISTORY_KEY, "{not json").unwrap();

        let history = HistoryStore::new(kv);
        assert!(history.list().is_empty());

        // The next write replaces the unreadable document
        assert!(history
            .record_at(&restaurant("a"), &Location::new(0.0, 0.0), base_time())
            .unwrap());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn find_returns_latest_snapshot() {
        let history = store();
        history
            .record_at(&restaurant("a"), &Location::new(0.0, 0.0), base_time())
            .unwrap();

        assert!(history.find(&RestaurantId::new("a")).is_some());
        assert!(history.find(&RestaurantId::new("zzz")).is_none());
    }
}
