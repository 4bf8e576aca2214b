//! Per-restaurant rating overlay

use chrono::{DateTime, Local};
use dinepick_api::{MAX_RATING, MIN_RATING, RatingRecord, Restaurant, UserRating};
use dinepick_util::RestaurantId;
use std::sync::Arc;
use tracing::debug;

use crate::document::{read_document, write_document};
use crate::{KeyValueStore, StoreError, StoreResult};

/// Key owned by the rating store
pub const RATINGS_KEY: &str = "dinepick-ratings";

pub struct RatingStore {
    kv: Arc<dyn KeyValueStore>,
}

impl RatingStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub fn list(&self) -> Vec<RatingRecord> {
        read_document(self.kv.as_ref(), RATINGS_KEY).unwrap_or_default()
    }

    /// Rate a restaurant now
    pub fn rate(&self, id: &RestaurantId, rating: u8, note: Option<String>) -> StoreResult<()> {
        self.rate_at(id, rating, note, dinepick_util::now())
    }

    /// Insert or overwrite the rating for `id`
    pub fn rate_at(
        &self,
        id: &RestaurantId,
        rating: u8,
        note: Option<String>,
        now: DateTime<Local>,
    ) -> StoreResult<()> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(StoreError::InvalidRating(rating));
        }

        let mut records = self.list();
        match records.iter_mut().find(|r| &r.id == id) {
            Some(existing) => {
                existing.rating = rating;
                existing.note = note;
                existing.rated_at = now;
            }
            None => records.push(RatingRecord {
                id: id.clone(),
                rating,
                note,
                rated_at: now,
            }),
        }

        write_document(self.kv.as_ref(), RATINGS_KEY, &records)?;
        debug!(restaurant_id = %id, rating, "Rating saved");
        Ok(())
    }

    pub fn get(&self, id: &RestaurantId) -> UserRating {
        self.list()
            .iter()
            .find(|r| &r.id == id)
            .map(UserRating::from)
            .unwrap_or_default()
    }

    /// Copy stored ratings and notes onto restaurants
    pub fn apply_overlay(&self, restaurants: &mut [Restaurant]) {
        let records = self.list();
        for restaurant in restaurants {
            if let Some(record) = records.iter().find(|r| r.id == restaurant.id) {
                restaurant.user_rating = Some(record.rating);
                restaurant.user_note = record.note.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryKv;
    use chrono::TimeZone;

    fn store() -> RatingStore {
        RatingStore::new(Arc::new(MemoryKv::new()))
    }

    #[test]
    fn unrated_restaurant_has_no_rating() {
        assert_eq!(store().get(&RestaurantId::new("x")), UserRating::default());
    }

    #[test]
    fn later_rating_overwrites() {
        let ratings = store();
        let id = RestaurantId::new("1");
        let t0 = Local.with_ymd_and_hms(2025, 3, 1, 20, 0, 0).unwrap();
        let t1 = Local.with_ymd_and_hms(2025, 3, 8, 20, 0, 0).unwrap();

        ratings.rate_at(&id, 4, Some("Good ramen".into()), t0).unwrap();
        ratings.rate_at(&id, 2, None, t1).unwrap();

        let records = ratings.list();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].rated_at, t1);
        assert_eq!(
            ratings.get(&id),
            UserRating {
                rating: Some(2),
                note: None
            }
        );
    }

    #[test]
    fn rejects_out_of_range() {
        let ratings = store();
        let id = RestaurantId::new("1");
        assert!(matches!(ratings.rate(&id, 0, None), Err(StoreError::InvalidRating(0))));
        assert!(matches!(ratings.rate(&id, 6, None), Err(StoreError::InvalidRating(6))));
        assert!(ratings.list().is_empty());
    }

    #[test]
    fn overlay_copies_rating_and_note() {
        let ratings = store();
        ratings
            .rate(&RestaurantId::new("1"), 5, Some("Best tacos".into()))
            .unwrap();

        let mut fetched = vec![Restaurant::new("1", "Taqueria", 0.0, 0.0)];
        ratings.apply_overlay(&mut fetched);

        assert_eq!(fetched[0].user_rating, Some(5));
        assert_eq!(fetched[0].user_note.as_deref(), Some("Best tacos"));
    }
}
