//! Favorites set

use dinepick_api::Restaurant;
use dinepick_util::RestaurantId;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::document::{read_document, write_document};
use crate::{KeyValueStore, StoreResult};

/// Key owned by the favorites store
pub const FAVORITES_KEY: &str = "dinepick-favorites";

/// Restaurant snapshots the user marked as favorite, unique by id
pub struct FavoritesStore {
    kv: Arc<dyn KeyValueStore>,
}

impl FavoritesStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// All favorites in insertion order
    pub fn list(&self) -> Vec<Restaurant> {
        read_document(self.kv.as_ref(), FAVORITES_KEY).unwrap_or_default()
    }

    pub fn ids(&self) -> HashSet<RestaurantId> {
        self.list().into_iter().map(|r| r.id).collect()
    }

    pub fn is_favorite(&self, id: &RestaurantId) -> bool {
        self.list().iter().any(|r| &r.id == id)
    }

    /// Add a restaurant; adding an existing id changes nothing
    pub fn add(&self, restaurant: &Restaurant) -> StoreResult<()> {
        let mut favorites = self.list();
        if favorites.iter().any(|r| r.id == restaurant.id) {
            return Ok(());
        }

        let mut snapshot = restaurant.clone();
        snapshot.is_favorite = true;
        favorites.push(snapshot);

        write_document(self.kv.as_ref(), FAVORITES_KEY, &favorites)?;
        debug!(restaurant_id = %restaurant.id, "Favorite added");
        Ok(())
    }

    /// Remove by id; removing an absent id changes nothing
    pub fn remove(&self, id: &RestaurantId) -> StoreResult<()> {
        let mut favorites = self.list();
        let before = favorites.len();
        favorites.retain(|r| &r.id != id);
        if favorites.len() == before {
            return Ok(());
        }

        write_document(self.kv.as_ref(), FAVORITES_KEY, &favorites)?;
        debug!(restaurant_id = %id, "Favorite removed");
        Ok(())
    }

    /// Flip membership and return whether the restaurant is now a favorite
    pub fn toggle(&self, restaurant: &Restaurant) -> StoreResult<bool> {
        if self.is_favorite(&restaurant.id) {
            self.remove(&restaurant.id)?;
            Ok(false)
        } else {
            self.add(restaurant)?;
            Ok(true)
        }
    }

    /// Set the favorite flag on freshly fetched restaurants
    pub fn apply_overlay(&self, restaurants: &mut [Restaurant]) {
        let ids = self.ids();
        for restaurant in restaurants {
            restaurant.is_favorite = ids.contains(&restaurant.id);
        }
    }
}
