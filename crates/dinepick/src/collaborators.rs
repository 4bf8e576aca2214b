//! Collaborators used by the command line front end

use anyhow::{Context, Result};
use async_trait::async_trait;
use dinepick_api::{Location, Restaurant, SharePayload};
use dinepick_core::{Positioned, is_open_now};
use dinepick_provider_api::{
    Geocoder, Notifier, ProviderError, ProviderResult, RestaurantSearch, ShareSink,
};
use dinepick_util::RestaurantId;
use std::path::Path;
use tracing::{debug, info};

/// Restaurant search over a local JSON file (an array of restaurants)
pub struct DatasetSearch {
    restaurants: Vec<Restaurant>,
}

impl DatasetSearch {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset {:?}", path))?;
        let search = Self::from_json(&content)
            .with_context(|| format!("Failed to parse dataset {:?}", path))?;

        info!(
            dataset = %path.display(),
            restaurants = search.restaurants.len(),
            "Dataset loaded"
        );
        Ok(search)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(Self {
            restaurants: serde_json::from_str(content)?,
        })
    }

    pub fn find(&self, id: &RestaurantId) -> Option<&Restaurant> {
        self.restaurants.iter().find(|r| &r.id == id)
    }
}

#[async_trait]
impl RestaurantSearch for DatasetSearch {
    async fn search(&self, origin: &Location, radius_km: f64) -> ProviderResult<Vec<Restaurant>> {
        let max = radius_km * 1000.0;

        let mut found: Vec<Restaurant> = self
            .restaurants
            .iter()
            .filter_map(|r| {
                let distance = r.distance_to(origin);
                (distance <= max).then(|| {
                    let mut r = r.clone();
                    r.distance = Some(distance);
                    r.is_open = Some(is_open_now(r.opening_hours.as_deref()));
                    r
                })
            })
            .collect();
        found.sort_by(|a, b| a.distance.unwrap_or(0.0).total_cmp(&b.distance.unwrap_or(0.0)));

        debug!(radius_km, found = found.len(), "Dataset searched");
        Ok(found)
    }
}

/// Resolves place names against the dataset: the first restaurant whose name
/// or address contains the query, ignoring case
#[async_trait]
impl Geocoder for DatasetSearch {
    async fn geocode(&self, address: &str) -> ProviderResult<Location> {
        let query = address.trim().to_lowercase();
        let contains = |text: &str| text.to_lowercase().contains(&query);

        self.restaurants
            .iter()
            .find(|r| contains(&r.name) || r.address.as_deref().is_some_and(contains))
            .map(Restaurant::location)
            .ok_or_else(|| ProviderError::NoMatch(address.to_string()))
    }
}

/// Notifications as log lines
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str) {
        info!(title, body, "Notification");
    }
}

/// Prints share payloads for copy and paste
pub struct StdoutShare;

#[async_trait]
impl ShareSink for StdoutShare {
    async fn share(&self, payload: &SharePayload) -> ProviderResult<()> {
        println!("{}", payload.title);
        println!("{}", payload.clipboard_text());
        Ok(())
    }
}
