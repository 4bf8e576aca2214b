//! Mock collaborators for testing

use async_trait::async_trait;
use dinepick_api::{Location, Restaurant, SharePayload};
use std::sync::{Arc, Mutex};

use crate::{
    Geocoder, LocationProvider, Notifier, ProviderError, ProviderResult, RestaurantSearch,
    ShareSink,
};

/// A notification captured by [`MockProviders`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub title: String,
    pub body: String,
}

/// Scripted implementation of every collaborator trait
pub struct MockProviders {
    /// Result of `current_location`
    pub location: Arc<Mutex<ProviderResult<Location>>>,

    /// Known addresses for `geocode`
    pub addresses: Arc<Mutex<Vec<(String, Location)>>>,

    /// Result of `search`
    pub restaurants: Arc<Mutex<ProviderResult<Vec<Restaurant>>>>,

    /// Radii passed to `search`, in call order
    pub searched_radii: Arc<Mutex<Vec<f64>>>,

    /// Notifications sent so far
    pub notifications: Arc<Mutex<Vec<SentNotification>>>,

    /// Payloads shared so far
    pub shared: Arc<Mutex<Vec<SharePayload>>>,
}

impl MockProviders {
    pub fn new() -> Self {
        Self {
            location: Arc::new(Mutex::new(Err(ProviderError::Unavailable))),
            addresses: Arc::new(Mutex::new(Vec::new())),
            restaurants: Arc::new(Mutex::new(Ok(Vec::new()))),
            searched_radii: Arc::new(Mutex::new(Vec::new())),
            notifications: Arc::new(Mutex::new(Vec::new())),
            shared: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_location(self, location: Location) -> Self {
        *self.location.lock().unwrap() = Ok(location);
        self
    }

    pub fn with_restaurants(self, restaurants: Vec<Restaurant>) -> Self {
        *self.restaurants.lock().unwrap() = Ok(restaurants);
        self
    }

    pub fn with_address(self, address: impl Into<String>, location: Location) -> Self {
        self.addresses.lock().unwrap().push((address.into(), location));
        self
    }

    /// Make the next searches fail
    pub fn fail_search(&self, error: ProviderError) {
        *self.restaurants.lock().unwrap() = Err(error);
    }

    pub fn sent_notifications(&self) -> Vec<SentNotification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn shared_payloads(&self) -> Vec<SharePayload> {
        self.shared.lock().unwrap().clone()
    }
}

impl Default for MockProviders {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocationProvider for MockProviders {
    async fn current_location(&self) -> ProviderResult<Location> {
        self.location.lock().unwrap().clone()
    }
}

#[async_trait]
impl Geocoder for MockProviders {
    async fn geocode(&self, address: &str) -> ProviderResult<Location> {
        self.addresses
            .lock()
            .unwrap()
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(address.trim()))
            .map(|(_, location)| location.clone())
            .ok_or_else(|| ProviderError::NoMatch(address.to_string()))
    }
}

#[async_trait]
impl RestaurantSearch for MockProviders {
    async fn search(&self, _origin: &Location, radius_km: f64) -> ProviderResult<Vec<Restaurant>> {
        self.searched_radii.lock().unwrap().push(radius_km);
        self.restaurants.lock().unwrap().clone()
    }
}

impl Notifier for MockProviders {
    fn notify(&self, title: &str, body: &str) {
        self.notifications.lock().unwrap().push(SentNotification {
            title: title.to_string(),
            body: body.to_string(),
        });
    }
}

#[async_trait]
impl ShareSink for MockProviders {
    async fn share(&self, payload: &SharePayload) -> ProviderResult<()> {
        self.shared.lock().unwrap().push(payload.clone());
        Ok(())
    }
}
