//! Collaborator traits

use async_trait::async_trait;
use dinepick_api::{Location, Restaurant, SharePayload};
use thiserror::Error;

/// Errors from collaborator calls
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location unavailable")]
    Unavailable,

    #[error("Location request timed out")]
    Timeout,

    #[error("No match for '{0}'")]
    NoMatch(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Not supported: {0}")]
    Unsupported(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Device position
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_location(&self) -> ProviderResult<Location>;
}

/// Address lookup
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve free-form address text to a location
    async fn geocode(&self, address: &str) -> ProviderResult<Location>;

    /// Optional: describe coordinates as an address
    async fn reverse_geocode(&self, lat: f64, lon: f64) -> ProviderResult<String> {
        Ok(format!("{:.4}, {:.4}", lat, lon))
    }
}

/// Nearby restaurant search.
///
/// Results carry `distance` (meters from `origin`) and the computed `is_open`
/// flag, and are expected to lie within `radius_km`.
#[async_trait]
pub trait RestaurantSearch: Send + Sync {
    async fn search(&self, origin: &Location, radius_km: f64) -> ProviderResult<Vec<Restaurant>>;
}

/// Fire-and-forget user notification. Implementations swallow their own
/// failures (e.g. permission not granted).
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str);
}

/// Platform share mechanism or clipboard
#[async_trait]
pub trait ShareSink: Send + Sync {
    async fn share(&self, payload: &SharePayload) -> ProviderResult<()>;
}
