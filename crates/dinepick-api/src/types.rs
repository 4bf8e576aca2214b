//! Restaurants, locations and search filters

use chrono::{DateTime, Local};
use dinepick_util::RestaurantId;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// Lowest price tier (`€`)
pub const MIN_PRICE_LEVEL: u8 = 1;

/// Highest price tier (`€€€€`)
pub const MAX_PRICE_LEVEL: u8 = 4;

fn is_false(value: &bool) -> bool {
    !*value
}

/// Out-of-range tiers from a provider are dropped, not rejected
fn price_level_in_range<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
    let level = Option::<i64>::deserialize(deserializer)?;
    Ok(level
        .and_then(|l| u8::try_from(l).ok())
        .filter(|l| (MIN_PRICE_LEVEL..=MAX_PRICE_LEVEL).contains(l)))
}

/// One dining venue.
///
/// The identity and coordinates come from the search provider and never
/// change. `distance` and `is_open` are computed for the search that produced
/// the record. The overlay fields (`is_favorite`, `user_rating`, `user_note`,
/// `visited_at`) are added locally and joined by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub lat: f64,
    pub lon: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    /// Raw opening-hours string, e.g. `Mo-Fr 12:00-14:00,19:00-22:00`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,

    /// Price tier, 1 (cheap) to 4 (expensive)
    #[serde(
        default,
        deserialize_with = "price_level_in_range",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_level: Option<u8>,

    /// Distance from the search origin, in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,

    /// Open/closed flag computed at search time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_open: Option<bool>,

    // Local overlay
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_favorite: bool,

    /// User rating, 1 to 5 stars
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_rating: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_note: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visited_at: Option<DateTime<Local>>,
}

impl Restaurant {
    /// Create a restaurant with only the required attributes set
    pub fn new(id: impl Into<RestaurantId>, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lat,
            lon,
            address: None,
            cuisine: None,
            phone: None,
            website: None,
            opening_hours: None,
            price_level: None,
            distance: None,
            is_open: None,
            is_favorite: false,
            user_rating: None,
            user_note: None,
            visited_at: None,
        }
    }

    pub fn with_cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }

    pub fn with_price_level(mut self, level: u8) -> Self {
        self.price_level = Some(level);
        self
    }

    pub fn with_distance(mut self, meters: f64) -> Self {
        self.distance = Some(meters);
        self
    }

    pub fn with_open(mut self, is_open: bool) -> Self {
        self.is_open = Some(is_open);
        self
    }

    pub fn with_opening_hours(mut self, hours: impl Into<String>) -> Self {
        self.opening_hours = Some(hours.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Position of this restaurant, named after it
    pub fn location(&self) -> Location {
        Location {
            lat: self.lat,
            lon: self.lon,
            name: Some(self.name.clone()),
        }
    }
}

/// A lat/lon pair used as a search origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,

    /// Human-readable name, kept for history display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            name: None,
        }
    }

    pub fn named(lat: f64, lon: f64, name: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            name: Some(name.into()),
        }
    }

    /// Name if known, otherwise `lat, lon` with four decimals
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{:.4}, {:.4}", self.lat, self.lon),
        }
    }
}

/// Declarative filter criteria. Every field is independent; an absent (or
/// empty/false) field does not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Filters {
    /// Exact cuisine tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,

    /// Acceptable price tiers; an empty set accepts any tier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_levels: Option<BTreeSet<u8>>,

    /// Keep only restaurants flagged open
    pub open_now: bool,

    /// Maximum distance in kilometers; non-positive values are ignored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_km: Option<f64>,

    /// Drop restaurants picked recently
    pub exclude_visited: bool,

    /// Keep only favorited restaurants
    pub favorites_only: bool,
}

impl Filters {
    /// Radius bound in meters, when one applies
    pub fn radius_meters(&self) -> Option<f64> {
        self.radius_km.filter(|km| *km > 0.0).map(|km| km * 1000.0)
    }

    /// Price tiers to enforce, when a non-empty set was given
    pub fn price_constraint(&self) -> Option<&BTreeSet<u8>> {
        self.price_levels.as_ref().filter(|levels| !levels.is_empty())
    }

    /// True when no criterion is set
    pub fn is_unconstrained(&self) -> bool {
        self.cuisine.is_none()
            && self.price_constraint().is_none()
            && !self.open_now
            && self.radius_meters().is_none()
            && !self.exclude_visited
            && !self.favorites_only
    }
}
