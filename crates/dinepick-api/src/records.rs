//! Records owned by the persistence stores

use chrono::{DateTime, Local};
use dinepick_util::RestaurantId;
use serde::{Deserialize, Serialize};

use crate::{Location, Restaurant};

/// Lowest accepted user rating
pub const MIN_RATING: u8 = 1;

/// Highest accepted user rating
pub const MAX_RATING: u8 = 5;

/// One past selection. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Snapshot of the restaurant at selection time, overlay included
    pub restaurant: Restaurant,

    pub selected_at: DateTime<Local>,

    /// Search origin used for the pick
    pub location: Location,
}

/// Global user settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub dark_mode: bool,
    pub notifications: bool,

    /// Default search radius in kilometers
    pub default_radius: f64,

    pub exclude_visited_by_default: bool,
    pub animations_enabled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_location: Option<Location>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            dark_mode: false,
            notifications: true,
            default_radius: 5.0,
            exclude_visited_by_default: false,
            animations_enabled: true,
            favorite_location: None,
        }
    }
}

impl Preferences {
    /// Shallow-merge the fields set in `update` into this record
    pub fn merge(&mut self, update: PreferencesUpdate) {
        if let Some(dark_mode) = update.dark_mode {
            self.dark_mode = dark_mode;
        }
        if let Some(notifications) = update.notifications {
            self.notifications = notifications;
        }
        if let Some(radius) = update.default_radius {
            self.default_radius = radius;
        }
        if let Some(exclude) = update.exclude_visited_by_default {
            self.exclude_visited_by_default = exclude;
        }
        if let Some(animations) = update.animations_enabled {
            self.animations_enabled = animations;
        }
        if let Some(location) = update.favorite_location {
            self.favorite_location = location;
        }
    }
}

/// Partial preferences update. `None` leaves a field untouched.
///
/// `favorite_location: Some(None)` clears the saved location. The stored
/// preferences document is an update too: it holds only the fields the user
/// has set, and is merged over the defaults on read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreferencesUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_radius: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_visited_by_default: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub animations_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_location: Option<Option<Location>>,
}

impl PreferencesUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Fields set in `later` win over the ones set here
    pub fn combine(&mut self, later: PreferencesUpdate) {
        self.dark_mode = later.dark_mode.or(self.dark_mode);
        self.notifications = later.notifications.or(self.notifications);
        self.default_radius = later.default_radius.or(self.default_radius);
        self.exclude_visited_by_default = later
            .exclude_visited_by_default
            .or(self.exclude_visited_by_default);
        self.animations_enabled = later.animations_enabled.or(self.animations_enabled);
        if later.favorite_location.is_some() {
            self.favorite_location = later.favorite_location;
        }
    }
}

/// Stored rating overlay for one restaurant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRecord {
    pub id: RestaurantId,
    pub rating: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    pub rated_at: DateTime<Local>,
}

/// A user's rating as seen by callers; both fields absent if never rated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserRating {
    pub rating: Option<u8>,
    pub note: Option<String>,
}

impl From<&RatingRecord> for UserRating {
    fn from(record: &RatingRecord) -> Self {
        Self {
            rating: Some(record.rating),
            note: record.note.clone(),
        }
    }
}
