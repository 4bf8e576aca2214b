//! Share links and data export

use chrono::{DateTime, Local};
use dinepick_api::{EXPORT_VERSION, ExportSnapshot, Restaurant, SharePayload};
use dinepick_store::{FavoritesStore, HistoryStore, PreferencesStore, RatingStore};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters escaped inside a form-encoded query value
const FORM_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// Characters escaped when the query is embedded as a single parameter
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn form_value(value: &str) -> String {
    // Spaces become '+' in form encoding
    value
        .split(' ')
        .map(|part| utf8_percent_encode(part, FORM_VALUE).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

/// Link that reopens a restaurant: `{base}?shared={query}`, where `query` is
/// the form-encoded `name`, `lat` and `lon`, escaped once more as a whole.
pub fn share_url(base_url: &str, restaurant: &Restaurant) -> String {
    let query = format!(
        "name={}&lat={}&lon={}",
        form_value(&restaurant.name),
        form_value(&restaurant.lat.to_string()),
        form_value(&restaurant.lon.to_string()),
    );
    format!(
        "{}?shared={}",
        base_url.trim_end_matches('/'),
        utf8_percent_encode(&query, URI_COMPONENT)
    )
}

pub fn share_payload(restaurant: &Restaurant, base_url: &str) -> SharePayload {
    SharePayload {
        title: format!("Where to eat? - {}", restaurant.name),
        text: format!("I found {} with dinepick! 🍽️", restaurant.name),
        url: share_url(base_url, restaurant),
    }
}

/// Turn-by-turn directions to the restaurant
pub fn directions_url(restaurant: &Restaurant) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&destination={},{}",
        restaurant.lat, restaurant.lon
    )
}

/// Everything the stores hold, stamped with `now`
pub fn export_snapshot(
    history: &HistoryStore,
    favorites: &FavoritesStore,
    preferences: &PreferencesStore,
    ratings: &RatingStore,
    now: DateTime<Local>,
) -> ExportSnapshot {
    ExportSnapshot {
        version: EXPORT_VERSION,
        exported_at: now,
        history: history.list(),
        favorites: favorites.list(),
        preferences: preferences.get(),
        ratings: ratings.list(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dinepick_api::{Location, PreferencesUpdate};
    use dinepick_store::MemoryKv;
    use dinepick_util::RestaurantId;
    use std::sync::Arc;

    #[test]
    fn url_is_double_encoded() {
        let r = Restaurant::new("1", "Chez Léon & Fils", 48.85, 2.35);
        let url = share_url("https://dinepick.app/", &r);

        assert_eq!(
            url,
            "https://dinepick.app?shared=name%3DChez%2BL%25C3%25A9on%2B%2526%2BFils%26lat%3D48.85%26lon%3D2.35"
        );
    }

    #[test]
    fn payload_text() {
        let r = Restaurant::new("1", "Sushi Zen", 1.5, -2.25);
        let payload = share_payload(&r, "https://example.org");

        assert_eq!(payload.title, "Where to eat? - Sushi Zen");
        assert!(payload.text.starts_with("I found Sushi Zen with dinepick!"));
        assert!(payload.url.starts_with("https://example.org?shared=name%3DSushi%2BZen"));
        assert!(payload.url.ends_with("lat%3D1.5%26lon%3D-2.25"));
    }

    #[test]
    fn directions_point_at_coordinates() {
        let r = Restaurant::new("1", "Cafe", 45.5, 4.25);
        assert_eq!(
            directions_url(&r),
            "https://www.google.com/maps/dir/?api=1&destination=45.5,4.25"
        );
    }

    #[test]
    fn snapshot_collects_all_stores() {
        let kv = Arc::new(MemoryKv::new());
        let history = HistoryStore::new(kv.clone());
        let favorites = FavoritesStore::new(kv.clone());
        let preferences = PreferencesStore::new(kv.clone());
        let ratings = RatingStore::new(kv);

        let r = Restaurant::new("1", "Cafe", 0.0, 0.0);
        history.record(&r, &Location::new(0.0, 0.0)).unwrap();
        favorites.add(&r).unwrap();
        preferences
            .update(PreferencesUpdate {
                dark_mode: Some(true),
                ..Default::default()
            })
            .unwrap();
        ratings.rate(&RestaurantId::new("1"), 4, None).unwrap();

        let now = dinepick_util::now();
        let snapshot = export_snapshot(&history, &favorites, &preferences, &ratings, now);

        assert_eq!(snapshot.version, EXPORT_VERSION);
        assert_eq!(snapshot.exported_at, now);
        assert_eq!(snapshot.history.len(), 1);
        assert_eq!(snapshot.favorites.len(), 1);
        assert!(snapshot.preferences.dark_mode);
        assert_eq!(snapshot.ratings[0].rating, 4);

        let json = serde_json::to_string_pretty(&snapshot).unwrap();
        assert!(json.contains("\"exportedAt\""));
    }
}
