//! Picker engine

use chrono::{DateTime, Local};
use dinepick_api::{ExportSnapshot, Filters, Location, Preferences, Restaurant};
use dinepick_config::{HistorySettings, PickerSettings, SearchSettings};
use dinepick_provider_api::{Geocoder, LocationProvider, Notifier, ProviderError, RestaurantSearch};
use dinepick_store::{FavoritesStore, HistoryStore, KeyValueStore, PreferencesStore, RatingStore};
use dinepick_util::DinepickError;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::{CoreEvent, celebration_message, export_snapshot, filter_restaurants, pick_random};

const EVENT_CAPACITY: usize = 64;

/// A completed selection
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub restaurant: Restaurant,
    pub message: &'static str,

    /// False when the history entry was suppressed or could not be written
    pub history_recorded: bool,
}

/// Result of a pick request
#[derive(Debug, Clone, PartialEq)]
pub enum PickOutcome {
    Picked(Selection),

    /// Nothing to choose from; no side effects happened
    NoMatches,
}

/// Where the search origin comes from
pub enum OriginSource<'a> {
    /// Coordinates given directly
    Point(Location),

    /// Device position
    Device(&'a dyn LocationProvider),

    /// Free-form address text
    Address {
        geocoder: &'a dyn Geocoder,
        query: String,
    },

    /// The favorite location from preferences
    Saved,
}

/// Map location failures to errors the user can act on
fn location_error(error: ProviderError) -> DinepickError {
    match error {
        ProviderError::PermissionDenied | ProviderError::Unavailable | ProviderError::Timeout => {
            DinepickError::NoLocation
        }
        ProviderError::NoMatch(query) => {
            DinepickError::invalid_input(format!("no place matches '{}'", query))
        }
        other => DinepickError::provider(other.to_string()),
    }
}

/// Owns the stores and sequences the side effects of a selection:
/// show, then record history, then notify.
pub struct Picker {
    history: HistoryStore,
    favorites: FavoritesStore,
    preferences: PreferencesStore,
    ratings: RatingStore,
    notifier: Arc<dyn Notifier>,
    settings: PickerSettings,
    events: broadcast::Sender<CoreEvent>,
}

impl Picker {
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        settings: PickerSettings,
        history: &HistorySettings,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            history: HistoryStore::with_limits(
                kv.clone(),
                history.max_entries,
                history.dedup_window_hours,
            ),
            favorites: FavoritesStore::new(kv.clone()),
            preferences: PreferencesStore::new(kv.clone()),
            ratings: RatingStore::new(kv),
            notifier,
            settings,
            events,
        }
    }

    /// Take the default search radius from configuration. A radius saved in
    /// preferences still wins.
    pub fn with_search_settings(mut self, search: &SearchSettings) -> Self {
        self.preferences = self.preferences.with_defaults(Preferences {
            default_radius: search.default_radius_km,
            ..Preferences::default()
        });
        self
    }

    /// Receive events emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<CoreEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: CoreEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn notify(&self, title: &str, body: String) {
        self.notifier.notify(title, &body);
        self.emit(CoreEvent::Notified {
            title: title.to_string(),
            body,
        });
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn preferences(&self) -> &PreferencesStore {
        &self.preferences
    }

    pub fn ratings(&self) -> &RatingStore {
        &self.ratings
    }

    /// Explicit location, or the preferred favorite location
    pub fn resolve_origin(&self, explicit: Option<Location>) -> dinepick_util::Result<Location> {
        explicit
            .or_else(|| self.preferences.get().favorite_location)
            .ok_or(DinepickError::NoLocation)
    }

    /// Resolve `source` to a search origin.
    ///
    /// A device that cannot report a position falls back to the favorite
    /// location when one is saved.
    pub async fn locate(&self, source: OriginSource<'_>) -> dinepick_util::Result<Location> {
        match source {
            OriginSource::Point(location) => Ok(location),
            OriginSource::Saved => self.resolve_origin(None),
            OriginSource::Device(provider) => match provider.current_location().await {
                Ok(location) => {
                    debug!(lat = location.lat, lon = location.lon, "Device location acquired");
                    Ok(location)
                }
                Err(e) => match (location_error(e), self.preferences.get().favorite_location) {
                    (DinepickError::NoLocation, Some(saved)) => {
                        warn!("Device location failed, using favorite location");
                        Ok(saved)
                    }
                    (err, _) => Err(err),
                },
            },
            OriginSource::Address { geocoder, query } => {
                let query = query.trim();
                if query.is_empty() {
                    return Err(DinepickError::invalid_input("empty address"));
                }
                let mut location = geocoder.geocode(query).await.map_err(location_error)?;
                if location.name.is_none() {
                    location.name = Some(query.to_string());
                }
                info!(query, origin = %location.display_name(), "Address geocoded");
                Ok(location)
            }
        }
    }

    /// Join local favorite flags and ratings onto fetched restaurants
    pub fn overlay(&self, restaurants: &mut [Restaurant]) {
        self.favorites.apply_overlay(restaurants);
        self.ratings.apply_overlay(restaurants);
    }

    /// Search around `origin` with the filter radius, or the default radius
    /// (preferences, then configuration) when the filters set none
    pub async fn search(
        &self,
        provider: &dyn RestaurantSearch,
        origin: &Location,
        filters: &Filters,
    ) -> dinepick_util::Result<Vec<Restaurant>> {
        let radius_km = filters
            .radius_km
            .filter(|km| *km > 0.0)
            .unwrap_or_else(|| self.preferences.get().default_radius);

        let mut found = provider
            .search(origin, radius_km)
            .await
            .map_err(|e| DinepickError::provider(e.to_string()))?;
        self.overlay(&mut found);

        info!(
            origin = %origin.display_name(),
            radius_km,
            found = found.len(),
            "Search completed"
        );
        Ok(found)
    }

    /// Restaurants eligible for a pick at `now`
    pub fn candidates(
        &self,
        all: &[Restaurant],
        filters: &Filters,
        now: DateTime<Local>,
    ) -> Vec<Restaurant> {
        let mut candidates = filter_restaurants(all, filters);

        let exclude_visited =
            filters.exclude_visited || self.preferences.get().exclude_visited_by_default;
        if exclude_visited {
            let recent = self
                .history
                .recent_ids_at(self.settings.recent_window_hours, now);
            candidates.retain(|r| !recent.contains(&r.id));
        }

        if filters.favorites_only {
            let favorites = self.favorites.ids();
            candidates.retain(|r| favorites.contains(&r.id));
        }

        debug!(
            total = all.len(),
            candidates = candidates.len(),
            filtered = !filters.is_unconstrained(),
            exclude_visited,
            "Candidates computed"
        );
        candidates
    }

    /// Wait the suspense delay, then choose uniformly among `candidates`
    pub async fn pick(&self, candidates: &[Restaurant], location: &Location) -> PickOutcome {
        if candidates.is_empty() {
            info!("No candidates to pick from");
            return PickOutcome::NoMatches;
        }

        let delay = self
            .settings
            .suspense_for(self.preferences.get().animations_enabled);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match pick_random(candidates).cloned() {
            Some(restaurant) => PickOutcome::Picked(self.complete_selection(restaurant, location)),
            None => PickOutcome::NoMatches,
        }
    }

    /// Show, record and notify a selection made elsewhere (e.g. the roulette)
    pub fn complete_selection(&self, restaurant: Restaurant, location: &Location) -> Selection {
        let message = celebration_message();
        info!(restaurant_id = %restaurant.id, name = %restaurant.name, "Restaurant selected");
        self.emit(CoreEvent::Selected {
            restaurant: restaurant.clone(),
            message,
        });

        let history_recorded = match self.history.record(&restaurant, location) {
            Ok(true) => {
                self.emit(CoreEvent::HistoryRecorded {
                    restaurant_id: restaurant.id.clone(),
                });
                true
            }
            Ok(false) => {
                self.emit(CoreEvent::HistorySuppressed {
                    restaurant_id: restaurant.id.clone(),
                });
                false
            }
            Err(e) => {
                warn!(error = %e, restaurant_id = %restaurant.id, "Failed to record history");
                false
            }
        };

        if self.preferences.get().notifications {
            self.notify(
                "Restaurant picked! 🍽️",
                format!("Off to {} for your next meal!", restaurant.name),
            );
        }

        Selection {
            restaurant,
            message,
            history_recorded,
        }
    }

    /// Flip favorite membership; adding notifies when notifications are on
    pub fn toggle_favorite(&self, restaurant: &Restaurant) -> dinepick_util::Result<bool> {
        let is_favorite = self.favorites.toggle(restaurant)?;
        self.emit(CoreEvent::FavoriteToggled {
            restaurant_id: restaurant.id.clone(),
            is_favorite,
        });

        if is_favorite && self.preferences.get().notifications {
            self.notify(
                "Added to favorites! ⭐",
                format!("{} was added to your favorites", restaurant.name),
            );
        }
        Ok(is_favorite)
    }

    pub fn rate(
        &self,
        restaurant: &Restaurant,
        rating: u8,
        note: Option<String>,
    ) -> dinepick_util::Result<()> {
        self.ratings.rate(&restaurant.id, rating, note)?;
        self.emit(CoreEvent::Rated {
            restaurant_id: restaurant.id.clone(),
            rating,
        });

        if self.preferences.get().notifications {
            self.notify(
                "Rating saved! 📝",
                format!("You rated {} {}/5 stars", restaurant.name, rating),
            );
        }
        Ok(())
    }

    pub fn export(&self, now: DateTime<Local>) -> ExportSnapshot {
        export_snapshot(
            &self.history,
            &self.favorites,
            &self.preferences,
            &self.ratings,
            now,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dinepick_api::PreferencesUpdate;
    use dinepick_provider_api::{MockProviders, ProviderError};
    use dinepick_store::{MemoryKv, SqliteKv};
    use dinepick_util::RestaurantId;
    use std::time::Duration;
    use tokio::time::Instant;

    fn setup(settings: PickerSettings) -> (Picker, Arc<MockProviders>) {
        let mock = Arc::new(MockProviders::new());
        let picker = Picker::new(
            Arc::new(MemoryKv::new()),
            mock.clone(),
            settings,
            &HistorySettings::default(),
        );
        (picker, mock)
    }

    fn here() -> Location {
        Location::named(48.85, 2.35, "Home")
    }

    fn drain(rx: &mut broadcast::Receiver<CoreEvent>) -> Vec<CoreEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn empty_candidates_have_no_side_effects() {
        let (picker, mock) = setup(PickerSettings::immediate());
        let mut rx = picker.subscribe();

        assert_eq!(picker.pick(&[], &here()).await, PickOutcome::NoMatches);
        assert!(drain(&mut rx).is_empty());
        assert!(picker.history().is_empty());
        assert!(mock.sent_notifications().is_empty());
    }

    #[tokio::test]
    async fn side_effects_happen_in_order() {
        let (picker, mock) = setup(PickerSettings::immediate());
        let mut rx = picker.subscribe();
        let only = Restaurant::new("1", "Le Bistrot", 48.86, 2.34);

        let outcome = picker.pick(std::slice::from_ref(&only), &here()).await;
        let PickOutcome::Picked(selection) = outcome else {
            panic!("expected a selection");
        };
        assert_eq!(selection.restaurant, only);
        assert!(selection.history_recorded);

        let events = drain(&mut rx);
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], CoreEvent::Selected { restaurant, .. } if restaurant.id == only.id));
        assert!(matches!(&events[1], CoreEvent::HistoryRecorded { .. }));
        assert!(matches!(&events[2], CoreEvent::Notified { .. }));

        assert_eq!(picker.history().list()[0].location, here());
        assert_eq!(
            mock.sent_notifications()[0].body,
            "Off to Le Bistrot for your next meal!"
        );
    }

    #[tokio::test]
    async fn repeat_pick_is_suppressed_in_history() {
        let (picker, _mock) = setup(PickerSettings::immediate());
        let only = [Restaurant::new("1", "Le Bistrot", 0.0, 0.0)];

        picker.pick(&only, &here()).await;
        let mut rx = picker.subscribe();
        let PickOutcome::Picked(second) = picker.pick(&only, &here()).await else {
            panic!("expected a selection");
        };

        assert!(!second.history_recorded);
        assert_eq!(picker.history().len(), 1);
        assert!(drain(&mut rx)
            .iter()
            .any(|e| matches!(e, CoreEvent::HistorySuppressed { .. })));
    }

    #[tokio::test]
    async fn notifications_respect_preference() {
        let (picker, mock) = setup(PickerSettings::immediate());
        picker
            .preferences()
            .update(PreferencesUpdate {
                notifications: Some(false),
                ..Default::default()
            })
            .unwrap();

        picker
            .pick(&[Restaurant::new("1", "Cafe", 0.0, 0.0)], &here())
            .await;
        assert!(mock.sent_notifications().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn suspense_depends_on_animations() {
        let (picker, _mock) = setup(PickerSettings::default());
        let only = [Restaurant::new("1", "Cafe", 0.0, 0.0)];

        let started = Instant::now();
        picker.pick(&only, &here()).await;
        assert!(started.elapsed() >= Duration::from_millis(4000));

        picker
            .preferences()
            .update(PreferencesUpdate {
                animations_enabled: Some(false),
                ..Default::default()
            })
            .unwrap();

        let started = Instant::now();
        picker.pick(&only, &here()).await;
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(1000));
        assert!(elapsed < Duration::from_millis(4000));
    }

    #[test]
    fn candidates_exclude_recent_visits() {
        let (picker, _mock) = setup(PickerSettings::immediate());
        let all = vec![
            Restaurant::new("1", "Visited", 0.0, 0.0),
            Restaurant::new("2", "Fresh", 0.0, 0.0),
        ];
        let now = dinepick_util::now();
        picker.history().record_at(&all[0], &here(), now).unwrap();

        assert_eq!(picker.candidates(&all, &Filters::default(), now).len(), 2);

        let filters = Filters {
            exclude_visited: true,
            ..Default::default()
        };
        let ids: Vec<_> = picker
            .candidates(&all, &filters, now)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![RestaurantId::new("2")]);

        // Outside the window the restaurant is eligible again
        let later = now + chrono::Duration::hours(25);
        assert_eq!(picker.candidates(&all, &filters, later).len(), 2);
    }

    #[test]
    fn exclude_visited_preference_applies_by_default() {
        let (picker, _mock) = setup(PickerSettings::immediate());
        let all = vec![Restaurant::new("1", "Visited", 0.0, 0.0)];
        let now = dinepick_util::now();
        picker.history().record_at(&all[0], &here(), now).unwrap();
        picker
            .preferences()
            .update(PreferencesUpdate {
                exclude_visited_by_default: Some(true),
                ..Default::default()
            })
            .unwrap();

        assert!(picker.candidates(&all, &Filters::default(), now).is_empty());
    }

    #[test]
    fn favorites_only() {
        let (picker, _mock) = setup(PickerSettings::immediate());
        let all = vec![
            Restaurant::new("1", "Loved", 0.0, 0.0),
            Restaurant::new("2", "Meh", 0.0, 0.0),
        ];
        picker.favorites().add(&all[0]).unwrap();

        let filters = Filters {
            favorites_only: true,
            ..Default::default()
        };
        let result = picker.candidates(&all, &filters, dinepick_util::now());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id.as_str(), "1");
    }

    #[tokio::test]
    async fn search_uses_default_radius_and_overlays() {
        let mock = Arc::new(
            MockProviders::new().with_restaurants(vec![Restaurant::new("1", "Cafe", 0.0, 0.0)]),
        );
        let picker = Picker::new(
            Arc::new(MemoryKv::new()),
            mock.clone(),
            PickerSettings::immediate(),
            &HistorySettings::default(),
        );
        picker
            .favorites()
            .add(&Restaurant::new("1", "Cafe", 0.0, 0.0))
            .unwrap();

        let found = picker
            .search(mock.as_ref(), &here(), &Filters::default())
            .await
            .unwrap();
        assert!(found[0].is_favorite);

        let filters = Filters {
            radius_km: Some(2.0),
            ..Default::default()
        };
        picker.search(mock.as_ref(), &here(), &filters).await.unwrap();
        assert_eq!(*mock.searched_radii.lock().unwrap(), vec![5.0, 2.0]);
    }

    #[tokio::test]
    async fn search_falls_back_to_configured_radius() {
        let mock = Arc::new(MockProviders::new());
        let search = SearchSettings {
            default_radius_km: 1.5,
            ..Default::default()
        };
        let picker = Picker::new(
            Arc::new(MemoryKv::new()),
            mock.clone(),
            PickerSettings::immediate(),
            &HistorySettings::default(),
        )
        .with_search_settings(&search);

        picker
            .search(mock.as_ref(), &here(), &Filters::default())
            .await
            .unwrap();

        picker
            .preferences()
            .update(PreferencesUpdate {
                default_radius: Some(3.0),
                ..Default::default()
            })
            .unwrap();
        picker
            .search(mock.as_ref(), &here(), &Filters::default())
            .await
            .unwrap();

        assert_eq!(*mock.searched_radii.lock().unwrap(), vec![1.5, 3.0]);
    }

    #[tokio::test]
    async fn search_failure_is_a_provider_error() {
        let (picker, mock) = setup(PickerSettings::immediate());
        mock.fail_search(ProviderError::Network("offline".into()));

        let err = picker
            .search(mock.as_ref(), &here(), &Filters::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DinepickError::ProviderError(_)));
    }

    #[test]
    fn origin_falls_back_to_favorite_location() {
        let (picker, _mock) = setup(PickerSettings::immediate());
        assert!(matches!(
            picker.resolve_origin(None),
            Err(DinepickError::NoLocation)
        ));

        let work = Location::named(45.76, 4.83, "Work");
        picker
            .preferences()
            .update(PreferencesUpdate {
                favorite_location: Some(Some(work.clone())),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(picker.resolve_origin(None).unwrap(), work);
        assert_eq!(picker.resolve_origin(Some(here())).unwrap(), here());
    }

    #[tokio::test]
    async fn locate_uses_device_position() {
        let (picker, _mock) = setup(PickerSettings::immediate());
        let device = MockProviders::new().with_location(here());

        let origin = picker.locate(OriginSource::Device(&device)).await.unwrap();
        assert_eq!(origin, here());
    }

    #[tokio::test]
    async fn device_failures_are_recoverable() {
        let (picker, _mock) = setup(PickerSettings::immediate());
        let device = MockProviders::new();

        for failure in [
            ProviderError::PermissionDenied,
            ProviderError::Unavailable,
            ProviderError::Timeout,
        ] {
            *device.location.lock().unwrap() = Err(failure);
            let err = picker.locate(OriginSource::Device(&device)).await.unwrap_err();
            assert!(matches!(err, DinepickError::NoLocation));
            assert!(err.is_user_recoverable());
        }
    }

    #[tokio::test]
    async fn device_failure_falls_back_to_favorite_location() {
        let (picker, _mock) = setup(PickerSettings::immediate());
        let work = Location::named(45.76, 4.83, "Work");
        picker
            .preferences()
            .update(PreferencesUpdate {
                favorite_location: Some(Some(work.clone())),
                ..Default::default()
            })
            .unwrap();

        let device = MockProviders::new();
        *device.location.lock().unwrap() = Err(ProviderError::PermissionDenied);
        assert_eq!(picker.locate(OriginSource::Device(&device)).await.unwrap(), work);
        assert_eq!(picker.locate(OriginSource::Saved).await.unwrap(), work);
    }

    #[tokio::test]
    async fn locate_geocodes_addresses() {
        let (picker, _mock) = setup(PickerSettings::immediate());
        let geocoder = MockProviders::new().with_address("Place Bellecour", Location::new(45.757, 4.832));

        let origin = picker
            .locate(OriginSource::Address {
                geocoder: &geocoder,
                query: "  place bellecour ".into(),
            })
            .await
            .unwrap();
        assert_eq!(origin, Location::named(45.757, 4.832, "place bellecour"));

        let err = picker
            .locate(OriginSource::Address {
                geocoder: &geocoder,
                query: "Atlantis".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DinepickError::InvalidInput(_)));
        assert!(err.is_user_recoverable());

        let err = picker
            .locate(OriginSource::Address {
                geocoder: &geocoder,
                query: "   ".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DinepickError::InvalidInput(_)));
    }

    #[test]
    fn toggle_favorite_notifies_only_on_add() {
        let (picker, mock) = setup(PickerSettings::immediate());
        let r = Restaurant::new("1", "Cafe", 0.0, 0.0);

        assert!(picker.toggle_favorite(&r).unwrap());
        assert!(!picker.toggle_favorite(&r).unwrap());
        let sent = mock.sent_notifications();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, "Cafe was added to your favorites");
    }

    #[test]
    fn rate_validates_and_emits() {
        let (picker, _mock) = setup(PickerSettings::immediate());
        let mut rx = picker.subscribe();
        let r = Restaurant::new("1", "Cafe", 0.0, 0.0);

        assert!(matches!(
            picker.rate(&r, 9, None),
            Err(DinepickError::InvalidInput(_))
        ));
        picker.rate(&r, 4, Some("Nice terrace".into())).unwrap();

        assert_eq!(picker.ratings().get(&r.id).rating, Some(4));
        assert!(matches!(
            drain(&mut rx).first(),
            Some(CoreEvent::Rated { rating: 4, .. })
        ));
    }

    #[tokio::test]
    async fn history_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dinepick.db");
        let only = [Restaurant::new("1", "Cafe", 0.0, 0.0)];

        {
            let kv = Arc::new(SqliteKv::open(&path).unwrap());
            let picker = Picker::new(
                kv,
                Arc::new(MockProviders::new()),
                PickerSettings::immediate(),
                &HistorySettings::default(),
            );
            picker.pick(&only, &here()).await;
        }

        let kv = Arc::new(SqliteKv::open(&path).unwrap());
        assert_eq!(HistoryStore::new(kv).len(), 1);
    }
}
