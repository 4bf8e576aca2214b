//! User preferences

use dinepick_api::{Preferences, PreferencesUpdate};
use std::sync::Arc;
use tracing::debug;

use crate::document::{read_document, write_document};
use crate::{KeyValueStore, StoreResult};

/// Key owned by the preferences store
pub const PREFERENCES_KEY: &str = "dinepick-preferences";

/// Single global preferences record, defaulted until first written
pub struct PreferencesStore {
    kv: Arc<dyn KeyValueStore>,
    defaults: Preferences,
}

impl PreferencesStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            defaults: Preferences::default(),
        }
    }

    /// Use `defaults` for every field the stored record does not set
    pub fn with_defaults(mut self, defaults: Preferences) -> Self {
        self.defaults = defaults;
        self
    }

    fn stored(&self) -> PreferencesUpdate {
        read_document(self.kv.as_ref(), PREFERENCES_KEY).unwrap_or_default()
    }

    /// Stored record merged over defaults
    pub fn get(&self) -> Preferences {
        let mut prefs = self.defaults.clone();
        prefs.merge(self.stored());
        prefs
    }

    /// Merge the given fields into the stored record and return the result.
    ///
    /// Only fields the user has set are persisted, so unset ones keep
    /// following the defaults.
    pub fn update(&self, update: PreferencesUpdate) -> StoreResult<Preferences> {
        let mut stored = self.stored();
        stored.combine(update);
        write_document(self.kv.as_ref(), PREFERENCES_KEY, &stored)?;

        let mut prefs = self.defaults.clone();
        prefs.merge(stored);
        debug!(?prefs, "Preferences updated");
        Ok(prefs)
    }

    /// Drop stored overrides so that `get` returns defaults
    pub fn reset(&self) -> StoreResult<()> {
        self.kv.remove(PREFERENCES_KEY)?;
        debug!("Preferences reset");
        Ok(())
    }
}
