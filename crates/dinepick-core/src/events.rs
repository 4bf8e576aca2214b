//! Core events emitted by the picker

use dinepick_api::Restaurant;
use dinepick_util::RestaurantId;

/// Events emitted by the picker, in the order their side effects happen
#[derive(Debug, Clone, PartialEq)]
pub enum CoreEvent {
    /// A restaurant was chosen and should be shown
    Selected {
        restaurant: Restaurant,
        message: &'static str,
    },

    /// The selection was appended to history
    HistoryRecorded { restaurant_id: RestaurantId },

    /// The selection was already in history within the dedup window
    HistorySuppressed { restaurant_id: RestaurantId },

    /// A notification was sent
    Notified { title: String, body: String },

    /// Favorite membership changed
    FavoriteToggled {
        restaurant_id: RestaurantId,
        is_favorite: bool,
    },

    /// A rating was saved
    Rated {
        restaurant_id: RestaurantId,
        rating: u8,
    },
}
