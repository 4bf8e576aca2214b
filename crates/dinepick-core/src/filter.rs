//! Restaurant filtering

use dinepick_api::{Filters, Restaurant};

/// Whether a single restaurant satisfies every criterion in `filters`
pub fn matches_filters(restaurant: &Restaurant, filters: &Filters) -> bool {
    if let Some(cuisine) = &filters.cuisine {
        if restaurant.cuisine.as_ref() != Some(cuisine) {
            return false;
        }
    }

    if let Some(levels) = filters.price_constraint() {
        match restaurant.price_level {
            Some(level) if levels.contains(&level) => {}
            _ => return false,
        }
    }

    if filters.open_now && restaurant.is_open != Some(true) {
        return false;
    }

    // Unknown distance passes; the search already bounded the radius
    if let (Some(max), Some(distance)) = (filters.radius_meters(), restaurant.distance) {
        if distance > max {
            return false;
        }
    }

    true
}

/// Keep restaurants matching `filters`, preserving input order.
///
/// `exclude_visited` and `favorites_only` need stored state and are applied
/// by the picker, not here.
pub fn filter_restaurants(restaurants: &[Restaurant], filters: &Filters) -> Vec<Restaurant> {
    restaurants
        .iter()
        .filter(|r| matches_filters(r, filters))
        .cloned()
        .collect()
}

/// Distinct cuisine tags, sorted
pub fn available_cuisines(restaurants: &[Restaurant]) -> Vec<String> {
    let mut cuisines: Vec<String> = restaurants
        .iter()
        .filter_map(|r| r.cuisine.clone())
        .collect();
    cuisines.sort();
    cuisines.dedup();
    cuisines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn sample() -> Vec<Restaurant> {
        vec![
            Restaurant::new("1", "Pizzeria", 0.0, 0.0)
                .with_cuisine("italian")
                .with_price_level(2)
                .with_open(true)
                .with_distance(800.0),
            Restaurant::new("2", "Sushi Bar", 0.0, 0.0)
                .with_cuisine("japanese")
                .with_price_level(3)
                .with_open(false)
                .with_distance(2500.0),
            Restaurant::new("3", "Trattoria", 0.0, 0.0)
                .with_cuisine("italian")
                .with_open(true),
            Restaurant::new("4", "Snack", 0.0, 0.0).with_price_level(1),
        ]
    }

    fn ids(restaurants: &[Restaurant]) -> Vec<&str> {
        restaurants.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn empty_filters_keep_everything() {
        let all = sample();
        assert_eq!(filter_restaurants(&all, &Filters::default()), all);
    }

    #[test]
    fn cuisine_is_exact() {
        let filters = Filters {
            cuisine: Some("italian".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_restaurants(&sample(), &filters)), vec!["1", "3"]);

        let filters = Filters {
            cuisine: Some("Italian".into()),
            ..Default::default()
        };
        assert!(filter_restaurants(&sample(), &filters).is_empty());
    }

    #[test]
    fn price_requires_known_tier() {
        let filters = Filters {
            price_levels: Some(BTreeSet::from([1, 2])),
            ..Default::default()
        };
        assert_eq!(ids(&filter_restaurants(&sample(), &filters)), vec!["1", "4"]);
    }

    #[test]
    fn empty_price_set_is_ignored() {
        let filters = Filters {
            price_levels: Some(BTreeSet::new()),
            ..Default::default()
        };
        assert_eq!(filter_restaurants(&sample(), &filters).len(), 4);
    }

    #[test]
    fn open_now_needs_explicit_flag() {
        let filters = Filters {
            open_now: true,
            ..Default::default()
        };
        assert_eq!(ids(&filter_restaurants(&sample(), &filters)), vec!["1", "3"]);
    }

    #[test]
    fn radius_passes_unknown_distance() {
        let filters = Filters {
            radius_km: Some(1.0),
            ..Default::default()
        };
        assert_eq!(
            ids(&filter_restaurants(&sample(), &filters)),
            vec!["1", "3", "4"]
        );
    }

    #[test]
    fn combined_criteria_all_hold() {
        let filters = Filters {
            cuisine: Some("italian".into()),
            open_now: true,
            radius_km: Some(1.0),
            price_levels: Some(BTreeSet::from([2])),
            ..Default::default()
        };
        let result = filter_restaurants(&sample(), &filters);
        assert_eq!(ids(&result), vec!["1"]);
        assert!(result.iter().all(|r| matches_filters(r, &filters)));
    }

    #[test]
    fn cuisines_sorted_and_unique() {
        assert_eq!(available_cuisines(&sample()), vec!["italian", "japanese"]);
        assert!(available_cuisines(&[]).is_empty());
    }
}
