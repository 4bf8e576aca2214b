//! Uniform random selection

use rand::Rng;

/// Pick one element uniformly at random; `None` for an empty slice
pub fn pick_random<T>(items: &[T]) -> Option<&T> {
    pick_random_with(items, &mut rand::rng())
}

/// [`pick_random`] with an explicit random source
pub fn pick_random_with<'a, T, R: Rng>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.random_range(0..items.len()))
}
