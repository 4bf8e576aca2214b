//! Strongly-typed identifiers for dinepick

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identifier of a restaurant, as issued by the data source.
///
/// This is the join key for favorites, ratings and history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestaurantId(String);

impl RestaurantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RestaurantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RestaurantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Unique identifier for one roulette spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpinId(Uuid);

impl SpinId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SpinId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SpinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restaurant_id_equality() {
        let id1 = RestaurantId::new("node/123");
        let id2 = RestaurantId::from("node/123");
        let id3 = RestaurantId::new("node/456");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn spin_id_uniqueness() {
        assert_ne!(SpinId::new(), SpinId::new());
    }

    #[test]
    fn restaurant_id_serializes_as_plain_string() {
        let id = RestaurantId::new("4242");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"4242\"");

        let parsed: RestaurantId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
