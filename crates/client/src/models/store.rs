//! Store (outlet) records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warung_core::{StoreId, timestamp};

/// A physical store customers order from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Opening time, `HH:MM[:SS]`.
    #[serde(default)]
    pub open_time: Option<String>,
    /// Closing time, `HH:MM[:SS]`.
    #[serde(default)]
    pub close_time: Option<String>,
    #[serde(default)]
    pub is_open: bool,
    /// Distance from the queried position in kilometres (nearby search only).
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Store {
    /// Opening hours as `open - close`, when both are known.
    #[must_use]
    pub fn hours(&self) -> Option<String> {
        match (&self.open_time, &self.close_time) {
            (Some(open), Some(close)) => Some(format!("{open} - {close}")),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_nearby_store_shape() {
        let store: Store = serde_json::from_str(
            r#"{
                "id": 3,
                "name": "Warung Pusat",
                "address": "Jl. Merdeka 1",
                "latitude": -6.2,
                "longitude": 106.8,
                "open_time": "08:00",
                "close_time": "22:00",
                "is_open": true,
                "distance": 1.25
            }"#,
        )
        .unwrap();

        assert_eq!(store.id.as_str(), "3");
        assert_eq!(store.distance, Some(1.25));
        assert!(store.description.is_none());
        assert_eq!(store.hours().as_deref(), Some("08:00 - 22:00"));
    }
}
