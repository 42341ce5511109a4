//! Position-dependent records: coordinates, nearby stores, weather picks.

use serde::{Deserialize, Serialize};

use warung_core::{CategoryId, MenuId, Price};

use super::Store;

/// A device position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// `data` of `GET /stores/nearby`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyStores {
    #[serde(default)]
    pub stores: Vec<Store>,
    #[serde(default)]
    pub total: u32,
}

/// Weather condition code and label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherConditions {
    pub id: i64,
    pub main: String,
    pub description: String,
}

/// Current weather at the queried position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSummary {
    /// Temperature in degrees Celsius.
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub weather: WeatherConditions,
}

/// A recommended menu, trimmed to what the home screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedMenu {
    pub id: MenuId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

const fn default_available() -> bool {
    true
}

/// `data` of `GET /menus/weather-recommendations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecommendation {
    pub weather: WeatherSummary,
    /// Condition tags the backend matched, e.g. `hot`, `rainy`.
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub menus: Vec<RecommendedMenu>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_weather_recommendation() {
        let rec: WeatherRecommendation = serde_json::from_str(
            r#"{
                "weather": {
                    "temp": 31.5,
                    "feels_like": 35,
                    "humidity": 70,
                    "weather": {"id": 800, "main": "Clear", "description": "clear sky"}
                },
                "conditions": ["hot"],
                "menus": [{"id": 7, "name": "Es Teh", "price": 5000}]
            }"#,
        )
        .unwrap();

        assert_eq!(rec.weather.weather.main, "Clear");
        assert_eq!(rec.conditions, vec!["hot".to_string()]);
        assert_eq!(rec.menus[0].price, Price::from_rupiah(5000));
    }

    #[test]
    fn test_decode_empty_nearby() {
        let nearby: NearbyStores = serde_json::from_str(r#"{"stores":[],"total":0}"#).unwrap();
        assert!(nearby.stores.is_empty());
    }
}
