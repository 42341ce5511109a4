//! Home screen feed.
//!
//! The profile fetch runs alongside the location chain; once a position is
//! known, nearby stores and weather recommendations are fetched together.
//! Every source keeps its own result so one failure does not hide the rest.

use tracing::{instrument, warn};

use crate::error::ClientError;
use crate::location::{LocationError, LocationProvider, current_location};
use crate::models::{Coordinates, NearbyStores, User, WeatherRecommendation};
use crate::services::{MenuService, ProfileService, StoreService};

/// Everything the home screen shows.
#[derive(Debug)]
pub struct HomeFeed {
    pub profile: Result<User, ClientError>,
    pub location: Result<Coordinates, LocationError>,
    pub nearby: Result<NearbyStores, ClientError>,
    pub recommendations: Result<WeatherRecommendation, ClientError>,
}

impl HomeFeed {
    /// Load all sources.
    #[instrument(skip_all, fields(radius_km = radius_km))]
    pub async fn load(
        profile: &ProfileService<'_>,
        stores: &StoreService<'_>,
        menus: &MenuService<'_>,
        location: &dyn LocationProvider,
        radius_km: f64,
    ) -> Self {
        let location_chain = async {
            match current_location(location).await {
                Ok(coords) => {
                    let (nearby, recommendations) = tokio::join!(
                        stores.nearby(coords, radius_km),
                        menus.weather_recommendations(coords),
                    );
                    (Ok(coords), nearby, recommendations)
                }
                Err(e) => (
                    Err(e.clone()),
                    Err(ClientError::Location(e.clone())),
                    Err(ClientError::Location(e)),
                ),
            }
        };

        let (profile, (location, nearby, recommendations)) =
            tokio::join!(profile.profile(), location_chain);

        let feed = Self {
            profile,
            location,
            nearby,
            recommendations,
        };
        if feed.is_complete_failure() {
            warn!("Every home feed source failed");
        }
        feed
    }

    /// True when no source produced data.
    #[must_use]
    pub const fn is_complete_failure(&self) -> bool {
        self.profile.is_err() && self.nearby.is_err() && self.recommendations.is_err()
    }

    /// True when signing in again would fix the feed.
    #[must_use]
    pub fn requires_login(&self) -> bool {
        [self.profile.as_ref().err(), self.nearby.as_ref().err()]
            .into_iter()
            .flatten()
            .any(ClientError::requires_login)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use secrecy::SecretString;

    use crate::api::ApiClient;
    use crate::config::ClientConfig;
    use crate::location::StaticLocation;
    use crate::storage::{self, MemoryStore};

    use super::*;

    fn offline_api(with_token: bool) -> ApiClient {
        let store = Arc::new(MemoryStore::new());
        if with_token {
            storage::save_token(store.as_ref(), &SecretString::from("1|abc")).unwrap();
        }
        let config = ClientConfig::for_base_url("http://127.0.0.1:9/api/v1").unwrap();
        ApiClient::new(&config, store)
    }

    #[tokio::test]
    async fn test_denied_location_fails_dependent_sources() {
        let api = offline_api(true);
        let feed = HomeFeed::load(
            &ProfileService::new(&api),
            &StoreService::new(&api),
            &MenuService::new(&api),
            &StaticLocation::default(),
            5.0,
        )
        .await;

        assert_eq!(feed.location.unwrap_err(), LocationError::PermissionDenied);
        assert!(matches!(
            feed.nearby,
            Err(ClientError::Location(LocationError::PermissionDenied))
        ));
        assert!(feed.profile.unwrap_err().is_network());
    }

    #[tokio::test]
    async fn test_signed_out_feed() {
        let api = offline_api(false);
        let location = StaticLocation::new(Some(Coordinates {
            latitude: -6.2,
            longitude: 106.8,
        }));
        let feed = HomeFeed::load(
            &ProfileService::new(&api),
            &StoreService::new(&api),
            &MenuService::new(&api),
            &location,
            5.0,
        )
        .await;

        assert!(feed.location.is_ok());
        assert!(feed.is_complete_failure());
        assert!(feed.requires_login());
    }
}
