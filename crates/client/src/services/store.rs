//! Store service.
//!
//! Every store endpoint needs a session; calls fail with `MissingToken`
//! before any request when signed out.

use serde::Deserialize;
use tracing::{debug, instrument, warn};

use warung_core::StoreId;

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{Coordinates, NearbyStores, Store};

#[derive(Deserialize)]
struct StoresData {
    stores: Vec<Store>,
}

#[derive(Deserialize)]
struct StoreData {
    store: Store,
}

/// Store service.
pub struct StoreService<'a> {
    api: &'a ApiClient,
}

impl<'a> StoreService<'a> {
    /// Create a new store service.
    #[must_use]
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// All stores.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` when signed out, otherwise any request error.
    #[instrument(skip(self))]
    pub async fn stores(&self) -> Result<Vec<Store>> {
        self.api.require_token()?;
        let data: StoresData = self.api.get(&["stores"], "Store").await?;
        debug!(count = data.stores.len(), "Fetched stores");
        Ok(data.stores)
    }

    /// Stores open right now.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` when signed out, otherwise any request error.
    #[instrument(skip(self))]
    pub async fn open_stores(&self) -> Result<Vec<Store>> {
        self.api.require_token()?;
        let data: StoresData = self.api.get(&["stores", "open"], "Store").await?;
        Ok(data.stores)
    }

    /// Stores whose name or address matches `query`.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` when signed out, otherwise any request error.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<Store>> {
        self.api.require_token()?;
        let data: StoresData = self
            .api
            .get_with_query(&["stores", "search"], &[("query", query)], "Store")
            .await?;
        Ok(data.stores)
    }

    /// One store.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` when signed out, `NotFound` for an unknown id,
    /// otherwise any request error.
    #[instrument(skip(self), fields(store_id = %id))]
    pub async fn store(&self, id: &StoreId) -> Result<Store> {
        self.api.require_token()?;
        let data: StoreData = self.api.get(&["stores", id.as_str()], "Store").await?;
        Ok(data.store)
    }

    /// Stores within `radius_km` of `coords`, nearest first.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` when signed out, otherwise any request error.
    #[instrument(skip(self))]
    pub async fn nearby(&self, coords: Coordinates, radius_km: f64) -> Result<NearbyStores> {
        self.api.require_token()?;
        let latitude = coords.latitude.to_string();
        let longitude = coords.longitude.to_string();
        let radius = radius_km.to_string();

        let nearby: NearbyStores = self
            .api
            .get_with_query(
                &["stores", "nearby"],
                &[
                    ("latitude", latitude.as_str()),
                    ("longitude", longitude.as_str()),
                    ("radius", radius.as_str()),
                ],
                "Store",
            )
            .await?;

        if nearby.stores.is_empty() {
            warn!(radius_km, "No stores found nearby");
        }
        Ok(nearby)
    }
}
