//! Menu service: categories, menus and weather-based recommendations.

use serde::Deserialize;
use tracing::{debug, instrument};

use warung_core::CategoryId;

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{Category, Coordinates, MenuItem, WeatherRecommendation};

/// Which menus to list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MenuFilter {
    #[default]
    All,
    Category(CategoryId),
    Search(String),
}

impl MenuFilter {
    /// Build a filter from optional screen inputs. A category takes
    /// precedence over a search query; blank queries are ignored.
    #[must_use]
    pub fn from_inputs(category: Option<CategoryId>, search: Option<&str>) -> Self {
        match (category, search.map(str::trim).filter(|q| !q.is_empty())) {
            (Some(id), _) => Self::Category(id),
            (None, Some(query)) => Self::Search(query.to_string()),
            (None, None) => Self::All,
        }
    }
}

#[derive(Deserialize)]
struct CategoriesData {
    categories: Vec<Category>,
}

#[derive(Deserialize)]
struct MenusData {
    menus: Vec<MenuItem>,
}

/// Menu service.
pub struct MenuService<'a> {
    api: &'a ApiClient,
}

impl<'a> MenuService<'a> {
    /// Create a new menu service.
    #[must_use]
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// List menu categories.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` when signed out, otherwise any request error.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.api.require_token()?;
        let data: CategoriesData = self.api.get(&["categories"], "Category").await?;
        debug!(count = data.categories.len(), "Fetched categories");
        Ok(data.categories)
    }

    /// List menus matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` when signed out, otherwise any request error.
    #[instrument(skip(self))]
    pub async fn menus(&self, filter: &MenuFilter) -> Result<Vec<MenuItem>> {
        self.api.require_token()?;
        let data: MenusData = match filter {
            MenuFilter::All => self.api.get(&["menus"], "Menu").await?,
            MenuFilter::Category(id) => {
                self.api
                    .get(&["menus", "category", id.as_str()], "Category")
                    .await?
            }
            MenuFilter::Search(query) => {
                self.api
                    .get_with_query(&["menus", "search"], &[("query", query.as_str())], "Menu")
                    .await?
            }
        };
        debug!(count = data.menus.len(), "Fetched menus");
        Ok(data.menus)
    }

    /// Menus recommended for the current weather at `coords`.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` when signed out, otherwise any request error.
    #[instrument(skip(self))]
    pub async fn weather_recommendations(
        &self,
        coords: Coordinates,
    ) -> Result<WeatherRecommendation> {
        self.api.require_token()?;
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();
        self.api
            .get_with_query(
                &["menus", "weather-recommendations"],
                &[("lat", lat.as_str()), ("lon", lon.as_str())],
                "Recommendation",
            )
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use crate::config::ClientConfig;
    use crate::error::ClientError;
    use crate::storage::MemoryStore;

    use super::*;

    #[test]
    fn test_filter_category_takes_precedence() {
        let filter = MenuFilter::from_inputs(Some(CategoryId::new("4")), Some("nasi"));
        assert_eq!(filter, MenuFilter::Category(CategoryId::new("4")));
    }

    #[test]
    fn test_filter_search_and_blank() {
        assert_eq!(
            MenuFilter::from_inputs(None, Some(" nasi ")),
            MenuFilter::Search("nasi".to_string())
        );
        assert_eq!(MenuFilter::from_inputs(None, Some("   ")), MenuFilter::All);
        assert_eq!(MenuFilter::from_inputs(None, None), MenuFilter::All);
    }

    #[tokio::test]
    async fn test_menus_require_token() {
        let config = ClientConfig::for_base_url("http://127.0.0.1:9/api/v1").unwrap();
        let api = ApiClient::new(&config, Arc::new(MemoryStore::new()));

        let err = MenuService::new(&api)
            .menus(&MenuFilter::All)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::MissingToken));
    }
}
