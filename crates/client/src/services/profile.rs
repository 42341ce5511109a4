//! Profile service.

use serde::Deserialize;
use tracing::instrument;

use crate::api::ApiClient;
use crate::error::{Result, set_sentry_user};
use crate::models::User;
use crate::storage;

#[derive(Deserialize)]
struct ProfileData {
    user: User,
}

/// Profile service.
pub struct ProfileService<'a> {
    api: &'a ApiClient,
}

impl<'a> ProfileService<'a> {
    /// Create a new profile service.
    #[must_use]
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Fetch the signed-in user and refresh the cached record.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` when signed out, otherwise any request or
    /// storage error.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<User> {
        self.api.require_token()?;
        let data: ProfileData = self.api.get(&["profile"], "Profile").await?;
        storage::save_user(self.api.store(), &data.user)?;
        set_sentry_user(&data.user.id, Some(&data.user.phone));
        Ok(data.user)
    }

    /// The last user record seen, without a network call.
    ///
    /// # Errors
    ///
    /// Returns an error if the cached record cannot be read.
    pub fn cached_user(&self) -> Result<Option<User>> {
        Ok(storage::load_user(self.api.store())?)
    }
}
