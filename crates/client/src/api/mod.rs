//! REST client for the Warung backend.
//!
//! One [`ApiClient`] is shared by every service. Requests pass through
//! [`ApiClient::authorize`], which attaches the stored bearer token when
//! there is one; responses are unwrapped from the [`envelope::Envelope`]
//! and non-success statuses are mapped by [`envelope::status_error`].

pub mod envelope;

use std::sync::Arc;

use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::storage::{self, KeyValueStore};

/// Maximum body length included in error logs.
const LOG_BODY_LIMIT: usize = 500;

/// HTTP client bound to one backend and one key-value store.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the configured backend.
    #[must_use]
    pub fn new(config: &ClientConfig, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_base_url.clone(),
                store,
            }),
        }
    }

    /// Backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// The shared key-value store.
    #[must_use]
    pub fn store(&self) -> &dyn KeyValueStore {
        self.inner.store.as_ref()
    }

    /// The stored bearer token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn token(&self) -> Result<Option<SecretString>> {
        Ok(storage::load_token(self.store())?)
    }

    /// The stored bearer token, or `MissingToken`.
    ///
    /// Called by services whose endpoints require authentication so that
    /// they fail before any network call.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` if no token is stored.
    pub fn require_token(&self) -> Result<SecretString> {
        self.token()?.ok_or(ClientError::MissingToken)
    }

    /// Attach `Authorization: Bearer <token>` when a token is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        Ok(match self.token()? {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        })
    }

    /// Build an endpoint URL from path segments under the base URL.
    ///
    /// Each segment is percent-encoded, so ids cannot escape their position.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if the base URL cannot hold a path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidRequest("base URL cannot hold a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `GET` an endpoint and return the envelope's `data`.
    ///
    /// # Errors
    ///
    /// Returns `Network`, a status-mapped error or a decode error.
    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        resource: &'static str,
    ) -> Result<T> {
        let request = self.request(Method::GET, segments)?;
        let body = self.execute(request, resource).await?;
        decode(&body, envelope::decode_data(&body))
    }

    /// `GET` an endpoint with query parameters and return the envelope's `data`.
    ///
    /// # Errors
    ///
    /// Returns `Network`, a status-mapped error or a decode error.
    pub async fn get_with_query<T, Q>(
        &self,
        segments: &[&str],
        query: &Q,
        resource: &'static str,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.request(Method::GET, segments)?.query(query);
        let body = self.execute(request, resource).await?;
        decode(&body, envelope::decode_data(&body))
    }

    /// `POST` a JSON body and return the envelope's `data`.
    ///
    /// # Errors
    ///
    /// Returns `Network`, a status-mapped error or a decode error.
    pub async fn post<T, B>(&self, segments: &[&str], body: &B, resource: &'static str) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, segments)?.json(body);
        let body = self.execute(request, resource).await?;
        decode(&body, envelope::decode_data(&body))
    }

    /// `POST` without a body to an endpoint that answers with a message only.
    ///
    /// # Errors
    ///
    /// Returns `Network`, a status-mapped error or a decode error.
    pub async fn send_for_message(
        &self,
        segments: &[&str],
        resource: &'static str,
    ) -> Result<Option<String>> {
        let request = self.request(Method::POST, segments)?;
        let body = self.execute(request, resource).await?;
        decode(&body, envelope::decode_message(&body))
    }

    /// `POST` a JSON body and return the whole envelope, whose `data` may be
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns `Network`, a status-mapped error or a decode error.
    pub async fn post_for_reply<T, B>(
        &self,
        segments: &[&str],
        body: &B,
        resource: &'static str,
    ) -> Result<envelope::Envelope<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, segments)?.json(body);
        let body = self.execute(request, resource).await?;
        decode(&body, envelope::decode_reply(&body))
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!(method = %method, url = %url, "Sending request");
        let request = self
            .inner
            .client
            .request(method, url)
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        self.authorize(request)
    }

    /// Send a request and return the body of a 2xx response.
    async fn execute(&self, request: RequestBuilder, resource: &'static str) -> Result<String> {
        let response = request.send().await.map_err(|e| {
            error!(error = %e, "Request failed without a response");
            ClientError::Network(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(ClientError::Network)?;

        if !status.is_success() {
            error!(
                status = %status,
                body = %truncate(&body),
                "API returned non-success status"
            );
            return Err(envelope::status_error(status, &body, resource));
        }

        Ok(body)
    }
}

/// Log decode failures with the offending body.
fn decode<T>(body: &str, result: Result<T>) -> Result<T> {
    if let Err(ClientError::Decode(reason)) = &result {
        error!(
            error = %reason,
            body = %truncate(body),
            "Failed to decode API response"
        );
    }
    result
}

fn truncate(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::storage::MemoryStore;

    use super::*;

    fn client(base: &str) -> (ApiClient, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let config = ClientConfig::for_base_url(base).unwrap();
        (ApiClient::new(&config, store.clone()), store)
    }

    #[test]
    fn test_endpoint_keeps_version_prefix() {
        let (api, _) = client("http://localhost:8000/api/v1");
        assert_eq!(
            api.endpoint(&["orders", "42", "cancel"]).unwrap().as_str(),
            "http://localhost:8000/api/v1/orders/42/cancel"
        );
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let (api, _) = client("http://localhost:8000/api/v1/");
        assert_eq!(
            api.endpoint(&["payment", "status", "T/1 2"]).unwrap().as_str(),
            "http://localhost:8000/api/v1/payment/status/T%2F1%202"
        );
    }

    #[test]
    fn test_require_token_without_token() {
        let (api, _) = client("http://localhost:8000/api/v1");
        assert!(matches!(
            api.require_token(),
            Err(ClientError::MissingToken)
        ));
    }

    #[test]
    fn test_authorize_attaches_bearer_token() {
        let (api, store) = client("http://localhost:8000/api/v1");
        storage::save_token(store.as_ref(), &SecretString::from("1|secret")).unwrap();

        let request = api
            .authorize(reqwest::Client::new().get("http://localhost/"))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer 1|secret"
        );
    }

    #[test]
    fn test_authorize_without_token_sends_as_is() {
        let (api, _) = client("http://localhost:8000/api/v1");
        let request = api
            .authorize(reqwest::Client::new().get("http://localhost/"))
            .unwrap()
            .build()
            .unwrap();
        assert!(request.headers().get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let (api, _) = client("http://127.0.0.1:9/api/v1");
        let err = api
            .get::<serde_json::Value>(&["stores"], "Store")
            .await
            .unwrap_err();
        assert!(err.is_network());
    }
}
