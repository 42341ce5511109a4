//! Payment service.
//!
//! Channel listing never fails: checkout must always be able to offer cash.

use serde::Deserialize;
use tracing::{info, instrument, warn};

use warung_core::OrderId;

use crate::api::ApiClient;
use crate::error::{ClientError, Result};
use crate::models::{PaymentChannel, PaymentStatusReport};

#[derive(Deserialize)]
struct PaymentUrlData {
    #[serde(default)]
    payment_url: Option<String>,
}

/// Payment service.
pub struct PaymentService<'a> {
    api: &'a ApiClient,
}

impl<'a> PaymentService<'a> {
    /// Create a new payment service.
    #[must_use]
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Payment channels offered by the provider.
    ///
    /// Entries without a string `code` and `name` are dropped. On any failure,
    /// or when nothing valid remains, returns only [`PaymentChannel::cash`].
    #[instrument(skip(self))]
    pub async fn payment_channels(&self) -> Vec<PaymentChannel> {
        match self.fetch_channels().await {
            Ok(channels) if !channels.is_empty() => {
                info!(count = channels.len(), "Fetched payment channels");
                channels
            }
            Ok(_) => {
                warn!("No valid payment channels, falling back to cash");
                vec![PaymentChannel::cash()]
            }
            Err(e) => {
                warn!(error = %e, "Failed to load payment channels, falling back to cash");
                vec![PaymentChannel::cash()]
            }
        }
    }

    async fn fetch_channels(&self) -> Result<Vec<PaymentChannel>> {
        self.api.require_token()?;
        let raw: Vec<serde_json::Value> =
            self.api.get(&["payment-channels"], "Payment channel").await?;
        Ok(valid_channels(raw))
    }

    /// Status of the payment identified by `reference`.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` when signed out, otherwise any request error.
    #[instrument(skip(self))]
    pub async fn payment_status(&self, reference: &str) -> Result<PaymentStatusReport> {
        self.api.require_token()?;
        self.api
            .get(&["payment", "status", reference], "Payment")
            .await
    }

    /// Checkout URL for an unpaid order.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` when signed out, `Decode` when the response has
    /// no URL, otherwise any request error.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn payment_url(&self, order_id: &OrderId) -> Result<String> {
        self.api.require_token()?;
        let data: PaymentUrlData = self
            .api
            .get(&["orders", order_id.as_str(), "payment-url"], "Order")
            .await?;
        data.payment_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ClientError::Decode("response has no payment URL".to_string()))
    }
}

/// Keep entries whose `code` and `name` are strings.
fn valid_channels(raw: Vec<serde_json::Value>) -> Vec<PaymentChannel> {
    raw.into_iter()
        .filter(|entry| entry.get("code").is_some_and(serde_json::Value::is_string))
        .filter(|entry| entry.get("name").is_some_and(serde_json::Value::is_string))
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::config::ClientConfig;
    use crate::storage::{self, MemoryStore};

    use super::*;

    #[test]
    fn test_invalid_channels_are_filtered() {
        let channels = valid_channels(vec![
            json!({"code": "QRIS", "name": "QRIS", "icon_url": "https://x/qris.png"}),
            json!({"code": 12, "name": "Broken"}),
            json!({"code": "BRIVA"}),
            json!("nonsense"),
        ]);

        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].code, "QRIS");
    }

    #[tokio::test]
    async fn test_channels_fall_back_to_cash_without_token() {
        let config = ClientConfig::for_base_url("http://127.0.0.1:9/api/v1").unwrap();
        let api = ApiClient::new(&config, Arc::new(MemoryStore::new()));

        let channels = PaymentService::new(&api).payment_channels().await;
        assert_eq!(channels, vec![PaymentChannel::cash()]);
    }

    #[tokio::test]
    async fn test_channels_fall_back_to_cash_when_offline() {
        let store = Arc::new(MemoryStore::new());
        storage::save_token(store.as_ref(), &secrecy::SecretString::from("t")).unwrap();
        let config = ClientConfig::for_base_url("http://127.0.0.1:9/api/v1").unwrap();
        let api = ApiClient::new(&config, store);

        let channels = PaymentService::new(&api).payment_channels().await;
        assert_eq!(channels, vec![PaymentChannel::cash()]);
    }
}
