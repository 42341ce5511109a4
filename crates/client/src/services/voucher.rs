//! Voucher service.
//!
//! The voucher list has moved around between backend versions: it may be
//! `data` itself, `data.vouchers`, or the first array-valued property of
//! `data`. All three are accepted. Any other shape reads as no vouchers, and
//! entries that do not decode are skipped.

use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use warung_core::{DiscountType, Price, VoucherId};

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{ApiVoucher, Voucher};

/// Voucher service.
pub struct VoucherService<'a> {
    api: &'a ApiClient,
}

impl<'a> VoucherService<'a> {
    /// Create a new voucher service.
    #[must_use]
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// The signed-in user's vouchers in display form.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` when signed out, otherwise any request error.
    #[instrument(skip(self))]
    pub async fn vouchers(&self) -> Result<Vec<Voucher>> {
        self.api.require_token()?;
        let data: serde_json::Value = self.api.get(&["vouchers"], "Voucher").await?;

        let vouchers = decode_vouchers(locate_vouchers(data));

        debug!(count = vouchers.len(), "Fetched vouchers");
        Ok(vouchers)
    }

    /// Redeem a voucher. Returns the server's message.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` when signed out, otherwise any request error.
    #[instrument(skip(self), fields(voucher_id = %id))]
    pub async fn use_voucher(&self, id: &VoucherId) -> Result<Option<String>> {
        self.api.require_token()?;
        let message = self
            .api
            .send_for_message(&["vouchers", id.as_str(), "use"], "Voucher")
            .await?;
        info!("Voucher used");
        Ok(message)
    }
}

fn locate_vouchers(data: serde_json::Value) -> Vec<serde_json::Value> {
    let found = match data {
        serde_json::Value::Array(items) => Some(items),
        serde_json::Value::Object(mut fields) => match fields.remove("vouchers") {
            Some(serde_json::Value::Array(items)) => Some(items),
            _ => fields.into_iter().find_map(|(_, value)| match value {
                serde_json::Value::Array(items) => Some(items),
                _ => None,
            }),
        },
        _ => None,
    };
    found.unwrap_or_else(|| {
        warn!("No voucher list in response");
        Vec::new()
    })
}

fn decode_vouchers(raw: Vec<serde_json::Value>) -> Vec<Voucher> {
    raw.into_iter()
        .filter_map(|entry| match serde_json::from_value::<ApiVoucher>(entry) {
            Ok(api) => Some(transform_voucher(api)),
            Err(e) => {
                warn!(error = %e, "Skipping malformed voucher");
                None
            }
        })
        .collect()
}

/// Convert a backend voucher into display form.
///
/// Current field names win over legacy ones; missing amounts read as zero and
/// a missing discount type as fixed.
#[must_use]
pub fn transform_voucher(api: ApiVoucher) -> Voucher {
    let discount_type = api
        .discount_type
        .as_deref()
        .or(api.kind.as_deref())
        .and_then(|raw| raw.parse::<DiscountType>().ok())
        .unwrap_or_default();
    let discount = api.discount_value.or(api.value).unwrap_or(Decimal::ZERO);
    let min_purchase = api
        .minimum_purchase
        .or(api.min_order)
        .unwrap_or(Decimal::ZERO);

    let (name, description) = match discount_type {
        DiscountType::Percentage => (
            format!("Discount {}%", discount.normalize()),
            api.max_discount.map_or_else(
                || "Save up to unlimited".to_string(),
                |max| format!("Save up to {}", Price::new(max)),
            ),
        ),
        DiscountType::Fixed => (
            format!("Discount {}", Price::new(discount)),
            "Direct price cut".to_string(),
        ),
    };

    Voucher {
        id: api.id,
        code: api.code,
        name,
        description,
        discount,
        min_purchase: Price::new(min_purchase),
        valid_until: api.end_date,
        is_used: api.used_count > 0,
    }
}
