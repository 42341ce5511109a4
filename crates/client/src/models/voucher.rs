//! Voucher records, as sent by the backend and as shown in the app.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use warung_core::{Price, VoucherId};

/// Voucher as the backend sends it.
///
/// Two generations of the API coexist: `discount_type` / `discount_value` /
/// `minimum_purchase` and the older `type` / `value` / `min_order`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiVoucher {
    pub id: VoucherId,
    pub code: String,
    #[serde(default)]
    pub discount_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub discount_value: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub minimum_purchase: Option<Decimal>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub value: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub min_order: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub max_discount: Option<Decimal>,
    #[serde(default)]
    pub max_usage: Option<u32>,
    #[serde(default)]
    pub used_count: u32,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

/// Voucher in display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Voucher {
    pub id: VoucherId,
    pub code: String,
    pub name: String,
    pub description: String,
    /// Percentage points or rupiah, depending on the discount type.
    pub discount: Decimal,
    pub min_purchase: Price,
    pub valid_until: Option<String>,
    pub is_used: bool,
}

/// Accept a number or a numeric string; anything unparseable reads as absent.
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        Some(serde_json::Value::String(s)) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    })
}
