//! Orders, order placement and payment records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warung_core::{
    CASH_CODE, MenuId, OrderId, OrderItemId, OrderStatus, PaymentMethod, PaymentStatus, Price,
    StoreId, UserId, timestamp,
};

// =============================================================================
// Orders
// =============================================================================

/// Menu summary embedded in an order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderMenuSummary {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// One line of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub menu_id: MenuId,
    pub quantity: u32,
    /// Unit price at the time of ordering.
    pub price: Price,
    pub subtotal: Price,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub menu: Option<OrderMenuSummary>,
}

impl OrderItem {
    /// Name of the ordered menu, or its id when the summary is missing.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.menu
            .as_ref()
            .map_or_else(|| self.menu_id.as_str(), |menu| menu.name.as_str())
    }
}

/// Store summary embedded in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStoreSummary {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub store_id: StoreId,
    #[serde(default)]
    pub store: Option<OrderStoreSummary>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub total_price: Price,
    #[serde(default)]
    pub discount_amount: Price,
    pub final_price: Price,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_url: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub expired_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Store name, if the summary was embedded.
    #[must_use]
    pub fn store_name(&self) -> Option<&str> {
        self.store.as_ref().map(|store| store.name.as_str())
    }
}

// =============================================================================
// Placement
// =============================================================================

/// One requested line of a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub menu_id: MenuId,
    pub quantity: u32,
    /// Sent as `null` when empty.
    pub notes: Option<String>,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOrderRequest {
    pub store_id: StoreId,
    pub items: Vec<OrderLine>,
    /// `CASH` or a lower-cased channel code.
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

/// Payment record created alongside an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub payment_method: String,
    /// Provider checkout page; absent for cash.
    #[serde(default)]
    pub payment_url: Option<String>,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub expired_time: Option<String>,
}

impl Payment {
    /// True when the backend recorded the payment as cash.
    #[must_use]
    pub fn is_cash(&self) -> bool {
        self.payment_method.eq_ignore_ascii_case(CASH_CODE)
    }

    /// Payment URL, treating an empty string as absent.
    #[must_use]
    pub fn redirect_url(&self) -> Option<&str> {
        self.payment_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// `data` of a successful `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlacement {
    pub order: Order,
    pub payment: Payment,
}

// =============================================================================
// Payment channels and status
// =============================================================================

/// A payment method offered by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentChannel {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PaymentChannel {
    /// The pay-at-counter channel, always available.
    #[must_use]
    pub fn cash() -> Self {
        Self {
            code: CASH_CODE.to_string(),
            name: "Pay at counter".to_string(),
            icon_url: None,
            description: Some("Cash payment at the cashier".to_string()),
        }
    }

    /// The checkout selection this channel stands for.
    #[must_use]
    pub fn method(&self) -> PaymentMethod {
        PaymentMethod::from_code(&self.code)
    }
}

/// `data` of `GET /payment/status/:reference`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStatusReport {
    #[serde(default)]
    pub order_id: Option<OrderId>,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub payment_url: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub expired_time: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PLACEMENT: &str = r#"{
        "order": {
            "id": 101,
            "store_id": 3,
            "user_id": "u-1",
            "total_price": 50000,
            "discount_amount": 0,
            "final_price": "50000.00",
            "status": "pending",
            "payment_status": "unpaid",
            "payment_method": "qris",
            "expired_at": "2025-03-01 10:00:00",
            "created_at": "2025-03-01 09:00:00",
            "items": [{
                "id": 1,
                "menu_id": "m-1",
                "quantity": 2,
                "price": 25000,
                "subtotal": 50000,
                "notes": null,
                "menu": {"name": "Nasi Goreng", "description": null}
            }]
        },
        "payment": {
            "payment_method": "qris",
            "payment_url": "https://pay.example/checkout/abc",
            "status": "unpaid",
            "reference": "T123",
            "expired_time": "2025-03-01 10:00:00"
        }
    }"#;

    #[test]
    fn test_decode_order_placement() {
        let placement: OrderPlacement = serde_json::from_str(PLACEMENT).unwrap();
        assert_eq!(placement.order.id.as_str(), "101");
        assert_eq!(placement.order.status, OrderStatus::Pending);
        assert_eq!(placement.order.items[0].display_name(), "Nasi Goreng");
        assert_eq!(
            placement.payment.redirect_url(),
            Some("https://pay.example/checkout/abc")
        );
        assert!(!placement.payment.is_cash());
    }

    #[test]
    fn test_cash_payment_without_url() {
        let payment: Payment =
            serde_json::from_str(r#"{"payment_method":"cash","payment_url":"","status":"unpaid"}"#)
                .unwrap();
        assert!(payment.is_cash());
        assert!(payment.redirect_url().is_none());
    }

    #[test]
    fn test_create_order_request_wire_format() {
        let request = CreateOrderRequest {
            store_id: StoreId::new("3"),
            items: vec![OrderLine {
                menu_id: MenuId::new("m-1"),
                quantity: 2,
                notes: None,
            }],
            payment_method: PaymentMethod::from_code("QRIS"),
            notes: Some("extra spicy".to_string()),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "store_id": "3",
                "items": [{"menu_id": "m-1", "quantity": 2, "notes": null}],
                "payment_method": "qris",
                "notes": "extra spicy"
            })
        );
    }

    #[test]
    fn test_cash_channel() {
        let cash = PaymentChannel::cash();
        assert_eq!(cash.code, "CASH");
        assert!(cash.method().is_cash());
    }
}
