//! Order service.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use warung_core::OrderId;

use crate::api::ApiClient;
use crate::error::{ClientError, Result};
use crate::models::{CreateOrderRequest, Order, OrderPlacement};

/// The order operations checkout and order history depend on.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// The signed-in user's orders.
    async fn orders(&self) -> Result<Vec<Order>>;

    /// One order with its items.
    async fn order(&self, id: &OrderId) -> Result<Order>;

    /// Place an order.
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<OrderPlacement>;

    /// Cancel a pending order. Returns the server's message.
    async fn cancel_order(&self, id: &OrderId) -> Result<Option<String>>;
}

#[derive(Deserialize)]
struct OrdersData {
    orders: Vec<Order>,
}

#[derive(Deserialize)]
struct OrderData {
    order: Order,
}

/// Reject requests the backend would refuse anyway.
///
/// # Errors
///
/// Returns `InvalidRequest` naming the first problem found.
pub fn validate_order_request(request: &CreateOrderRequest) -> Result<()> {
    if request.store_id.as_str().trim().is_empty() {
        return Err(ClientError::InvalidRequest("Store ID is required".to_string()));
    }
    if request.items.is_empty() {
        return Err(ClientError::InvalidRequest(
            "Order must contain at least one item".to_string(),
        ));
    }
    for line in &request.items {
        if line.menu_id.as_str().trim().is_empty() {
            return Err(ClientError::InvalidRequest("Menu ID is required".to_string()));
        }
        if line.quantity < 1 {
            return Err(ClientError::InvalidRequest(
                "Item quantity must be at least 1".to_string(),
            ));
        }
    }
    Ok(())
}

/// Order service.
pub struct OrderService<'a> {
    api: &'a ApiClient,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl OrderGateway for OrderService<'_> {
    #[instrument(skip(self))]
    async fn orders(&self) -> Result<Vec<Order>> {
        self.api.require_token()?;
        let data: OrdersData = self.api.get(&["orders"], "Order").await?;
        debug!(count = data.orders.len(), "Fetched orders");
        Ok(data.orders)
    }

    #[instrument(skip(self), fields(order_id = %id))]
    async fn order(&self, id: &OrderId) -> Result<Order> {
        self.api.require_token()?;
        let data: OrderData = self.api.get(&["orders", id.as_str()], "Order").await?;
        Ok(data.order)
    }

    #[instrument(skip(self, request), fields(store_id = %request.store_id, items = request.items.len()))]
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<OrderPlacement> {
        validate_order_request(request)?;
        self.api.require_token()?;

        let placement: OrderPlacement = self.api.post(&["orders"], request, "Store").await?;
        info!(
            order_id = %placement.order.id,
            payment_method = %placement.payment.payment_method,
            "Order placed"
        );
        Ok(placement)
    }

    #[instrument(skip(self), fields(order_id = %id))]
    async fn cancel_order(&self, id: &OrderId) -> Result<Option<String>> {
        self.api.require_token()?;
        let message = self
            .api
            .send_for_message(&["orders", id.as_str(), "cancel"], "Order")
            .await?;
        info!("Order cancelled");
        Ok(message)
    }
}
