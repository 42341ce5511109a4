//! Order history screen state.

use thiserror::Error;
use tracing::info;

use warung_core::{OrderId, OrderStatus};

use crate::error::{ClientError, add_breadcrumb};
use crate::models::Order;
use crate::services::OrderGateway;

/// Order history failures.
#[derive(Debug, Error)]
pub enum OrdersError {
    #[error("Only pending orders can be cancelled (this order is {status})")]
    NotCancellable { status: OrderStatus },

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// The user's orders as last fetched.
#[derive(Debug, Clone, Default)]
pub struct OrderHistory {
    orders: Vec<Order>,
}

impl OrderHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| &order.id == id)
    }

    /// Replace the list with the server's.
    ///
    /// # Errors
    ///
    /// Returns the gateway's error; the previous list is kept.
    pub async fn refresh(&mut self, gateway: &dyn OrderGateway) -> Result<&[Order], OrdersError> {
        self.orders = gateway.orders().await?;
        Ok(&self.orders)
    }

    /// Cancel an order, then refetch the list.
    ///
    /// Orders known locally must be pending. Unknown ids are submitted and
    /// left to the server to judge.
    ///
    /// # Errors
    ///
    /// `NotCancellable` without a call, or the gateway's error.
    pub async fn cancel(
        &mut self,
        gateway: &dyn OrderGateway,
        id: &OrderId,
    ) -> Result<Option<String>, OrdersError> {
        if let Some(order) = self.get(id)
            && !order.status.is_cancellable()
        {
            return Err(OrdersError::NotCancellable {
                status: order.status,
            });
        }

        add_breadcrumb("orders", "Cancelling order", Some(&[("order_id", id.as_str())]));
        let message = gateway.cancel_order(id).await?;
        info!(order_id = %id, "Order cancelled, refreshing list");
        self.refresh(gateway).await?;
        Ok(message)
    }
}
