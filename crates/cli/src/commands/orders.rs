//! Order history screens.
//!
//! # Usage
//!
//! ```bash
//! warung orders
//! warung orders --detail 42
//! warung orders --cancel 42
//! warung orders --pay 42
//! ```

use warung_client::error::add_breadcrumb;
use warung_client::orders::OrderHistory;
use warung_client::payment_page::PaymentPage;
use warung_client::services::{OrderGateway, OrderService, PaymentService};
use warung_core::OrderId;

use super::order::follow_payment_page;
use super::{CommandError, Context};
use crate::render;

pub async fn list(ctx: &Context) -> Result<(), CommandError> {
    ctx.require_login()?;
    let service = OrderService::new(&ctx.api);
    let mut history = OrderHistory::new();

    render::orders(history.refresh(&service).await?);
    Ok(())
}

pub async fn detail(ctx: &Context, id: &str) -> Result<(), CommandError> {
    ctx.require_login()?;
    let order = OrderService::new(&ctx.api).order(&OrderId::new(id)).await?;
    render::order_detail(&order);
    Ok(())
}

/// Cancel, then show the refetched list.
pub async fn cancel(ctx: &Context, id: &str) -> Result<(), CommandError> {
    ctx.require_login()?;
    let service = OrderService::new(&ctx.api);
    let mut history = OrderHistory::new();
    history.refresh(&service).await?;

    let message = history.cancel(&service, &OrderId::new(id)).await?;
    render::notice(message.as_deref().unwrap_or("Order cancelled"));
    render::orders(history.orders());
    Ok(())
}

/// Reopen the checkout page of an order that is still unpaid.
pub async fn pay(ctx: &Context, id: &str) -> Result<(), CommandError> {
    ctx.require_login()?;
    let order_id = OrderId::new(id);
    add_breadcrumb("payment", "Payment page reopened", Some(&[("order_id", id)]));

    let url = PaymentService::new(&ctx.api).payment_url(&order_id).await?;
    follow_payment_page(PaymentPage::new(url), None).await
}
