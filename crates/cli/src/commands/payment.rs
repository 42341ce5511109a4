//! Payment channel list and payment status screens.

use warung_client::services::PaymentService;

use super::{CommandError, Context};
use crate::render;

/// The list always has at least the cash channel.
pub async fn channels(ctx: &Context) -> Result<(), CommandError> {
    ctx.require_login()?;
    let channels = PaymentService::new(&ctx.api).payment_channels().await;
    render::channels(&channels);
    Ok(())
}

pub async fn status(ctx: &Context, reference: &str) -> Result<(), CommandError> {
    ctx.require_login()?;
    let report = PaymentService::new(&ctx.api)
        .payment_status(reference)
        .await?;
    render::payment_report(&report);
    Ok(())
}
