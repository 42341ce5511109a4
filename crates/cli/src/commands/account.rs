//! Profile and voucher screens.

use warung_client::services::{ProfileService, VoucherService};
use warung_core::VoucherId;

use super::{CommandError, Context};
use crate::render;

pub async fn profile(ctx: &Context) -> Result<(), CommandError> {
    ctx.require_login()?;
    let user = ProfileService::new(&ctx.api).profile().await?;
    render::user(&user);
    Ok(())
}

pub async fn vouchers(ctx: &Context) -> Result<(), CommandError> {
    ctx.require_login()?;
    let vouchers = VoucherService::new(&ctx.api).vouchers().await?;
    render::vouchers(&vouchers);
    Ok(())
}

pub async fn use_voucher(ctx: &Context, id: &str) -> Result<(), CommandError> {
    ctx.require_login()?;
    let message = VoucherService::new(&ctx.api)
        .use_voucher(&VoucherId::new(id))
        .await?;
    render::notice(message.as_deref().unwrap_or("Voucher applied"));
    Ok(())
}
