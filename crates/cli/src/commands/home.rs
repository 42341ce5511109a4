//! Home screen.

use warung_client::home::HomeFeed;
use warung_client::location::StaticLocation;
use warung_client::services::{MenuService, ProfileService, StoreService};

use super::{CommandError, Context};
use crate::render;

pub async fn show(ctx: &Context) -> Result<(), CommandError> {
    ctx.require_login()?;

    let feed = HomeFeed::load(
        &ProfileService::new(&ctx.api),
        &StoreService::new(&ctx.api),
        &MenuService::new(&ctx.api),
        &StaticLocation::new(ctx.config.location),
        ctx.config.nearby_radius_km,
    )
    .await;

    if feed.requires_login() {
        return Err(CommandError::LoginRequired);
    }
    if feed.is_complete_failure() {
        return Err(CommandError::Unavailable);
    }

    render::home(&feed);
    Ok(())
}
