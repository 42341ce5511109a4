//! Store list and detail screens.
//!
//! # Usage
//!
//! ```bash
//! warung stores
//! warung stores --open
//! warung stores --search bakso
//! warung stores --id 3
//!
//! # Needs WARUNG_LATITUDE / WARUNG_LONGITUDE
//! warung stores --nearby
//! ```
//!
//! Every view needs a session.

use warung_client::ClientError;
use warung_client::location::{StaticLocation, current_location};
use warung_client::services::StoreService;
use warung_core::StoreId;

use super::{CommandError, Context};
use crate::render;

/// Which stores to show.
#[derive(Debug)]
pub enum StoresView {
    All,
    Open,
    Search(String),
    Detail(String),
    Nearby,
}

pub async fn show(ctx: &Context, view: StoresView) -> Result<(), CommandError> {
    ctx.require_login()?;
    let service = StoreService::new(&ctx.api);

    match view {
        StoresView::All => render::stores(&service.stores().await?),
        StoresView::Open => render::stores(&service.open_stores().await?),
        StoresView::Search(query) => render::stores(&service.search(&query).await?),
        StoresView::Detail(id) => render::store_detail(&service.store(&StoreId::new(id)).await?),
        StoresView::Nearby => {
            let coords = current_location(&StaticLocation::new(ctx.config.location))
                .await
                .map_err(ClientError::from)?;
            let nearby = service.nearby(coords, ctx.config.nearby_radius_km).await?;
            render::stores(&nearby.stores);
        }
    }
    Ok(())
}
