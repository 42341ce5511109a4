//! Menu screen: categories, then the menus matching the filter.

use warung_client::services::{MenuFilter, MenuService};
use warung_core::CategoryId;

use super::{CommandError, Context};
use crate::render;

pub async fn show(
    ctx: &Context,
    category: Option<String>,
    search: Option<&str>,
) -> Result<(), CommandError> {
    ctx.require_login()?;
    let service = MenuService::new(&ctx.api);

    let filter = MenuFilter::from_inputs(category.map(CategoryId::new), search);
    let (categories, menus) = tokio::join!(service.categories(), service.menus(&filter));

    render::heading("Categories");
    render::categories(&categories?);
    render::heading("Menu");
    render::menus(&menus?);
    Ok(())
}
