//! Order screen: fill the cart, check out, then follow the payment page.
//!
//! # Usage
//!
//! ```bash
//! # Pay at the counter
//! warung order --store 3 --item 12 --item 12 --item "7:1:extra sambal"
//!
//! # Pay online; paste the URLs the payment page visits, one per line
//! warung order --store 3 --item 12:2 --payment qris --notes "table 4"
//! ```

use tokio::io::{AsyncBufReadExt, BufReader};
use warung_client::checkout::{CheckoutFlow, CheckoutOutcome};
use warung_client::error::add_breadcrumb;
use warung_client::models::{MenuItem, PaymentChannel};
use warung_client::payment_page::{PaymentNavigation, PaymentPage};
use warung_client::services::{MenuFilter, MenuService, OrderService, PaymentService, StoreService};
use warung_core::{CASH_CODE, MenuId, PaymentMethod, StoreId};

use super::{CommandError, Context};
use crate::render;

/// One `--item` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub menu_id: MenuId,
    pub quantity: u32,
    pub notes: Option<String>,
}

impl std::str::FromStr for ItemSpec {
    type Err = CommandError;

    /// `MENU[:QTY[:NOTES]]`; notes may contain further colons.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let menu_id = parts
            .next()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CommandError::InvalidArgument(format!("missing menu ID in `{s}`")))?;
        let quantity = match parts.next().map(str::trim) {
            None | Some("") => 1,
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|q| *q >= 1)
                .ok_or_else(|| {
                    CommandError::InvalidArgument(format!("quantity must be at least 1 in `{s}`"))
                })?,
        };
        let notes = parts
            .next()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Ok(Self {
            menu_id: MenuId::new(menu_id),
            quantity,
            notes,
        })
    }
}

pub async fn place(
    ctx: &Context,
    store_id: &str,
    items: &[String],
    payment: Option<&str>,
    notes: Option<String>,
) -> Result<(), CommandError> {
    ctx.require_login()?;
    let specs = items
        .iter()
        .map(|raw| raw.parse::<ItemSpec>())
        .collect::<Result<Vec<_>, _>>()?;

    let stores = StoreService::new(&ctx.api);
    let menus = MenuService::new(&ctx.api);
    let payments = PaymentService::new(&ctx.api);
    let store_id = StoreId::new(store_id);
    let (store, menu, channels) = tokio::join!(
        stores.store(&store_id),
        menus.menus(&MenuFilter::All),
        payments.payment_channels(),
    );
    let menu = menu?;

    let mut flow = CheckoutFlow::new();
    flow.select_store(store?);
    for spec in &specs {
        let item = find_menu(&menu, &spec.menu_id)?;
        for _ in 0..spec.quantity {
            flow.add_to_cart(item.clone());
        }
        if let Some(notes) = &spec.notes {
            flow.update_item_notes(&spec.menu_id, notes.as_str());
        }
    }

    if let Some(code) = payment {
        flow.select_payment_method(Some(resolve_payment(&channels, code)?));
    }
    if let Some(notes) = notes {
        flow.set_notes(notes);
    }

    if let Some(store) = flow.store() {
        render::heading(&format!("Cart at {}", store.name));
    }
    render::cart(flow.cart());
    render::line(&format!(
        "Payment {}",
        flow.payment_method().unwrap_or(&PaymentMethod::Cash)
    ));

    let outcome = flow.checkout(&OrderService::new(&ctx.api)).await?;
    render::heading("Order");
    render::placement(outcome.placement());

    let next_route = outcome.next_route();
    match outcome {
        CheckoutOutcome::PayAtCounter { .. } => {
            render::notice("Pay at the counter when you pick up your order");
            if let Some(route) = next_route {
                render::route(route);
            }
        }
        CheckoutOutcome::PaymentRedirect { url, placement } => {
            let reference = placement.payment.reference.as_deref();
            follow_payment_page(PaymentPage::new(url), reference).await?;
        }
    }
    Ok(())
}

/// Look `code` up among the server's channels. Cash is offered whether or
/// not the server lists it.
fn resolve_payment(
    channels: &[PaymentChannel],
    code: &str,
) -> Result<PaymentMethod, CommandError> {
    let cash = PaymentChannel::cash();
    let lists_cash = channels.iter().any(|c| c.code.eq_ignore_ascii_case(CASH_CODE));
    let candidates: Vec<&PaymentChannel> = channels
        .iter()
        .chain((!lists_cash).then_some(&cash))
        .collect();

    candidates
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code))
        .map(|c| c.method())
        .ok_or_else(|| {
            let codes: Vec<&str> = candidates.iter().map(|c| c.code.as_str()).collect();
            CommandError::InvalidArgument(format!(
                "unknown payment channel `{code}` (available: {})",
                codes.join(", ")
            ))
        })
}

fn find_menu<'m>(menu: &'m [MenuItem], id: &MenuId) -> Result<&'m MenuItem, CommandError> {
    let item = menu
        .iter()
        .find(|m| &m.id == id)
        .ok_or_else(|| CommandError::InvalidArgument(format!("unknown menu {id}")))?;
    if !item.is_available {
        return Err(CommandError::InvalidArgument(format!(
            "{} is not available right now",
            item.name
        )));
    }
    Ok(item)
}

/// Stand-in for the web view: every line on stdin is a navigation.
pub async fn follow_payment_page(
    mut page: PaymentPage,
    reference: Option<&str>,
) -> Result<(), CommandError> {
    render::line(&format!("Complete the payment at {}", page.url()));
    render::notice("Paste each URL the payment page visits; end input to leave the page open.");
    add_breadcrumb("payment", "Payment page opened", None);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(url) = lines.next_line().await? {
        let navigation = page.on_navigation(url.trim());
        match navigation {
            PaymentNavigation::Continue => continue,
            PaymentNavigation::Succeeded => render::notice("Payment completed"),
            PaymentNavigation::Failed => render::notice("Payment failed or was cancelled"),
        }
        if let Some(route) = navigation.route() {
            render::route(route);
        }
        break;
    }

    if !page.is_closed() {
        let hint = reference.map_or_else(
            || "warung orders".to_string(),
            |r| format!("warung payment-status {r}"),
        );
        render::notice(&format!("Payment not finished; check later with `{hint}`"));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_item_spec_defaults_to_one() {
        let spec: ItemSpec = "12".parse().unwrap();
        assert_eq!(spec.menu_id, MenuId::new("12"));
        assert_eq!(spec.quantity, 1);
        assert_eq!(spec.notes, None);
    }

    #[test]
    fn test_item_spec_keeps_colons_in_notes() {
        let spec: ItemSpec = "7:2:ready at 12:30".parse().unwrap();
        assert_eq!(spec.quantity, 2);
        assert_eq!(spec.notes.as_deref(), Some("ready at 12:30"));
    }

    #[test]
    fn test_item_spec_rejects_zero_quantity() {
        assert!("7:0".parse::<ItemSpec>().is_err());
        assert!("7:many".parse::<ItemSpec>().is_err());
        assert!(":2".parse::<ItemSpec>().is_err());
    }

    fn channel(code: &str, name: &str) -> PaymentChannel {
        PaymentChannel {
            code: code.to_string(),
            name: name.to_string(),
            icon_url: None,
            description: None,
        }
    }

    #[test]
    fn test_cash_accepted_when_server_omits_it() {
        let channels = [channel("QRIS", "QRIS"), channel("BCA_VA", "BCA Virtual Account")];

        let method = resolve_payment(&channels, "cash").unwrap();
        assert!(method.is_cash());

        let method = resolve_payment(&channels, "qris").unwrap();
        assert_eq!(method.wire_code(), "qris");
    }

    #[test]
    fn test_unknown_channel_lists_cash() {
        let err = resolve_payment(&[channel("QRIS", "QRIS")], "ovo").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid argument: unknown payment channel `ovo` (available: QRIS, CASH)"
        );
    }
}
