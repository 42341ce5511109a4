//! Property tests for the cart as seen through the checkout flow.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use proptest::prelude::*;
use warung_client::cart::QuantityChange;
use warung_client::checkout::CheckoutFlow;
use warung_core::{MenuId, Price};
use warung_integration_tests::{menu, store};

const PRICES: [i64; 5] = [3_000, 5_000, 12_500, 18_000, 40_000];

#[derive(Debug, Clone)]
enum Edit {
    Add(usize),
    Increment(usize),
    Decrement(usize),
    Notes(usize, String),
}

fn edit() -> impl Strategy<Value = Edit> {
    let index = 0..PRICES.len();
    prop_oneof![
        index.clone().prop_map(Edit::Add),
        index.clone().prop_map(Edit::Increment),
        index.clone().prop_map(Edit::Decrement),
        (index, "[ a-z]{0,8}").prop_map(|(i, notes)| Edit::Notes(i, notes)),
    ]
}

fn apply(flow: &mut CheckoutFlow, edit: &Edit) {
    match edit {
        Edit::Add(i) => flow.add_to_cart(menu(&i.to_string(), "Menu", PRICES[*i])),
        Edit::Increment(i) => {
            flow.update_quantity(&MenuId::new(i.to_string()), QuantityChange::Increment);
        }
        Edit::Decrement(i) => {
            flow.update_quantity(&MenuId::new(i.to_string()), QuantityChange::Decrement);
        }
        Edit::Notes(i, notes) => {
            flow.update_item_notes(&MenuId::new(i.to_string()), notes.as_str());
        }
    }
}

proptest! {
    #[test]
    fn test_order_request_mirrors_cart(edits in prop::collection::vec(edit(), 1..48)) {
        let mut flow = CheckoutFlow::new();
        flow.select_store(store("3", "Warung Pusat"));
        for edit in &edits {
            apply(&mut flow, edit);
        }

        let cart = flow.cart();
        let expected_total: i64 = cart
            .items()
            .iter()
            .map(|item| PRICES[item.menu.id.as_str().parse::<usize>().unwrap()] * i64::from(item.quantity))
            .sum();
        prop_assert_eq!(flow.total(), Price::from_rupiah(expected_total));

        match flow.order_request() {
            Ok(request) => {
                prop_assert!(!cart.is_empty());
                prop_assert_eq!(request.items.len(), cart.len());
                let units: u32 = request.items.iter().map(|line| line.quantity).sum();
                prop_assert_eq!(units, cart.item_count());
                for (line, item) in request.items.iter().zip(cart.items()) {
                    prop_assert_eq!(&line.menu_id, &item.menu.id);
                    prop_assert!(line.quantity >= 1);
                    prop_assert_eq!(line.notes.is_none(), item.notes.trim().is_empty());
                }
            }
            Err(_) => prop_assert!(cart.is_empty()),
        }
    }
}
