//! In-memory cart.
//!
//! Items keep insertion order. Each menu appears at most once and every
//! quantity is at least 1: decrementing the last unit removes the item.

use warung_core::{MenuId, Price};

use crate::models::{MenuItem, OrderLine};

/// A menu in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub menu: MenuItem,
    pub quantity: u32,
    /// Per-item instructions; empty when none.
    pub notes: String,
}

impl CartItem {
    /// Price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.menu.price.times(self.quantity)
    }
}

/// Direction of a quantity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    Increment,
    Decrement,
}

/// The cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `menu`.
    pub fn add(&mut self, menu: MenuItem) {
        if let Some(item) = self.find_mut(&menu.id) {
            item.quantity = item.quantity.saturating_add(1);
        } else {
            self.items.push(CartItem {
                menu,
                quantity: 1,
                notes: String::new(),
            });
        }
    }

    /// Change the quantity of `menu_id` by one. Returns false if the menu is
    /// not in the cart.
    pub fn update_quantity(&mut self, menu_id: &MenuId, change: QuantityChange) -> bool {
        let Some(index) = self.position(menu_id) else {
            return false;
        };
        let Some(item) = self.items.get_mut(index) else {
            return false;
        };
        match change {
            QuantityChange::Increment => item.quantity = item.quantity.saturating_add(1),
            QuantityChange::Decrement if item.quantity > 1 => item.quantity -= 1,
            QuantityChange::Decrement => {
                self.items.remove(index);
            }
        }
        true
    }

    /// Replace the notes of `menu_id`. Returns false if the menu is not in
    /// the cart.
    pub fn update_notes(&mut self, menu_id: &MenuId, notes: impl Into<String>) -> bool {
        self.find_mut(menu_id).is_some_and(|item| {
            item.notes = notes.into();
            true
        })
    }

    /// Sum of price times quantity.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct menus.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Number of units across all menus.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, item| count.saturating_add(item.quantity))
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, menu_id: &MenuId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.menu.id == menu_id)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Lines for an order request. Blank notes are sent as `null`.
    #[must_use]
    pub fn order_lines(&self) -> Vec<OrderLine> {
        self.items
            .iter()
            .map(|item| OrderLine {
                menu_id: item.menu.id.clone(),
                quantity: item.quantity,
                notes: Some(item.notes.trim())
                    .filter(|notes| !notes.is_empty())
                    .map(str::to_string),
            })
            .collect()
    }

    fn position(&self, menu_id: &MenuId) -> Option<usize> {
        self.items.iter().position(|item| &item.menu.id == menu_id)
    }

    fn find_mut(&mut self, menu_id: &MenuId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| &item.menu.id == menu_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn menu(id: &str, price: i64) -> MenuItem {
        MenuItem {
            id: MenuId::new(id),
            name: format!("Menu {id}"),
            description: None,
            price: Price::from_rupiah(price),
            image: None,
            is_available: true,
            category_id: None,
            store_id: None,
            category: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_add_merges_same_menu() {
        let mut cart = Cart::new();
        cart.add(menu("a", 10_000));
        cart.add(menu("b", 5_000));
        cart.add(menu("a", 10_000));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.items()[0].menu.id.as_str(), "a");
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.total(), Price::from_rupiah(25_000));
    }

    #[test]
    fn test_decrement_last_unit_removes() {
        let mut cart = Cart::new();
        cart.add(menu("a", 10_000));

        assert!(cart.update_quantity(&MenuId::new("a"), QuantityChange::Decrement));
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_update_unknown_menu() {
        let mut cart = Cart::new();
        assert!(!cart.update_quantity(&MenuId::new("x"), QuantityChange::Increment));
        assert!(!cart.update_notes(&MenuId::new("x"), "pedas"));
    }

    #[test]
    fn test_order_lines_send_blank_notes_as_null() {
        let mut cart = Cart::new();
        cart.add(menu("a", 10_000));
        cart.add(menu("b", 5_000));
        cart.update_notes(&MenuId::new("a"), "no onions");
        cart.update_notes(&MenuId::new("b"), "   ");

        let lines = cart.order_lines();
        assert_eq!(lines[0].notes.as_deref(), Some("no onions"));
        assert_eq!(lines[1].notes, None);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize),
        Inc(usize),
        Dec(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..4usize).prop_map(Op::Add),
            (0..4usize).prop_map(Op::Inc),
            (0..4usize).prop_map(Op::Dec),
        ]
    }

    proptest! {
        #[test]
        fn test_cart_invariants_hold(ops in proptest::collection::vec(op(), 0..64)) {
            let prices = [1_000i64, 2_500, 12_000, 30_000];
            let mut cart = Cart::new();

            for op in ops {
                match op {
                    Op::Add(i) => cart.add(menu(&i.to_string(), prices[i])),
                    Op::Inc(i) => {
                        cart.update_quantity(&MenuId::new(i.to_string()), QuantityChange::Increment);
                    }
                    Op::Dec(i) => {
                        cart.update_quantity(&MenuId::new(i.to_string()), QuantityChange::Decrement);
                    }
                }

                let mut ids: Vec<_> = cart.items().iter().map(|item| item.menu.id.clone()).collect();
                ids.sort();
                ids.dedup();
                prop_assert_eq!(ids.len(), cart.len());
                prop_assert!(cart.items().iter().all(|item| item.quantity >= 1));

                let expected: i64 = cart
                    .items()
                    .iter()
                    .map(|item| prices[item.menu.id.as_str().parse::<usize>().unwrap()] * i64::from(item.quantity))
                    .sum();
                prop_assert_eq!(cart.total(), Price::from_rupiah(expected));
            }
        }
    }
}
