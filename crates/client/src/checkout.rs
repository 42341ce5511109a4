//! Menu-screen checkout flow.
//!
//! [`CheckoutFlow`] owns the cart together with the store, payment method
//! and notes chosen on the menu screen. [`CheckoutFlow::checkout`] borrows
//! the flow mutably for the whole submission, so a second submission cannot
//! start while one is in flight.

use thiserror::Error;
use tracing::{info, warn};

use warung_core::{MenuId, PaymentMethod, Price, StoreId};

use crate::cart::{Cart, QuantityChange};
use crate::error::{ClientError, add_breadcrumb};
use crate::models::{CreateOrderRequest, MenuItem, OrderPlacement, Store};
use crate::navigation::Route;
use crate::services::OrderGateway;

/// Checkout failures.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Please choose a store first")]
    NoStoreSelected,

    #[error("Please choose a payment method")]
    NoPaymentMethod,

    /// The order was placed with an online method but no payment page came
    /// back.
    #[error("The order was created but no payment page was provided")]
    PaymentUrlMissing,

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Where the flow is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckoutPhase {
    #[default]
    Building,
    Submitting,
    Completed,
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Open the provider's payment page.
    PaymentRedirect {
        url: String,
        placement: Box<OrderPlacement>,
    },
    /// Pay at the counter.
    PayAtCounter { placement: Box<OrderPlacement> },
}

impl CheckoutOutcome {
    /// Route to show next. A payment redirect stays on the menu screen until
    /// the payment page closes.
    #[must_use]
    pub const fn next_route(&self) -> Option<Route> {
        match self {
            Self::PaymentRedirect { .. } => None,
            Self::PayAtCounter { .. } => Some(Route::Orders),
        }
    }

    #[must_use]
    pub fn placement(&self) -> &OrderPlacement {
        match self {
            Self::PaymentRedirect { placement, .. } | Self::PayAtCounter { placement } => {
                placement
            }
        }
    }
}

/// Menu-screen state.
#[derive(Debug, Clone)]
pub struct CheckoutFlow {
    cart: Cart,
    store: Option<Store>,
    payment_method: Option<PaymentMethod>,
    notes: String,
    cart_visible: bool,
    phase: CheckoutPhase,
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutFlow {
    /// Empty cart, no store, cash selected.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cart: Cart::new(),
            store: None,
            payment_method: Some(PaymentMethod::Cash),
            notes: String::new(),
            cart_visible: false,
            phase: CheckoutPhase::Building,
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn total(&self) -> Price {
        self.cart.total()
    }

    #[must_use]
    pub const fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    #[must_use]
    pub const fn store(&self) -> Option<&Store> {
        self.store.as_ref()
    }

    #[must_use]
    pub const fn payment_method(&self) -> Option<&PaymentMethod> {
        self.payment_method.as_ref()
    }

    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    #[must_use]
    pub const fn is_cart_visible(&self) -> bool {
        self.cart_visible
    }

    /// Add one unit and open the cart view.
    pub fn add_to_cart(&mut self, menu: MenuItem) {
        add_breadcrumb("cart", "Added menu to cart", Some(&[("menu_id", menu.id.as_str())]));
        self.cart.add(menu);
        self.cart_visible = true;
    }

    pub fn update_quantity(&mut self, menu_id: &MenuId, change: QuantityChange) -> bool {
        self.cart.update_quantity(menu_id, change)
    }

    pub fn update_item_notes(&mut self, menu_id: &MenuId, notes: impl Into<String>) -> bool {
        self.cart.update_notes(menu_id, notes)
    }

    pub fn select_store(&mut self, store: Store) {
        self.store = Some(store);
    }

    /// Choose a payment method; `None` clears the selection.
    pub fn select_payment_method(&mut self, method: Option<PaymentMethod>) {
        self.payment_method = method;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Whether the checkout action is enabled.
    #[must_use]
    pub fn can_checkout(&self) -> bool {
        !self.cart.is_empty() && self.phase != CheckoutPhase::Submitting
    }

    /// Build the order request from the current selections.
    ///
    /// # Errors
    ///
    /// `EmptyCart`, `NoStoreSelected` or `NoPaymentMethod`, checked in that
    /// order.
    pub fn order_request(&self) -> Result<CreateOrderRequest, CheckoutError> {
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let store = self.store.as_ref().ok_or(CheckoutError::NoStoreSelected)?;
        let payment_method = self
            .payment_method
            .clone()
            .ok_or(CheckoutError::NoPaymentMethod)?;
        let notes = self.notes.trim();

        Ok(CreateOrderRequest {
            store_id: store.id.clone(),
            items: self.cart.order_lines(),
            payment_method,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }

    /// Place the order.
    ///
    /// On success the cart is cleared. If an online method returns no payment
    /// page, the cart is kept and the flow returns to building.
    ///
    /// # Errors
    ///
    /// Precondition errors without a network call, the gateway's error, or
    /// `PaymentUrlMissing`.
    pub async fn checkout(
        &mut self,
        gateway: &dyn OrderGateway,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let request = self.order_request()?;
        let store_id: StoreId = request.store_id.clone();
        add_breadcrumb("checkout", "Submitting order", Some(&[("store_id", store_id.as_str())]));

        self.phase = CheckoutPhase::Submitting;
        let placement = match gateway.create_order(&request).await {
            Ok(placement) => placement,
            Err(e) => {
                self.phase = CheckoutPhase::Building;
                warn!(error = %e, "Checkout failed");
                return Err(e.into());
            }
        };

        let redirect = placement.payment.redirect_url().map(str::to_string);
        let outcome = if let Some(url) = redirect {
            CheckoutOutcome::PaymentRedirect {
                url,
                placement: Box::new(placement),
            }
        } else if placement.payment.is_cash() {
            CheckoutOutcome::PayAtCounter {
                placement: Box::new(placement),
            }
        } else {
            self.phase = CheckoutPhase::Building;
            warn!(
                order_id = %placement.order.id,
                payment_method = %placement.payment.payment_method,
                "Order placed without a payment page"
            );
            return Err(CheckoutError::PaymentUrlMissing);
        };

        self.cart.clear();
        self.cart_visible = false;
        self.notes.clear();
        self.phase = CheckoutPhase::Completed;
        info!(order_id = %outcome.placement().order.id, "Checkout completed");
        Ok(outcome)
    }

    /// Start a new order after a completed checkout.
    pub fn reset(&mut self) {
        if self.phase == CheckoutPhase::Completed {
            self.phase = CheckoutPhase::Building;
        }
    }
}
