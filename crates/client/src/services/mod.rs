//! Domain services over the REST API.
//!
//! # Services
//!
//! - `auth` - Login, registration, OTP verification, logout
//! - `menu` - Categories, menus, weather-based recommendations
//! - `order` - Order placement, history, cancellation
//! - `payment` - Payment channels, payment status, payment URLs
//! - `profile` - The signed-in user's profile
//! - `store` - Store listing, search, nearby stores
//! - `voucher` - Voucher listing and redemption
//!
//! Each service borrows the shared [`ApiClient`](crate::api::ApiClient).
//! The auth and order services also implement the gateway traits consumed by
//! the session store, checkout and order history, so those flows can run
//! against fakes.

pub mod auth;
pub mod menu;
pub mod order;
pub mod payment;
pub mod profile;
pub mod store;
pub mod voucher;

pub use auth::{AuthGateway, AuthService};
pub use menu::{MenuFilter, MenuService};
pub use order::{OrderGateway, OrderService};
pub use payment::PaymentService;
pub use profile::ProfileService;
pub use store::StoreService;
pub use voucher::{VoucherService, transform_voucher};
