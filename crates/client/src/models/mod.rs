//! Typed records exchanged with the backend.
//!
//! Field names follow the JSON wire format. Timestamps go through
//! [`warung_core::timestamp`] so both RFC 3339 and `YYYY-MM-DD HH:MM:SS`
//! decode; nullable fields are `Option` with `#[serde(default)]` so that a
//! missing key and an explicit `null` read the same.

pub mod location;
pub mod menu;
pub mod order;
pub mod store;
pub mod user;
pub mod voucher;

pub use location::{
    Coordinates, NearbyStores, RecommendedMenu, WeatherConditions, WeatherRecommendation,
    WeatherSummary,
};
pub use menu::{Category, CategorySummary, MenuItem};
pub use order::{
    CreateOrderRequest, Order, OrderItem, OrderLine, OrderMenuSummary, OrderPlacement,
    OrderStoreSummary, Payment, PaymentChannel, PaymentStatusReport,
};
pub use store::Store;
pub use user::{AuthPayload, User};
pub use voucher::{ApiVoucher, Voucher};
