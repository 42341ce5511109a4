//! Warung Core - Shared domain types.
//!
//! This crate provides the types shared by the Warung client components:
//! - `client` - API client, session store, cart and checkout
//! - `cli` - Terminal screens for the food-ordering app
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, phone numbers,
//!   statuses and payment methods

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
