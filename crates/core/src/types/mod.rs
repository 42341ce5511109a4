//! Core types for Warung.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod payment;
pub mod phone;
pub mod price;
pub mod status;
pub mod timestamp;

pub use id::*;
pub use payment::{CASH_CODE, PaymentMethod};
pub use phone::{PhoneError, PhoneNumber};
pub use price::{Price, PriceError};
pub use status::*;
