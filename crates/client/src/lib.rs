//! Warung client library.
//!
//! Everything the app's screens need short of rendering: configuration, the
//! persisted key-value store, the REST client and domain services, the
//! session store, the cart and checkout flow, the payment page bridge, order
//! history and the home feed.
//!
//! # Example
//!
//! ```rust,ignore
//! let config = ClientConfig::from_env()?;
//! let store = Arc::new(FileStore::new(&config.data_dir));
//! let api = ApiClient::new(&config, store);
//!
//! let stores = StoreService::new(&api).open_stores().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod home;
pub mod location;
pub mod models;
pub mod navigation;
pub mod orders;
pub mod payment_page;
pub mod services;
pub mod session;
pub mod storage;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use navigation::Route;
