//! Screens, one module per area.
//!
//! Every screen gets a [`Context`] holding the configuration and an API
//! client backed by the on-disk key-value store.

pub mod account;
pub mod auth;
pub mod home;
pub mod menu;
pub mod order;
pub mod orders;
pub mod payment;
pub mod stores;

use std::sync::Arc;

use thiserror::Error;
use warung_client::checkout::CheckoutError;
use warung_client::orders::OrdersError;
use warung_client::services::AuthService;
use warung_client::session::Session;
use warung_client::storage::{FileStore, KeyValueStore};
use warung_client::{ApiClient, ClientConfig, ClientError, Route};
use warung_core::PhoneError;

/// Errors a screen can end with.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No session; the app would show the login screen.
    #[error("Please log in first (warung login --phone ... --password ...)")]
    LoginRequired,

    /// The screen cannot be shown and the app would navigate elsewhere.
    #[error("{reason}; continue at {route}")]
    Redirect { route: Route, reason: &'static str },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid phone number: {0}")]
    Phone(#[from] PhoneError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Orders(#[from] OrdersError),

    #[error("Could not read input: {0}")]
    Io(#[from] std::io::Error),

    /// Every source of a screen failed.
    #[error("Nothing could be loaded")]
    Unavailable,
}

impl CommandError {
    /// The client error underneath, if the command failed on one.
    pub const fn client_error(&self) -> Option<&ClientError> {
        match self {
            Self::Client(e)
            | Self::Checkout(CheckoutError::Client(e))
            | Self::Orders(OrdersError::Client(e)) => Some(e),
            _ => None,
        }
    }
}

/// What every screen needs.
pub struct Context {
    pub config: ClientConfig,
    pub api: ApiClient,
}

impl Context {
    pub fn new(config: ClientConfig) -> Self {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.data_dir.clone()));
        let api = ApiClient::new(&config, store);
        Self { config, api }
    }

    /// Gate for screens behind login: resume the persisted session and
    /// refuse when the app would open on a signed-out screen.
    pub fn require_login(&self) -> Result<(), CommandError> {
        let auth = AuthService::new(&self.api);
        let session = Session::restore(&auth, self.api.store())?;
        if session.entry_route().is_public() {
            Err(CommandError::LoginRequired)
        } else {
            Ok(())
        }
    }
}
