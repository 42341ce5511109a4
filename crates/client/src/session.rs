//! Session store.
//!
//! Holds whether the user is signed in and the phone number awaiting OTP
//! verification. All mutations go through the named operations below; each
//! returns the route to show next.

use secrecy::SecretString;
use tracing::{info, warn};

use crate::error::{ClientError, Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::navigation::Route;
use crate::services::AuthGateway;
use crate::storage::{self, KeyValueStore, StorageError, keys};

/// Observable session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub is_authenticated: bool,
    /// Phone number submitted at registration, until OTP verification.
    pub register_phone: Option<String>,
}

/// What the OTP screen should do when mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpGate {
    /// Show the form for this phone number.
    Ready(String),
    /// No registration is pending.
    Redirect(Route),
}

/// Result of a logout.
#[derive(Debug)]
pub struct LogoutOutcome {
    pub route: Route,
    /// The server's error, if it did not acknowledge. Local state is cleared
    /// either way.
    pub server_error: Option<ClientError>,
}

impl LogoutOutcome {
    /// True when the server acknowledged the logout.
    #[must_use]
    pub const fn acknowledged(&self) -> bool {
        self.server_error.is_none()
    }
}

/// The session store.
pub struct Session<'a> {
    gateway: &'a dyn AuthGateway,
    state: SessionState,
}

impl<'a> Session<'a> {
    /// Start signed out.
    #[must_use]
    pub fn new(gateway: &'a dyn AuthGateway) -> Self {
        Self {
            gateway,
            state: SessionState::default(),
        }
    }

    /// Resume from persisted credentials: signed in when a token is stored.
    ///
    /// A cached user record that no longer decodes is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn restore(gateway: &'a dyn AuthGateway, store: &dyn KeyValueStore) -> Result<Self> {
        let is_authenticated = storage::load_token(store)?.is_some();
        let user = match storage::load_user(store) {
            Ok(user) => user,
            Err(e @ StorageError::Serde { .. }) => {
                warn!(error = %e, "Discarding unreadable cached user");
                store.remove(keys::USER_DATA)?;
                None
            }
            Err(e) => return Err(e.into()),
        };
        if is_authenticated && let Some(user) = user {
            set_sentry_user(&user.id, Some(&user.phone));
        }
        Ok(Self {
            gateway,
            state: SessionState {
                is_authenticated,
                register_phone: None,
            },
        })
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.state.is_authenticated
    }

    /// Where the app opens.
    #[must_use]
    pub const fn entry_route(&self) -> Route {
        if self.state.is_authenticated {
            Route::Home
        } else {
            Route::Login
        }
    }

    /// Sign in.
    ///
    /// # Errors
    ///
    /// Returns the service error; state is left unchanged.
    pub async fn login(&mut self, phone: &str, password: &SecretString) -> Result<Route> {
        add_breadcrumb("auth", "Login attempt", None);
        let user = self.gateway.login(phone, password).await?;
        if let Some(user) = &user {
            set_sentry_user(&user.id, Some(&user.phone));
        }
        self.state.is_authenticated = true;
        info!("Session authenticated");
        Ok(Route::Home)
    }

    /// Create an account and remember the phone for OTP verification.
    ///
    /// # Errors
    ///
    /// Returns the service error; state is left unchanged.
    pub async fn register(
        &mut self,
        name: &str,
        phone: &str,
        password: &SecretString,
    ) -> Result<Route> {
        add_breadcrumb("auth", "Registration attempt", None);
        self.gateway.register(name, phone, password).await?;
        self.state.register_phone = Some(phone.to_string());
        Ok(Route::VerifyOtp)
    }

    /// What the OTP screen shows.
    #[must_use]
    pub fn otp_gate(&self) -> OtpGate {
        self.state
            .register_phone
            .clone()
            .map_or(OtpGate::Redirect(Route::Register), OtpGate::Ready)
    }

    /// Submit the OTP for the pending registration.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` without a pending registration (no call is made),
    /// otherwise the service error with the phone kept for a retry.
    pub async fn verify_otp(&mut self, otp: &str) -> Result<Route> {
        let phone = self.state.register_phone.clone().ok_or_else(|| {
            ClientError::InvalidRequest("No registration is awaiting verification".to_string())
        })?;
        self.gateway.verify_otp(&phone, otp).await?;
        self.state.register_phone = None;
        Ok(Route::Login)
    }

    /// Sign out. Local state is always cleared.
    pub async fn logout(&mut self) -> LogoutOutcome {
        let server_error = self.gateway.logout().await.err();
        if let Some(e) = &server_error {
            warn!(error = %e, "Logout not acknowledged by server");
        }

        self.state = SessionState::default();
        clear_sentry_user();
        LogoutOutcome {
            route: Route::Login,
            server_error,
        }
    }
}
