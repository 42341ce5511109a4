//! Domain errors with Sentry integration.
//!
//! Every service returns [`ClientError`]. Its `Display` output is the
//! user-facing message: screens render it directly in their error banner.
//! Raw transport errors never reach a screen unwrapped.

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::ConfigError;
use crate::location::LocationError;
use crate::storage::StorageError;

/// Application-level error type for the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The endpoint requires authentication and no token is stored.
    #[error("Please log in first")]
    MissingToken,

    /// 401 on an authenticated endpoint.
    #[error("Your session has expired. Please log in again.")]
    SessionExpired,

    /// 401 on login.
    #[error("Incorrect phone number or password")]
    InvalidCredentials,

    /// 400 on OTP verification.
    #[error("Invalid OTP code")]
    InvalidOtp,

    /// 409 on registration.
    #[error("This phone number is already registered")]
    AlreadyRegistered,

    /// 403.
    #[error("You do not have access to this resource")]
    Forbidden,

    /// 404, naming what was looked up.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// 422 with the field messages joined.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// 429.
    #[error("Too many attempts, please try again later")]
    RateLimited,

    /// 500.
    #[error("The server encountered an error. Please try again later.")]
    Server,

    /// Any other non-success status.
    #[error("Request failed ({status}): {message}")]
    Http {
        /// HTTP status code.
        status: StatusCode,
        /// Server-provided message, or the canonical reason.
        message: String,
    },

    /// No response was received.
    #[error("Unable to reach the server. Check your internet connection.")]
    Network(#[source] reqwest::Error),

    /// The response did not have the expected shape.
    #[error("Unexpected response from the server: {0}")]
    Decode(String),

    /// The envelope reported `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// The request was refused client-side before sending.
    #[error("{0}")]
    InvalidRequest(String),

    /// Reading or writing the local store failed.
    #[error("Could not access local storage: {0}")]
    Storage(#[from] StorageError),

    /// Location permission denied or location unavailable.
    #[error(transparent)]
    Location(#[from] LocationError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// True for errors where no response was received.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// True when the user has to log in (again) to continue.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::MissingToken | Self::SessionExpired)
    }

    /// HTTP status of the failed response, if there was one.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::SessionExpired | Self::InvalidCredentials => Some(StatusCode::UNAUTHORIZED),
            Self::InvalidOtp => Some(StatusCode::BAD_REQUEST),
            Self::AlreadyRegistered => Some(StatusCode::CONFLICT),
            Self::Forbidden => Some(StatusCode::FORBIDDEN),
            Self::NotFound(_) => Some(StatusCode::NOT_FOUND),
            Self::Validation(_) => Some(StatusCode::UNPROCESSABLE_ENTITY),
            Self::RateLimited => Some(StatusCode::TOO_MANY_REQUESTS),
            Self::Server => Some(StatusCode::INTERNAL_SERVER_ERROR),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server, decode and storage failures. Expected outcomes such as bad
    /// credentials, validation or a missing login are not.
    #[must_use]
    pub const fn is_unexpected(&self) -> bool {
        matches!(
            self,
            Self::Server | Self::Decode(_) | Self::Storage(_) | Self::Http { .. }
        )
    }

    /// Report unexpected failures to Sentry.
    pub fn capture(&self) {
        if self.is_unexpected() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Client error"
            );
        }
    }
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, phone: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: phone.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added menu to cart", Some(&[("menu_id", "42")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
