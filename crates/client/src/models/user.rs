//! User account records.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use warung_core::{UserId, timestamp};

/// A registered customer as returned by login and `/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email, if the account has one.
    #[serde(default)]
    pub email: Option<String>,
    /// Phone number as stored by the backend (digits, `62` prefix).
    pub phone: String,
    /// Whether the phone number passed OTP verification.
    #[serde(default)]
    pub is_verified: bool,
    /// When the account was created.
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
    /// When the account was last updated.
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// `data` of a login or registration response.
///
/// Registration may answer without a token when the account still needs OTP
/// verification.
#[derive(Debug, Deserialize)]
pub struct AuthPayload {
    /// Bearer token for subsequent requests.
    #[serde(default)]
    pub token: Option<SecretString>,
    /// The authenticated (or newly created) user.
    #[serde(default)]
    pub user: Option<User>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_user_with_numeric_id_and_null_email() {
        let user: User = serde_json::from_str(
            r#"{
                "id": 12,
                "name": "Budi",
                "email": null,
                "phone": "6281234567890",
                "is_verified": true,
                "created_at": "2025-03-01 08:00:00",
                "updated_at": "2025-03-01T08:00:00.000000Z"
            }"#,
        )
        .unwrap();

        assert_eq!(user.id.as_str(), "12");
        assert!(user.email.is_none());
        assert!(user.created_at.is_some());
    }

    #[test]
    fn test_auth_payload_without_token() {
        let payload: AuthPayload =
            serde_json::from_str(r#"{"user":{"id":"u1","name":"A","phone":"62811111111"}}"#)
                .unwrap();
        assert!(payload.token.is_none());
        assert_eq!(payload.user.unwrap().name, "A");
    }

    #[test]
    fn test_auth_payload_with_token() {
        let payload: AuthPayload = serde_json::from_str(r#"{"token":"1|abc"}"#).unwrap();
        assert_eq!(payload.token.unwrap().expose_secret(), "1|abc");
    }
}
