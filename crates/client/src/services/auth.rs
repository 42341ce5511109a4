//! Authentication service.
//!
//! Phone numbers are reduced to digits before they are sent. Login, register
//! and OTP verification persist whatever token and user record the backend
//! returns; logout always clears them, whether or not the server
//! acknowledges.

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{info, instrument, warn};

use warung_core::phone;

use crate::api::ApiClient;
use crate::error::{ClientError, Result};
use crate::models::{AuthPayload, User};
use crate::storage;

/// The authentication operations the session store depends on.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange credentials for a token. Returns the user when the backend
    /// sent one.
    async fn login(&self, phone: &str, password: &SecretString) -> Result<Option<User>>;

    /// Create an account. The account still needs OTP verification.
    async fn register(
        &self,
        name: &str,
        phone: &str,
        password: &SecretString,
    ) -> Result<Option<User>>;

    /// Submit the OTP sent to `phone`. A token in the reply replaces the
    /// stored one. Returns the server's message.
    async fn verify_otp(&self, phone: &str, otp: &str) -> Result<Option<String>>;

    /// End the session on the server and clear local credentials.
    async fn logout(&self) -> Result<()>;
}

/// Authentication service.
pub struct AuthService<'a> {
    api: &'a ApiClient,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    fn persist(&self, payload: &AuthPayload) -> Result<()> {
        if let Some(token) = &payload.token {
            storage::save_token(self.api.store(), token)?;
        }
        if let Some(user) = &payload.user {
            storage::save_user(self.api.store(), user)?;
        }
        Ok(())
    }
}

#[async_trait]
impl AuthGateway for AuthService<'_> {
    /// # Errors
    ///
    /// `InvalidCredentials` on 401, `Decode` if the response has no token.
    #[instrument(skip(self, phone, password))]
    async fn login(&self, phone: &str, password: &SecretString) -> Result<Option<User>> {
        let body = json!({
            "phone": phone::digits_only(phone),
            "password": password.expose_secret(),
        });

        let payload: AuthPayload = self
            .api
            .post(&["login"], &body, "Account")
            .await
            .map_err(|e| match e {
                ClientError::SessionExpired => ClientError::InvalidCredentials,
                other => other,
            })?;

        if payload.token.is_none() {
            return Err(ClientError::Decode("login response has no token".to_string()));
        }
        self.persist(&payload)?;

        info!("Logged in");
        Ok(payload.user)
    }

    /// # Errors
    ///
    /// `AlreadyRegistered` on 409, `Validation` on 422.
    #[instrument(skip(self, name, phone, password))]
    async fn register(
        &self,
        name: &str,
        phone: &str,
        password: &SecretString,
    ) -> Result<Option<User>> {
        let body = json!({
            "name": name,
            "phone": phone::digits_only(phone),
            "password": password.expose_secret(),
        });

        let payload: AuthPayload = self
            .api
            .post(&["register"], &body, "Account")
            .await
            .map_err(|e| {
                if e.status() == Some(StatusCode::CONFLICT) {
                    ClientError::AlreadyRegistered
                } else {
                    e
                }
            })?;
        self.persist(&payload)?;

        info!("Registered, awaiting OTP verification");
        Ok(payload.user)
    }

    /// # Errors
    ///
    /// `InvalidOtp` on 400, `NotFound` on 401 (unknown phone number).
    #[instrument(skip(self, phone, otp))]
    async fn verify_otp(&self, phone: &str, otp: &str) -> Result<Option<String>> {
        let body = json!({
            "phone": phone::digits_only(phone),
            "otp": otp,
        });

        let reply = self
            .api
            .post_for_reply::<AuthPayload, _>(&["verify-otp"], &body, "Phone number")
            .await
            .map_err(|e| match e {
                ClientError::SessionExpired => ClientError::NotFound("Phone number"),
                other if other.status() == Some(StatusCode::BAD_REQUEST) => ClientError::InvalidOtp,
                other => other,
            })?;

        if let Some(payload) = &reply.data {
            self.persist(payload)?;
        }

        let token_refreshed = reply.data.as_ref().is_some_and(|p| p.token.is_some());
        info!(token_refreshed, "OTP verified");
        Ok(reply.message)
    }

    /// # Errors
    ///
    /// Returns the server error, if any, after local credentials are cleared.
    /// A storage failure while clearing takes precedence.
    #[instrument(skip(self))]
    async fn logout(&self) -> Result<()> {
        let server = match self.api.token()? {
            Some(_) => self.api.send_for_message(&["logout"], "Session").await.map(|_| ()),
            None => Ok(()),
        };

        storage::clear_auth(self.api.store())?;

        if let Err(e) = &server {
            warn!(error = %e, "Server logout failed, local session cleared");
        } else {
            info!("Logged out");
        }
        server
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id, Record};

    use crate::config::ClientConfig;
    use crate::storage::{KeyValueStore, MemoryStore, keys};

    use super::*;

    fn offline_api() -> (ApiClient, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let config = ClientConfig::for_base_url("http://127.0.0.1:9/api/v1").unwrap();
        (ApiClient::new(&config, store.clone()), store)
    }

    #[tokio::test]
    async fn test_login_offline_is_network_error() {
        let (api, store) = offline_api();
        let err = AuthService::new(&api)
            .login("0812-3456-7890", &SecretString::from("rahasia123"))
            .await
            .unwrap_err();

        assert!(err.is_network());
        assert!(storage::load_token(store.as_ref()).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logout_without_token_clears_user() {
        let (api, store) = offline_api();
        store.set(keys::USER_DATA, "{}").unwrap();

        AuthService::new(&api).logout().await.unwrap();
        assert!(store.get(keys::USER_DATA).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_token_even_when_server_unreachable() {
        let (api, store) = offline_api();
        storage::save_token(store.as_ref(), &SecretString::from("1|abc")).unwrap();

        let err = AuthService::new(&api).logout().await.unwrap_err();
        assert!(err.is_network());
        assert!(storage::load_token(store.as_ref()).unwrap().is_none());
    }

    /// Records span names and the field names spans carry.
    #[derive(Default)]
    struct SpanFields {
        spans: Mutex<Vec<&'static str>>,
        fields: Mutex<Vec<String>>,
    }

    struct FieldNames<'a>(&'a mut Vec<String>);

    impl Visit for FieldNames<'_> {
        fn record_debug(&mut self, field: &Field, _value: &dyn std::fmt::Debug) {
            self.0.push(field.name().to_string());
        }
    }

    impl tracing::Subscriber for SpanFields {
        fn enabled(&self, _metadata: &tracing::Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, span: &Attributes<'_>) -> Id {
            let mut spans = self.spans.lock().unwrap();
            spans.push(span.metadata().name());
            span.record(&mut FieldNames(&mut self.fields.lock().unwrap()));
            Id::from_u64(spans.len() as u64)
        }

        fn record(&self, _span: &Id, values: &Record<'_>) {
            values.record(&mut FieldNames(&mut self.fields.lock().unwrap()));
        }

        fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

        fn event(&self, _event: &tracing::Event<'_>) {}

        fn enter(&self, _span: &Id) {}

        fn exit(&self, _span: &Id) {}
    }

    #[tokio::test]
    async fn test_auth_spans_omit_phone_and_secrets() {
        let recorder = Arc::new(SpanFields::default());
        let _guard = tracing::subscriber::set_default(recorder.clone());
        let (api, _store) = offline_api();
        let auth = AuthService::new(&api);

        let password = SecretString::from("rahasia123");
        let _ = auth.login("081234567890", &password).await;
        let _ = auth.register("Sari", "081234567890", &password).await;
        let _ = auth.verify_otp("081234567890", "123456").await;

        let spans = recorder.spans.lock().unwrap();
        for name in ["login", "register", "verify_otp"] {
            assert!(spans.contains(&name), "no span for {name}");
        }
        let fields = recorder.fields.lock().unwrap();
        for secret in ["phone", "password", "otp", "name"] {
            assert!(!fields.iter().any(|f| f == secret), "span recorded {secret}");
        }
    }
}
