//! Response envelope and status mapping.
//!
//! Every endpoint answers `{ "success": bool, "message"?: string, "data"?: T }`.
//! Failed requests carry `message` and, for 422, an `errors` map of field to
//! messages.

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// The common response wrapper.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    /// Missing `success` reads as true; only an explicit `false` rejects.
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

const fn default_success() -> bool {
    true
}

/// Body of a non-2xx response.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<serde_json::Map<String, serde_json::Value>>,
}

impl ErrorBody {
    fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// All field messages in field order, joined with `", "`.
    fn joined_errors(&self) -> Option<String> {
        let errors = self.errors.as_ref()?;
        let messages: Vec<&str> = errors
            .values()
            .flat_map(|value| match value {
                serde_json::Value::Array(items) => {
                    items.iter().filter_map(serde_json::Value::as_str).collect()
                }
                serde_json::Value::String(message) => vec![message.as_str()],
                _ => Vec::new(),
            })
            .collect();

        if messages.is_empty() {
            None
        } else {
            Some(messages.join(", "))
        }
    }
}

/// Map a non-success status to the domain error.
///
/// `resource` names what a 404 failed to find.
#[must_use]
pub fn status_error(status: StatusCode, body: &str, resource: &'static str) -> ClientError {
    let parsed = ErrorBody::parse(body);
    match status {
        StatusCode::UNAUTHORIZED => ClientError::SessionExpired,
        StatusCode::FORBIDDEN => ClientError::Forbidden,
        StatusCode::NOT_FOUND => ClientError::NotFound(resource),
        StatusCode::UNPROCESSABLE_ENTITY => ClientError::Validation(
            parsed
                .joined_errors()
                .or(parsed.message)
                .unwrap_or_else(|| "invalid data".to_string()),
        ),
        StatusCode::TOO_MANY_REQUESTS => ClientError::RateLimited,
        StatusCode::INTERNAL_SERVER_ERROR => ClientError::Server,
        _ => ClientError::Http {
            status,
            message: parsed.message.unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            }),
        },
    }
}

/// Decode a 2xx body and return its `data`.
///
/// # Errors
///
/// `Decode` if the body is not an envelope or `data` is missing or has the
/// wrong shape; `Rejected` if the envelope reports `success: false`.
pub fn decode_data<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    let envelope = decode_envelope(body)?;
    let data = envelope
        .data
        .ok_or_else(|| ClientError::Decode("response has no data".to_string()))?;
    serde_json::from_value(data).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Decode a 2xx body and return its `message`.
///
/// # Errors
///
/// `Decode` if the body is not an envelope; `Rejected` if the envelope
/// reports `success: false`.
pub fn decode_message(body: &str) -> Result<Option<String>, ClientError> {
    Ok(decode_envelope(body)?.message)
}

/// Decode a 2xx body whose `data` may be absent or `null`.
///
/// # Errors
///
/// `Decode` if the body is not an envelope or `data` has the wrong shape;
/// `Rejected` if the envelope reports `success: false`.
pub fn decode_reply<T: DeserializeOwned>(body: &str) -> Result<Envelope<T>, ClientError> {
    let envelope = decode_envelope(body)?;
    let data = match envelope.data {
        None | Some(serde_json::Value::Null) => None,
        Some(value) => {
            Some(serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))?)
        }
    };
    Ok(Envelope {
        success: envelope.success,
        message: envelope.message,
        data,
    })
}

fn decode_envelope(body: &str) -> Result<Envelope<serde_json::Value>, ClientError> {
    let envelope: Envelope<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| ClientError::Decode(e.to_string()))?;
    if !envelope.success {
        return Err(ClientError::Rejected(
            envelope
                .message
                .unwrap_or_else(|| "The request was not successful".to_string()),
        ));
    }
    Ok(envelope)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Orders {
        orders: Vec<serde_json::Value>,
    }

    #[test]
    fn test_validation_messages_joined_in_field_order() {
        let body = r#"{
            "message": "The given data was invalid.",
            "errors": {
                "phone": ["The phone has already been taken."],
                "password": ["The password must be at least 8 characters.", "The password is weak."]
            }
        }"#;

        let err = status_error(StatusCode::UNPROCESSABLE_ENTITY, body, "User");
        match err {
            ClientError::Validation(message) => assert_eq!(
                message,
                "The phone has already been taken., The password must be at least 8 characters., The password is weak."
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validation_falls_back_to_message() {
        let err = status_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"message":"Store is closed"}"#,
            "Order",
        );
        assert_eq!(err.to_string(), "Validation failed: Store is closed");
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "", "Order"),
            ClientError::SessionExpired
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, "", "Order"),
            ClientError::Forbidden
        ));
        assert_eq!(
            status_error(StatusCode::NOT_FOUND, "<html>", "Order").to_string(),
            "Order not found"
        );
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, "", "Order"),
            ClientError::RateLimited
        ));
        assert!(matches!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, "", "Order"),
            ClientError::Server
        ));
    }

    #[test]
    fn test_other_status_uses_server_message() {
        let err = status_error(StatusCode::CONFLICT, r#"{"message":"Already taken"}"#, "User");
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
        assert_eq!(err.to_string(), "Request failed (409 Conflict): Already taken");
    }

    #[test]
    fn test_other_status_without_body() {
        let err = status_error(StatusCode::BAD_GATEWAY, "", "User");
        assert_eq!(err.to_string(), "Request failed (502 Bad Gateway): Bad Gateway");
    }

    #[test]
    fn test_decode_data() {
        let orders: Orders =
            decode_data(r#"{"success":true,"data":{"orders":[{"id":1}]}}"#).unwrap();
        assert_eq!(orders.orders.len(), 1);
    }

    #[test]
    fn test_decode_rejected() {
        let err = decode_data::<Orders>(r#"{"success":false,"message":"Store is closed"}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "Store is closed");
    }

    #[test]
    fn test_decode_missing_data() {
        let err = decode_data::<Orders>(r#"{"success":true}"#).unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn test_decode_wrong_shape() {
        let err = decode_data::<Orders>(r#"{"success":true,"data":{"orders":"nope"}}"#)
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn test_decode_not_json() {
        let err = decode_message("<html>").unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn test_decode_message() {
        let message =
            decode_message(r#"{"success":true,"message":"Order cancelled","data":null}"#).unwrap();
        assert_eq!(message.as_deref(), Some("Order cancelled"));
    }

    #[test]
    fn test_decode_reply_with_and_without_data() {
        let reply: Envelope<Orders> =
            decode_reply(r#"{"success":true,"message":"Verified","data":{"orders":[]}}"#).unwrap();
        assert_eq!(reply.message.as_deref(), Some("Verified"));
        assert!(reply.data.unwrap().orders.is_empty());

        let reply: Envelope<Orders> =
            decode_reply(r#"{"success":true,"message":"Verified","data":null}"#).unwrap();
        assert!(reply.data.is_none());
    }
}
