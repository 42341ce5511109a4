//! Device location access.
//!
//! Screens call [`current_location`], which asks for permission before
//! reading a position. Denial and platform failures surface as
//! [`LocationError`]; nothing retries.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::Coordinates;

/// Outcome of a permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationPermission {
    Granted,
    Denied,
}

/// Location errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("Permission to access location was denied")]
    PermissionDenied,

    #[error("Unable to determine current location: {0}")]
    Unavailable(String),
}

/// A source of device positions.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Ask the user (or platform) for foreground location access.
    async fn request_permission(&self) -> LocationPermission;

    /// Read the current position. Only called after permission is granted.
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Request permission, then read the current position.
///
/// # Errors
///
/// Returns `PermissionDenied` if access is refused, or the provider's error
/// if the position cannot be read.
pub async fn current_location(
    provider: &dyn LocationProvider,
) -> Result<Coordinates, LocationError> {
    info!("Requesting location permission");
    if provider.request_permission().await == LocationPermission::Denied {
        warn!("Location permission denied");
        return Err(LocationError::PermissionDenied);
    }

    let coords = provider.current_position().await?;
    info!(
        latitude = coords.latitude,
        longitude = coords.longitude,
        "Location acquired"
    );
    Ok(coords)
}

/// Fixed position from configuration. Without coordinates, permission is
/// denied.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticLocation {
    coords: Option<Coordinates>,
}

impl StaticLocation {
    #[must_use]
    pub const fn new(coords: Option<Coordinates>) -> Self {
        Self { coords }
    }
}

#[async_trait]
impl LocationProvider for StaticLocation {
    async fn request_permission(&self) -> LocationPermission {
        if self.coords.is_some() {
            LocationPermission::Granted
        } else {
            LocationPermission::Denied
        }
    }

    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        self.coords
            .ok_or_else(|| LocationError::Unavailable("no position configured".to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct BrokenGps;

    #[async_trait]
    impl LocationProvider for BrokenGps {
        async fn request_permission(&self) -> LocationPermission {
            LocationPermission::Granted
        }

        async fn current_position(&self) -> Result<Coordinates, LocationError> {
            Err(LocationError::Unavailable("no fix".to_string()))
        }
    }

    #[tokio::test]
    async fn test_configured_location() {
        let provider = StaticLocation::new(Some(Coordinates {
            latitude: -6.2,
            longitude: 106.8,
        }));
        let coords = current_location(&provider).await.unwrap();
        assert!((coords.latitude + 6.2).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_missing_location_is_denied() {
        let err = current_location(&StaticLocation::default())
            .await
            .unwrap_err();
        assert_eq!(err, LocationError::PermissionDenied);
    }

    #[tokio::test]
    async fn test_provider_failure_is_surfaced() {
        let err = current_location(&BrokenGps).await.unwrap_err();
        assert!(matches!(err, LocationError::Unavailable(_)));
    }
}
