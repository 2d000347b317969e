//! Single-shot geolocation providers.

use crate::core::geo::LatLng;
use async_trait::async_trait;

/// Reasons the user's position could not be obtained. All of them lead to
/// the same fallback view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    Unavailable,
    #[error("geolocation unsupported")]
    Unsupported,
}

#[async_trait]
pub trait GeolocationProvider: Send + Sync + 'static {
    async fn current_position(&self) -> Result<LatLng, GeolocationError>;
}

/// Provider that always reports the same position. Useful for kiosks and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub LatLng);

#[async_trait]
impl GeolocationProvider for FixedPosition {
    async fn current_position(&self) -> Result<LatLng, GeolocationError> {
        Ok(self.0)
    }
}

/// Provider for hosts without any location source.
#[derive(Debug, Clone, Copy)]
pub struct NoGeolocation(pub GeolocationError);

impl Default for NoGeolocation {
    fn default() -> Self {
        Self(GeolocationError::Unsupported)
    }
}

#[async_trait]
impl GeolocationProvider for NoGeolocation {
    async fn current_position(&self) -> Result<LatLng, GeolocationError> {
        Err(self.0)
    }
}
