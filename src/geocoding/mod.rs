//! Reverse geocoding: resolving a coordinate to a human-readable place name.
//!
//! Lookups never raise. Every failure path comes back as
//! [`GeocodeResult::Failed`] so callers have to branch on the outcome.

pub mod nominatim;

use crate::core::geo::LatLng;
use crate::{Error, Result};
use async_trait::async_trait;

pub use nominatim::NominatimClient;

/// Outcome of a single reverse-geocoding request. Consumed once by whoever
/// issued the request, never stored.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeResult {
    Resolved { display_name: String },
    Failed(GeocodeFailure),
}

impl GeocodeResult {
    pub fn resolved(display_name: impl Into<String>) -> Self {
        Self::Resolved {
            display_name: display_name.into(),
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::Resolved { display_name } => Some(display_name),
            Self::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The place name, or the failure as a crate error
    pub fn into_result(self) -> Result<String> {
        match self {
            Self::Resolved { display_name } => Ok(display_name),
            Self::Failed(failure) => Err(Error::GeocodeLookupFailed(failure)),
        }
    }
}

/// Why a lookup produced no place name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeocodeFailure {
    /// Transport error, including timeouts
    #[error("network error: {0}")]
    Network(String),
    /// Non-success HTTP status
    #[error("HTTP {0}")]
    Status(u16),
    /// Body was not the expected JSON document
    #[error("malformed response: {0}")]
    Malformed(String),
    /// Valid answer without a `display_name`
    #[error("response has no display_name")]
    MissingDisplayName,
}

/// A reverse-geocoding service. One attempt per call, no retries.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync + 'static {
    async fn reverse_geocode(&self, coord: LatLng) -> GeocodeResult;
}
