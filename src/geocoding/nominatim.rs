//! Reqwest-backed client for Nominatim-style `/reverse` endpoints.
//!
//! Owns transport details only: query building, timeout, status mapping and
//! extraction of `display_name` from the JSON body.

use super::{GeocodeFailure, GeocodeResult, ReverseGeocoder};
use crate::core::{config::GeocodingConfig, geo::LatLng};
use crate::Result;
use async_trait::async_trait;
use reqwest::{header, Client};

pub struct NominatimClient {
    client: Client,
    reverse_url: String,
}

impl NominatimClient {
    /// Builds a client with the configured user agent and request timeout.
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            reverse_url: reverse_url(&config.endpoint),
        })
    }

    pub fn reverse_url(&self) -> &str {
        &self.reverse_url
    }

    async fn fetch(&self, coord: LatLng) -> std::result::Result<String, GeocodeFailure> {
        let response = self
            .client
            .get(&self.reverse_url)
            .header(header::ACCEPT, "application/json")
            .query(&[
                ("format", "json".to_string()),
                ("lat", coord.lat.to_string()),
                ("lon", coord.lng.to_string()),
            ])
            .send()
            .await
            .map_err(|e| GeocodeFailure::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeFailure::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| GeocodeFailure::Network(e.to_string()))?;
        parse_display_name(&body)
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    async fn reverse_geocode(&self, coord: LatLng) -> GeocodeResult {
        log::debug!("reverse geocoding {}", coord);
        match self.fetch(coord).await {
            Ok(display_name) => GeocodeResult::Resolved { display_name },
            Err(failure) => {
                log::warn!("reverse geocoding {} failed: {}", coord, failure);
                GeocodeResult::Failed(failure)
            }
        }
    }
}

fn reverse_url(endpoint: &str) -> String {
    format!("{}/reverse", endpoint.trim_end_matches('/'))
}

/// Extracts the place name from a `/reverse` response body.
pub(crate) fn parse_display_name(body: &[u8]) -> std::result::Result<String, GeocodeFailure> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| GeocodeFailure::Malformed(e.to_string()))?;

    match value.get("display_name").and_then(|v| v.as_str()) {
        Some(name) if !name.trim().is_empty() => Ok(name.to_string()),
        _ => Err(GeocodeFailure::MissingDisplayName),
    }
}
