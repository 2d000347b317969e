//! Configuration for the interaction core
//!
//! Settings are grouped by concern (view, geocoding, markers). Every field has
//! a default so a partial JSON document is enough to override what matters.

use crate::core::constants::*;
use crate::core::geo::LatLng;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapnoteConfig {
    pub view: ViewConfig,
    pub geocoding: GeocodingConfig,
    pub markers: MarkerConfig,
}

impl MapnoteConfig {
    /// Parses a (possibly partial) JSON document and validates the result
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.view.default_center.is_valid() {
            return Err(Error::Config(format!(
                "default center out of range: {}",
                self.view.default_center
            )));
        }
        if self.geocoding.endpoint.trim().is_empty() {
            return Err(Error::Config("geocoding endpoint is empty".to_string()));
        }
        if self.geocoding.timeout_ms == 0 {
            return Err(Error::Config("geocoding timeout must be positive".to_string()));
        }
        if self.markers.icon_scale <= 0.0 {
            return Err(Error::Config("marker icon scale must be positive".to_string()));
        }
        if self.markers.user_label.trim().is_empty() {
            return Err(Error::Config("user marker label is empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub default_center: LatLng,
    pub default_zoom: f64,
    pub located_zoom: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        let (lng, lat) = DEFAULT_CENTER_LON_LAT;
        Self {
            default_center: LatLng::from_lon_lat(lng, lat),
            default_zoom: DEFAULT_ZOOM,
            located_zoom: LOCATED_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    pub endpoint: String,
    pub user_agent: String,
    pub timeout_ms: u64,
}

impl GeocodingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEOCODING_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_ms: DEFAULT_GEOCODING_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    pub user_icon_url: String,
    pub saved_icon_url: String,
    pub icon_scale: f64,
    pub icon_anchor: (f64, f64),
    pub user_label: String,
    pub hit_tolerance_m: f64,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            user_icon_url: USER_ICON_URL.to_string(),
            saved_icon_url: SAVED_ICON_URL.to_string(),
            icon_scale: MARKER_ICON_SCALE,
            icon_anchor: MARKER_ICON_ANCHOR,
            user_label: USER_MARKER_LABEL.to_string(),
            hit_tolerance_m: MARKER_HIT_TOLERANCE_M,
        }
    }
}
