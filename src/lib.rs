//! # mapnote
//!
//! Interaction core for an annotated map: locate the user, drop and describe
//! markers, and show reverse-geocoded place names, without ever letting a
//! slow lookup overwrite a newer popup.
//!
//! Rendering is left to a map collaborator ([`MapView`]) and a UI sink that
//! observes [`PopupState`] transitions. Everything that can race (geolocation,
//! reverse geocoding) is funnelled through one event queue and guarded by
//! sequence tokens.

pub mod core;
pub mod data;
pub mod geocoding;
pub mod geolocation;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod runtime;
pub mod traits;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    builder::ControllerBuilder,
    config::MapnoteConfig,
    controller::{ControllerHandle, MapInteractionController},
    geo::{LatLng, Point},
    map::HeadlessMap,
    viewport::Viewport,
};

pub use crate::data::locations::{LocationRegistry, SavedLocation};

pub use crate::geocoding::{GeocodeFailure, GeocodeResult, NominatimClient, ReverseGeocoder};

pub use crate::geolocation::{FixedPosition, GeolocationError, GeolocationProvider, NoGeolocation};

pub use crate::input::events::{ClickEvent, ControllerEvent, LookupPurpose, SequenceToken};

pub use crate::layers::marker::{Marker, MarkerId, MarkerKind, MarkerRender, MarkerStore};

pub use crate::traits::MapView;

pub use crate::ui::popup::{PopupController, PopupState};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Why a save request did not go through
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SaveRejection {
    #[error("description is empty")]
    EmptyDescription,
    #[error("no coordinate is pending")]
    NoPendingCoordinate,
}

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapnoteError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Geolocation unavailable: {0}")]
    GeolocationUnavailable(#[from] GeolocationError),

    #[error("Geocode lookup failed: {0}")]
    GeocodeLookupFailed(GeocodeFailure),

    #[error("Invalid save input: {0}")]
    InvalidSaveInput(SaveRejection),

    #[error("Marker description must not be empty")]
    EmptyDescription,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type Error = MapnoteError;

/// Installs `env_logger` as the `log` backend, honouring `RUST_LOG`.
/// Safe to call more than once.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .is_test(cfg!(test))
        .try_init();
}

/// Without the `debug` feature there is no logger to install.
#[cfg(not(feature = "debug"))]
pub fn init_logging() {}
