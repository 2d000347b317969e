//! Prelude module for common mapnote types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use mapnote::prelude::*;`

pub use crate::core::{
    builder::ControllerBuilder,
    config::{GeocodingConfig, MapnoteConfig, MarkerConfig, ViewConfig},
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

pub use crate::runtime::{AsyncHandle, AsyncSpawner};

pub use crate::traits::MapView;

pub use crate::ui::popup::{PopupController, PopupState};

pub use crate::{Error as MapnoteError, Result};

pub use std::sync::Arc;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
