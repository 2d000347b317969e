use crate::{
    core::geo::{LatLng, Point},
    geocoding::GeocodeResult,
    geolocation::GeolocationError,
    layers::marker::MarkerId,
};
use std::fmt;

/// A tap or click on the map, as reported by the map collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    /// Container pixel that was hit
    pub pixel: Point,
    /// Geographic coordinate under the pixel
    pub coordinate: LatLng,
}

/// Monotonically increasing id of a popup-opening lookup. Only the most
/// recent token may write to the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceToken(pub u64);

impl fmt::Display for SequenceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which popup a lookup will open once it settles
#[derive(Debug, Clone, PartialEq)]
pub enum LookupPurpose {
    /// Nearest place to the user's position
    NearestLocation,
    /// Region of a clicked marker
    MarkerInfo {
        marker: MarkerId,
        description: String,
    },
    /// Place name shown in the input prompt for a bare-terrain click
    InputPrompt,
}

impl LookupPurpose {
    pub fn opens_input_prompt(&self) -> bool {
        matches!(self, Self::InputPrompt)
    }
}

/// Everything the interaction controller reacts to. Map events, user
/// actions and async completions all arrive through this one type.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    Click(ClickEvent),
    /// The collaborator already resolved the hit to a marker
    FeatureHit { marker: MarkerId },
    SaveConfirmed { description: String },
    SaveCancelled,
    /// The user closed whatever popup is visible
    PopupDismissed,
    GeolocationSettled(Result<LatLng, GeolocationError>),
    GeocodeSettled {
        token: SequenceToken,
        purpose: LookupPurpose,
        coordinate: LatLng,
        result: GeocodeResult,
    },
    /// Stops [`crate::MapInteractionController::run`]
    Shutdown,
}

impl ControllerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Click(_) => "click",
            Self::FeatureHit { .. } => "feature-hit",
            Self::SaveConfirmed { .. } => "save-confirmed",
            Self::SaveCancelled => "save-cancelled",
            Self::PopupDismissed => "popup-dismissed",
            Self::GeolocationSettled(_) => "geolocation-settled",
            Self::GeocodeSettled { .. } => "geocode-settled",
            Self::Shutdown => "shutdown",
        }
    }
}
