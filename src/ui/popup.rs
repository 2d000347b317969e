use crate::core::{constants::CLICKED_ON_PREFIX, geo::LatLng};
use crate::geocoding::GeocodeResult;

/// What popup, if any, is on screen. Only one variant can be active, so two
/// popups can never be open together.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PopupState {
    #[default]
    Closed,
    /// Asks for a description of the clicked place
    InputPrompt { pending: LatLng, info: String },
    /// Place name (or fallback text) near the user's position
    NearestLocationInfo { message: String },
    /// Details of a clicked marker
    MarkerInfo {
        description: String,
        coordinate: LatLng,
        region: String,
    },
}

impl PopupState {
    /// Input prompt whose info line shows the resolved name, or the
    /// coordinate itself when the lookup failed.
    pub fn input_prompt(pending: LatLng, lookup: &GeocodeResult) -> Self {
        let info = match lookup.display_name() {
            Some(name) => format!("{CLICKED_ON_PREFIX}{name}"),
            None => pending.format_coordinate(),
        };
        Self::InputPrompt { pending, info }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::InputPrompt { .. } => "input-prompt",
            Self::NearestLocationInfo { .. } => "nearest-location",
            Self::MarkerInfo { .. } => "marker-info",
        }
    }

    pub fn title(&self) -> Option<&'static str> {
        match self {
            Self::NearestLocationInfo { .. } => Some("Lokasi Terdekat"),
            Self::MarkerInfo { .. } => Some("Informasi Lokasi"),
            Self::Closed | Self::InputPrompt { .. } => None,
        }
    }

    /// Text lines the UI sink should display
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Closed => Vec::new(),
            Self::InputPrompt { info, .. } => vec![info.clone()],
            Self::NearestLocationInfo { message } => vec![message.clone()],
            Self::MarkerInfo {
                description,
                coordinate,
                region,
            } => vec![
                format!("Deskripsi: {description}"),
                format!(
                    "Koordinat: Longitude {:.6}, Latitude {:.6}",
                    coordinate.lng, coordinate.lat
                ),
                format!("Nama Daerah: {region}"),
            ],
        }
    }
}

/// Observer callback type, invoked after every state change
pub type PopupCallback = Box<dyn Fn(&PopupState) + Send + Sync>;

/// Single owner of the visible popup. Opening replaces whatever was shown
/// (last write wins); popups never stack.
#[derive(Default)]
pub struct PopupController {
    state: PopupState,
    observers: Vec<PopupCallback>,
}

impl PopupController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer, e.g. the UI rendering sink
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: Fn(&PopupState) + Send + Sync + 'static,
    {
        self.observers.push(Box::new(callback));
    }

    /// Shows `state`, closing any popup that was open. Returns the replaced one.
    pub fn open(&mut self, state: PopupState) -> Option<PopupState> {
        let previous = std::mem::replace(&mut self.state, state);
        if previous.is_open() {
            log::debug!("popup {} replaced by {}", previous.kind(), self.state.kind());
        } else {
            log::debug!("popup {} opened", self.state.kind());
        }
        self.notify();
        previous.is_open().then_some(previous)
    }

    pub fn close(&mut self) {
        if !self.state.is_open() {
            return;
        }
        log::debug!("popup {} closed", self.state.kind());
        self.state = PopupState::Closed;
        self.notify();
    }

    pub fn current(&self) -> &PopupState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    fn notify(&self) {
        for observer in &self.observers {
            observer(&self.state);
        }
    }
}
