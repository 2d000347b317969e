//! The interaction orchestrator
//!
//! Translates map events, user actions and async completions into store
//! mutations and popup transitions. All state lives here and is only touched
//! from [`MapInteractionController::dispatch`], one event at a time, so store
//! mutations never interleave. Lookups run on spawned tasks and report back
//! through the event queue; a result whose sequence token is no longer the
//! active one is dropped.

use crate::{
    core::{
        config::MapnoteConfig,
        constants::{
            GEOLOCATION_FAILED_MESSAGE, GEOLOCATION_UNSUPPORTED_MESSAGE, REGION_LOOKUP_FAILED,
            REGION_NOT_FOUND,
        },
        geo::LatLng,
    },
    data::locations::{LocationRegistry, SavedLocation},
    geocoding::{GeocodeFailure, GeocodeResult, ReverseGeocoder},
    geolocation::{GeolocationError, GeolocationProvider},
    input::events::{ClickEvent, ControllerEvent, LookupPurpose, SequenceToken},
    layers::marker::{MarkerId, MarkerKind, MarkerStore},
    runtime::{AsyncHandle, AsyncSpawner},
    traits::MapView,
    ui::popup::{PopupController, PopupState},
    Error, Result, SaveRejection,
};
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Observer for the saved-location list, invoked with the full snapshot
pub type LocationsCallback = Box<dyn Fn(&[SavedLocation]) + Send + Sync>;

/// Cloneable sender for posting events to a running controller
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    tx: UnboundedSender<ControllerEvent>,
}

impl ControllerHandle {
    /// Queue an event. Returns false once the controller is gone.
    pub fn send(&self, event: ControllerEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn click(&self, click: ClickEvent) -> bool {
        self.send(ControllerEvent::Click(click))
    }

    pub fn save(&self, description: impl Into<String>) -> bool {
        self.send(ControllerEvent::SaveConfirmed {
            description: description.into(),
        })
    }

    pub fn cancel(&self) -> bool {
        self.send(ControllerEvent::SaveCancelled)
    }

    pub fn dismiss(&self) -> bool {
        self.send(ControllerEvent::PopupDismissed)
    }

    pub fn shutdown(&self) -> bool {
        self.send(ControllerEvent::Shutdown)
    }
}

#[derive(Debug, Clone)]
struct ActiveLookup {
    token: SequenceToken,
    opens_prompt: bool,
}

pub struct MapInteractionController {
    config: MapnoteConfig,
    map: Box<dyn MapView>,
    geocoder: Arc<dyn ReverseGeocoder>,
    spawner: Arc<dyn AsyncSpawner>,
    markers: MarkerStore,
    locations: LocationRegistry,
    popups: PopupController,
    location_observers: Vec<LocationsCallback>,
    pending: Option<LatLng>,
    sequence: u64,
    active: Option<ActiveLookup>,
    tasks: Vec<Box<dyn AsyncHandle>>,
    events_tx: UnboundedSender<ControllerEvent>,
    events_rx: UnboundedReceiver<ControllerEvent>,
}

impl MapInteractionController {
    pub fn new(
        config: MapnoteConfig,
        map: Box<dyn MapView>,
        geocoder: Arc<dyn ReverseGeocoder>,
        spawner: Arc<dyn AsyncSpawner>,
    ) -> Self {
        let (events_tx, events_rx) = unbounded_channel();
        Self {
            config,
            map,
            geocoder,
            spawner,
            markers: MarkerStore::new(),
            locations: LocationRegistry::new(),
            popups: PopupController::new(),
            location_observers: Vec::new(),
            pending: None,
            sequence: 0,
            active: None,
            tasks: Vec::new(),
            events_tx,
            events_rx,
        }
    }

    pub fn handle(&self) -> ControllerHandle {
        ControllerHandle {
            tx: self.events_tx.clone(),
        }
    }

    pub fn config(&self) -> &MapnoteConfig {
        &self.config
    }

    pub fn markers(&self) -> &MarkerStore {
        &self.markers
    }

    pub fn locations(&self) -> &LocationRegistry {
        &self.locations
    }

    pub fn popup(&self) -> &PopupState {
        self.popups.current()
    }

    pub fn pending_coordinate(&self) -> Option<LatLng> {
        self.pending
    }

    /// Token of the lookup currently allowed to open a popup
    pub fn active_token(&self) -> Option<SequenceToken> {
        self.active.as_ref().map(|active| active.token)
    }

    /// Number of spawned tasks that have not finished yet
    pub fn in_flight(&mut self) -> usize {
        self.tasks.retain(|task| !task.is_finished());
        self.tasks.len()
    }

    pub fn subscribe_popup<F>(&mut self, callback: F)
    where
        F: Fn(&PopupState) + Send + Sync + 'static,
    {
        self.popups.subscribe(callback);
    }

    pub fn subscribe_locations<F>(&mut self, callback: F)
    where
        F: Fn(&[SavedLocation]) + Send + Sync + 'static,
    {
        self.location_observers.push(Box::new(callback));
    }

    /// Asks `provider` for the user's position. The answer comes back as
    /// [`ControllerEvent::GeolocationSettled`].
    pub fn locate(&mut self, provider: Arc<dyn GeolocationProvider>) {
        let tx = self.events_tx.clone();
        self.spawn(async move {
            let result = provider.current_position().await;
            if tx.send(ControllerEvent::GeolocationSettled(result)).is_err() {
                log::debug!("controller gone, dropping geolocation result");
            }
        });
    }

    /// Single entry point for every event. Returns false on shutdown.
    pub fn dispatch(&mut self, event: ControllerEvent) -> bool {
        log::debug!("dispatching {}", event.name());
        match event {
            ControllerEvent::Click(click) => self.on_map_click(click),
            ControllerEvent::FeatureHit { marker } => self.on_feature_hit(marker),
            ControllerEvent::SaveConfirmed { description } => {
                if let Err(e) = self.on_save_confirmed(&description) {
                    log::debug!("save ignored: {}", e);
                }
            }
            ControllerEvent::SaveCancelled => self.on_save_cancelled(),
            ControllerEvent::PopupDismissed => self.on_popup_dismissed(),
            ControllerEvent::GeolocationSettled(result) => self.on_geolocation_settled(result),
            ControllerEvent::GeocodeSettled {
                token,
                purpose,
                coordinate,
                result,
            } => self.on_geocode_settled(token, purpose, coordinate, result),
            ControllerEvent::Shutdown => return false,
        }
        true
    }

    /// Waits for the next queued event and dispatches it
    pub async fn process_next(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => self.dispatch(event),
            None => false,
        }
    }

    /// Dispatches queued events until [`ControllerEvent::Shutdown`]
    pub async fn run(&mut self) {
        while self.process_next().await {}
        for task in self.tasks.drain(..) {
            if !task.is_finished() {
                task.cancel();
            }
        }
        log::info!("interaction controller stopped");
    }

    pub fn on_geolocation_settled(
        &mut self,
        result: std::result::Result<LatLng, GeolocationError>,
    ) {
        let position = result.and_then(|position| {
            if position.is_valid() {
                Ok(position)
            } else {
                log::warn!("geolocation returned out-of-range position {}", position);
                Err(GeolocationError::Unavailable)
            }
        });

        match position {
            Ok(position) => {
                log::info!("user located at {}", position);
                let label = self.config.markers.user_label.clone();
                match self.create_marker(position, &label, MarkerKind::User) {
                    Ok(id) => log::debug!("user marker {} created", id),
                    Err(e) => log::warn!("user marker not created: {}", e),
                }
                self.map.set_view(position, self.config.view.located_zoom);
                self.pending = None;
                self.issue_lookup(position, LookupPurpose::NearestLocation);
            }
            Err(reason) => {
                log::info!("{}, showing default view", Error::from(reason));
                self.map.set_view(
                    self.config.view.default_center,
                    self.config.view.default_zoom,
                );
                let message = match reason {
                    GeolocationError::Unsupported => GEOLOCATION_UNSUPPORTED_MESSAGE,
                    GeolocationError::PermissionDenied | GeolocationError::Unavailable => {
                        GEOLOCATION_FAILED_MESSAGE
                    }
                };
                self.pending = None;
                self.invalidate_lookup();
                self.popups.open(PopupState::NearestLocationInfo {
                    message: message.to_string(),
                });
            }
        }
    }

    pub fn on_map_click(&mut self, click: ClickEvent) {
        if let Some(marker) = self.map.feature_at_pixel(click.pixel) {
            self.on_feature_hit(marker);
            return;
        }

        let coordinate = click.coordinate.normalized();
        // collaborators whose icons are too small to hit still resolve by distance
        let tolerance_m = self.config.markers.hit_tolerance_m;
        if let Some(id) = self.markers.find_at(coordinate, tolerance_m).map(|m| m.id()) {
            log::debug!("click at {} within {} m of {}", coordinate, tolerance_m, id);
            self.on_feature_hit(id);
            return;
        }

        log::debug!("bare map click at {}", coordinate);
        self.pending = Some(coordinate);
        self.issue_lookup(coordinate, LookupPurpose::InputPrompt);
    }

    pub fn on_feature_hit(&mut self, id: MarkerId) {
        let Some(marker) = self.markers.get(id) else {
            log::warn!("map reported unknown feature {}", id);
            return;
        };
        let coordinate = marker.position();
        let purpose = LookupPurpose::MarkerInfo {
            marker: id,
            description: marker.description().to_string(),
        };
        self.pending = None;
        self.issue_lookup(coordinate, purpose);
    }

    /// Saves the pending coordinate as a location plus a marker. Leaves every
    /// store untouched when the description is blank or nothing is pending.
    ///
    /// While an input prompt is open, the coordinate it shows is the one
    /// saved, even if a newer click is still waiting for its lookup.
    pub fn on_save_confirmed(&mut self, description: &str) -> Result<MarkerId> {
        let description = description.trim();
        if description.is_empty() {
            return Err(Error::InvalidSaveInput(SaveRejection::EmptyDescription));
        }
        let shown = match self.popups.current() {
            PopupState::InputPrompt { pending, .. } => Some(*pending),
            _ => None,
        };
        let Some(position) = shown.or(self.pending) else {
            return Err(Error::InvalidSaveInput(SaveRejection::NoPendingCoordinate));
        };

        let id = self.create_marker(position, description, MarkerKind::Saved)?;
        self.locations.append(position, description);
        log::info!("saved location {} at {}", self.locations.len(), position);

        self.pending = None;
        self.invalidate_lookup();
        if matches!(self.popups.current(), PopupState::InputPrompt { .. }) {
            self.popups.close();
        }
        self.notify_locations();
        Ok(id)
    }

    pub fn on_save_cancelled(&mut self) {
        self.pending = None;
        if self.active.as_ref().is_some_and(|active| active.opens_prompt) {
            self.invalidate_lookup();
        }
        if matches!(self.popups.current(), PopupState::InputPrompt { .. }) {
            self.popups.close();
        }
    }

    pub fn on_popup_dismissed(&mut self) {
        if matches!(self.popups.current(), PopupState::InputPrompt { .. }) {
            self.on_save_cancelled();
        } else {
            self.popups.close();
        }
    }

    pub fn on_geocode_settled(
        &mut self,
        token: SequenceToken,
        purpose: LookupPurpose,
        coordinate: LatLng,
        result: GeocodeResult,
    ) {
        match &self.active {
            Some(active) if active.token == token => {}
            _ => {
                log::debug!(
                    "dropping stale lookup {} (active: {:?})",
                    token,
                    self.active_token()
                );
                return;
            }
        }
        self.active = None;

        let state = match purpose {
            LookupPurpose::NearestLocation => PopupState::NearestLocationInfo {
                message: match result.into_result() {
                    Ok(display_name) => display_name,
                    Err(e) => {
                        log::debug!("nearest location falls back to coordinate: {}", e);
                        coordinate.format_coordinate()
                    }
                },
            },
            LookupPurpose::MarkerInfo {
                marker,
                description,
            } => {
                let region = region_text(&result);
                log::debug!("region of {} resolved to {:?}", marker, region);
                PopupState::MarkerInfo {
                    description,
                    coordinate,
                    region,
                }
            }
            LookupPurpose::InputPrompt => PopupState::input_prompt(coordinate, &result),
        };
        self.popups.open(state);
    }

    fn create_marker(
        &mut self,
        position: LatLng,
        description: &str,
        kind: MarkerKind,
    ) -> Result<MarkerId> {
        let id = self.markers.create(position, description, kind)?;
        if let Some(marker) = self.markers.get(id) {
            self.map.render_marker(&marker.render_request(&self.config.markers));
        }
        Ok(id)
    }

    fn issue_lookup(&mut self, coordinate: LatLng, purpose: LookupPurpose) -> SequenceToken {
        self.sequence += 1;
        let token = SequenceToken(self.sequence);
        if let Some(previous) = self.active.replace(ActiveLookup {
            token,
            opens_prompt: purpose.opens_input_prompt(),
        }) {
            log::debug!("lookup {} superseded by {}", previous.token, token);
        }

        let geocoder = self.geocoder.clone();
        let tx = self.events_tx.clone();
        self.spawn(async move {
            let result = geocoder.reverse_geocode(coordinate).await;
            let event = ControllerEvent::GeocodeSettled {
                token,
                purpose,
                coordinate,
                result,
            };
            if tx.send(event).is_err() {
                log::debug!("controller gone, dropping lookup {}", token);
            }
        });
        token
    }

    fn invalidate_lookup(&mut self) {
        if let Some(previous) = self.active.take() {
            log::debug!("lookup {} invalidated", previous.token);
        }
    }

    fn spawn<F>(&mut self, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        self.tasks.retain(|task| !task.is_finished());
        self.tasks.push(self.spawner.spawn_boxed(Box::pin(future)));
    }

    fn notify_locations(&self) {
        let snapshot = self.locations.all();
        for observer in &self.location_observers {
            observer(snapshot);
        }
    }
}

fn region_text(result: &GeocodeResult) -> String {
    match result {
        GeocodeResult::Resolved { display_name } => display_name.clone(),
        GeocodeResult::Failed(GeocodeFailure::MissingDisplayName) => REGION_NOT_FOUND.to_string(),
        GeocodeResult::Failed(_) => REGION_LOOKUP_FAILED.to_string(),
    }
}
