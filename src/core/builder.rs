//! Controller builder for fluent configuration
//!
//! Collects the config, the map collaborator, the geocoder and the spawner,
//! filling in the Nominatim client and the Tokio spawner when none is given.

use crate::{
    core::{config::MapnoteConfig, controller::MapInteractionController},
    data::locations::SavedLocation,
    geocoding::{NominatimClient, ReverseGeocoder},
    runtime::{self, AsyncSpawner},
    traits::MapView,
    ui::popup::PopupState,
    Error, Result,
};
use std::sync::Arc;

type PopupObserver = Box<dyn Fn(&PopupState) + Send + Sync>;
type LocationsObserver = Box<dyn Fn(&[SavedLocation]) + Send + Sync>;

/// Builder for creating and configuring a [`MapInteractionController`]
#[derive(Default)]
pub struct ControllerBuilder {
    config: MapnoteConfig,
    map: Option<Box<dyn MapView>>,
    geocoder: Option<Arc<dyn ReverseGeocoder>>,
    spawner: Option<Arc<dyn AsyncSpawner>>,
    popup_observers: Vec<PopupObserver>,
    location_observers: Vec<LocationsObserver>,
}

impl ControllerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: MapnoteConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the map-rendering collaborator (required)
    pub fn with_map<M: MapView + 'static>(mut self, map: M) -> Self {
        self.map = Some(Box::new(map));
        self
    }

    /// Use a custom reverse geocoder instead of the HTTP client
    pub fn with_geocoder(mut self, geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    /// Use a custom task spawner instead of the runtime default
    pub fn with_spawner(mut self, spawner: Arc<dyn AsyncSpawner>) -> Self {
        self.spawner = Some(spawner);
        self
    }

    pub fn on_popup<F>(mut self, callback: F) -> Self
    where
        F: Fn(&PopupState) + Send + Sync + 'static,
    {
        self.popup_observers.push(Box::new(callback));
        self
    }

    pub fn on_locations<F>(mut self, callback: F) -> Self
    where
        F: Fn(&[SavedLocation]) + Send + Sync + 'static,
    {
        self.location_observers.push(Box::new(callback));
        self
    }

    pub fn build(self) -> Result<MapInteractionController> {
        self.config.validate()?;

        let map = self
            .map
            .ok_or_else(|| Error::Config("a map collaborator is required".to_string()))?;
        let geocoder = match self.geocoder {
            Some(geocoder) => geocoder,
            None => Arc::new(NominatimClient::new(&self.config.geocoding)?),
        };
        let spawner = self
            .spawner
            .or_else(runtime::default_spawner)
            .ok_or_else(|| Error::Config("no async spawner available".to_string()))?;

        let mut controller = MapInteractionController::new(self.config, map, geocoder, spawner);
        for observer in self.popup_observers {
            controller.subscribe_popup(observer);
        }
        for observer in self.location_observers {
            controller.subscribe_locations(observer);
        }
        Ok(controller)
    }
}
