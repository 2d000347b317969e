//! In-process map collaborator without a screen.
//!
//! Keeps a viewport and the rendered marker list so hit-testing works the way
//! a real renderer would: by pixel distance to each drawn icon. Cloning gives
//! another handle to the same map, so a driver can keep one while the
//! controller owns the other.

use crate::{
    core::{
        geo::{LatLng, Point},
        viewport::Viewport,
    },
    input::events::ClickEvent,
    layers::marker::{MarkerId, MarkerRender},
    traits::MapView,
};
use std::sync::{Arc, Mutex, MutexGuard};

/// Default pick radius around a marker's anchor, in pixels
pub const DEFAULT_HIT_RADIUS_PX: f64 = 12.0;

#[derive(Debug)]
struct HeadlessState {
    viewport: Viewport,
    markers: Vec<MarkerRender>,
    hit_radius_px: f64,
}

#[derive(Debug, Clone)]
pub struct HeadlessMap {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessMap {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            state: Arc::new(Mutex::new(HeadlessState {
                viewport,
                markers: Vec::new(),
                hit_radius_px: DEFAULT_HIT_RADIUS_PX,
            })),
        }
    }

    pub fn with_hit_radius(self, radius_px: f64) -> Self {
        self.lock().hit_radius_px = radius_px;
        self
    }

    pub fn viewport(&self) -> Viewport {
        self.lock().viewport.clone()
    }

    pub fn rendered_markers(&self) -> Vec<MarkerRender> {
        self.lock().markers.clone()
    }

    /// Builds the click event a renderer would emit for a tap on `coordinate`
    pub fn click_at(&self, coordinate: LatLng) -> ClickEvent {
        let pixel = self.lock().viewport.lat_lng_to_pixel(&coordinate);
        ClickEvent { pixel, coordinate }
    }

    /// Builds the click event for a tap on a container pixel
    pub fn click_at_pixel(&self, pixel: Point) -> ClickEvent {
        let coordinate = self.lock().viewport.pixel_to_lat_lng(&pixel);
        ClickEvent { pixel, coordinate }
    }

    fn lock(&self) -> MutexGuard<'_, HeadlessState> {
        // state stays consistent even if a holder panicked
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MapView for HeadlessMap {
    fn feature_at_pixel(&self, pixel: Point) -> Option<MarkerId> {
        let state = self.lock();
        state
            .markers
            .iter()
            .map(|marker| {
                let anchor = state.viewport.lat_lng_to_pixel(&marker.position);
                (marker.id, anchor.distance_to(&pixel))
            })
            .filter(|(_, distance)| *distance <= state.hit_radius_px)
            // newest marker is drawn on top
            .min_by(|a, b| a.1.total_cmp(&b.1).then(b.0.cmp(&a.0)))
            .map(|(id, _)| id)
    }

    fn set_view(&mut self, center: LatLng, zoom: f64) {
        let mut state = self.lock();
        state.viewport.set_center(center);
        state.viewport.set_zoom(zoom);
    }

    fn render_marker(&mut self, marker: &MarkerRender) {
        self.lock().markers.push(marker.clone());
    }
}
