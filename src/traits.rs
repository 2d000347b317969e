//! Narrow contracts with the collaborators that own rendering
//!
//! The core never draws anything itself. It asks the map collaborator what
//! was hit, where to look, and which markers to draw.

use crate::{
    core::geo::{LatLng, Point},
    layers::marker::{MarkerId, MarkerRender},
};

/// The map-rendering collaborator
pub trait MapView: Send {
    /// The marker rendered under `pixel`, if any
    fn feature_at_pixel(&self, pixel: Point) -> Option<MarkerId>;

    /// Recenter and zoom the view
    fn set_view(&mut self, center: LatLng, zoom: f64);

    /// Draw a newly created marker
    fn render_marker(&mut self, marker: &MarkerRender);
}
