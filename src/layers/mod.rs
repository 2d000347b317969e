pub mod marker;

pub use marker::{Marker, MarkerId, MarkerKind, MarkerRender, MarkerStore};
