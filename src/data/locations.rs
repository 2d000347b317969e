use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// A place the user chose to keep, with their own description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedLocation {
    pub position: LatLng,
    pub description: String,
}

impl SavedLocation {
    /// Listing line for this location at 1-based position `number`
    pub fn display_line(&self, number: usize) -> String {
        format!(
            "Location {}: Longitude {}, Latitude {}, Description: {}",
            number, self.position.lng, self.position.lat, self.description
        )
    }
}

/// Append-only list of saved locations. Insertion order is display order.
#[derive(Debug, Clone, Default)]
pub struct LocationRegistry {
    locations: Vec<SavedLocation>,
}

impl LocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, position: LatLng, description: impl Into<String>) {
        self.locations.push(SavedLocation {
            position,
            description: description.into(),
        });
    }

    pub fn all(&self) -> &[SavedLocation] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// One line per location, numbered from 1.
    pub fn display_lines(&self) -> Vec<String> {
        self.locations
            .iter()
            .enumerate()
            .map(|(i, location)| location.display_line(i + 1))
            .collect()
    }
}
