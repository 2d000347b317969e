use crate::{
    core::{config::MarkerConfig, geo::LatLng},
    prelude::HashMap,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a marker, assigned at creation and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarkerId(pub u64);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerKind {
    /// The user's own position
    User,
    /// A location saved through the input prompt
    Saved,
}

impl MarkerKind {
    pub fn icon_url<'a>(&self, config: &'a MarkerConfig) -> &'a str {
        match self {
            Self::User => &config.user_icon_url,
            Self::Saved => &config.saved_icon_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    id: MarkerId,
    position: LatLng,
    description: String,
    kind: MarkerKind,
}

impl Marker {
    pub fn id(&self) -> MarkerId {
        self.id
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> MarkerKind {
        self.kind
    }

    /// What the map collaborator needs to draw this marker
    pub fn render_request(&self, config: &MarkerConfig) -> MarkerRender {
        MarkerRender {
            id: self.id,
            position: self.position,
            icon_url: self.kind.icon_url(config).to_string(),
            scale: config.icon_scale,
            anchor: config.icon_anchor,
        }
    }
}

/// Draw request handed to the marker-rendering sink
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerRender {
    pub id: MarkerId,
    pub position: LatLng,
    pub icon_url: String,
    pub scale: f64,
    pub anchor: (f64, f64),
}

/// Canonical marker metadata, ordered by creation. Hit-testing against
/// rendered icons stays with the map collaborator.
#[derive(Debug, Default)]
pub struct MarkerStore {
    markers: Vec<Marker>,
    index: HashMap<MarkerId, usize>,
    next_id: u64,
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a marker. Descriptions may repeat; identity is the returned id.
    pub fn create(
        &mut self,
        position: LatLng,
        description: &str,
        kind: MarkerKind,
    ) -> Result<MarkerId> {
        if description.trim().is_empty() {
            return Err(Error::EmptyDescription);
        }
        if !position.is_valid() {
            return Err(Error::InvalidCoordinates(position.to_string()));
        }

        self.next_id += 1;
        let id = MarkerId(self.next_id);
        self.index.insert(id, self.markers.len());
        self.markers.push(Marker {
            id,
            position,
            description: description.to_string(),
            kind,
        });
        Ok(id)
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.index.get(&id).and_then(|&i| self.markers.get(i))
    }

    /// Nearest marker within `tolerance_m` metres; the earliest one wins ties.
    pub fn find_at(&self, position: LatLng, tolerance_m: f64) -> Option<&Marker> {
        let mut best: Option<(&Marker, f64)> = None;
        for marker in &self.markers {
            let distance = marker.position.distance_to(&position);
            if distance > tolerance_m {
                continue;
            }
            match best {
                Some((_, best_distance)) if best_distance <= distance => {}
                _ => best = Some((marker, distance)),
            }
        }
        best.map(|(marker, _)| marker)
    }

    /// Removes a marker. Ids of the remaining markers are untouched.
    pub fn remove(&mut self, id: MarkerId) -> Option<Marker> {
        let position = self.index.remove(&id)?;
        let removed = self.markers.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    pub fn all(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
