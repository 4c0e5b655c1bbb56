//! Place domain model.
//!
//! # Responsibility
//! - Define the pinned-place record shown as a map marker.
//! - Define the exact on-disk field set for that record.
//!
//! # Invariants
//! - `id` is generated once and is the sole equality and hash key.
//! - Coordinates change only by building a whole replacement record.
//! - Serialized form has exactly `id|name|description|latitude|longitude`.

use crate::model::region::Coordinate;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Stable identifier of one place.
pub type PlaceId = Uuid;

/// Name given to places created from the map.
pub const DEFAULT_PLACE_NAME: &str = "New location";

/// One pinned place.
///
/// Two places compare equal when their ids match, even if every other field
/// differs. Lookups by identity rely on this.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    pub description: String,
    latitude: f64,
    longitude: f64,
}

impl Place {
    /// Creates a place at `coordinate` with a fresh id and default labels.
    pub fn new(coordinate: Coordinate) -> Self {
        Self::with_id(Uuid::new_v4(), DEFAULT_PLACE_NAME, "", coordinate)
    }

    /// Creates a place with a caller-provided id.
    ///
    /// Used by edit and import paths where identity already exists.
    pub fn with_id(
        id: PlaceId,
        name: impl Into<String>,
        description: impl Into<String>,
        coordinate: Coordinate,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
        }
    }

    /// Sample place for previews and smoke checks.
    pub fn example() -> Self {
        Self::new(Coordinate::new(51.501, -0.141))
            .renamed("Buckingham Palace", "Where King Charles lives with his dorgis.")
    }

    /// Returns an edited copy keeping this place's id and coordinates.
    pub fn renamed(&self, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_id(self.id, name, description, self.coordinate())
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

impl PartialEq for Place {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Place {}

impl Hash for Place {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
