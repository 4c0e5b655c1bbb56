//! Map geometry value types.
//!
//! Nothing here is persisted. The viewport only exists so new places can be
//! dropped at the current map center.

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components can be stored as JSON numbers.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Visible extent around a map center, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSpan {
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

/// Current map viewport: center plus visible span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapRegion {
    pub center: Coordinate,
    pub span: CoordinateSpan,
}

impl MapRegion {
    pub const fn new(center: Coordinate, span: CoordinateSpan) -> Self {
        Self { center, span }
    }
}

impl Default for MapRegion {
    /// Western Europe at country scale.
    fn default() -> Self {
        Self {
            center: Coordinate::new(50.0, 0.0),
            span: CoordinateSpan {
                latitude_delta: 25.0,
                longitude_delta: 25.0,
            },
        }
    }
}
