// Location domain model
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A named monitoring location, either a configured preset or a resolved
/// free-text address.
#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub name: String,
    pub coords: Coordinates,
}

impl Location {
    pub fn new(name: String, coords: Coordinates) -> Self {
        Self { name, coords }
    }
}
