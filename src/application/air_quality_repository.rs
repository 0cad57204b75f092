// Repository traits for upstream data access
use crate::domain::location::Coordinates;
use crate::domain::observation::HourlySeries;
use async_trait::async_trait;

/// One upstream acquisition: the live reading plus the hourly lookback
/// series. The live value is reported independently of the series and is
/// not guaranteed to equal its last point.
#[derive(Debug, Clone)]
pub struct AirQualityReading {
    pub live_pm25: f64,
    pub live_aqi: Option<f64>,
    pub series: HourlySeries,
}

#[async_trait]
pub trait AirQualityRepository: Send + Sync {
    /// Fetch the current reading and lookback series for a coordinate.
    /// Any retrieval fault (status, timeout, malformed payload) is an `Err`;
    /// a partial series is never returned.
    async fn fetch_air_quality(&self, coords: Coordinates) -> anyhow::Result<AirQualityReading>;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a free-text address to a coordinate. `Ok(None)` when the
    /// address matches nothing.
    async fn geocode(&self, address: &str) -> anyhow::Result<Option<Coordinates>>;
}
