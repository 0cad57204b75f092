// Open-Meteo air-quality feed adapter
use crate::application::air_quality_repository::{AirQualityReading, AirQualityRepository};
use crate::domain::location::Coordinates;
use crate::domain::observation::HourlySeries;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct OpenMeteoRepository {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct AirQualityResponse {
    current: CurrentBlock,
    hourly: HourlyBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    pm2_5: Option<f64>,
    us_aqi: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Vec<String>,
    pm2_5: Vec<Option<f64>>,
}

impl OpenMeteoRepository {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build air-quality HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn build_query_url(&self, coords: Coordinates) -> String {
        format!(
            "{}?latitude={}&longitude={}&current=pm2_5,us_aqi&hourly=pm2_5&past_days=2&forecast_days=1",
            self.base_url, coords.latitude, coords.longitude
        )
    }

    fn map_reading(payload: AirQualityResponse) -> Result<AirQualityReading> {
        let live_pm25 = payload
            .current
            .pm2_5
            .context("Air-quality payload is missing the current pm2_5 value")?;

        let series = HourlySeries::from_raw(&payload.hourly.time, &payload.hourly.pm2_5);
        if series.is_empty() {
            tracing::warn!("Upstream payload contained no usable hourly rows");
        }
        tracing::debug!(
            "Mapped upstream payload: {} of {} hourly rows usable",
            series.len(),
            payload.hourly.time.len()
        );

        Ok(AirQualityReading {
            live_pm25,
            live_aqi: payload.current.us_aqi,
            series,
        })
    }
}

#[async_trait]
impl AirQualityRepository for OpenMeteoRepository {
    async fn fetch_air_quality(&self, coords: Coordinates) -> Result<AirQualityReading> {
        let url = self.build_query_url(coords);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to reach the air-quality feed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Air-quality feed returned status {}: {}", status, body);
        }

        let payload = response
            .json::<AirQualityResponse>()
            .await
            .context("Failed to parse air-quality payload")?;

        Self::map_reading(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "latitude": 31.5,
        "longitude": 74.4,
        "current": { "time": "2026-08-07T10:00", "pm2_5": 184.0, "us_aqi": 234.0 },
        "hourly": {
            "time": ["2026-08-07T08:00", "2026-08-07T09:00", "2026-08-07T10:00"],
            "pm2_5": [170.0, null, 181.5]
        }
    }"#;

    #[test]
    fn test_map_reading() {
        let payload: AirQualityResponse = serde_json::from_str(FIXTURE).unwrap();
        let reading = OpenMeteoRepository::map_reading(payload).unwrap();

        assert_eq!(reading.live_pm25, 184.0);
        assert_eq!(reading.live_aqi, Some(234.0));
        // The null row is dropped, not zero-filled
        assert_eq!(reading.series.values(), vec![170.0, 181.5]);
    }

    #[test]
    fn test_missing_live_value_is_an_error() {
        let raw = r#"{
            "current": { "pm2_5": null, "us_aqi": 120.0 },
            "hourly": { "time": [], "pm2_5": [] }
        }"#;
        let payload: AirQualityResponse = serde_json::from_str(raw).unwrap();

        assert!(OpenMeteoRepository::map_reading(payload).is_err());
    }

    #[test]
    fn test_build_query_url() {
        let repo = OpenMeteoRepository::new(
            "https://air-quality-api.open-meteo.com/v1/air-quality/".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();

        let url = repo.build_query_url(Coordinates::new(31.5204, 74.3587));
        assert!(url.starts_with("https://air-quality-api.open-meteo.com/v1/air-quality?"));
        assert!(url.contains("latitude=31.5204"));
        assert!(url.contains("past_days=2"));
        assert!(url.contains("forecast_days=1"));
    }
}
